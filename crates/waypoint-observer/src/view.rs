//! Observer view
//!
//! Classifies delegated clicks through the link descriptor and decides
//! between dispatching a navigation intent, suppressing the default,
//! opening a new window, or leaving the browser alone.

use parking_lot::RwLock;
use std::sync::Arc;

use waypoint_context::Context;
use waypoint_history::NavigateIntent;
use waypoint_link::{Anchor, Link};
use waypoint_page::{Content, PageHandle};

use crate::module::ModuleView;
use crate::Result;

/// Opens an href outside the in-page pipeline (the host's `open`
/// primitive).
pub trait WindowOpener: Send + Sync {
    fn open(&self, href: &str);
}

/// Opener that records requested hrefs. Default for headless hosts.
#[derive(Default)]
pub struct RecordingOpener {
    opened: RwLock<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.read().clone()
    }
}

impl WindowOpener for RecordingOpener {
    fn open(&self, href: &str) {
        tracing::info!(href = %href, "opening in new window");
        self.opened.write().push(href.to_string());
    }
}

/// A delegated click reaching the observed root.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub anchor: Anchor,
}

impl ClickEvent {
    pub fn new(anchor: Anchor) -> Self {
        Self { anchor }
    }
}

/// What the observer decided for one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Default browser behavior proceeds untouched.
    Ignored,
    /// Default prevented; one navigation intent dispatched.
    Navigated { href: String },
    /// Default prevented, nothing dispatched. Avoids a redundant reload of
    /// the current location.
    Suppressed,
    /// Default prevented; href handed to the window opener.
    OpenedWindow { href: String },
}

impl ClickOutcome {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, ClickOutcome::Ignored)
    }
}

#[derive(Debug, Clone)]
pub struct ObserverConfig {
    /// Class that opts an anchor out of observation.
    pub opt_out_class: Option<String>,
    /// Event dispatched for eligible links.
    pub intent_event: String,
    /// Open foreign-origin self-target links in a new window instead of
    /// letting the browser leave the page.
    pub force_new_window: bool,
}

struct ViewState {
    bound: bool,
}

/// Binds click interception over the view root and performs the content
/// swap for the region it owns.
pub struct ObserverView {
    context: Context,
    page: PageHandle,
    config: Arc<ObserverConfig>,
    opener: Arc<dyn WindowOpener>,
    state: Arc<RwLock<ViewState>>,
}

impl ObserverView {
    pub fn new(context: Context, page: PageHandle, config: ObserverConfig) -> Self {
        Self {
            context,
            page,
            config: Arc::new(config),
            opener: Arc::new(RecordingOpener::new()),
            state: Arc::new(RwLock::new(ViewState { bound: true })),
        }
    }

    pub fn with_opener(mut self, opener: Arc<dyn WindowOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn is_bound(&self) -> bool {
        self.state.read().bound
    }

    /// Classify one click. Dispatches at most one navigation intent.
    pub fn on_click(&self, event: &ClickEvent) -> Result<ClickOutcome> {
        if !self.state.read().bound {
            return Ok(ClickOutcome::Ignored);
        }

        if let Some(class) = self.config.opt_out_class.as_deref() {
            if event.anchor.has_class(class) {
                return Ok(ClickOutcome::Ignored);
            }
        }

        let reference = self.page.read().location().clone();
        let link = Link::from_anchor(&event.anchor, &reference)?;

        if link.is_download() || link.is_mailto() || link.is_javascript() {
            return Ok(ClickOutcome::Ignored);
        }

        if !link.is_target_self() {
            return Ok(ClickOutcome::Ignored);
        }

        if link.is_same_origin() {
            if !link.is_same_pathname() || !link.is_same_search() {
                let href = link.href().to_string();
                tracing::debug!(href = %href, "dispatching navigation intent");
                self.context.bus().dispatch(
                    &self.config.intent_event,
                    NavigateIntent::new(href.clone()).to_value(),
                );
                return Ok(ClickOutcome::Navigated { href });
            }

            if link.is_same_hash() {
                // Same path, search and hash: reloading would be redundant.
                return Ok(ClickOutcome::Suppressed);
            }

            // Only the hash differs; keep the default anchor scroll.
            return Ok(ClickOutcome::Ignored);
        }

        if self.config.force_new_window {
            let href = link.href().to_string();
            self.opener.open(&href);
            return Ok(ClickOutcome::OpenedWindow { href });
        }

        Ok(ClickOutcome::Ignored)
    }
}

impl Clone for ObserverView {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            page: Arc::clone(&self.page),
            config: Arc::clone(&self.config),
            opener: Arc::clone(&self.opener),
            state: Arc::clone(&self.state),
        }
    }
}

impl ModuleView for ObserverView {
    fn name(&self) -> &str {
        "observer"
    }

    fn destroy(&mut self) {
        self.state.write().bound = false;
    }

    fn replace(&mut self, content: &Content) -> Result<()> {
        self.page.write().replace_content(content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use url::Url;
    use waypoint_page::Page;

    const INTENT: &str = "*:navigate";

    fn page() -> PageHandle {
        Page::new(
            Url::parse("https://example.com/a/?x=1").unwrap(),
            "A",
            "<p>a</p>",
        )
        .shared()
    }

    fn config() -> ObserverConfig {
        ObserverConfig {
            opt_out_class: Some("no-singlepage".to_string()),
            intent_event: INTENT.to_string(),
            force_new_window: false,
        }
    }

    fn intents(context: &Context) -> Arc<Mutex<Vec<NavigateIntent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        context.bus().subscribe(INTENT, move |_, payload| {
            if let Some(intent) = NavigateIntent::from_value(payload) {
                seen_clone.lock().push(intent);
            }
        });
        seen
    }

    fn click(href: &str) -> ClickEvent {
        ClickEvent::new(Anchor::new(href))
    }

    #[test]
    fn test_different_pathname_dispatches_one_intent() {
        let context = Context::new();
        let seen = intents(&context);
        let view = ObserverView::new(context, page(), config());

        let outcome = view.on_click(&click("/b/")).unwrap();

        assert_eq!(
            outcome,
            ClickOutcome::Navigated {
                href: "https://example.com/b/".to_string()
            }
        );
        assert!(outcome.prevents_default());
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(seen.lock()[0].href, "https://example.com/b/");
        assert!(!seen.lock()[0].keep_state);
    }

    #[test]
    fn test_different_search_dispatches_intent() {
        let context = Context::new();
        let seen = intents(&context);
        let view = ObserverView::new(context, page(), config());

        let outcome = view.on_click(&click("/a/?x=2")).unwrap();
        assert!(matches!(outcome, ClickOutcome::Navigated { .. }));
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_identical_location_is_suppressed() {
        let context = Context::new();
        let seen = intents(&context);
        let view = ObserverView::new(context, page(), config());

        let outcome = view.on_click(&click("/a/?x=1")).unwrap();
        assert_eq!(outcome, ClickOutcome::Suppressed);
        assert!(outcome.prevents_default());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_hash_only_difference_keeps_default() {
        let context = Context::new();
        let seen = intents(&context);
        let view = ObserverView::new(context, page(), config());

        let outcome = view.on_click(&click("/a/?x=1#section")).unwrap();
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(!outcome.prevents_default());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_reordered_search_is_same_location() {
        let context = Context::new();
        let page = Page::new(
            Url::parse("https://example.com/a/?a=1&b=2").unwrap(),
            "A",
            "",
        )
        .shared();
        let seen = intents(&context);
        let view = ObserverView::new(context, page, config());

        let outcome = view.on_click(&click("/a/?b=2&a=1")).unwrap();
        assert_eq!(outcome, ClickOutcome::Suppressed);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_special_links_are_ignored() {
        let context = Context::new();
        let seen = intents(&context);
        let view = ObserverView::new(context, page(), config());

        for anchor in [
            Anchor::new("/report.pdf").with_download(),
            Anchor::new("mailto:hi@example.com"),
            Anchor::new("javascript:void(0)"),
            Anchor::new("/b/").with_target("_blank"),
        ] {
            let outcome = view.on_click(&ClickEvent::new(anchor)).unwrap();
            assert_eq!(outcome, ClickOutcome::Ignored);
        }

        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_opt_out_class_is_ignored() {
        let context = Context::new();
        let seen = intents(&context);
        let view = ObserverView::new(context, page(), config());

        let anchor = Anchor::new("/b/").with_class("no-singlepage");
        let outcome = view.on_click(&ClickEvent::new(anchor)).unwrap();

        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_cross_origin_without_policy_is_ignored() {
        let context = Context::new();
        let seen = intents(&context);
        let view = ObserverView::new(context, page(), config());

        let outcome = view.on_click(&click("https://other.com/b/")).unwrap();
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_cross_origin_with_policy_opens_window() {
        let context = Context::new();
        let seen = intents(&context);
        let opener = Arc::new(RecordingOpener::new());

        let mut config = config();
        config.force_new_window = true;
        let view = ObserverView::new(context, page(), config)
            .with_opener(Arc::clone(&opener) as Arc<dyn WindowOpener>);

        let outcome = view.on_click(&click("https://other.com/b/")).unwrap();

        assert_eq!(
            outcome,
            ClickOutcome::OpenedWindow {
                href: "https://other.com/b/".to_string()
            }
        );
        assert_eq!(opener.opened(), vec!["https://other.com/b/".to_string()]);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_destroyed_view_ignores_clicks() {
        let context = Context::new();
        let seen = intents(&context);
        let mut view = ObserverView::new(context, page(), config());

        view.destroy();
        let outcome = view.on_click(&click("/b/")).unwrap();

        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_replace_swaps_page_content() {
        let page = page();
        let mut view = ObserverView::new(Context::new(), Arc::clone(&page), config());

        view.replace(&Content::Markup("<p>new</p>".to_string()))
            .unwrap();
        assert_eq!(page.read().content(), "<p>new</p>");
    }
}
