//! Navigation orchestrator
//!
//! Drives one navigation request through the transition pipeline. Every
//! step settles before the next begins; the translate hooks suspend the
//! pipeline cooperatively until their `:done` signal. There is no
//! cancellation and no queue: overlapping intents run as independent
//! pipelines over the same page, views and adapter.

use serde_json::{json, Value};
use std::sync::Arc;

use waypoint_context::Context;
use waypoint_history::{HistoryAdapter, NavigateIntent};
use waypoint_link::Link;
use waypoint_observer::SharedModuleViews;
use waypoint_page::{extract, Content, Extracted, PageHandle, ScriptExecutor};

use crate::fetch::Fetch;
use crate::request::{Direction, NavigationRequest, Outcome};
use crate::state::TransitionState;
use crate::Result;

/// Event names and parse settings for the pipeline, frozen at wiring time.
#[derive(Debug, Clone)]
pub struct TransitionConfig {
    /// Base name for lifecycle events (`:init`, `:start`, `:end`, `:fail`,
    /// `:done` are appended).
    pub base_event: String,
    pub translate_in_event: String,
    pub translate_out_event: String,
    /// Module lifecycle events, dispatched with the swap root.
    pub initialize_event: String,
    pub destroy_event: String,
    pub swap_selector: String,
    /// Ids of inline scripts re-executed after a swap.
    pub script_ids: Vec<String>,
    /// Ids of styles and stylesheet links re-applied after a swap.
    pub style_ids: Vec<String>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            base_event: "*:navigate".to_string(),
            translate_in_event: "*:translate-in".to_string(),
            translate_out_event: "*:translate-out".to_string(),
            initialize_event: "application:start".to_string(),
            destroy_event: "application:stop".to_string(),
            swap_selector: "#main".to_string(),
            script_ids: Vec::new(),
            style_ids: Vec::new(),
        }
    }
}

pub struct Orchestrator {
    context: Context,
    page: PageHandle,
    views: SharedModuleViews,
    history: Arc<HistoryAdapter>,
    fetcher: Arc<dyn Fetch>,
    executor: Arc<dyn ScriptExecutor>,
    config: TransitionConfig,
}

impl Orchestrator {
    pub fn new(
        context: Context,
        page: PageHandle,
        views: SharedModuleViews,
        history: Arc<HistoryAdapter>,
        fetcher: Arc<dyn Fetch>,
        executor: Arc<dyn ScriptExecutor>,
        config: TransitionConfig,
    ) -> Self {
        Self {
            context,
            page,
            views,
            history,
            fetcher,
            executor,
            config,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Run one navigation to settlement. Fetch and parse failures take the
    /// failure branch and still emit translate-out and `:done`; nothing
    /// escapes to the caller.
    pub async fn run(&self, intent: NavigateIntent) {
        let reference = self.page.read().location().clone();
        let link = match Link::from_href(&intent.href, &reference) {
            Ok(link) => link,
            Err(e) => {
                tracing::error!(href = %intent.href, error = %e, "unresolvable navigation target");
                return;
            }
        };

        let previous_title = self.page.read().title().to_string();
        let mut request = NavigationRequest::new(
            link,
            previous_title,
            intent.keep_state,
            Direction::from_delta(intent.direction),
        );

        tracing::info!(
            id = %request.id,
            href = %request.link.href(),
            direction = request.direction.as_str(),
            "navigation started"
        );

        if let Err(e) = self.drive(&mut request).await {
            tracing::error!(id = %request.id, error = %e, "navigation pipeline aborted");
            return;
        }

        tracing::info!(
            id = %request.id,
            outcome = ?request.outcome,
            "navigation settled"
        );
    }

    async fn drive(&self, request: &mut NavigationRequest) -> Result<()> {
        request.advance(TransitionState::Init)?;
        self.emit(":init", &self.current_title());

        request.advance(TransitionState::TranslateIn)?;
        self.translate(&self.config.translate_in_event, "in", request)
            .await;

        request.advance(TransitionState::Requesting)?;
        let extracted = self.request_and_parse(request).await;

        match extracted {
            Some(extracted) => {
                request.advance(TransitionState::ParseSuccess)?;
                self.apply(request, extracted)?;
            }
            None => {
                request.advance(TransitionState::ParseFailure)?;
                request.outcome = Outcome::Failure;
                // Failure replaces the `:start`/`:end` pair. No content or
                // history mutation happened.
                self.emit(":fail", &self.current_title());
            }
        }

        request.advance(TransitionState::TranslateOut)?;
        self.translate(&self.config.translate_out_event, "out", request)
            .await;

        request.advance(TransitionState::Done)?;
        self.emit(":done", &self.current_title());

        Ok(())
    }

    /// Fetch the target and parse the response. Any shortfall — transport
    /// error, non-success status, missing or empty swap fragment — lands
    /// on the failure branch rather than surfacing.
    async fn request_and_parse(&self, request: &NavigationRequest) -> Option<Extracted> {
        let fetched = match self.fetcher.fetch(request.link.url()).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(id = %request.id, error = %e, "fetch failed");
                return None;
            }
        };

        if !fetched.is_success() {
            tracing::warn!(id = %request.id, status = fetched.status, "non-success response");
            return None;
        }

        let extracted = match extract(
            &fetched.body,
            &self.config.swap_selector,
            &self.config.script_ids,
            &self.config.style_ids,
        ) {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::warn!(id = %request.id, error = %e, "response parse failed");
                return None;
            }
        };

        if extracted.fragment.is_none() {
            tracing::warn!(
                id = %request.id,
                selector = %self.config.swap_selector,
                "swap target missing or empty in response"
            );
            return None;
        }

        Some(extracted)
    }

    /// The success path: notify, tear down, swap, record history, re-apply
    /// assets, bring modules back up.
    fn apply(&self, request: &mut NavigationRequest, extracted: Extracted) -> Result<()> {
        let title = extracted
            .title
            .clone()
            .unwrap_or_else(|| request.previous_title.clone());

        self.emit(":start", &title);

        let root = json!({ "root": self.config.swap_selector });
        self.context
            .bus()
            .dispatch(&self.config.destroy_event, root.clone());

        let content = Content::Markup(extracted.fragment.clone().unwrap_or_default());
        self.views.write().replace_all(&content)?;

        if request.keep_state {
            // The history entry already exists (pop); only the title moves.
            self.page.write().set_title(&title);
        } else {
            self.history.navigate(request.link.href(), Some(&title));
        }

        for script in &extracted.scripts {
            if let Err(e) = self.executor.execute(script) {
                tracing::warn!(id = %script.id, error = %e, "inline script failed");
            }
        }

        {
            let mut page = self.page.write();
            for style in &extracted.styles {
                page.append_head_asset(style.clone());
            }
        }

        self.context.bus().dispatch(&self.config.initialize_event, root);

        self.emit(":end", &title);

        request.extracted = Some(extracted);
        request.outcome = Outcome::Success;
        Ok(())
    }

    /// Emit a translate event and suspend until its `:done` signal. A
    /// handler that never signals stalls this pipeline indefinitely; the
    /// contract assumes handlers always complete.
    async fn translate(&self, event: &str, phase: &str, request: &NavigationRequest) {
        let done_event = format!("{event}:done");
        let waiter = self.context.bus().wait_for(&done_event);

        let payload = json!({
            "translate": phase,
            "direction": request.direction.as_str(),
            "link": serde_json::to_value(&request.link).unwrap_or(Value::Null),
            "title": self.current_title(),
        });
        self.context.bus().dispatch(event, payload);

        if waiter.await.is_err() {
            tracing::warn!(event = %event, "translate waiter dropped without signal");
        }
    }

    fn emit(&self, suffix: &str, title: &str) {
        let event = format!("{}{}", self.config.base_event, suffix);
        self.context.bus().dispatch(&event, json!({ "title": title }));
    }

    fn current_title(&self) -> String {
        self.page.read().title().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use url::Url;
    use waypoint_history::MemorySessionHistory;
    use waypoint_observer::{ModuleViewRegistry, ObserverConfig, ObserverView};
    use waypoint_page::{Page, RecordingExecutor};

    use crate::fetch::FetchedPage;

    const RESPONSE: &str = concat!(
        "<!doctype html><html><head><title>New</title>",
        "<style id=\"theme\">.x{}</style></head>",
        "<body><script id=\"setup\">boot();</script>",
        "<div id=\"main\">X</div>",
        "<script id=\"analytics\">track();</script></body></html>",
    );

    struct StubFetch {
        status: u16,
        body: String,
    }

    #[async_trait]
    impl Fetch for StubFetch {
        async fn fetch(&self, _url: &Url) -> crate::Result<FetchedPage> {
            Ok(FetchedPage {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    struct Harness {
        context: Context,
        page: PageHandle,
        backend: Arc<MemorySessionHistory>,
        executor: Arc<RecordingExecutor>,
        events: Arc<Mutex<Vec<String>>>,
        orchestrator: Orchestrator,
    }

    fn harness(status: u16, body: &str, config: TransitionConfig) -> Harness {
        let context = Context::new();
        let page = Page::new(
            Url::parse("https://example.com/a/").unwrap(),
            "Old",
            "<p>old</p>",
        )
        .shared();

        let backend = Arc::new(MemorySessionHistory::new("https://example.com/a/"));
        let history = Arc::new(HistoryAdapter::new(
            context.clone(),
            Arc::clone(&page),
            Arc::clone(&backend) as Arc<dyn waypoint_history::SessionHistory>,
            config.base_event.clone(),
        ));

        let views = ModuleViewRegistry::shared();
        let observer = ObserverView::new(
            context.clone(),
            Arc::clone(&page),
            ObserverConfig {
                opt_out_class: None,
                intent_event: config.base_event.clone(),
                force_new_window: false,
            },
        );
        views.write().register(Box::new(observer));

        let executor = Arc::new(RecordingExecutor::new());

        // Immediate-completion translate handlers, the same wiring the
        // bootstrap command installs by default.
        for event in [&config.translate_in_event, &config.translate_out_event] {
            let bus_context = context.clone();
            let done = format!("{event}:done");
            context.bus().subscribe(event, move |_, _| {
                bus_context.bus().dispatch(&done, Value::Null);
            });
        }

        // Record the observable event order.
        let events = Arc::new(Mutex::new(Vec::new()));
        for event in [
            format!("{}:init", config.base_event),
            config.translate_in_event.clone(),
            format!("{}:start", config.base_event),
            config.destroy_event.clone(),
            config.initialize_event.clone(),
            format!("{}:end", config.base_event),
            format!("{}:fail", config.base_event),
            config.translate_out_event.clone(),
            format!("{}:done", config.base_event),
        ] {
            let events_clone = Arc::clone(&events);
            context.bus().subscribe(&event, move |name, _| {
                events_clone.lock().push(name.to_string());
            });
        }

        let orchestrator = Orchestrator::new(
            context.clone(),
            Arc::clone(&page),
            views,
            history,
            Arc::new(StubFetch {
                status,
                body: body.to_string(),
            }),
            Arc::clone(&executor) as Arc<dyn ScriptExecutor>,
            config,
        );

        Harness {
            context,
            page,
            backend,
            executor,
            events,
            orchestrator,
        }
    }

    fn config_with_assets() -> TransitionConfig {
        TransitionConfig {
            script_ids: vec!["setup".to_string(), "analytics".to_string()],
            style_ids: vec!["theme".to_string()],
            ..TransitionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_successful_navigation_event_sequence() {
        let h = harness(200, RESPONSE, TransitionConfig::default());

        h.orchestrator
            .run(NavigateIntent::new("https://example.com/b/"))
            .await;

        let events = h.events.lock();
        assert_eq!(
            events.as_slice(),
            [
                "*:navigate:init",
                "*:translate-in",
                "*:navigate:start",
                "application:stop",
                "application:start",
                "*:navigate:end",
                "*:translate-out",
                "*:navigate:done",
            ]
        );
    }

    #[tokio::test]
    async fn test_successful_navigation_swaps_and_records_history() {
        let h = harness(200, RESPONSE, TransitionConfig::default());

        h.orchestrator
            .run(NavigateIntent::new("https://example.com/b/"))
            .await;

        assert_eq!(h.page.read().title(), "New");
        assert_eq!(h.page.read().content(), "X");
        assert_eq!(h.page.read().location().as_str(), "https://example.com/b/");
        assert_eq!(h.backend.push_calls(), 1);
        assert_eq!(h.backend.current_state().href, "https://example.com/b/");
        assert_eq!(h.backend.current_state().index, 1);
    }

    #[tokio::test]
    async fn test_failed_navigation_event_sequence() {
        let h = harness(500, "boom", TransitionConfig::default());

        h.orchestrator
            .run(NavigateIntent::new("https://example.com/b/"))
            .await;

        let events = h.events.lock();
        assert_eq!(
            events.as_slice(),
            [
                "*:navigate:init",
                "*:translate-in",
                "*:navigate:fail",
                "*:translate-out",
                "*:navigate:done",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_navigation_leaves_page_and_history_untouched() {
        let h = harness(500, "boom", TransitionConfig::default());

        h.orchestrator
            .run(NavigateIntent::new("https://example.com/b/"))
            .await;

        assert_eq!(h.page.read().title(), "Old");
        assert_eq!(h.page.read().content(), "<p>old</p>");
        assert_eq!(h.backend.push_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_fragment_is_failure() {
        let h = harness(
            200,
            "<title>New</title><div id=\"main\">   </div>",
            TransitionConfig::default(),
        );

        h.orchestrator
            .run(NavigateIntent::new("https://example.com/b/"))
            .await;

        assert!(h.events.lock().contains(&"*:navigate:fail".to_string()));
        assert_eq!(h.page.read().content(), "<p>old</p>");
    }

    #[tokio::test]
    async fn test_keep_state_skips_history_update() {
        let h = harness(200, RESPONSE, TransitionConfig::default());

        let intent = NavigateIntent {
            href: "https://example.com/b/".to_string(),
            keep_state: true,
            direction: Some(-1),
        };
        h.orchestrator.run(intent).await;

        assert_eq!(h.backend.push_calls(), 0);
        assert_eq!(h.page.read().title(), "New");
        assert_eq!(h.page.read().content(), "X");
    }

    #[tokio::test]
    async fn test_scripts_and_styles_applied_in_document_order() {
        let h = harness(200, RESPONSE, config_with_assets());

        h.orchestrator
            .run(NavigateIntent::new("https://example.com/b/"))
            .await;

        assert_eq!(h.executor.executed(), vec!["setup", "analytics"]);
        let page = h.page.read();
        let head_ids: Vec<_> = page.head_assets().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(head_ids, vec!["theme"]);
    }

    #[tokio::test]
    async fn test_translate_payload_direction() {
        let h = harness(200, RESPONSE, TransitionConfig::default());

        let directions = Arc::new(Mutex::new(Vec::new()));
        let directions_clone = Arc::clone(&directions);
        h.context.bus().subscribe("*:translate-in", move |_, payload| {
            directions_clone
                .lock()
                .push(payload["direction"].as_str().unwrap_or("").to_string());
        });

        let intent = NavigateIntent {
            href: "https://example.com/b/".to_string(),
            keep_state: true,
            direction: Some(-3),
        };
        h.orchestrator.run(intent).await;

        assert_eq!(directions.lock().as_slice(), ["backward"]);
    }

    #[tokio::test]
    async fn test_unresolvable_href_emits_nothing() {
        let h = harness(200, RESPONSE, TransitionConfig::default());

        h.orchestrator
            .run(NavigateIntent::new("https://exa mple/###"))
            .await;

        // Link construction failures abort before `:init`.
        assert!(h.events.lock().is_empty());
    }
}
