//! Bootstrap wiring and engine facade
//!
//! One call wires the whole navigation stack into an application context:
//! observer view over the view root, navigate handler, translate defaults
//! and exactly one history adapter. Wiring is guarded by a registry key
//! and by the history capability check.

use serde_json::Value;
use std::sync::Arc;

use waypoint_context::Context;
use waypoint_history::{HistoryAdapter, HistoryState, NavigateIntent, SessionHistory};
use waypoint_observer::{
    ClickEvent, ClickOutcome, ModuleViewRegistry, ObserverView, SharedModuleViews, WindowOpener,
};
use waypoint_page::{PageHandle, RecordingExecutor, ScriptExecutor};
use waypoint_transition::{Fetch, Orchestrator};

use crate::settings::NavigationSettings;
use crate::Result;

/// Registry key marking a context as bootstrapped.
pub const BOOTSTRAP_KEY: &str = "singlepage:bootstrapped";

/// Host-provided capabilities the wiring needs.
pub struct BootstrapOptions {
    fetcher: Arc<dyn Fetch>,
    executor: Arc<dyn ScriptExecutor>,
    opener: Option<Arc<dyn WindowOpener>>,
}

impl BootstrapOptions {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            executor: Arc::new(RecordingExecutor::new()),
            opener: None,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn ScriptExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_opener(mut self, opener: Arc<dyn WindowOpener>) -> Self {
        self.opener = Some(opener);
        self
    }
}

/// Register the views the engine itself brings to the swap region.
pub fn initialize_modules(views: &SharedModuleViews, observer: &ObserverView) {
    views.write().register_persistent(Box::new(observer.clone()));
}

/// Tear down the content-scoped views. Wired to the destroy event.
pub fn destroy_modules(views: &SharedModuleViews) {
    views.write().destroy_transient();
}

/// Wire the navigation engine into `context` once.
///
/// Returns `Ok(None)` without wiring anything when the context is already
/// bootstrapped or when the history backend reports no support; in the
/// latter case the application keeps native browser navigation.
///
/// Custom translate handlers must be subscribed before this call; the
/// pass-through defaults are only installed for translate events nobody
/// listens to yet.
pub fn bootstrap(
    context: &Context,
    page: PageHandle,
    backend: Arc<dyn SessionHistory>,
    options: BootstrapOptions,
    settings: NavigationSettings,
) -> Result<Option<Engine>> {
    if context.registry().has_wiring(BOOTSTRAP_KEY) {
        tracing::debug!("navigation already bootstrapped, skipping");
        return Ok(None);
    }

    if !backend.is_supported() {
        tracing::info!("session history unsupported, keeping native navigation");
        return Ok(None);
    }

    settings.validate()?;

    let views = ModuleViewRegistry::shared();
    let mut observer = ObserverView::new(
        context.clone(),
        Arc::clone(&page),
        settings.observer_config(),
    );
    if let Some(opener) = options.opener {
        observer = observer.with_opener(opener);
    }
    initialize_modules(&views, &observer);

    let history = Arc::new(HistoryAdapter::new(
        context.clone(),
        Arc::clone(&page),
        backend,
        settings.event_name.clone(),
    ));

    let orchestrator = Arc::new(Orchestrator::new(
        context.clone(),
        Arc::clone(&page),
        Arc::clone(&views),
        Arc::clone(&history),
        options.fetcher,
        options.executor,
        settings.transition_config(),
    ));

    // Every intent spawns an independent pipeline; there is no queue and
    // no cancellation of in-flight navigations.
    let pipeline = Arc::clone(&orchestrator);
    context
        .bus()
        .subscribe(&settings.event_name, move |_, payload| {
            match NavigateIntent::from_value(payload) {
                Some(intent) => {
                    let pipeline = Arc::clone(&pipeline);
                    tokio::spawn(async move { pipeline.run(intent).await });
                }
                None => tracing::warn!("navigate event without a valid intent payload"),
            }
        });

    for event in [
        settings.translate_in_event.clone(),
        settings.translate_out_event.clone(),
    ] {
        if context.bus().subscriber_count(&event) > 0 {
            continue;
        }
        let done = format!("{event}:done");
        let bus_context = context.clone();
        context.bus().subscribe(&event, move |_, _| {
            bus_context.bus().dispatch(&done, Value::Null);
        });
    }

    let teardown_views = Arc::clone(&views);
    context
        .bus()
        .subscribe(&settings.destroy_event, move |_, _| {
            destroy_modules(&teardown_views);
        });

    context.registry().wire_value(BOOTSTRAP_KEY, Value::Bool(true));
    tracing::info!(event = %settings.event_name, root = %settings.view_root, "navigation bootstrapped");

    Ok(Some(Engine {
        context: context.clone(),
        page,
        views,
        observer,
        history,
        orchestrator,
        settings,
    }))
}

/// The wired navigation engine. Hosts feed it clicks and pop
/// notifications; everything else runs over the context's event bus.
pub struct Engine {
    context: Context,
    page: PageHandle,
    views: SharedModuleViews,
    observer: ObserverView,
    history: Arc<HistoryAdapter>,
    orchestrator: Arc<Orchestrator>,
    settings: NavigationSettings,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    pub fn views(&self) -> &SharedModuleViews {
        &self.views
    }

    pub fn observer(&self) -> &ObserverView {
        &self.observer
    }

    pub fn history(&self) -> &HistoryAdapter {
        &self.history
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Classify one delegated click, dispatching an intent if eligible.
    pub fn handle_click(&self, event: &ClickEvent) -> Result<ClickOutcome> {
        Ok(self.observer.on_click(event)?)
    }

    /// Feed a history pop notification from the host.
    pub fn handle_pop(&self, state: Option<HistoryState>) {
        self.history.handle_pop(state);
    }

    /// Run one navigation pipeline to settlement.
    pub async fn navigate(&self, href: &str) {
        self.orchestrator.run(NavigateIntent::new(href)).await;
    }
}
