//! History adapter
//!
//! Mediates every history mutation the navigation pipeline performs and
//! turns pop notifications into navigation-intent events. After any
//! backend failure the adapter degrades permanently: all further
//! navigations become full page loads.

use std::sync::Arc;

use parking_lot::Mutex;
use waypoint_context::Context;
use waypoint_page::PageHandle;

use crate::backend::{HistoryState, SessionHistory};
use crate::intent::NavigateIntent;

struct AdapterState {
    degraded: bool,
    /// Index of the entry the page currently sits on. The only piece of
    /// state shared between overlapping pipelines that is serialized.
    last_index: i64,
}

pub struct HistoryAdapter {
    context: Context,
    page: PageHandle,
    backend: Arc<dyn SessionHistory>,
    event_name: String,
    state: Mutex<AdapterState>,
}

impl HistoryAdapter {
    /// Wraps `backend`, replacing the current entry with an indexed one so
    /// later pops can report a direction. A failing replace flips the
    /// adapter straight into degraded mode; the error does not surface.
    pub fn new(
        context: Context,
        page: PageHandle,
        backend: Arc<dyn SessionHistory>,
        event_name: impl Into<String>,
    ) -> Self {
        let current = backend.current_href();
        let mut degraded = false;

        if let Err(e) = backend.replace(HistoryState {
            href: current,
            index: 0,
        }) {
            tracing::warn!(error = %e, "history backend rejected initial replace, degrading");
            degraded = true;
        }

        Self {
            context,
            page,
            backend,
            event_name: event_name.into(),
            state: Mutex::new(AdapterState {
                degraded,
                last_index: 0,
            }),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.state.lock().degraded
    }

    /// Record a navigation: push an entry with the next index and set the
    /// document title when one is given. In degraded mode, or when the
    /// push fails, falls back to a hard navigation. Never fails.
    pub fn navigate(&self, href: &str, title: Option<&str>) {
        // The index counter stays locked across the push so overlapping
        // pipelines cannot claim the same entry index.
        let mut state = self.state.lock();
        if state.degraded {
            drop(state);
            self.backend.hard_navigate(href);
            return;
        }

        let next_index = state.last_index + 1;
        match self.backend.push(HistoryState {
            href: href.to_string(),
            index: next_index,
        }) {
            Ok(()) => {
                state.last_index = next_index;
                drop(state);

                let mut page = self.page.write();
                if let Some(title) = title {
                    page.set_title(title);
                }
                if let Ok(location) = page.location().join(href) {
                    page.set_location(location);
                }

                tracing::debug!(href = %href, index = next_index, "history entry pushed");
            }
            Err(e) => {
                state.degraded = true;
                drop(state);

                tracing::warn!(error = %e, href = %href, "history push failed, degrading");
                self.backend.hard_navigate(href);
            }
        }
    }

    /// Handle a pop notification from the backend. The popped state's href
    /// (or the current location when the state is absent) and the signed
    /// index delta are dispatched as a navigation intent with
    /// `keepState: true`. A multi-step pop yields the full delta, not ±1.
    pub fn handle_pop(&self, popped: Option<HistoryState>) {
        let (href, index) = match popped {
            Some(state) => (state.href, state.index),
            None => (self.backend.current_href(), 0),
        };

        let direction = {
            let mut state = self.state.lock();
            let delta = index - state.last_index;
            state.last_index = index;
            delta
        };

        tracing::debug!(href = %href, direction, "history pop");

        let intent = NavigateIntent {
            href,
            keep_state: true,
            direction: Some(direction),
        };
        self.context.bus().dispatch(&self.event_name, intent.to_value());
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }
}
