//! Session-history backends

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::Result;

/// The persisted shape of one history entry. The index increases
/// monotonically with every push and is what pop handling uses to derive
/// navigation direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub href: String,
    pub index: i64,
}

/// The host's session-history mechanism.
///
/// Implementations wrap whatever the platform provides; push and replace
/// are allowed to fail, and the adapter treats any failure as permanent
/// (degraded mode).
pub trait SessionHistory: Send + Sync {
    /// Whether the mechanism exists at all. When this is false the
    /// bootstrap command wires nothing and native navigation takes over.
    fn is_supported(&self) -> bool;

    /// Replace the current entry.
    fn replace(&self, state: HistoryState) -> Result<()>;

    /// Push a new entry, truncating any forward entries.
    fn push(&self, state: HistoryState) -> Result<()>;

    /// The href of the current entry.
    fn current_href(&self) -> String;

    /// Full page load fallback. Infallible by contract: there is nothing
    /// left to recover to beyond it.
    fn hard_navigate(&self, href: &str);
}

struct MemoryState {
    current: HistoryState,
    back: Vec<HistoryState>,
    forward: Vec<HistoryState>,
    hard_navigations: Vec<String>,
    replace_calls: usize,
    push_calls: usize,
    failing: bool,
}

/// In-memory backend with back/forward stacks. Serves headless hosts and
/// every test that would otherwise need a browser.
pub struct MemorySessionHistory {
    state: Mutex<MemoryState>,
    supported: bool,
}

impl MemorySessionHistory {
    pub fn new(initial_href: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                current: HistoryState {
                    href: initial_href.into(),
                    index: 0,
                },
                back: Vec::new(),
                forward: Vec::new(),
                hard_navigations: Vec::new(),
                replace_calls: 0,
                push_calls: 0,
                failing: false,
            }),
            supported: true,
        }
    }

    /// A backend whose capability check fails.
    pub fn unsupported(initial_href: impl Into<String>) -> Self {
        Self {
            supported: false,
            ..Self::new(initial_href)
        }
    }

    /// Make subsequent push/replace calls fail, for degraded-mode tests.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    /// Step one entry back; returns the newly current state, the way a
    /// pop notification would report it.
    pub fn go_back(&self) -> Option<HistoryState> {
        let mut state = self.state.lock();
        let previous = state.back.pop()?;
        let old = std::mem::replace(&mut state.current, previous);
        state.forward.push(old);
        Some(state.current.clone())
    }

    /// Step one entry forward; returns the newly current state.
    pub fn go_forward(&self) -> Option<HistoryState> {
        let mut state = self.state.lock();
        let next = state.forward.pop()?;
        let old = std::mem::replace(&mut state.current, next);
        state.back.push(old);
        Some(state.current.clone())
    }

    /// Step `delta` entries (negative = back). Returns the final state,
    /// mirroring how a multi-step pop reports only the landing entry.
    pub fn go(&self, delta: i64) -> Option<HistoryState> {
        let mut landed = None;
        for _ in 0..delta.unsigned_abs() {
            landed = if delta < 0 {
                self.go_back()
            } else {
                self.go_forward()
            };
            landed.as_ref()?;
        }
        landed
    }

    pub fn current_state(&self) -> HistoryState {
        self.state.lock().current.clone()
    }

    pub fn hard_navigations(&self) -> Vec<String> {
        self.state.lock().hard_navigations.clone()
    }

    pub fn replace_calls(&self) -> usize {
        self.state.lock().replace_calls
    }

    pub fn push_calls(&self) -> usize {
        self.state.lock().push_calls
    }
}

impl SessionHistory for MemorySessionHistory {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn replace(&self, new: HistoryState) -> Result<()> {
        let mut state = self.state.lock();
        state.replace_calls += 1;
        if state.failing {
            return Err(crate::HistoryError::Backend(
                "replace rejected".to_string(),
            ));
        }
        state.current = new;
        Ok(())
    }

    fn push(&self, new: HistoryState) -> Result<()> {
        let mut state = self.state.lock();
        state.push_calls += 1;
        if state.failing {
            return Err(crate::HistoryError::Backend("push rejected".to_string()));
        }
        let old = std::mem::replace(&mut state.current, new);
        state.back.push(old);
        state.forward.clear();
        Ok(())
    }

    fn current_href(&self) -> String {
        self.state.lock().current.href.clone()
    }

    fn hard_navigate(&self, href: &str) {
        tracing::info!(href = %href, "hard navigation");
        self.state.lock().hard_navigations.push(href.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_back_forward() {
        let history = MemorySessionHistory::new("https://example.com/a/");

        history
            .push(HistoryState {
                href: "https://example.com/b/".to_string(),
                index: 1,
            })
            .unwrap();
        history
            .push(HistoryState {
                href: "https://example.com/c/".to_string(),
                index: 2,
            })
            .unwrap();

        let popped = history.go_back().unwrap();
        assert_eq!(popped.index, 1);

        let popped = history.go_forward().unwrap();
        assert_eq!(popped.index, 2);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemorySessionHistory::new("https://example.com/a/");
        history
            .push(HistoryState {
                href: "https://example.com/b/".to_string(),
                index: 1,
            })
            .unwrap();
        history.go_back().unwrap();

        history
            .push(HistoryState {
                href: "https://example.com/c/".to_string(),
                index: 2,
            })
            .unwrap();

        assert!(history.go_forward().is_none());
    }

    #[test]
    fn test_multi_step_go() {
        let history = MemorySessionHistory::new("https://example.com/a/");
        for (i, path) in ["/b/", "/c/"].iter().enumerate() {
            history
                .push(HistoryState {
                    href: format!("https://example.com{path}"),
                    index: (i + 1) as i64,
                })
                .unwrap();
        }

        let landed = history.go(-2).unwrap();
        assert_eq!(landed.index, 0);

        let landed = history.go(2).unwrap();
        assert_eq!(landed.index, 2);
    }

    #[test]
    fn test_failure_injection() {
        let history = MemorySessionHistory::new("https://example.com/a/");
        history.set_failing(true);

        assert!(history
            .push(HistoryState {
                href: "https://example.com/b/".to_string(),
                index: 1,
            })
            .is_err());
        assert_eq!(history.current_href(), "https://example.com/a/");
    }
}
