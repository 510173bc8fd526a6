//! In-flight navigation request

use uuid::Uuid;

use waypoint_link::Link;
use waypoint_page::Extracted;

use crate::error::TransitionError;
use crate::state::TransitionState;
use crate::Result;

/// Transition direction, shown to translate handlers. Derived from the
/// signed index delta of the originating intent; anything non-negative
/// (including the default) is forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_delta(delta: Option<i64>) -> Self {
        match delta {
            Some(d) if d < 0 => Direction::Backward,
            _ => Direction::Forward,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Success,
    Failure,
}

/// One navigation in flight. Created when the navigate event fires and
/// dropped when the pipeline settles; nothing persists across navigations
/// apart from the page, the view registry and the history adapter.
pub struct NavigationRequest {
    pub id: Uuid,
    pub link: Link,
    pub previous_title: String,
    pub keep_state: bool,
    pub direction: Direction,
    pub outcome: Outcome,
    pub extracted: Option<Extracted>,
    state: TransitionState,
}

impl NavigationRequest {
    pub fn new(link: Link, previous_title: String, keep_state: bool, direction: Direction) -> Self {
        Self {
            id: Uuid::new_v4(),
            link,
            previous_title,
            keep_state,
            direction,
            outcome: Outcome::Pending,
            extracted: None,
            state: TransitionState::Idle,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Move to `target`, guarding against out-of-order pipeline steps.
    pub fn advance(&mut self, target: TransitionState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(TransitionError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        tracing::trace!(id = %self.id, from = %self.state, to = %target, "advance");
        self.state = target;
        Ok(())
    }
}
