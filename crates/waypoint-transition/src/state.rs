//! Transition state machine
//!
//! ```text
//! Idle
//!   ↓ navigate event
//! Init
//!   ↓
//! TranslateIn
//!   ↓ :done signal
//! Requesting
//!   ↓ fetch settles
//! ParseSuccess | ParseFailure
//!   ↓
//! TranslateOut
//!   ↓ :done signal
//! Done
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// No navigation in flight.
    Idle,
    /// Request created, `:init` emitted.
    Init,
    /// Suspended on the translate-in completion signal.
    TranslateIn,
    /// Fetch in flight.
    Requesting,
    /// Response parsed, swap fragment available.
    ParseSuccess,
    /// Non-success status or empty fragment.
    ParseFailure,
    /// Suspended on the translate-out completion signal.
    TranslateOut,
    /// `:done` emitted; terminal.
    Done,
}

impl TransitionState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: TransitionState) -> bool {
        use TransitionState::*;
        matches!(
            (self, target),
            (Idle, Init)
                | (Init, TranslateIn)
                | (TranslateIn, Requesting)
                | (Requesting, ParseSuccess)
                | (Requesting, ParseFailure)
                | (ParseSuccess, TranslateOut)
                | (ParseFailure, TranslateOut)
                | (TranslateOut, Done)
        )
    }

    /// Whether the fetch outcome has been decided.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            TransitionState::ParseSuccess
                | TransitionState::ParseFailure
                | TransitionState::TranslateOut
                | TransitionState::Done
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionState::Idle => "idle",
            TransitionState::Init => "init",
            TransitionState::TranslateIn => "translate-in",
            TransitionState::Requesting => "requesting",
            TransitionState::ParseSuccess => "parse-success",
            TransitionState::ParseFailure => "parse-failure",
            TransitionState::TranslateOut => "translate-out",
            TransitionState::Done => "done",
        }
    }
}

impl std::fmt::Display for TransitionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        use TransitionState::*;
        assert!(Idle.can_transition_to(Init));
        assert!(Init.can_transition_to(TranslateIn));
        assert!(TranslateIn.can_transition_to(Requesting));
        assert!(Requesting.can_transition_to(ParseSuccess));
        assert!(Requesting.can_transition_to(ParseFailure));
        assert!(ParseSuccess.can_transition_to(TranslateOut));
        assert!(ParseFailure.can_transition_to(TranslateOut));
        assert!(TranslateOut.can_transition_to(Done));
    }

    #[test]
    fn test_invalid_transitions() {
        use TransitionState::*;
        // The translate hooks may not be skipped.
        assert!(!Init.can_transition_to(Requesting));
        assert!(!ParseSuccess.can_transition_to(Done));
        assert!(!ParseFailure.can_transition_to(Done));
        // Failure cannot be revisited as success.
        assert!(!ParseFailure.can_transition_to(ParseSuccess));
        // Done is terminal.
        assert!(!Done.can_transition_to(Init));
    }

    #[test]
    fn test_settled() {
        assert!(!TransitionState::Requesting.is_settled());
        assert!(TransitionState::ParseFailure.is_settled());
        assert!(TransitionState::Done.is_settled());
    }
}
