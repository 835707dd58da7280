//! Explicit state machine for a user-facing analysis session.
//!
//! Replaces ad-hoc readiness flags with a single enum driven by discrete
//! events. The machine enforces the pipeline's at-most-one-in-flight
//! contract: `RunRequested` is rejected while a run is already `Processing`,
//! and every failure leaves the session in a re-triable state.

use tracing::trace;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    ModelLoading,
    Ready,
    ImageSelected,
    Processing,
    ResultReady,
    Failed,
}

/// Discrete occurrences that move a session between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ModelLoadStarted,
    ModelLoaded,
    ModelLoadFailed,
    ImageSelected,
    RunRequested,
    RunCompleted,
    RunFailed,
    Reset,
}

impl SessionState {
    /// Whether a new pipeline run may be requested from this state.
    pub fn can_run(&self) -> bool {
        matches!(
            self,
            SessionState::ImageSelected | SessionState::ResultReady | SessionState::Failed
        )
    }
}

/// Apply `event` to `state`, returning the next state or `None` when the
/// event is not valid in the current state (callers leave the state as-is).
pub fn transition(state: SessionState, event: SessionEvent) -> Option<SessionState> {
    use SessionEvent as E;
    use SessionState as S;

    let next = match (state, event) {
        (_, E::Reset) => Some(S::Idle),
        (S::Idle, E::ModelLoadStarted) => Some(S::ModelLoading),
        (S::ModelLoading, E::ModelLoaded) => Some(S::Ready),
        (S::ModelLoading, E::ModelLoadFailed) => Some(S::Failed),
        // An image may be picked or replaced whenever no run is in flight.
        (S::Ready | S::ImageSelected | S::ResultReady | S::Failed, E::ImageSelected) => {
            Some(S::ImageSelected)
        }
        (s, E::RunRequested) if s.can_run() => Some(S::Processing),
        (S::Processing, E::RunCompleted) => Some(S::ResultReady),
        (S::Processing, E::RunFailed) => Some(S::Failed),
        _ => None,
    };

    trace!(?state, ?event, ?next, "session transition");
    next
}

/// A session holding its current state and ignoring invalid events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Apply `event`; returns whether it was accepted.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match transition(self.state, event) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionEvent as E;
    use SessionState as S;

    fn session_at(events: &[E]) -> Session {
        let mut session = Session::new();
        for &event in events {
            assert!(session.apply(event), "setup event {event:?} rejected");
        }
        session
    }

    #[test]
    fn happy_path_reaches_result() {
        let session = session_at(&[
            E::ModelLoadStarted,
            E::ModelLoaded,
            E::ImageSelected,
            E::RunRequested,
            E::RunCompleted,
        ]);
        assert_eq!(session.state(), S::ResultReady);
    }

    #[test]
    fn run_requires_a_selected_image() {
        let mut session = session_at(&[E::ModelLoadStarted, E::ModelLoaded]);
        assert!(!session.apply(E::RunRequested));
        assert_eq!(session.state(), S::Ready);
    }

    #[test]
    fn no_second_run_while_processing() {
        let mut session = session_at(&[
            E::ModelLoadStarted,
            E::ModelLoaded,
            E::ImageSelected,
            E::RunRequested,
        ]);
        assert_eq!(session.state(), S::Processing);
        assert!(!session.apply(E::RunRequested));
        assert_eq!(session.state(), S::Processing);
    }

    #[test]
    fn failed_run_is_retriable() {
        let mut session = session_at(&[
            E::ModelLoadStarted,
            E::ModelLoaded,
            E::ImageSelected,
            E::RunRequested,
            E::RunFailed,
        ]);
        assert_eq!(session.state(), S::Failed);
        assert!(session.state().can_run());
        assert!(session.apply(E::RunRequested));
        assert_eq!(session.state(), S::Processing);
    }

    #[test]
    fn result_allows_rerun_or_new_image() {
        let mut session = session_at(&[
            E::ModelLoadStarted,
            E::ModelLoaded,
            E::ImageSelected,
            E::RunRequested,
            E::RunCompleted,
        ]);
        assert!(session.apply(E::ImageSelected));
        assert_eq!(session.state(), S::ImageSelected);
    }

    #[test]
    fn image_cannot_be_selected_before_models_load() {
        let mut session = Session::new();
        assert!(!session.apply(E::ImageSelected));
        assert_eq!(session.state(), S::Idle);
    }

    #[test]
    fn model_load_failure_lands_in_failed() {
        let session = session_at(&[E::ModelLoadStarted, E::ModelLoadFailed]);
        assert_eq!(session.state(), S::Failed);
    }

    #[test]
    fn reset_returns_to_idle_from_anywhere() {
        let mut session = session_at(&[
            E::ModelLoadStarted,
            E::ModelLoaded,
            E::ImageSelected,
            E::RunRequested,
        ]);
        assert!(session.apply(E::Reset));
        assert_eq!(session.state(), S::Idle);
    }

    #[test]
    fn invalid_events_leave_state_untouched() {
        let mut session = session_at(&[E::ModelLoadStarted]);
        assert!(!session.apply(E::RunCompleted));
        assert!(!session.apply(E::RunFailed));
        assert_eq!(session.state(), S::ModelLoading);
    }
}
