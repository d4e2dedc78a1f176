//! Session states and the transition table

use serde::{Deserialize, Serialize};

/// Lifecycle state of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Page load requested, waiting for it to finish
    #[default]
    Loading,
    /// Load finished, checking for the framework
    AwaitingFrameworkCheck,
    /// Waiting for late assets before configuring
    Settling,
    /// Disabling transitions and fragments
    Configuring,
    /// Rendering the current position
    Capturing,
    /// Advance requested, waiting for the deck to move
    AwaitingAdvance,
    /// Finished, normally or not
    Terminated,
}

impl SessionState {
    /// Whether `next` may follow `self`.
    ///
    /// The only cycle is `Capturing <-> AwaitingAdvance`; every live state
    /// may terminate.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Terminated, _) => false,
            (_, Terminated) => true,
            (Loading, AwaitingFrameworkCheck)
            | (AwaitingFrameworkCheck, Settling)
            | (Settling, Configuring)
            | (Configuring, Capturing)
            | (Capturing, AwaitingAdvance)
            | (AwaitingAdvance, Capturing) => true,
            _ => false,
        }
    }

    /// Whether the session has finished
    pub fn is_terminal(self) -> bool {
        self == SessionState::Terminated
    }

    /// Name used in logs and errors
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::AwaitingFrameworkCheck => "awaiting framework check",
            SessionState::Settling => "settling",
            SessionState::Configuring => "configuring",
            SessionState::Capturing => "capturing",
            SessionState::AwaitingAdvance => "awaiting advance",
            SessionState::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
