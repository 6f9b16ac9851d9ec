// Phase of the most recent mutation, surfaced to the presentation layer
// as one tagged value instead of per-form boolean flags.

use serde::Serialize;

/// Lifecycle of an asynchronous mutation.
///
/// `Failed` is not terminal: starting another mutation moves back to
/// `InFlight`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

impl OperationState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, OperationState::InFlight)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OperationState::Failed(_))
    }

    /// Failure reason, when failed
    pub fn failure(&self) -> Option<&str> {
        match self {
            OperationState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
