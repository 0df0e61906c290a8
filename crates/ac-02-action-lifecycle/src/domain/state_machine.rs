//! # Action State Graph
//!
//! ```text
//! Unspecified ──register──→ Pending
//! Pending     ──→ Processing | Done (Cascade only) | Expired
//! Processing  ──→ Processing | Done | Failed | Expired
//! Done        ──→ Approved
//! Approved, Rejected, Failed, Expired: terminal
//! ```

use super::entities::{ActionState, ActionType};
use super::errors::{ActionError, ActionResult};

/// Whether `from -> to` is an edge of the lifecycle graph.
pub fn is_valid_transition(action_type: ActionType, from: ActionState, to: ActionState) -> bool {
    use ActionState::*;

    match (from, to) {
        (Unspecified, Pending) => true,
        (Pending, Processing) | (Pending, Expired) => true,
        // single-prover path
        (Pending, Done) => action_type == ActionType::Cascade,
        (Processing, Processing | Done | Failed | Expired) => true,
        (Done, Approved) => true,
        _ => false,
    }
}

/// Reject transitions outside the graph.
pub fn ensure_transition(
    action_type: ActionType,
    from: ActionState,
    to: ActionState,
) -> ActionResult<()> {
    if is_valid_transition(action_type, from, to) {
        Ok(())
    } else {
        Err(ActionError::InvalidActionState(format!(
            "{action_type} cannot move from {from} to {to}"
        )))
    }
}
