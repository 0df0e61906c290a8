//! Events emitted after each committed state change.

use shared_types::Event;

use super::entities::{Action, ActionState};

pub const EVENT_ACTION_REGISTERED: &str = "action_registered";
pub const EVENT_ACTION_FINALIZED: &str = "action_finalized";
pub const EVENT_ACTION_APPROVED: &str = "action_approved";
pub const EVENT_ACTION_FAILED: &str = "action_failed";
pub const EVENT_ACTION_EXPIRED: &str = "action_expired";
pub const EVENT_FINALIZATION_REJECTED: &str = "action_finalization_rejected";

pub const ATTR_ACTION_ID: &str = "action_id";
pub const ATTR_CREATOR: &str = "creator";
pub const ATTR_ACTION_TYPE: &str = "action_type";
pub const ATTR_SUPERNODES: &str = "supernodes";
pub const ATTR_FEE: &str = "fee";
pub const ATTR_PREVIOUS_STATE: &str = "previous_state";
pub const ATTR_ERROR: &str = "error";
pub const ATTR_FINALIZER: &str = "finalizer";
pub const ATTR_REASON: &str = "reason";
pub const ATTR_EVIDENCE_ID: &str = "evidence_id";

fn base(kind: &str, action: &Action) -> Event {
    Event::new(kind)
        .attr(ATTR_ACTION_ID, &action.action_id)
        .attr(ATTR_CREATOR, &action.creator)
        .attr(ATTR_ACTION_TYPE, action.action_type)
}

pub fn registered(action: &Action) -> Event {
    base(EVENT_ACTION_REGISTERED, action).attr(ATTR_FEE, &action.price)
}

pub fn finalized(action: &Action) -> Event {
    base(EVENT_ACTION_FINALIZED, action).attr(ATTR_SUPERNODES, action.super_nodes.join(","))
}

pub fn approved(action: &Action) -> Event {
    base(EVENT_ACTION_APPROVED, action)
}

pub fn failed(action: &Action, error: &str) -> Event {
    base(EVENT_ACTION_FAILED, action)
        .attr(ATTR_SUPERNODES, action.super_nodes.join(","))
        .attr(ATTR_ERROR, error)
}

pub fn expired(action: &Action, previous_state: ActionState) -> Event {
    base(EVENT_ACTION_EXPIRED, action).attr(ATTR_PREVIOUS_STATE, previous_state)
}

/// A finalizer whose submission was refused.
pub fn finalization_rejected(action: &Action, finalizer: &str, reason: &str) -> Event {
    base(EVENT_FINALIZATION_REJECTED, action)
        .attr(ATTR_FINALIZER, finalizer)
        .attr(ATTR_REASON, reason)
}
