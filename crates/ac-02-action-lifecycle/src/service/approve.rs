use action_telemetry::log_action_event;
use shared_types::Address;

use super::ActionKeeper;
use crate::domain::entities::{Action, ActionState};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::events;
use crate::domain::state_machine::ensure_transition;
use crate::ports::outbound::KeyValueStore;
use crate::store::{self, WriteBatch};

impl<S: KeyValueStore> ActionKeeper<S> {
    /// Creator sign-off: Done to Approved.
    pub fn approve_action(&mut self, action_id: &str, creator: &Address) -> ActionResult<Action> {
        let previous = store::require_action(&self.store, action_id)?;

        if previous.state != ActionState::Done {
            return Err(ActionError::InvalidActionState(format!(
                "action {action_id} cannot be approved: current state {}",
                previous.state
            )));
        }
        if previous.creator != *creator {
            return Err(ActionError::UnauthorizedSupernode(format!(
                "only the creator {} can approve action {action_id}",
                previous.creator
            )));
        }

        self.registry
            .get(previous.action_type)?
            .validate_approval(&previous)?;
        ensure_transition(previous.action_type, previous.state, ActionState::Approved)?;

        let mut action = previous.clone();
        action.state = ActionState::Approved;

        let mut batch = WriteBatch::new();
        batch.put_action(&action, Some(&previous))?;
        batch.commit(&mut self.store)?;

        log_action_event!(info, "Action approved", action.action_id, creator = %creator);
        self.emit(vec![events::approved(&action)]);
        Ok(action)
    }
}
