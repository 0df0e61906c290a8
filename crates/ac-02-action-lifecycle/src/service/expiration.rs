use action_telemetry::log_action_event;
use shared_types::BlockContext;
use tracing::{debug, warn};

use super::ActionKeeper;
use crate::domain::entities::ActionState;
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::events;
use crate::domain::state_machine::ensure_transition;
use crate::metrics;
use crate::ports::outbound::KeyValueStore;
use crate::store::{self, KeyPrefix, WriteBatch};

impl<S: KeyValueStore> ActionKeeper<S> {
    /// End-of-block sweep. Expires every open action whose expiration time
    /// has passed and refunds its escrow. Returns the number expired.
    ///
    /// A failure on one action is logged and leaves it for the next block.
    pub fn check_expiration(&mut self, block: BlockContext) -> usize {
        let mut candidates = Vec::new();
        for state in [ActionState::Pending, ActionState::Processing] {
            match store::index_ids(&self.store, &KeyPrefix::state_prefix(state)) {
                Ok(ids) => candidates.extend(ids),
                Err(e) => warn!(state = %state, "Failed to scan state index: {e}"),
            }
        }

        let mut expired = 0;
        for action_id in candidates {
            match self.expire_action(block, &action_id) {
                Ok(true) => expired += 1,
                Ok(false) => {}
                Err(e) => warn!(action_id = %action_id, "Failed to expire action: {e}"),
            }
        }

        if expired > 0 {
            debug!(height = block.height, expired, "Expiration sweep finished");
        }
        expired
    }

    fn expire_action(&mut self, block: BlockContext, action_id: &str) -> ActionResult<bool> {
        let previous = store::require_action(&self.store, action_id)?;
        if !previous.state.is_open()
            || previous.expiration_time <= 0
            || previous.expiration_time > block.time_unix
        {
            return Ok(false);
        }
        ensure_transition(previous.action_type, previous.state, ActionState::Expired)?;

        let mut action = previous.clone();
        action.state = ActionState::Expired;
        let mut batch = WriteBatch::new();
        batch.put_action(&action, Some(&previous))?;

        if !action.price.is_zero() {
            self.ports
                .bank
                .send_coins_from_module_to_account(
                    &self.config.module_name,
                    &action.creator,
                    &action.price,
                )
                .map_err(|e| ActionError::Bank(e.to_string()))?;
        }
        let creator = action.creator.clone();
        let price = action.price.clone();
        self.commit_or_reescrow(batch, &creator, &price)?;

        log_action_event!(
            info,
            "Action expired",
            action.action_id,
            previous_state = %previous.state,
            refund = %action.price
        );
        metrics::record_expired();
        self.emit(vec![events::expired(&action, previous.state)]);
        Ok(true)
    }
}
