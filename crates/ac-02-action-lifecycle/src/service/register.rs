use action_telemetry::log_action_event;
use shared_types::BlockContext;

use super::ActionKeeper;
use crate::domain::entities::{Action, ActionState};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::events;
use crate::domain::params::Params;
use crate::metrics;
use crate::ports::outbound::KeyValueStore;
use crate::store::{self, KeyPrefix, WriteBatch};

impl<S: KeyValueStore> ActionKeeper<S> {
    /// Register a new action, escrow its price and return the assigned id.
    pub fn register_action(&mut self, block: BlockContext, mut action: Action) -> ActionResult<String> {
        if action.metadata.is_empty() {
            return Err(ActionError::InvalidMetadata("metadata is required".into()));
        }
        if !action.action_id.is_empty() {
            return Err(ActionError::InvalidRequest(
                "action ID is assigned at registration and must be empty".into(),
            ));
        }
        if !matches!(action.state, ActionState::Unspecified | ActionState::Pending) {
            return Err(ActionError::InvalidActionState(format!(
                "new action cannot start in {}",
                action.state
            )));
        }

        let params = store::load_params(&self.store)?;
        self.check_price(&params, &action)?;

        let spendable = self
            .ports
            .bank
            .spendable_balance(&action.creator, &action.price.denom);
        if spendable < action.price.amount {
            return Err(ActionError::InsufficientFunds(format!(
                "{} has {spendable}{}, needs {}",
                action.creator, action.price.denom, action.price
            )));
        }

        let in_block = store::index_ids(&self.store, &KeyPrefix::height_prefix(block.height))?.len();
        if in_block as u64 >= params.max_actions_per_block {
            return Err(ActionError::InvalidRequest(format!(
                "block {} already holds the maximum of {} actions",
                block.height, params.max_actions_per_block
            )));
        }

        let handler = self.registry.get(action.action_type)?;
        handler.register_action(&self.handler_context(block, &params), &action)?;

        let id = store::load_count(&self.store)?
            .checked_add(1)
            .ok_or_else(|| ActionError::Internal("action counter overflow".into()))?;
        action.action_id = id.to_string();
        action.state = ActionState::Pending;
        action.block_height = block.height;
        action.super_nodes.clear();

        if self.store.exists(&KeyPrefix::action_key(&action.action_id))? {
            return Err(ActionError::DuplicateAction(action.action_id));
        }

        let mut batch = WriteBatch::new();
        batch.put_action(&action, None)?;
        batch.put_count(id);

        self.ports
            .bank
            .send_coins_from_account_to_module(&action.creator, &self.config.module_name, &action.price)
            .map_err(|e| ActionError::Bank(e.to_string()))?;

        let creator = action.creator.clone();
        let price = action.price.clone();
        self.commit_or_refund(batch, &creator, &price)?;

        log_action_event!(
            info,
            "Action registered",
            action.action_id,
            action_type = %action.action_type,
            creator = %action.creator,
            price = %action.price,
            expiration_time = action.expiration_time
        );
        metrics::record_registered(action.action_type.as_str());
        self.emit(vec![events::registered(&action)]);

        Ok(action.action_id)
    }

    /// Price must be in the base fee denom and at least the base fee.
    fn check_price(&self, params: &Params, action: &Action) -> ActionResult<()> {
        let base = &params.base_action_fee;
        if action.price.denom != base.denom {
            return Err(ActionError::InvalidPrice(format!(
                "price denom {} does not match {}",
                action.price.denom, base.denom
            )));
        }
        if action.price.amount < base.amount {
            return Err(ActionError::InvalidPrice(format!(
                "price {} is below the base action fee {base}",
                action.price
            )));
        }
        Ok(())
    }
}
