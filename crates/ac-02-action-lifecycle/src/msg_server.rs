//! # Msg Server
//!
//! Entry points for transaction messages: stateless validation, then the
//! message-specific stateful checks, then the keeper.
//!
//! ```ignore
//! let response = MsgServer::new(&mut keeper).request_action(block, msg)?;
//! ```

use shared_types::BlockContext;
use tracing::debug;

use crate::domain::entities::{Action, ActionState};
use crate::domain::errors::{ActionError, ActionResult};
use crate::handlers::MsgKind;
use crate::msgs::{
    MsgApproveAction, MsgApproveActionResponse, MsgFinalizeAction, MsgFinalizeActionResponse,
    MsgRequestAction, MsgRequestActionResponse, MsgUpdateParams, MsgUpdateParamsResponse,
};
use crate::ports::inbound::ActionMsgApi;
use crate::ports::outbound::KeyValueStore;
use crate::service::ActionKeeper;
use crate::store;

/// Message handler borrowing a keeper for one transaction.
pub struct MsgServer<'a, S: KeyValueStore> {
    keeper: &'a mut ActionKeeper<S>,
}

impl<'a, S: KeyValueStore> MsgServer<'a, S> {
    pub fn new(keeper: &'a mut ActionKeeper<S>) -> Self {
        Self { keeper }
    }
}

impl<S: KeyValueStore> ActionKeeper<S> {
    /// Resolve the expiration for a request made at `block`.
    ///
    /// An explicit time must be in the future and at least
    /// `expiration_duration` away; an absent one defaults to exactly that.
    fn resolve_expiration(&self, block: BlockContext, requested: Option<i64>) -> ActionResult<i64> {
        let params = store::load_params(&self.store)?;
        let duration = i64::try_from(params.expiration_duration.as_secs())
            .map_err(|_| ActionError::Internal("expiration duration overflows".into()))?;
        let min_expiration = block.time_unix.saturating_add(duration);

        match requested {
            None => Ok(min_expiration),
            Some(expiration) if expiration <= block.time_unix => Err(ActionError::ActionExpired(
                "expiration time must be in the future".into(),
            )),
            Some(expiration) if expiration < min_expiration => {
                Err(ActionError::InvalidExpiration(format!(
                    "expiration time must be at least {duration} seconds from current block time"
                )))
            }
            Some(expiration) => Ok(expiration),
        }
    }
}

impl<S: KeyValueStore> ActionMsgApi for MsgServer<'_, S> {
    fn request_action(
        &mut self,
        block: BlockContext,
        msg: MsgRequestAction,
    ) -> ActionResult<MsgRequestActionResponse> {
        msg.validate_basic()?;
        let creator = msg.creator()?;
        let action_type = msg.action_type()?;
        let price = msg.price()?;
        let expiration_time = self.keeper.resolve_expiration(block, msg.expiration_time()?)?;

        let params = store::load_params(&self.keeper.store)?;
        let metadata = self
            .keeper
            .registry
            .get(action_type)?
            .process(&msg.metadata, MsgKind::RequestAction, Some(&params))?;

        let action_id = self.keeper.register_action(
            block,
            Action {
                action_id: String::new(),
                creator,
                action_type,
                metadata,
                price,
                expiration_time,
                state: ActionState::Pending,
                block_height: block.height,
                super_nodes: Vec::new(),
            },
        )?;

        let stored = store::require_action(&self.keeper.store, &action_id)?;
        Ok(MsgRequestActionResponse {
            action_id,
            status: stored.state.to_string(),
        })
    }

    fn finalize_action(
        &mut self,
        block: BlockContext,
        msg: MsgFinalizeAction,
    ) -> ActionResult<MsgFinalizeActionResponse> {
        msg.validate_basic()?;
        let supernode = msg.supernode()?;
        let action_type = msg.action_type()?;

        let metadata = self
            .keeper
            .registry
            .get(action_type)?
            .process(&msg.metadata, MsgKind::FinalizeAction, None)?;

        let stored = store::require_action(&self.keeper.store, &msg.action_id)?;
        if stored.action_type != action_type {
            return Err(ActionError::InvalidActionType(format!(
                "action {} is {}, message declares {action_type}",
                msg.action_id, stored.action_type
            )));
        }

        let outcome = self
            .keeper
            .finalize_action(block, &msg.action_id, &supernode, &metadata)
            .and_then(|finalization| finalization.into_result());

        match outcome {
            Ok(_) => Ok(MsgFinalizeActionResponse {}),
            Err(e) if e.is_module_kind() => Err(e),
            Err(e) => {
                debug!(action_id = %msg.action_id, "Wrapping finalization error: {e}");
                Err(ActionError::InvalidActionState(e.to_string()))
            }
        }
    }

    fn approve_action(
        &mut self,
        _block: BlockContext,
        msg: MsgApproveAction,
    ) -> ActionResult<MsgApproveActionResponse> {
        msg.validate_basic()?;
        let creator = msg.creator()?;
        let action = self.keeper.approve_action(&msg.action_id, &creator)?;
        Ok(MsgApproveActionResponse {
            action_id: action.action_id,
            status: action.state.to_string(),
        })
    }

    fn update_params(&mut self, msg: MsgUpdateParams) -> ActionResult<MsgUpdateParamsResponse> {
        msg.validate_basic()?;
        let authority = msg.authority()?;
        self.keeper.update_params(&authority, &msg.params)?;
        Ok(MsgUpdateParamsResponse {})
    }

    fn end_block(&mut self, block: BlockContext) {
        self.keeper.check_expiration(block);
    }
}
