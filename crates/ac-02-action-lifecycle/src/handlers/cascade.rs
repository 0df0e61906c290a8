//! Cascade: erasure-coded storage, finalized by a single supernode whose
//! RaptorQ symbol ids pass the audit.

use shared_types::Address;
use tracing::info;

use super::signature::CreatorSignature;
use super::{audit_error, parse_json, require, ActionHandler, FinalizeVerdict, HandlerContext, MsgKind};
use crate::domain::entities::{Action, ActionMetadata, ActionState, ActionType, CascadeMetadata};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;

#[derive(Debug, Default, Clone, Copy)]
pub struct CascadeHandler;

impl CascadeHandler {
    fn registered(action: &Action) -> ActionResult<CascadeMetadata> {
        let meta = action.decode_metadata()?.into_cascade()?;
        require(!meta.data_hash.is_empty(), "data_hash is required in existing metadata")?;
        require(!meta.file_name.is_empty(), "file_name is required in existing metadata")?;
        require(meta.rq_ids_ic != 0, "rq_ids_ic is required in existing metadata")?;
        require(meta.rq_ids_max != 0, "rq_ids_max is required in existing metadata")?;
        require(!meta.signatures.is_empty(), "signatures is required in existing metadata")?;
        Ok(meta)
    }
}

impl ActionHandler for CascadeHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Cascade
    }

    fn process(&self, json: &str, kind: MsgKind, params: Option<&Params>) -> ActionResult<Vec<u8>> {
        let mut meta: CascadeMetadata = parse_json(json)?;

        match kind {
            MsgKind::RequestAction => {
                require(!meta.data_hash.is_empty(), "data_hash is required for cascade metadata")?;
                require(!meta.file_name.is_empty(), "file_name is required for cascade metadata")?;
                require(meta.rq_ids_ic != 0, "rq_ids_ic is required for cascade metadata")?;
                require(!meta.signatures.is_empty(), "signatures is required for cascade metadata")?;
                let params = params.ok_or_else(|| {
                    ActionError::InvalidMetadata("params are required for cascade metadata".into())
                })?;
                meta.rq_ids_max = params.max_raptor_q_symbols;
            }
            MsgKind::FinalizeAction => {
                require(!meta.rq_ids_ids.is_empty(), "rq_ids_ids is required for cascade metadata")?;
            }
        }

        ActionMetadata::Cascade(meta).encode()
    }

    fn register_action(&self, ctx: &HandlerContext<'_>, action: &Action) -> ActionResult<()> {
        let meta = action.decode_metadata()?.into_cascade()?;
        CreatorSignature::parse(&meta.signatures)?.verify(ctx.accounts, &action.creator)
    }

    fn finalize_action(
        &self,
        ctx: &HandlerContext<'_>,
        action: &Action,
        supernode: &Address,
        metadata: &[u8],
    ) -> ActionResult<FinalizeVerdict> {
        info!(
            action_id = %action.action_id,
            supernode = %supernode,
            "Validating Cascade action finalization"
        );

        let mut stored = Self::registered(action)?;
        let submitted = ActionMetadata::decode_for(ActionType::Cascade, metadata)?.into_cascade()?;

        ac_01_id_audit::verify_ids(
            &submitted.rq_ids_ids,
            &stored.signatures,
            stored.rq_ids_ic,
            stored.rq_ids_max,
            &ctx.audit_seed(action, supernode),
        )
        .map_err(audit_error)?;

        stored.rq_ids_ids = submitted.rq_ids_ids;
        stored.rq_ids_oti = submitted.rq_ids_oti;

        Ok(FinalizeVerdict::accept(
            ActionState::Done,
            ActionMetadata::Cascade(stored).encode()?,
        ))
    }
}
