//! Sense: content fingerprinting, finalized once a quorum of supernodes
//! submit matching fingerprint ids.
//!
//! The running vote is kept in `SenseMetadata::supernode_fingerprints` and
//! persisted with every submission.

use shared_types::Address;
use tracing::{error, info};

use super::signature::SupernodeSignatures;
use super::{audit_error, parse_json, require, ActionHandler, FinalizeVerdict, HandlerContext, MsgKind};
use crate::domain::consensus::{compare_fingerprints, ConsensusOutcome};
use crate::domain::entities::{Action, ActionMetadata, ActionState, ActionType, SenseMetadata};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;

#[derive(Debug, Default, Clone, Copy)]
pub struct SenseHandler;

/// Vote digest for a submitted id list.
fn fingerprint_digest(ids: &[String]) -> String {
    ids.join(",")
}

impl SenseHandler {
    fn registered(action: &Action) -> ActionResult<SenseMetadata> {
        let meta = action.decode_metadata()?.into_sense()?;
        require(!meta.data_hash.is_empty(), "data_hash is required in existing metadata")?;
        require(
            meta.dd_and_fingerprints_ic != 0,
            "dd_and_fingerprints_ic is required in existing metadata",
        )?;
        require(
            meta.dd_and_fingerprints_max != 0,
            "dd_and_fingerprints_max is required in existing metadata",
        )?;
        Ok(meta)
    }
}

impl ActionHandler for SenseHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Sense
    }

    fn process(&self, json: &str, kind: MsgKind, params: Option<&Params>) -> ActionResult<Vec<u8>> {
        let mut meta: SenseMetadata = parse_json(json)?;

        match kind {
            MsgKind::RequestAction => {
                require(!meta.data_hash.is_empty(), "data_hash is required for sense metadata")?;
                require(
                    meta.dd_and_fingerprints_ic != 0,
                    "dd_and_fingerprints_ic is required for sense metadata",
                )?;
                let params = params.ok_or_else(|| {
                    ActionError::InvalidMetadata("params are required for sense metadata".into())
                })?;
                meta.dd_and_fingerprints_max = params.max_dd_and_fingerprints;
                // Votes only ever come from finalization.
                meta.supernode_fingerprints.clear();
            }
            MsgKind::FinalizeAction => {
                require(
                    !meta.dd_and_fingerprints_ids.is_empty(),
                    "dd_and_fingerprints_ids is required for sense metadata",
                )?;
                require(!meta.signatures.is_empty(), "signatures is required for sense metadata")?;
            }
        }

        ActionMetadata::Sense(meta).encode()
    }

    fn register_action(&self, _ctx: &HandlerContext<'_>, action: &Action) -> ActionResult<()> {
        action.decode_metadata()?.into_sense().map(|_| ())
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
            current_state = %action.state,
            previous_supernodes = action.super_nodes.len(),
            "Validating Sense action finalization"
        );

        let mut stored = Self::registered(action)?;
        let submitted = ActionMetadata::decode_for(ActionType::Sense, metadata)?.into_sense()?;

        SupernodeSignatures::parse(&submitted.signatures)?.verify_any(ctx.accounts, supernode)?;

        ac_01_id_audit::verify_ids(
            &submitted.dd_and_fingerprints_ids,
            &submitted.signatures,
            stored.dd_and_fingerprints_ic,
            stored.dd_and_fingerprints_max,
            &ctx.audit_seed(action, supernode),
        )
        .map_err(|e| match audit_error(e) {
            ActionError::InvalidId(msg) => ActionError::InvalidMetadata(msg),
            other => other,
        })?;

        let digest = fingerprint_digest(&submitted.dd_and_fingerprints_ids);

        if action.state == ActionState::Pending {
            stored.supernode_fingerprints.clear();
            stored
                .supernode_fingerprints
                .insert(supernode.to_string(), digest);
            return Ok(FinalizeVerdict::accept(
                ActionState::Processing,
                ActionMetadata::Sense(stored).encode()?,
            ));
        }

        if stored.supernode_fingerprints.is_empty() {
            return Err(ActionError::InvalidMetadata(
                "supernode_fingerprints is required in existing metadata".into(),
            ));
        }
        stored
            .supernode_fingerprints
            .insert(supernode.to_string(), digest);

        let quorum = usize::try_from(ctx.params.min_super_nodes).unwrap_or(usize::MAX);
        if stored.supernode_fingerprints.len() < quorum {
            return Ok(FinalizeVerdict::accept(
                ActionState::Processing,
                ActionMetadata::Sense(stored).encode()?,
            ));
        }

        match compare_fingerprints(&stored.supernode_fingerprints) {
            ConsensusOutcome::Agreed { .. } => {
                info!(
                    action_id = %action.action_id,
                    "All supernodes submitted matching fingerprints, finalizing Sense action"
                );
                stored.signatures = submitted.signatures;
                stored.dd_and_fingerprints_ids = submitted.dd_and_fingerprints_ids;
                stored.supernode_fingerprints.clear();
                Ok(FinalizeVerdict::accept(
                    ActionState::Done,
                    ActionMetadata::Sense(stored).encode()?,
                ))
            }
            ConsensusOutcome::Minority { bad, .. } => {
                info!(
                    action_id = %action.action_id,
                    bad_supernodes = ?bad,
                    "Minority fingerprints rejected, waiting for more supernodes"
                );
                for sn in &bad {
                    stored.supernode_fingerprints.remove(sn);
                }
                Ok(FinalizeVerdict {
                    state: ActionState::Processing,
                    metadata: ActionMetadata::Sense(stored).encode()?,
                    advisory: Some(ActionError::FinalizationError(format!(
                        "fingerprints from {} do not match the majority",
                        bad.join(", ")
                    ))),
                    flag_bad: bad,
                })
            }
            ConsensusOutcome::NoMajority { bad } => {
                error!(
                    action_id = %action.action_id,
                    bad_supernodes = ?bad,
                    "Supernode fingerprints have no majority"
                );
                for sn in &bad {
                    stored.supernode_fingerprints.remove(sn);
                }
                Ok(FinalizeVerdict {
                    state: ActionState::Failed,
                    metadata: ActionMetadata::Sense(stored).encode()?,
                    advisory: Some(ActionError::FinalizationError(
                        "supernode fingerprints have no majority".into(),
                    )),
                    flag_bad: bad,
                })
            }
        }
    }
}
