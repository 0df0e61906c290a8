use action_telemetry::{log_action_event, log_supernode_event};
use shared_types::{Address, BlockContext};
use tracing::error;

use super::ActionKeeper;
use crate::domain::entities::{Action, ActionState, Finalization};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::events::{self, ATTR_EVIDENCE_ID};
use crate::domain::params::Params;
use crate::domain::state_machine::ensure_transition;
use crate::metrics;
use crate::ports::outbound::{EvidenceType, FinalizationEvidence, KeyValueStore, SupernodeState};
use crate::store::{self, WriteBatch};

impl<S: KeyValueStore> ActionKeeper<S> {
    /// Apply a supernode's finalization submission.
    ///
    /// `Err` means nothing was written. `Ok(Finalization::Rejected)` means
    /// the submission was recorded but the caller must still report the
    /// advisory error.
    pub fn finalize_action(
        &mut self,
        block: BlockContext,
        action_id: &str,
        supernode: &Address,
        metadata: &[u8],
    ) -> ActionResult<Finalization> {
        let params = store::load_params(&self.store)?;
        let previous = store::require_action(&self.store, action_id)?;

        if !previous.state.is_open() {
            return Err(ActionError::InvalidActionState(format!(
                "action {action_id} cannot be finalized: current state {} is not one of pending or processing",
                previous.state
            )));
        }

        if let Err(e) = self.authorize_supernode(&params, &previous, supernode) {
            metrics::record_finalization_rejected(e.kind());
            return Err(e);
        }

        let handler = self.registry.get(previous.action_type)?;
        let verdict = match handler.finalize_action(
            &self.handler_context(block, &params),
            &previous,
            supernode,
            metadata,
        ) {
            Ok(verdict) => verdict,
            Err(e) => {
                if matches!(e, ActionError::InvalidSignature(_)) {
                    self.record_rejection(
                        &previous,
                        supernode,
                        EvidenceType::FinalizationSignatureFailure,
                        &e.to_string(),
                        Vec::new(),
                    );
                }
                metrics::record_finalization_rejected(e.kind());
                return Err(e);
            }
        };

        ensure_transition(previous.action_type, previous.state, verdict.state)?;

        let mut action = previous.clone();
        action.state = verdict.state;
        action.metadata = verdict.metadata;
        action.super_nodes.push(supernode.to_string());
        for bad in &verdict.flag_bad {
            action.flag_bad(bad, &self.config.bad_marker);
        }

        let mut batch = WriteBatch::new();
        batch.put_action(&action, Some(&previous))?;

        let plan = match action.state {
            ActionState::Done => Some(self.plan_fees(&params, &action)?),
            _ => None,
        };

        batch.commit(&mut self.store)?;

        log_supernode_event!(
            info,
            "Finalization recorded",
            action.action_id,
            supernode,
            previous_state = %previous.state,
            state = %action.state,
            supernodes = action.super_nodes.len()
        );

        let mut emitted = Vec::new();
        let mut advisory = verdict.advisory;
        match action.state {
            ActionState::Done => {
                if let Some(plan) = plan {
                    self.pay_out(&action, plan);
                }
                metrics::record_finalized(action.action_type.as_str());
                emitted.push(events::finalized(&action));
            }
            ActionState::Failed => {
                log_action_event!(warn, "Action failed finalization", action.action_id);
                emitted.push(events::failed(&action, "finalization failed"));
                if advisory.is_none() {
                    advisory = Some(ActionError::FinalizationError(format!(
                        "action {action_id} failed"
                    )));
                }
            }
            _ => {}
        }
        self.emit(emitted);

        Ok(match advisory {
            None => Finalization::Accepted {
                state: action.state,
            },
            Some(advisory) => {
                metrics::record_finalization_rejected(advisory.kind());
                Finalization::Rejected {
                    state: action.state,
                    advisory,
                }
            }
        })
    }

    /// The finalizer must be new to this action, in the top active set for
    /// the action's registration height, and backed by an unjailed
    /// validator.
    fn authorize_supernode(
        &self,
        params: &Params,
        action: &Action,
        supernode: &Address,
    ) -> ActionResult<()> {
        if action.has_supernode(supernode.as_str(), &self.config.bad_marker) {
            return Err(ActionError::UnauthorizedSupernode(format!(
                "supernode {supernode} is already in the SuperNodes list for action {}",
                action.action_id
            )));
        }

        let limit = params.top_supernodes_limit;
        let top = self
            .ports
            .supernodes
            .get_top_supernodes_for_block(action.block_height, limit as usize, SupernodeState::Active)
            .map_err(|e| ActionError::InvalidRequest(format!("failed to query top supernodes: {e}")))?;

        let Some(info) = top.iter().find(|sn| sn.supernode_account == *supernode) else {
            let err = ActionError::UnauthorizedSupernode(format!(
                "supernode {supernode} is not in the top-{limit} ACTIVE supernodes for block height {}",
                action.block_height
            ));
            let expected = top.iter().map(|sn| sn.supernode_account.to_string()).collect();
            self.record_rejection(
                action,
                supernode,
                EvidenceType::FinalizationNotInTopSupernodes,
                &err.to_string(),
                expected,
            );
            return Err(err);
        };

        match self.ports.staking.get_validator(&info.validator_address) {
            Some(validator) if !validator.jailed => Ok(()),
            Some(_) => Err(ActionError::UnauthorizedSupernode(format!(
                "validator {} backing supernode {supernode} is jailed",
                info.validator_address
            ))),
            None => Err(ActionError::UnauthorizedSupernode(format!(
                "validator {} backing supernode {supernode} not found",
                info.validator_address
            ))),
        }
    }

    /// Record audit evidence and emit `action_finalization_rejected`.
    fn record_rejection(
        &self,
        action: &Action,
        finalizer: &Address,
        evidence_type: EvidenceType,
        reason: &str,
        expected: Vec<String>,
    ) {
        log_supernode_event!(warn, "Finalization refused", action.action_id, finalizer, reason = reason);

        let evidence_id = self.ports.audit.as_ref().and_then(|audit| {
            let metadata_json = serde_json::json!({
                "attempted_finalizer_address": finalizer.as_str(),
                "expected_finalizer_addresses": expected,
                "reason": reason,
            })
            .to_string();
            audit
                .create_evidence(FinalizationEvidence {
                    reporter: self.config.module_account.clone(),
                    subject: finalizer.to_string(),
                    action_id: action.action_id.clone(),
                    evidence_type,
                    metadata_json,
                })
                .map_err(|e| {
                    error!(
                        action_id = %action.action_id,
                        finalizer = %finalizer,
                        "Failed to record finalization evidence: {e}"
                    );
                })
                .ok()
        });

        let mut event = events::finalization_rejected(action, finalizer.as_str(), reason);
        if let Some(id) = evidence_id {
            event = event.attr(ATTR_EVIDENCE_ID, id);
        }
        self.emit(vec![event]);
    }
}
