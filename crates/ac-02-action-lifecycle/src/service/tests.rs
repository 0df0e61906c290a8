use shared_types::BlockContext;

use crate::domain::entities::{ActionState, ActionType, Finalization};
use crate::domain::errors::{ActionError, KVStoreError};
use crate::domain::events::{
    EVENT_ACTION_APPROVED, EVENT_ACTION_EXPIRED, EVENT_ACTION_FAILED, EVENT_ACTION_FINALIZED,
    EVENT_ACTION_REGISTERED, EVENT_FINALIZATION_REJECTED,
};
use crate::domain::params::Params;
use crate::ports::outbound::EvidenceType;
use crate::store;
use crate::test_utils::{address, ulume, TestChain, CREATOR_FUNDS};

const PRICE: u128 = 30_000;

fn cascade(chain: &mut TestChain) -> String {
    let json = chain.cascade_request_json();
    chain.request(ActionType::Cascade, &json, PRICE).unwrap()
}

fn sense(chain: &mut TestChain) -> String {
    let json = chain.sense_request_json("collection-1");
    chain.request(ActionType::Sense, &json, PRICE).unwrap()
}

/// Submit Sense results from `node`; ids derive from `signers` signing
/// `payload`.
fn sense_vote(
    chain: &mut TestChain,
    node: usize,
    action_id: &str,
    signers: [usize; 3],
    payload: &[u8],
) -> Result<(), ActionError> {
    let signatures = chain.sense_signatures(signers, payload);
    let json = chain.sense_finalize_json(&signatures).unwrap();
    chain.finalize(node, action_id, ActionType::Sense, &json).map(|_| ())
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[test]
fn test_register_escrows_price() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);

    assert_eq!(id, "1");
    assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS - PRICE);
    assert_eq!(chain.escrow(), PRICE);

    let action = chain.action(&id).unwrap();
    assert_eq!(action.state, ActionState::Pending);
    assert_eq!(action.block_height, chain.block.height);
    assert_eq!(
        action.expiration_time,
        chain.block.time_unix + Params::default().expiration_duration.as_secs() as i64
    );
    assert_eq!(chain.events.of_kind(EVENT_ACTION_REGISTERED).len(), 1);
}

#[test]
fn test_ids_are_sequential() {
    let mut chain = TestChain::new(1).unwrap();
    assert_eq!(cascade(&mut chain), "1");
    assert_eq!(sense(&mut chain), "2");
    assert_eq!(store::load_count(chain.keeper.store()).unwrap(), 2);
}

#[test]
fn test_price_below_base_fee_rejected() {
    let mut chain = TestChain::new(1).unwrap();
    let json = chain.cascade_request_json();
    assert!(matches!(
        chain.request(ActionType::Cascade, &json, 9_999),
        Err(ActionError::InvalidPrice(_))
    ));
}

#[test]
fn test_foreign_denom_rejected() {
    let mut chain = TestChain::new(1).unwrap();
    let mut action = chain.action_template(ActionType::Cascade).unwrap();
    action.price = shared_types::Coin::parse("50000uatom").unwrap();
    assert!(matches!(
        chain.keeper.register_action(chain.block, action),
        Err(ActionError::InvalidPrice(_))
    ));
}

#[test]
fn test_insufficient_funds_writes_nothing() {
    let mut chain = TestChain::new(1).unwrap();
    let json = chain.cascade_request_json();
    assert!(matches!(
        chain.request(ActionType::Cascade, &json, CREATOR_FUNDS + 1),
        Err(ActionError::InsufficientFunds(_))
    ));
    assert_eq!(store::load_count(chain.keeper.store()).unwrap(), 0);
    assert_eq!(chain.escrow(), 0);
}

#[test]
fn test_block_action_limit() {
    let params = Params::default().with_max_actions_per_block(2);
    let mut chain = TestChain::with_params(1, params).unwrap();
    cascade(&mut chain);
    cascade(&mut chain);

    let json = chain.cascade_request_json();
    assert!(matches!(
        chain.request(ActionType::Cascade, &json, PRICE),
        Err(ActionError::InvalidRequest(_))
    ));

    chain.advance(5);
    assert!(chain.request(ActionType::Cascade, &json, PRICE).is_ok());
}

#[test]
fn test_unsigned_cascade_registration_rejected() {
    let mut chain = TestChain::new(1).unwrap();
    let json = serde_json::json!({
        "data_hash": "h",
        "file_name": "f",
        "rq_ids_ic": 3,
        "signatures": "ZGF0YQ==.AAAA",
    })
    .to_string();
    assert!(matches!(
        chain.request(ActionType::Cascade, &json, PRICE),
        Err(ActionError::InvalidSignature(_))
    ));
    assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS);
}

#[test]
fn test_failed_commit_refunds_escrow() {
    let mut chain = TestChain::new(1).unwrap();
    chain.keeper.store_mut().set_fail_batches(true);

    let json = chain.cascade_request_json();
    assert!(matches!(
        chain.request(ActionType::Cascade, &json, PRICE),
        Err(ActionError::Store(KVStoreError::BatchFailed { .. }))
    ));
    assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS);
    assert_eq!(chain.escrow(), 0);
    assert!(chain.events.of_kind(EVENT_ACTION_REGISTERED).is_empty());
}

// =============================================================================
// CASCADE FINALIZATION
// =============================================================================

#[test]
fn test_cascade_single_supernode_paid_in_full() {
    let mut chain = TestChain::new(3).unwrap();
    let id = cascade(&mut chain);
    let json = chain.cascade_finalize_json(&id).unwrap();

    chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();

    let action = chain.action(&id).unwrap();
    assert_eq!(action.state, ActionState::Done);
    assert_eq!(action.super_nodes, vec![chain.node_address(0).to_string()]);
    assert_eq!(chain.balance(chain.node_address(0)), PRICE);
    assert_eq!(chain.escrow(), 0);

    let meta = action.decode_metadata().unwrap().into_cascade().unwrap();
    assert_eq!(meta.rq_ids_ids.len() as u64, meta.rq_ids_max);
    assert_eq!(meta.rq_ids_oti, vec![1, 2, 3]);
    assert_eq!(chain.events.of_kind(EVENT_ACTION_FINALIZED).len(), 1);
}

#[test]
fn test_done_action_cannot_be_refinalized() {
    let mut chain = TestChain::new(3).unwrap();
    let id = cascade(&mut chain);
    let json = chain.cascade_finalize_json(&id).unwrap();
    chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();

    assert!(matches!(
        chain.finalize(1, &id, ActionType::Cascade, &json),
        Err(ActionError::InvalidActionState(_))
    ));
    assert_eq!(chain.balance(chain.node_address(1)), 0);
}

#[test]
fn test_forged_cascade_ids_leave_action_pending() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let forged: Vec<String> = (0..50).map(|i| format!("forged{i}")).collect();
    let json = serde_json::json!({ "rq_ids_ids": forged }).to_string();

    assert!(matches!(
        chain.finalize(0, &id, ActionType::Cascade, &json),
        Err(ActionError::InvalidId(_))
    ));
    let action = chain.action(&id).unwrap();
    assert_eq!(action.state, ActionState::Pending);
    assert!(action.super_nodes.is_empty());
    assert_eq!(chain.escrow(), PRICE);
}

#[test]
fn test_declared_type_must_match_stored() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let signatures = chain.sense_signatures([0, 0, 0], b"fp");
    let json = chain.sense_finalize_json(&signatures).unwrap();

    assert!(matches!(
        chain.finalize(0, &id, ActionType::Sense, &json),
        Err(ActionError::InvalidActionType(_))
    ));
}

// =============================================================================
// AUTHORIZATION
// =============================================================================

#[test]
fn test_supernode_outside_top_set_refused_with_evidence() {
    let mut params = Params::default();
    params.top_supernodes_limit = 2;
    let mut chain = TestChain::with_params(3, params).unwrap();
    let id = cascade(&mut chain);
    let json = chain.cascade_finalize_json(&id).unwrap();

    assert!(matches!(
        chain.finalize(2, &id, ActionType::Cascade, &json),
        Err(ActionError::UnauthorizedSupernode(_))
    ));
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Pending);

    let records = chain.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].evidence_type, EvidenceType::FinalizationNotInTopSupernodes);
    assert_eq!(records[0].subject, chain.node_address(2).to_string());
    assert!(records[0].metadata_json.contains(chain.node_address(0).as_str()));

    let rejected = chain.events.of_kind(EVENT_FINALIZATION_REJECTED);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].get("evidence_id"), Some("1"));
}

#[test]
fn test_jailed_validator_refused() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let json = chain.cascade_finalize_json(&id).unwrap();
    chain.supernodes.jail(&chain.nodes[0].validator_address);

    assert!(matches!(
        chain.finalize(0, &id, ActionType::Cascade, &json),
        Err(ActionError::UnauthorizedSupernode(msg)) if msg.contains("jailed")
    ));
}

#[test]
fn test_repeat_sense_submission_refused() {
    let mut chain = TestChain::new(3).unwrap();
    let id = sense(&mut chain);
    sense_vote(&mut chain, 0, &id, [0, 1, 2], b"fp").unwrap();

    assert!(matches!(
        sense_vote(&mut chain, 0, &id, [0, 1, 2], b"fp"),
        Err(ActionError::UnauthorizedSupernode(msg)) if msg.contains("already")
    ));
}

#[test]
fn test_bad_supernode_signature_recorded() {
    let mut chain = TestChain::new(3).unwrap();
    let id = sense(&mut chain);
    // node 2 is not among the signers
    let signatures = chain.sense_signatures([0, 1, 0], b"fp");
    let json = chain.sense_finalize_json(&signatures).unwrap();

    assert!(matches!(
        chain.finalize(2, &id, ActionType::Sense, &json),
        Err(ActionError::InvalidSignature(_))
    ));
    let records = chain.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].evidence_type, EvidenceType::FinalizationSignatureFailure);
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Pending);
}

// =============================================================================
// SENSE CONSENSUS
// =============================================================================

#[test]
fn test_sense_quorum_splits_fee() {
    let mut chain = TestChain::new(3).unwrap();
    let id = sense(&mut chain);

    sense_vote(&mut chain, 0, &id, [0, 1, 2], b"fp").unwrap();
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Processing);
    sense_vote(&mut chain, 1, &id, [0, 1, 2], b"fp").unwrap();
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Processing);
    sense_vote(&mut chain, 2, &id, [0, 1, 2], b"fp").unwrap();

    let action = chain.action(&id).unwrap();
    assert_eq!(action.state, ActionState::Done);
    assert_eq!(action.super_nodes.len(), 3);
    for i in 0..3 {
        assert_eq!(chain.balance(chain.node_address(i)), PRICE / 3);
    }
    assert_eq!(chain.escrow(), 0);
}

#[test]
fn test_sense_minority_flagged_and_unpaid() {
    const MAJORITY: [usize; 3] = [0, 2, 3];
    let mut chain = TestChain::new(4).unwrap();
    let id = sense(&mut chain);

    sense_vote(&mut chain, 0, &id, MAJORITY, b"fp").unwrap();
    sense_vote(&mut chain, 1, &id, [1, 1, 1], b"other").unwrap();
    assert!(matches!(
        sense_vote(&mut chain, 2, &id, MAJORITY, b"fp"),
        Err(ActionError::FinalizationError(_))
    ));

    // the rejection was still committed
    let action = chain.action(&id).unwrap();
    assert_eq!(action.state, ActionState::Processing);
    assert_eq!(action.super_nodes[1], format!("{} (bad)", chain.node_address(1)));

    sense_vote(&mut chain, 3, &id, MAJORITY, b"fp").unwrap();
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Done);
    assert_eq!(chain.balance(chain.node_address(1)), 0);
    for i in [0, 2, 3] {
        assert_eq!(chain.balance(chain.node_address(i)), PRICE / 3);
    }
}

#[test]
fn test_sense_no_majority_fails() {
    let mut chain = TestChain::new(3).unwrap();
    let id = sense(&mut chain);

    sense_vote(&mut chain, 0, &id, [0, 1, 2], b"a").unwrap();
    sense_vote(&mut chain, 1, &id, [0, 1, 2], b"b").unwrap();
    assert!(matches!(
        sense_vote(&mut chain, 2, &id, [0, 1, 2], b"c"),
        Err(ActionError::FinalizationError(_))
    ));

    let action = chain.action(&id).unwrap();
    assert_eq!(action.state, ActionState::Failed);
    assert!(action.super_nodes.iter().all(|sn| sn.ends_with(" (bad)")));
    assert_eq!(chain.events.of_kind(EVENT_ACTION_FAILED).len(), 1);
    // nothing is paid out of a failed action
    assert_eq!(chain.escrow(), PRICE);
}

#[test]
fn test_keeper_reports_soft_rejection() {
    let mut chain = TestChain::new(3).unwrap();
    let id = sense(&mut chain);
    sense_vote(&mut chain, 0, &id, [0, 1, 2], b"a").unwrap();
    sense_vote(&mut chain, 1, &id, [0, 1, 2], b"b").unwrap();

    let signatures = chain.sense_signatures([0, 1, 2], b"c");
    let json = chain.sense_finalize_json(&signatures).unwrap();
    let metadata = chain
        .keeper
        .registry()
        .get(ActionType::Sense)
        .unwrap()
        .process(&json, crate::handlers::MsgKind::FinalizeAction, None)
        .unwrap();
    let supernode = chain.node_address(2).clone();
    let block = chain.block;

    let outcome = chain
        .keeper
        .finalize_action(block, &id, &supernode, &metadata)
        .unwrap();
    assert!(matches!(
        outcome,
        Finalization::Rejected {
            state: ActionState::Failed,
            advisory: ActionError::FinalizationError(_),
        }
    ));
}

// =============================================================================
// APPROVAL
// =============================================================================

#[test]
fn test_creator_approves_done_action() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let json = chain.cascade_finalize_json(&id).unwrap();
    chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();

    let creator = chain.creator.address.clone();
    let approved = chain.keeper.approve_action(&id, &creator).unwrap();
    assert_eq!(approved.state, ActionState::Approved);
    assert_eq!(chain.events.of_kind(EVENT_ACTION_APPROVED).len(), 1);
}

#[test]
fn test_approve_requires_done_and_creator() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let creator = chain.creator.address.clone();

    assert!(matches!(
        chain.keeper.approve_action(&id, &creator),
        Err(ActionError::InvalidActionState(_))
    ));

    let json = chain.cascade_finalize_json(&id).unwrap();
    chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();
    let stranger = address("lumera1stranger0001").unwrap();
    assert!(matches!(
        chain.keeper.approve_action(&id, &stranger),
        Err(ActionError::UnauthorizedSupernode(_))
    ));
    assert!(matches!(
        chain.keeper.approve_action("99", &creator),
        Err(ActionError::NotFound(_))
    ));
}

// =============================================================================
// EXPIRATION
// =============================================================================

#[test]
fn test_expired_action_refunded() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let expiration = chain.action(&id).unwrap().expiration_time;

    assert_eq!(chain.keeper.check_expiration(BlockContext::new(2, expiration - 1)), 0);
    assert_eq!(chain.keeper.check_expiration(BlockContext::new(3, expiration)), 1);

    let action = chain.action(&id).unwrap();
    assert_eq!(action.state, ActionState::Expired);
    assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS);
    assert_eq!(chain.escrow(), 0);

    let expired = chain.events.of_kind(EVENT_ACTION_EXPIRED);
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].get("previous_state"), Some("ACTION_STATE_PENDING"));
}

#[test]
fn test_processing_action_expires() {
    let mut chain = TestChain::new(3).unwrap();
    let id = sense(&mut chain);
    sense_vote(&mut chain, 0, &id, [0, 1, 2], b"fp").unwrap();
    let expiration = chain.action(&id).unwrap().expiration_time;

    assert_eq!(chain.keeper.check_expiration(BlockContext::new(5, expiration + 10)), 1);
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Expired);
}

#[test]
fn test_zero_expiration_never_expires() {
    let mut chain = TestChain::new(1).unwrap();
    let mut action = chain.action_template(ActionType::Cascade).unwrap();
    action.expiration_time = 0;
    let block = chain.block;
    let id = chain.keeper.register_action(block, action).unwrap();

    assert_eq!(chain.keeper.check_expiration(BlockContext::new(9, i64::MAX)), 0);
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Pending);
}

#[test]
fn test_done_action_not_expired() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let json = chain.cascade_finalize_json(&id).unwrap();
    chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();
    let expiration = chain.action(&id).unwrap().expiration_time;

    assert_eq!(chain.keeper.check_expiration(BlockContext::new(9, expiration + 1)), 0);
    assert_eq!(chain.action(&id).unwrap().state, ActionState::Done);
}

#[test]
fn test_expiration_commit_failure_reescrows() {
    let mut chain = TestChain::new(1).unwrap();
    let id = cascade(&mut chain);
    let expiration = chain.action(&id).unwrap().expiration_time;

    chain.keeper.store_mut().set_fail_batches(true);
    assert_eq!(chain.keeper.check_expiration(BlockContext::new(2, expiration)), 0);
    assert_eq!(chain.escrow(), PRICE);
    assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS - PRICE);

    chain.keeper.store_mut().set_fail_batches(false);
    assert_eq!(chain.keeper.check_expiration(BlockContext::new(3, expiration)), 1);
}

// =============================================================================
// PARAMS
// =============================================================================

#[test]
fn test_update_params_requires_authority() {
    let mut chain = TestChain::new(1).unwrap();
    let params = Params::default().with_base_action_fee(ulume(5_000));

    let stranger = chain.creator.address.clone();
    assert!(matches!(
        chain.keeper.update_params(&stranger, &params),
        Err(ActionError::InvalidSigner(_))
    ));

    let authority = chain.authority.clone();
    chain.keeper.update_params(&authority, &params).unwrap();
    assert_eq!(chain.keeper.get_params().unwrap().base_action_fee.amount, 5_000);
}

#[test]
fn test_invalid_params_not_stored() {
    let mut chain = TestChain::new(1).unwrap();
    let authority = chain.authority.clone();
    let params = Params::default().with_fee_shares("0.5", "0.6");
    assert!(chain.keeper.update_params(&authority, &params).is_err());
    assert_eq!(chain.keeper.get_params().unwrap(), Params::default());
}
