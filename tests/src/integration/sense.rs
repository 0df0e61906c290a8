//! # Sense Consensus Scenarios
//!
//! Three ranked supernodes submit fingerprint ids for the same action; the
//! action completes once a quorum agrees and the fee is split among the
//! agreeing nodes.

#[cfg(test)]
mod tests {
    use ac_02_action_lifecycle::domain::events::{EVENT_ACTION_FAILED, EVENT_ACTION_FINALIZED};
    use ac_02_action_lifecycle::test_utils::TestChain;
    use ac_02_action_lifecycle::{
        ActionError, ActionMsgApi, ActionQueryApi, ActionState, ActionType, MsgApproveAction,
    };

    const PRICE: u128 = 30_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn registered(nodes: usize) -> (TestChain, String) {
        action_telemetry::init_test_logging();
        let mut chain = TestChain::new(nodes).unwrap();
        let json = chain.sense_request_json("collection-7");
        let id = chain.request(ActionType::Sense, &json, PRICE).unwrap();
        (chain, id)
    }

    fn submit(
        chain: &mut TestChain,
        node: usize,
        id: &str,
        signers: [usize; 3],
        payload: &[u8],
    ) -> Result<(), ActionError> {
        let signatures = chain.sense_signatures(signers, payload);
        let json = chain.sense_finalize_json(&signatures).unwrap();
        chain.finalize(node, id, ActionType::Sense, &json).map(|_| ())
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    /// Three agreeing supernodes complete the action and split the fee.
    #[test]
    fn test_three_supernodes_agree() {
        let (mut chain, id) = registered(3);

        for node in 0..3 {
            submit(&mut chain, node, &id, [0, 1, 2], b"fingerprints").unwrap();
        }

        let action = chain.keeper.get_action(&id).unwrap();
        assert_eq!(action.state, ActionState::Done);
        let expected: Vec<String> = (0..3).map(|i| chain.node_address(i).to_string()).collect();
        assert_eq!(action.super_nodes, expected);
        for node in 0..3 {
            assert_eq!(chain.balance(chain.node_address(node)), PRICE / 3);
        }

        let meta = action.decode_metadata().unwrap().into_sense().unwrap();
        assert!(meta.supernode_fingerprints.is_empty());
        assert_eq!(meta.dd_and_fingerprints_ids.len() as u64, meta.dd_and_fingerprints_max);

        let finalized = chain.events.of_kind(EVENT_ACTION_FINALIZED);
        assert_eq!(finalized.len(), 1);
        assert_eq!(finalized[0].get("supernodes"), Some(expected.join(",").as_str()));
    }

    /// The creator signs off once the action is done.
    #[test]
    fn test_agreed_action_approved_by_creator() {
        let (mut chain, id) = registered(3);
        for node in 0..3 {
            submit(&mut chain, node, &id, [0, 1, 2], b"fingerprints").unwrap();
        }

        let block = chain.block;
        let creator = chain.creator.address.to_string();
        let response = chain
            .msg_server()
            .approve_action(block, MsgApproveAction::new(creator, id.clone()))
            .unwrap();
        assert_eq!(response.status, "ACTION_STATE_APPROVED");

        // terminal
        let block = chain.block;
        let creator = chain.creator.address.to_string();
        assert!(matches!(
            chain
                .msg_server()
                .approve_action(block, MsgApproveAction::new(creator, id)),
            Err(ActionError::InvalidActionState(_))
        ));
    }

    /// A dissenting node is flagged and excluded from the payout; a later
    /// agreeing node completes the quorum.
    #[test]
    fn test_dissenter_replaced() {
        let (mut chain, id) = registered(4);
        let majority = [0, 2, 3];

        submit(&mut chain, 0, &id, majority, b"fingerprints").unwrap();
        submit(&mut chain, 1, &id, [1, 1, 1], b"tampered").unwrap();
        let err = submit(&mut chain, 2, &id, majority, b"fingerprints").unwrap_err();
        assert_eq!(err.code(), 14);

        let action = chain.keeper.get_action(&id).unwrap();
        assert_eq!(action.state, ActionState::Processing);
        assert!(action.super_nodes[1].ends_with(" (bad)"));

        // a flagged node cannot vote again
        assert!(matches!(
            submit(&mut chain, 1, &id, [1, 1, 1], b"fingerprints"),
            Err(ActionError::UnauthorizedSupernode(_))
        ));

        submit(&mut chain, 3, &id, majority, b"fingerprints").unwrap();
        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Done);
        assert_eq!(chain.balance(chain.node_address(1)), 0);
        for node in [0, 2, 3] {
            assert_eq!(chain.balance(chain.node_address(node)), PRICE / 3);
        }
    }

    /// Three different answers: nobody is paid and the price stays escrowed.
    #[test]
    fn test_no_majority_fails_action() {
        let (mut chain, id) = registered(3);

        submit(&mut chain, 0, &id, [0, 1, 2], b"one").unwrap();
        submit(&mut chain, 1, &id, [0, 1, 2], b"two").unwrap();
        assert!(matches!(
            submit(&mut chain, 2, &id, [0, 1, 2], b"three"),
            Err(ActionError::FinalizationError(_))
        ));

        let action = chain.keeper.get_action(&id).unwrap();
        assert_eq!(action.state, ActionState::Failed);
        assert_eq!(chain.events.of_kind(EVENT_ACTION_FAILED).len(), 1);
        for node in 0..3 {
            assert_eq!(chain.balance(chain.node_address(node)), 0);
        }
        assert_eq!(chain.escrow(), PRICE);

        // failed is terminal
        assert!(matches!(
            submit(&mut chain, 0, &id, [0, 1, 2], b"one"),
            Err(ActionError::InvalidActionState(_))
        ));
    }

    /// Forged ids never reach the vote.
    #[test]
    fn test_forged_ids_rejected_before_vote() {
        let (mut chain, id) = registered(3);
        let signatures = chain.sense_signatures([0, 1, 2], b"fingerprints");
        let forged: Vec<String> = (0..50).map(|i| format!("id{i}")).collect();
        let json = serde_json::json!({
            "dd_and_fingerprints_ids": forged,
            "signatures": signatures,
        })
        .to_string();

        assert!(matches!(
            chain.finalize(0, &id, ActionType::Sense, &json),
            Err(ActionError::InvalidMetadata(_))
        ));
        let action = chain.keeper.get_action(&id).unwrap();
        assert_eq!(action.state, ActionState::Pending);
        assert!(action.super_nodes.is_empty());
    }
}
