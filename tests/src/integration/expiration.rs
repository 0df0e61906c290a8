//! # Expiration Scenarios
//!
//! The end-of-block sweep moves overdue Pending and Processing actions to
//! Expired and returns the escrow to the creator.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ac_02_action_lifecycle::domain::events::EVENT_ACTION_EXPIRED;
    use ac_02_action_lifecycle::test_utils::{TestChain, CREATOR_FUNDS};
    use ac_02_action_lifecycle::{
        ActionError, ActionMsgApi, ActionQueryApi, ActionState, ActionType, PageRequest, Params,
    };

    const PRICE: u128 = 20_000;
    const HOUR: i64 = 3_600;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn hourly_chain(nodes: usize) -> TestChain {
        action_telemetry::init_test_logging();
        let params = Params::default().with_expiration_duration(Duration::from_secs(HOUR as u64));
        TestChain::with_params(nodes, params).unwrap()
    }

    fn end_block(chain: &mut TestChain) {
        let block = chain.block;
        chain.msg_server().end_block(block);
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    /// An untouched action is refunded once its deadline passes.
    #[test]
    fn test_pending_action_refunded_at_deadline() {
        let mut chain = hourly_chain(3);
        let json = chain.cascade_request_json();
        let id = chain.request(ActionType::Cascade, &json, PRICE).unwrap();
        assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS - PRICE);

        chain.advance(HOUR - 1);
        end_block(&mut chain);
        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Pending);

        chain.advance(1);
        end_block(&mut chain);
        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Expired);
        assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS);
        assert_eq!(chain.escrow(), 0);

        let events = chain.events.of_kind(EVENT_ACTION_EXPIRED);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].get("action_id"), Some(id.as_str()));
    }

    /// A Sense action stuck below quorum expires like a pending one.
    #[test]
    fn test_stalled_sense_action_expires() {
        let mut chain = hourly_chain(3);
        let json = chain.sense_request_json("collection-1");
        let id = chain.request(ActionType::Sense, &json, PRICE).unwrap();

        let signatures = chain.sense_signatures([0, 1, 2], b"fingerprints");
        let finalize = chain.sense_finalize_json(&signatures).unwrap();
        chain.finalize(0, &id, ActionType::Sense, &finalize).unwrap();
        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Processing);

        chain.advance(HOUR);
        end_block(&mut chain);

        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Expired);
        assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS);
        assert_eq!(chain.balance(chain.node_address(0)), 0);

        // expired is terminal
        assert!(matches!(
            chain.finalize(1, &id, ActionType::Sense, &finalize),
            Err(ActionError::InvalidActionState(_))
        ));
    }

    /// Completed actions keep their payout when the deadline passes.
    #[test]
    fn test_done_action_survives_sweep() {
        let mut chain = hourly_chain(1);
        let json = chain.cascade_request_json();
        let id = chain.request(ActionType::Cascade, &json, PRICE).unwrap();
        let finalize = chain.cascade_finalize_json(&id).unwrap();
        chain.finalize(0, &id, ActionType::Cascade, &finalize).unwrap();

        chain.advance(2 * HOUR);
        end_block(&mut chain);

        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Done);
        assert_eq!(chain.balance(chain.node_address(0)), PRICE);
        assert!(chain.events.of_kind(EVENT_ACTION_EXPIRED).is_empty());
    }

    /// One sweep expires every overdue action and the expired index lists
    /// them.
    #[test]
    fn test_sweep_expires_batch() {
        let mut chain = hourly_chain(1);
        let json = chain.cascade_request_json();
        let early: Vec<String> = (0..3)
            .map(|_| chain.request(ActionType::Cascade, &json, PRICE).unwrap())
            .collect();
        chain.advance(HOUR / 2);
        let late = chain.request(ActionType::Cascade, &json, PRICE).unwrap();

        chain.advance(HOUR / 2);
        end_block(&mut chain);

        let expired = chain.keeper.list_expired_actions(&PageRequest::default()).unwrap();
        let ids: Vec<&str> = expired.actions.iter().map(|a| a.action_id.as_str()).collect();
        assert_eq!(ids, early.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(chain.keeper.get_action(&late).unwrap().state, ActionState::Pending);
        assert_eq!(chain.escrow(), PRICE);
    }
}
