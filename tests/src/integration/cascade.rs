//! # Cascade Scenarios
//!
//! A single authorized supernode proves storage by submitting the RaptorQ
//! symbol ids derived from the creator's signed layout.

#[cfg(test)]
mod tests {
    use ac_02_action_lifecycle::domain::events::{
        EVENT_ACTION_FINALIZED, EVENT_ACTION_REGISTERED, EVENT_FINALIZATION_REJECTED,
    };
    use ac_02_action_lifecycle::test_utils::{TestChain, CREATOR_FUNDS};
    use ac_02_action_lifecycle::{ActionError, ActionQueryApi, ActionState, ActionType, Params};

    const PRICE: u128 = 25_000;

    fn registered(chain: &mut TestChain) -> String {
        let json = chain.cascade_request_json();
        chain.request(ActionType::Cascade, &json, PRICE).unwrap()
    }

    /// Register, finalize, pay: the escrow moves entirely to the prover.
    #[test]
    fn test_cascade_end_to_end() {
        action_telemetry::init_test_logging();
        let mut chain = TestChain::new(3).unwrap();
        let id = registered(&mut chain);
        assert_eq!(chain.escrow(), PRICE);

        let json = chain.cascade_finalize_json(&id).unwrap();
        chain.finalize(1, &id, ActionType::Cascade, &json).unwrap();

        let action = chain.keeper.get_action(&id).unwrap();
        assert_eq!(action.state, ActionState::Done);
        assert_eq!(chain.balance(chain.node_address(1)), PRICE);
        assert_eq!(chain.balance(&chain.creator.address), CREATOR_FUNDS - PRICE);
        assert_eq!(chain.escrow(), 0);

        assert_eq!(chain.events.of_kind(EVENT_ACTION_REGISTERED).len(), 1);
        let finalized = chain.events.of_kind(EVENT_ACTION_FINALIZED);
        assert_eq!(finalized[0].get("action_type"), Some("ACTION_TYPE_CASCADE"));
    }

    /// With a foundation share the community pool is funded first.
    #[test]
    fn test_foundation_share_funds_community_pool() {
        let params = Params::default().with_fee_shares("0.9", "0.1");
        let mut chain = TestChain::with_params(1, params).unwrap();
        let id = registered(&mut chain);
        let json = chain.cascade_finalize_json(&id).unwrap();

        chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();

        assert_eq!(chain.bank.community_pool("ulume"), 2_500);
        assert_eq!(chain.balance(chain.node_address(0)), 22_500);
        assert_eq!(chain.escrow(), 0);
    }

    /// A blocked payee is skipped; the action still completes and the
    /// unpaid share stays in escrow.
    #[test]
    fn test_failed_payout_does_not_revert() {
        let mut chain = TestChain::new(1).unwrap();
        let id = registered(&mut chain);
        let json = chain.cascade_finalize_json(&id).unwrap();
        let payee = chain.node_address(0).clone();
        chain.bank.block(&payee);

        chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();

        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Done);
        assert_eq!(chain.balance(&payee), 0);
        assert_eq!(chain.escrow(), PRICE);
    }

    /// Only the ranked top set may finalize; an outsider leaves evidence.
    #[test]
    fn test_unranked_supernode_refused() {
        let mut params = Params::default();
        params.top_supernodes_limit = 1;
        let mut chain = TestChain::with_params(2, params).unwrap();
        let id = registered(&mut chain);
        let json = chain.cascade_finalize_json(&id).unwrap();

        let err = chain.finalize(1, &id, ActionType::Cascade, &json).unwrap_err();
        assert_eq!(err.code(), 10);
        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Pending);
        assert_eq!(chain.audit.records().len(), 1);
        assert_eq!(chain.events.of_kind(EVENT_FINALIZATION_REJECTED).len(), 1);

        chain.finalize(0, &id, ActionType::Cascade, &json).unwrap();
        assert_eq!(chain.keeper.get_action(&id).unwrap().state, ActionState::Done);
    }

    #[test]
    fn test_unknown_action() {
        let mut chain = TestChain::new(1).unwrap();
        let id = registered(&mut chain);
        let json = chain.cascade_finalize_json(&id).unwrap();
        assert!(matches!(
            chain.finalize(0, "404", ActionType::Cascade, &json),
            Err(ActionError::NotFound(_))
        ));
    }
}
