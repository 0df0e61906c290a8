//! # Query Scenarios
//!
//! Read-side views over a populated chain: listings by creator, supernode,
//! state and metadata, with offset pagination.

#[cfg(test)]
mod tests {
    use ac_02_action_lifecycle::test_utils::TestChain;
    use ac_02_action_lifecycle::{
        ActionError, ActionFilter, ActionQueryApi, ActionState, ActionType, PageRequest,
    };

    const PRICE: u128 = 15_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Five cascade actions (the first finalized by node 0) and two sense
    /// actions in different collections.
    fn populated() -> (TestChain, Vec<String>) {
        action_telemetry::init_test_logging();
        let mut chain = TestChain::new(3).unwrap();
        let json = chain.cascade_request_json();
        let mut ids: Vec<String> = (0..5)
            .map(|_| chain.request(ActionType::Cascade, &json, PRICE).unwrap())
            .collect();

        let finalize = chain.cascade_finalize_json(&ids[0]).unwrap();
        chain
            .finalize(0, &ids[0], ActionType::Cascade, &finalize)
            .unwrap();

        chain.advance(5);
        for collection in ["portraits", "landscapes"] {
            let json = chain.sense_request_json(collection);
            ids.push(chain.request(ActionType::Sense, &json, PRICE).unwrap());
        }
        (chain, ids)
    }

    fn ids_of(page: &ac_02_action_lifecycle::ActionPage) -> Vec<&str> {
        page.actions.iter().map(|a| a.action_id.as_str()).collect()
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[test]
    fn test_pages_through_creator_actions() {
        let (chain, _) = populated();
        let creator = chain.creator.address.to_string();

        let first = chain
            .keeper
            .list_actions_by_creator(&creator, &PageRequest::new(0, 3).with_count_total())
            .unwrap();
        assert_eq!(ids_of(&first), ["1", "2", "3"]);
        assert_eq!(first.page.total, Some(7));
        assert_eq!(first.page.next_offset, Some(3));

        let last = chain
            .keeper
            .list_actions_by_creator(&creator, &PageRequest::new(6, 3))
            .unwrap();
        assert_eq!(ids_of(&last), ["7"]);
        assert_eq!(last.page.total, None);
        assert_eq!(last.page.next_offset, None);

        let nobody = chain
            .keeper
            .list_actions_by_creator("lumera1stranger", &PageRequest::default())
            .unwrap();
        assert!(nobody.actions.is_empty());
    }

    #[test]
    fn test_supernode_and_state_views() {
        let (chain, ids) = populated();
        let node = chain.node_address(0).to_string();

        let served = chain
            .keeper
            .list_actions_by_supernode(&node, &PageRequest::default())
            .unwrap();
        assert_eq!(ids_of(&served), [ids[0].as_str()]);

        let filter = ActionFilter {
            action_type: Some(ActionType::Cascade),
            state: Some(ActionState::Pending),
        };
        let pending = chain
            .keeper
            .list_actions(&filter, &PageRequest::default().with_count_total())
            .unwrap();
        assert_eq!(pending.page.total, Some(4));
        assert!(pending.actions.iter().all(|a| a.state == ActionState::Pending));
    }

    #[test]
    fn test_height_and_metadata_lookup() {
        let (chain, ids) = populated();

        let genesis = chain
            .keeper
            .list_actions_by_block_height(1, &PageRequest::default())
            .unwrap();
        assert_eq!(genesis.actions.len(), 5);

        let portraits = chain
            .keeper
            .query_action_by_metadata(
                ActionType::Sense,
                "collection_id=portraits",
                &PageRequest::default(),
            )
            .unwrap();
        assert_eq!(ids_of(&portraits), [ids[5].as_str()]);

        let archives = chain
            .keeper
            .query_action_by_metadata(
                ActionType::Cascade,
                "file_name=archive.tar",
                &PageRequest::default(),
            )
            .unwrap();
        assert_eq!(archives.actions.len(), 5);

        assert!(matches!(
            chain.keeper.query_action_by_metadata(
                ActionType::Cascade,
                "rq_ids_ic=7",
                &PageRequest::default()
            ),
            Err(ActionError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_fee_quote_matches_params() {
        let (chain, _) = populated();
        let params = chain.keeper.params().unwrap();
        let quote = chain.keeper.get_action_fee("10").unwrap();
        assert_eq!(
            quote.amount,
            params.base_action_fee.amount + 10 * params.fee_per_byte.amount
        );
    }
}
