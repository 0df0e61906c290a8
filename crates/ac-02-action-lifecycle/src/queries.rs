//! # Query Server
//!
//! Read-only views over the store. Listing results are ordered by numeric
//! action id and paginated by offset.

use shared_types::Coin;

use crate::domain::entities::{Action, ActionMetadata, ActionState, ActionType};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;
use crate::ports::inbound::{ActionFilter, ActionPage, ActionQueryApi, PageRequest, PageResponse};
use crate::ports::outbound::KeyValueStore;
use crate::service::ActionKeeper;
use crate::store::{self, KeyPrefix};

/// Metadata fields `query_action_by_metadata` accepts per action type.
fn queryable_fields(action_type: ActionType) -> &'static [&'static str] {
    match action_type {
        ActionType::Cascade => &["data_hash", "file_name"],
        ActionType::Sense => &["collection_id", "group_id", "data_hash"],
        ActionType::Unspecified => &[],
    }
}

/// Slice `items` according to `page`.
fn paginate<T>(items: Vec<T>, page: &PageRequest) -> (Vec<T>, PageResponse) {
    let total = items.len() as u64;
    let offset = page.offset.min(total);
    let end = offset.saturating_add(page.effective_limit()).min(total);

    let selected = items
        .into_iter()
        .skip(offset as usize)
        .take((end - offset) as usize)
        .collect();

    let response = PageResponse {
        total: page.count_total.then_some(total),
        next_offset: (end < total).then_some(end),
    };
    (selected, response)
}

impl<S: KeyValueStore> ActionKeeper<S> {
    fn load_ids(&self, ids: Vec<String>) -> ActionResult<Vec<Action>> {
        ids.iter()
            .map(|id| store::require_action(&self.store, id))
            .collect()
    }

    fn page_of(&self, actions: Vec<Action>, page: &PageRequest) -> ActionPage {
        let (actions, page) = paginate(actions, page);
        ActionPage { actions, page }
    }

    /// Page through an index, loading only the selected actions.
    fn page_of_index(&self, prefix: &[u8], page: &PageRequest) -> ActionResult<ActionPage> {
        let ids = store::index_ids(&self.store, prefix)?;
        let (ids, page) = paginate(ids, page);
        Ok(ActionPage {
            actions: self.load_ids(ids)?,
            page,
        })
    }
}

impl<S: KeyValueStore> ActionQueryApi for ActionKeeper<S> {
    fn params(&self) -> ActionResult<Params> {
        store::load_params(&self.store)
    }

    fn get_action(&self, action_id: &str) -> ActionResult<Action> {
        if action_id.is_empty() {
            return Err(ActionError::InvalidRequest("action ID is required".into()));
        }
        store::require_action(&self.store, action_id)
    }

    fn get_action_fee(&self, data_size: &str) -> ActionResult<Coin> {
        let size: u64 = data_size.trim().parse().map_err(|_| {
            ActionError::InvalidRequest(format!("invalid data size {data_size:?}"))
        })?;
        store::load_params(&self.store)?.action_fee(size)
    }

    fn list_actions(&self, filter: &ActionFilter, page: &PageRequest) -> ActionResult<ActionPage> {
        let candidates = match filter.state {
            Some(state) => self.load_ids(store::index_ids(
                &self.store,
                &KeyPrefix::state_prefix(state),
            )?)?,
            None => store::all_actions(&self.store)?,
        };
        let matching = candidates
            .into_iter()
            .filter(|action| filter.matches(action))
            .collect();
        Ok(self.page_of(matching, page))
    }

    fn list_actions_by_block_height(&self, height: u64, page: &PageRequest) -> ActionResult<ActionPage> {
        self.page_of_index(&KeyPrefix::height_prefix(height), page)
    }

    fn list_actions_by_creator(&self, creator: &str, page: &PageRequest) -> ActionResult<ActionPage> {
        if creator.is_empty() {
            return Err(ActionError::InvalidAddress("creator address is required".into()));
        }
        self.page_of_index(&KeyPrefix::creator_prefix(creator), page)
    }

    fn list_actions_by_supernode(&self, supernode: &str, page: &PageRequest) -> ActionResult<ActionPage> {
        if supernode.is_empty() {
            return Err(ActionError::InvalidAddress("supernode address is required".into()));
        }
        let matching = store::all_actions(&self.store)?
            .into_iter()
            .filter(|action| action.has_supernode(supernode, &self.config.bad_marker))
            .collect();
        Ok(self.page_of(matching, page))
    }

    fn list_expired_actions(&self, page: &PageRequest) -> ActionResult<ActionPage> {
        self.page_of_index(&KeyPrefix::state_prefix(ActionState::Expired), page)
    }

    fn query_action_by_metadata(
        &self,
        action_type: ActionType,
        query: &str,
        page: &PageRequest,
    ) -> ActionResult<ActionPage> {
        let (field, value) = query
            .split_once('=')
            .map(|(f, v)| (f.trim(), v.trim()))
            .filter(|(f, _)| !f.is_empty())
            .ok_or_else(|| {
                ActionError::InvalidRequest(format!("metadata query must be field=value, got {query:?}"))
            })?;

        if !queryable_fields(action_type).contains(&field) {
            return Err(ActionError::InvalidRequest(format!(
                "field {field} is not queryable for {action_type}"
            )));
        }

        let mut matching = Vec::new();
        for action in store::all_actions(&self.store)? {
            if action.action_type != action_type {
                continue;
            }
            let metadata = ActionMetadata::decode_for(action_type, &action.metadata)?;
            if metadata.field(field) == Some(value) {
                matching.push(action);
            }
        }
        Ok(self.page_of(matching, page))
    }
}
