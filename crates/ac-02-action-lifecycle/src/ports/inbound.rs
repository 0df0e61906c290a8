//! # Inbound Ports (Driving Ports)
//!
//! What the host chain calls: the four transaction messages, the end-block
//! hook, and the read-only queries.

use shared_types::{BlockContext, Coin};

use crate::domain::entities::{Action, ActionState, ActionType};
use crate::domain::errors::ActionResult;
use crate::domain::params::Params;
use crate::msgs::{
    MsgApproveAction, MsgApproveActionResponse, MsgFinalizeAction, MsgFinalizeActionResponse,
    MsgRequestAction, MsgRequestActionResponse, MsgUpdateParams, MsgUpdateParamsResponse,
};

/// Default page size when a request leaves `limit` at 0.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Offset pagination over results ordered by action id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    /// 0 selects [`DEFAULT_PAGE_LIMIT`].
    pub limit: u64,
    pub count_total: bool,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            count_total: false,
        }
    }

    pub fn with_count_total(mut self) -> Self {
        self.count_total = true;
        self
    }

    pub fn effective_limit(&self) -> u64 {
        if self.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageResponse {
    /// Set only when the request asked for `count_total`.
    pub total: Option<u64>,
    /// Offset of the next page, if there is one.
    pub next_offset: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionFilter {
    pub action_type: Option<ActionType>,
    pub state: Option<ActionState>,
}

impl ActionFilter {
    pub fn matches(&self, action: &Action) -> bool {
        self.action_type.map_or(true, |t| action.action_type == t)
            && self.state.map_or(true, |s| action.state == s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionPage {
    pub actions: Vec<Action>,
    pub page: PageResponse,
}

/// Transaction entry points.
pub trait ActionMsgApi {
    fn request_action(
        &mut self,
        block: BlockContext,
        msg: MsgRequestAction,
    ) -> ActionResult<MsgRequestActionResponse>;

    /// Soft-committed rejections are returned as `Err` after the write.
    fn finalize_action(
        &mut self,
        block: BlockContext,
        msg: MsgFinalizeAction,
    ) -> ActionResult<MsgFinalizeActionResponse>;

    fn approve_action(
        &mut self,
        block: BlockContext,
        msg: MsgApproveAction,
    ) -> ActionResult<MsgApproveActionResponse>;

    fn update_params(&mut self, msg: MsgUpdateParams) -> ActionResult<MsgUpdateParamsResponse>;

    /// End-of-block hook; runs the expiration sweep.
    fn end_block(&mut self, block: BlockContext);
}

/// Read-only queries.
pub trait ActionQueryApi {
    fn params(&self) -> ActionResult<Params>;

    fn get_action(&self, action_id: &str) -> ActionResult<Action>;

    /// Fee for `data_size` bytes, given as a decimal string.
    fn get_action_fee(&self, data_size: &str) -> ActionResult<Coin>;

    fn list_actions(&self, filter: &ActionFilter, page: &PageRequest) -> ActionResult<ActionPage>;

    fn list_actions_by_block_height(&self, height: u64, page: &PageRequest) -> ActionResult<ActionPage>;

    fn list_actions_by_creator(&self, creator: &str, page: &PageRequest) -> ActionResult<ActionPage>;

    fn list_actions_by_supernode(&self, supernode: &str, page: &PageRequest) -> ActionResult<ActionPage>;

    fn list_expired_actions(&self, page: &PageRequest) -> ActionResult<ActionPage>;

    /// `query` has the form `field=value`.
    fn query_action_by_metadata(
        &self,
        action_type: ActionType,
        query: &str,
        page: &PageRequest,
    ) -> ActionResult<ActionPage>;
}
