//! # Type Handlers
//!
//! Per-type metadata validation and finalization logic, dispatched through
//! an [`ActionRegistry`] keyed by [`ActionType`].

pub mod cascade;
pub mod sense;
pub mod signature;

use std::collections::HashMap;

use ac_01_id_audit::{AuditSeed, IdAuditError};
use shared_types::{Address, BlockContext};

use crate::domain::entities::{Action, ActionState, ActionType};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;
use crate::ports::outbound::AccountKeeper;

pub use cascade::CascadeHandler;
pub use sense::SenseHandler;

/// Which message a JSON metadata payload arrived with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgKind {
    RequestAction,
    FinalizeAction,
}

/// Read-only context handed to handlers.
pub struct HandlerContext<'a> {
    pub block: BlockContext,
    pub params: &'a Params,
    pub accounts: &'a dyn AccountKeeper,
}

impl HandlerContext<'_> {
    /// Audit seed for a submission by `submitter` on `action`.
    pub fn audit_seed(&self, action: &Action, submitter: &Address) -> AuditSeed {
        AuditSeed::new(self.block.height, action.action_id.clone(), submitter.as_str())
    }
}

/// What a finalization submission does to the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeVerdict {
    pub state: ActionState,
    /// Replacement metadata bytes.
    pub metadata: Vec<u8>,
    /// Supernodes to mark bad, the submitter included if applicable.
    pub flag_bad: Vec<String>,
    /// Error reported to the submitter after the verdict is committed.
    pub advisory: Option<ActionError>,
}

impl FinalizeVerdict {
    pub fn accept(state: ActionState, metadata: Vec<u8>) -> Self {
        Self {
            state,
            metadata,
            flag_bad: Vec::new(),
            advisory: None,
        }
    }
}

/// Behavior that varies by action type.
pub trait ActionHandler: Send + Sync {
    fn action_type(&self) -> ActionType;

    /// Validate a message's JSON metadata and convert it to the binary
    /// storage format. `params` is required for `RequestAction`.
    fn process(&self, json: &str, kind: MsgKind, params: Option<&Params>) -> ActionResult<Vec<u8>>;

    /// Registration-time checks on a new action's metadata.
    fn register_action(&self, ctx: &HandlerContext<'_>, action: &Action) -> ActionResult<()>;

    /// Evaluate a supernode's submission against the stored action.
    fn finalize_action(
        &self,
        ctx: &HandlerContext<'_>,
        action: &Action,
        supernode: &Address,
        metadata: &[u8],
    ) -> ActionResult<FinalizeVerdict>;

    /// Type-specific approval checks. The default only requires readable
    /// metadata.
    fn validate_approval(&self, action: &Action) -> ActionResult<()> {
        action.decode_metadata().map(|_| ())
    }
}

/// Handlers keyed by action type, built once per keeper.
pub struct ActionRegistry {
    handlers: HashMap<ActionType, Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(handler.action_type(), handler);
    }

    pub fn get(&self, action_type: ActionType) -> ActionResult<&dyn ActionHandler> {
        self.handlers
            .get(&action_type)
            .map(|h| h.as_ref())
            .ok_or_else(|| {
                ActionError::InvalidActionType(format!("no handler for {action_type}"))
            })
    }

    pub fn registered_types(&self) -> Vec<ActionType> {
        let mut types: Vec<_> = self.handlers.keys().copied().collect();
        types.sort();
        types
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(CascadeHandler));
        registry.register(Box::new(SenseHandler));
        registry
    }
}

/// Parse JSON metadata into `T`.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(json: &str) -> ActionResult<T> {
    serde_json::from_str(json)
        .map_err(|e| ActionError::InvalidMetadata(format!("failed to parse metadata JSON: {e}")))
}

pub(crate) fn require(condition: bool, message: &str) -> ActionResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ActionError::InvalidMetadata(message.to_string()))
    }
}

/// Structural audit failures are metadata errors; a sampled mismatch is an
/// invalid ID.
pub(crate) fn audit_error(e: IdAuditError) -> ActionError {
    match e {
        IdAuditError::Mismatch { .. } => ActionError::InvalidId(e.to_string()),
        other => ActionError::InvalidMetadata(other.to_string()),
    }
}
