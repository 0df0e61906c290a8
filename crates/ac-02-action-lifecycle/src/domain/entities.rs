//! # Action Entities
//!
//! The persisted `Action` record, its type/state enums and the per-type
//! metadata payloads.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::{Address, Coin};

use super::errors::{ActionError, ActionResult};

/// Kind of off-chain job an action represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionType {
    Unspecified,
    /// Erasure-coded storage, finalized by a single supernode.
    Cascade,
    /// Content fingerprinting, finalized by supernode consensus.
    Sense,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "ACTION_TYPE_UNSPECIFIED",
            Self::Cascade => "ACTION_TYPE_CASCADE",
            Self::Sense => "ACTION_TYPE_SENSE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ActionError;

    /// Accepts both the short (`CASCADE`) and enum (`ACTION_TYPE_CASCADE`)
    /// spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.strip_prefix("ACTION_TYPE_").unwrap_or(&upper) {
            "CASCADE" => Ok(Self::Cascade),
            "SENSE" => Ok(Self::Sense),
            "UNSPECIFIED" => Ok(Self::Unspecified),
            _ => Err(ActionError::InvalidActionType(s.to_string())),
        }
    }
}

/// Lifecycle state of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionState {
    Unspecified,
    Pending,
    Processing,
    Done,
    Approved,
    Rejected,
    Failed,
    Expired,
}

impl ActionState {
    pub const ALL: [ActionState; 8] = [
        Self::Unspecified,
        Self::Pending,
        Self::Processing,
        Self::Done,
        Self::Approved,
        Self::Rejected,
        Self::Failed,
        Self::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "ACTION_STATE_UNSPECIFIED",
            Self::Pending => "ACTION_STATE_PENDING",
            Self::Processing => "ACTION_STATE_PROCESSING",
            Self::Done => "ACTION_STATE_DONE",
            Self::Approved => "ACTION_STATE_APPROVED",
            Self::Rejected => "ACTION_STATE_REJECTED",
            Self::Failed => "ACTION_STATE_FAILED",
            Self::Expired => "ACTION_STATE_EXPIRED",
        }
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Approved | Self::Rejected | Self::Failed | Self::Expired
        )
    }

    /// States the expiration sweep and finalization accept.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionState {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("ACTION_STATE_").unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().strip_prefix("ACTION_STATE_") == Some(short))
            .ok_or_else(|| ActionError::InvalidActionState(format!("unknown state {s}")))
    }
}

/// A registered action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action_id: String,
    pub creator: Address,
    pub action_type: ActionType,
    /// Binary-encoded [`ActionMetadata`].
    pub metadata: Vec<u8>,
    pub price: Coin,
    /// Unix seconds; 0 never expires.
    pub expiration_time: i64,
    pub state: ActionState,
    pub block_height: u64,
    /// Finalizing supernodes in submission order. Entries flagged by the
    /// consensus matcher carry the bad marker suffix.
    pub super_nodes: Vec<String>,
}

impl Action {
    /// Whether `supernode` already submitted, flagged or not.
    pub fn has_supernode(&self, supernode: &str, bad_marker: &str) -> bool {
        self.super_nodes
            .iter()
            .any(|entry| entry.strip_suffix(bad_marker).unwrap_or(entry.as_str()) == supernode)
    }

    /// Append the bad marker to `supernode`'s entry. Returns false if absent
    /// or already flagged.
    pub fn flag_bad(&mut self, supernode: &str, bad_marker: &str) -> bool {
        match self.super_nodes.iter_mut().find(|entry| entry.as_str() == supernode) {
            Some(entry) => {
                entry.push_str(bad_marker);
                true
            }
            None => false,
        }
    }

    /// Unflagged supernodes, deduplicated, in submission order.
    pub fn rewarded_supernodes(&self, bad_marker: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for entry in &self.super_nodes {
            if entry.ends_with(bad_marker) || out.contains(entry) {
                continue;
            }
            out.push(entry.clone());
        }
        out
    }

    pub fn decode_metadata(&self) -> ActionResult<ActionMetadata> {
        ActionMetadata::decode_for(self.action_type, &self.metadata)
    }
}

/// Cascade (storage) metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeMetadata {
    pub data_hash: String,
    pub file_name: String,
    pub rq_ids_ic: u64,
    pub rq_ids_max: u64,
    /// `base64(data).creator_signature`
    pub signatures: String,
    pub rq_ids_ids: Vec<String>,
    pub rq_ids_oti: Vec<u8>,
}

/// Sense (fingerprinting) metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenseMetadata {
    pub data_hash: String,
    pub collection_id: String,
    pub group_id: String,
    pub dd_and_fingerprints_ic: u64,
    pub dd_and_fingerprints_max: u64,
    /// `base64(data).sig1.sig2.sig3`
    pub signatures: String,
    pub dd_and_fingerprints_ids: Vec<String>,
    /// Running vote state: supernode address to joined fingerprint ids.
    pub supernode_fingerprints: BTreeMap<String, String>,
}

/// Type-tagged metadata as persisted on an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionMetadata {
    Cascade(CascadeMetadata),
    Sense(SenseMetadata),
}

impl ActionMetadata {
    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Cascade(_) => ActionType::Cascade,
            Self::Sense(_) => ActionType::Sense,
        }
    }

    pub fn encode(&self) -> ActionResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> ActionResult<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| ActionError::InvalidMetadata(format!("failed to decode metadata: {e}")))
    }

    /// Decode and check the tag against the action's declared type.
    pub fn decode_for(action_type: ActionType, bytes: &[u8]) -> ActionResult<Self> {
        if bytes.is_empty() {
            return Err(ActionError::InvalidMetadata("metadata is empty".into()));
        }
        let metadata = Self::decode(bytes)?;
        if metadata.action_type() != action_type {
            return Err(ActionError::InvalidMetadata(format!(
                "metadata is {} but action is {}",
                metadata.action_type(),
                action_type
            )));
        }
        Ok(metadata)
    }

    pub fn into_cascade(self) -> ActionResult<CascadeMetadata> {
        match self {
            Self::Cascade(m) => Ok(m),
            other => Err(ActionError::InvalidMetadata(format!(
                "expected cascade metadata, got {}",
                other.action_type()
            ))),
        }
    }

    pub fn into_sense(self) -> ActionResult<SenseMetadata> {
        match self {
            Self::Sense(m) => Ok(m),
            other => Err(ActionError::InvalidMetadata(format!(
                "expected sense metadata, got {}",
                other.action_type()
            ))),
        }
    }

    /// Value of a queryable metadata field.
    pub fn field(&self, name: &str) -> Option<&str> {
        match (self, name) {
            (Self::Cascade(m), "data_hash") => Some(&m.data_hash),
            (Self::Cascade(m), "file_name") => Some(&m.file_name),
            (Self::Sense(m), "data_hash") => Some(&m.data_hash),
            (Self::Sense(m), "collection_id") => Some(&m.collection_id),
            (Self::Sense(m), "group_id") => Some(&m.group_id),
            _ => None,
        }
    }
}

/// Outcome of a finalization submission that reached the store.
///
/// `Rejected` means the submission's effects were committed (the supernode
/// is recorded, votes updated or flagged) but the transaction must still
/// report `advisory` to the submitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finalization {
    Accepted { state: ActionState },
    Rejected { state: ActionState, advisory: ActionError },
}

impl Finalization {
    pub fn state(&self) -> ActionState {
        match self {
            Self::Accepted { state } | Self::Rejected { state, .. } => *state,
        }
    }

    pub fn advisory(&self) -> Option<&ActionError> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { advisory, .. } => Some(advisory),
        }
    }

    /// Collapse into the transaction result reported to the submitter.
    pub fn into_result(self) -> ActionResult<ActionState> {
        match self {
            Self::Accepted { state } => Ok(state),
            Self::Rejected { advisory, .. } => Err(advisory),
        }
    }
}
