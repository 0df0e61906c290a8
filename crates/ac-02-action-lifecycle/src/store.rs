//! # Action Store
//!
//! Persisted layout:
//!
//! | Key | Value |
//! |-----|-------|
//! | `Action/value/{id}` | bincode `Action` |
//! | `Action/count/` | big-endian u64, last assigned id |
//! | `Action/state/{STATE}/{id}` | empty |
//! | `Action/creator/{creator}/{id}` | empty |
//! | `Action/height/{height:020}/{id}` | empty |
//! | `Params/` | bincode `Params` |
//!
//! Reads go straight to the store. Writes are collected in a [`WriteBatch`]
//! and applied with one `atomic_batch_write`.

use crate::domain::entities::{Action, ActionState};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;
use crate::ports::outbound::{BatchOperation, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    Action,
    Count,
    State,
    Creator,
    Height,
    Params,
}

impl KeyPrefix {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Action => b"Action/value/",
            KeyPrefix::Count => b"Action/count/",
            KeyPrefix::State => b"Action/state/",
            KeyPrefix::Creator => b"Action/creator/",
            KeyPrefix::Height => b"Action/height/",
            KeyPrefix::Params => b"Params/",
        }
    }

    pub fn key(&self, suffix: &str) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix.as_bytes());
        key
    }

    pub fn action_key(action_id: &str) -> Vec<u8> {
        KeyPrefix::Action.key(action_id)
    }

    pub fn count_key() -> Vec<u8> {
        KeyPrefix::Count.key("")
    }

    pub fn params_key() -> Vec<u8> {
        KeyPrefix::Params.key("")
    }

    pub fn state_prefix(state: ActionState) -> Vec<u8> {
        KeyPrefix::State.key(&format!("{}/", state.as_str()))
    }

    pub fn state_key(state: ActionState, action_id: &str) -> Vec<u8> {
        KeyPrefix::State.key(&format!("{}/{action_id}", state.as_str()))
    }

    pub fn creator_prefix(creator: &str) -> Vec<u8> {
        KeyPrefix::Creator.key(&format!("{creator}/"))
    }

    pub fn creator_key(creator: &str, action_id: &str) -> Vec<u8> {
        KeyPrefix::Creator.key(&format!("{creator}/{action_id}"))
    }

    pub fn height_prefix(height: u64) -> Vec<u8> {
        KeyPrefix::Height.key(&format!("{height:020}/"))
    }

    pub fn height_key(height: u64, action_id: &str) -> Vec<u8> {
        KeyPrefix::Height.key(&format!("{height:020}/{action_id}"))
    }
}

/// Order action ids numerically ("2" before "10").
pub fn sort_action_ids(ids: &mut [String]) {
    ids.sort_by(|a, b| (a.len(), a.as_str()).cmp(&(b.len(), b.as_str())));
}

pub fn load_action<S: KeyValueStore + ?Sized>(store: &S, action_id: &str) -> ActionResult<Option<Action>> {
    match store.get(&KeyPrefix::action_key(action_id))? {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}

pub fn require_action<S: KeyValueStore + ?Sized>(store: &S, action_id: &str) -> ActionResult<Action> {
    load_action(store, action_id)?
        .ok_or_else(|| ActionError::NotFound(format!("action {action_id} not found")))
}

/// Stored params, or the defaults if governance never set them.
pub fn load_params<S: KeyValueStore + ?Sized>(store: &S) -> ActionResult<Params> {
    match store.get(&KeyPrefix::params_key())? {
        Some(bytes) => Ok(bincode::deserialize(&bytes)?),
        None => Ok(Params::default()),
    }
}

/// Last assigned action id, 0 if none.
pub fn load_count<S: KeyValueStore + ?Sized>(store: &S) -> ActionResult<u64> {
    match store.get(&KeyPrefix::count_key())? {
        Some(bytes) => {
            let raw: [u8; 8] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| ActionError::Codec(format!("action counter has {} bytes", bytes.len())))?;
            Ok(u64::from_be_bytes(raw))
        }
        None => Ok(0),
    }
}

/// Action ids under an index prefix, numerically ordered.
pub fn index_ids<S: KeyValueStore + ?Sized>(store: &S, prefix: &[u8]) -> ActionResult<Vec<String>> {
    let mut ids = store
        .prefix_scan(prefix)?
        .into_iter()
        .map(|(key, _)| {
            String::from_utf8(key[prefix.len()..].to_vec())
                .map_err(|e| ActionError::Codec(format!("index key is not UTF-8: {e}")))
        })
        .collect::<ActionResult<Vec<_>>>()?;
    sort_action_ids(&mut ids);
    Ok(ids)
}

/// Every stored action, numerically ordered by id.
pub fn all_actions<S: KeyValueStore + ?Sized>(store: &S) -> ActionResult<Vec<Action>> {
    let mut actions = store
        .prefix_scan(KeyPrefix::Action.as_bytes())?
        .into_iter()
        .map(|(_, value)| bincode::deserialize::<Action>(&value).map_err(ActionError::from))
        .collect::<ActionResult<Vec<_>>>()?;
    actions.sort_by(|a, b| {
        (a.action_id.len(), a.action_id.as_str()).cmp(&(b.action_id.len(), b.action_id.as_str()))
    });
    Ok(actions)
}

/// Writes staged by one keeper operation.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOperation>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `action` and its index entries. `previous` is the stored
    /// version, if any; its state index entry is moved when the state
    /// changed.
    pub fn put_action(&mut self, action: &Action, previous: Option<&Action>) -> ActionResult<()> {
        self.ops.push(BatchOperation::put(
            KeyPrefix::action_key(&action.action_id),
            bincode::serialize(action)?,
        ));

        match previous {
            Some(old) if old.state != action.state => {
                self.ops
                    .push(BatchOperation::delete(KeyPrefix::state_key(old.state, &old.action_id)));
                self.ops.push(BatchOperation::put(
                    KeyPrefix::state_key(action.state, &action.action_id),
                    Vec::new(),
                ));
            }
            Some(_) => {}
            None => {
                self.ops.push(BatchOperation::put(
                    KeyPrefix::state_key(action.state, &action.action_id),
                    Vec::new(),
                ));
                self.ops.push(BatchOperation::put(
                    KeyPrefix::creator_key(action.creator.as_str(), &action.action_id),
                    Vec::new(),
                ));
                self.ops.push(BatchOperation::put(
                    KeyPrefix::height_key(action.block_height, &action.action_id),
                    Vec::new(),
                ));
            }
        }
        Ok(())
    }

    pub fn put_count(&mut self, count: u64) {
        self.ops.push(BatchOperation::put(
            KeyPrefix::count_key(),
            count.to_be_bytes().to_vec(),
        ));
    }

    pub fn put_params(&mut self, params: &Params) -> ActionResult<()> {
        self.ops
            .push(BatchOperation::put(KeyPrefix::params_key(), bincode::serialize(params)?));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn commit<S: KeyValueStore + ?Sized>(self, store: &mut S) -> ActionResult<()> {
        if self.ops.is_empty() {
            return Ok(());
        }
        store.atomic_batch_write(self.ops)?;
        Ok(())
    }
}
