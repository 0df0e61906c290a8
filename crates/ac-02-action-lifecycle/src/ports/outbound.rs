//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the keeper depends on: the key-value store it persists to,
//! and the bank, account, supernode, staking, distribution and audit modules
//! of the host chain.

use shared_types::{Address, Coin, Event};
use shared_crypto::AccountPublicKey;
use thiserror::Error;

use crate::domain::errors::KVStoreError;

// =============================================================================
// STORAGE
// =============================================================================

/// Result type for prefix scan operations.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value database operations.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Either ALL operations in the batch are applied, or NONE are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Entries whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

// =============================================================================
// BANK / DISTRIBUTION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("insufficient funds: {address} has {available}{denom}, needs {required}{denom}")]
    InsufficientFunds {
        address: String,
        denom: String,
        available: u128,
        required: u128,
    },

    #[error("unknown module account: {0}")]
    UnknownModule(String),

    #[error("recipient blocked: {0}")]
    Blocked(String),
}

/// Token balances and transfers.
pub trait BankKeeper: Send + Sync {
    /// Balance not locked by vesting or other holds.
    fn spendable_balance(&self, address: &Address, denom: &str) -> u128;

    fn get_balance(&self, address: &Address, denom: &str) -> u128;

    fn send_coins_from_account_to_module(
        &self,
        sender: &Address,
        module: &str,
        amount: &Coin,
    ) -> Result<(), BankError>;

    fn send_coins_from_module_to_account(
        &self,
        module: &str,
        recipient: &Address,
        amount: &Coin,
    ) -> Result<(), BankError>;
}

/// Community pool funding.
pub trait DistributionKeeper: Send + Sync {
    fn fund_community_pool(&self, amount: &Coin, sender: &Address) -> Result<(), BankError>;
}

// =============================================================================
// ACCOUNTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: Address,
    pub account_number: u64,
    /// Unset until the account signs its first transaction.
    pub public_key: Option<AccountPublicKey>,
}

pub trait AccountKeeper: Send + Sync {
    fn get_account(&self, address: &Address) -> Option<AccountInfo>;
}

// =============================================================================
// SUPERNODES / STAKING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupernodeState {
    Active,
    Disabled,
    Stopped,
    Penalized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupernodeInfo {
    /// Operator address of the backing validator.
    pub validator_address: String,
    /// Account the supernode signs and gets paid with.
    pub supernode_account: Address,
    pub state: SupernodeState,
    pub registered_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("supernode query failed: {0}")]
pub struct SupernodeQueryError(pub String);

pub trait SupernodeKeeper: Send + Sync {
    /// Top `limit` supernodes in `state` for `height`, ranked by the
    /// supernode module's block-specific ordering.
    fn get_top_supernodes_for_block(
        &self,
        height: u64,
        limit: usize,
        state: SupernodeState,
    ) -> Result<Vec<SupernodeInfo>, SupernodeQueryError>;

    fn query_supernode(&self, validator_address: &str) -> Option<SupernodeInfo>;

    fn is_supernode_active(&self, validator_address: &str) -> bool {
        self.query_supernode(validator_address)
            .is_some_and(|sn| sn.state == SupernodeState::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorInfo {
    pub operator_address: String,
    pub jailed: bool,
    pub bonded: bool,
}

pub trait StakingKeeper: Send + Sync {
    fn get_validator(&self, operator_address: &str) -> Option<ValidatorInfo>;
}

// =============================================================================
// AUDIT / EVENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceType {
    FinalizationSignatureFailure,
    FinalizationNotInTopSupernodes,
}

/// Evidence that a supernode's finalization attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizationEvidence {
    pub reporter: Address,
    pub subject: String,
    pub action_id: String,
    pub evidence_type: EvidenceType,
    /// JSON: attempted finalizer, expected finalizers, reason.
    pub metadata_json: String,
}

pub trait AuditKeeper: Send + Sync {
    /// Persist evidence and return its id.
    fn create_evidence(&self, evidence: FinalizationEvidence) -> Result<u64, String>;
}

/// Receives events after the writes that produced them commit.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}
