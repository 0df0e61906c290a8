//! # Action Module Errors
//!
//! Every error kind carries a stable numeric code so that clients can match
//! on it independently of the message text.

use thiserror::Error;

/// Errors from the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    #[error("Key not found")]
    NotFound,

    #[error("I/O error: {message}")]
    IOError { message: String },

    #[error("Batch write failed: {message}")]
    BatchFailed { message: String },
}

/// Action lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("action expired: {0}")]
    ActionExpired(String),

    #[error("invalid action type: {0}")]
    InvalidActionType(String),

    #[error("action not found: {0}")]
    NotFound(String),

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("invalid action state: {0}")]
    InvalidActionState(String),

    #[error("duplicate action: {0}")]
    DuplicateAction(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("invalid ID: {0}")]
    InvalidId(String),

    #[error("unauthorized supernode: {0}")]
    UnauthorizedSupernode(String),

    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("finalization error: {0}")]
    FinalizationError(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("bank transfer failed: {0}")]
    Bank(String),

    #[error("store error: {0}")]
    Store(#[from] KVStoreError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("invalid signer: {0}")]
    InvalidSigner(String),
}

impl ActionError {
    /// Stable module error code.
    pub fn code(&self) -> u32 {
        match self {
            Self::ActionExpired(_) => 1,
            Self::InvalidActionType(_) => 2,
            Self::NotFound(_) => 3,
            Self::InvalidMetadata(_) => 4,
            Self::InvalidActionState(_) => 5,
            Self::DuplicateAction(_) => 6,
            Self::InvalidSignature(_) => 7,
            Self::Internal(_) => 8,
            Self::InvalidId(_) => 9,
            Self::UnauthorizedSupernode(_) => 10,
            Self::InvalidExpiration(_) => 11,
            Self::InvalidPrice(_) => 12,
            Self::InvalidAddress(_) => 13,
            Self::FinalizationError(_) => 14,
            Self::InvalidRequest(_) => 16,
            Self::InsufficientFunds(_) => 17,
            Self::Bank(_) => 18,
            Self::Store(_) => 19,
            Self::Codec(_) => 20,
            Self::InvalidSigner(_) => 1100,
        }
    }

    /// Registered module kinds (codes 1..=15). The finalize message handler
    /// passes these through and reports anything else as an invalid state.
    pub fn is_module_kind(&self) -> bool {
        self.code() <= 15
    }

    /// Metric label for this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActionExpired(_) => "action_expired",
            Self::InvalidActionType(_) => "invalid_action_type",
            Self::NotFound(_) => "not_found",
            Self::InvalidMetadata(_) => "invalid_metadata",
            Self::InvalidActionState(_) => "invalid_action_state",
            Self::DuplicateAction(_) => "duplicate_action",
            Self::InvalidSignature(_) => "invalid_signature",
            Self::Internal(_) => "internal",
            Self::InvalidId(_) => "invalid_id",
            Self::UnauthorizedSupernode(_) => "unauthorized_supernode",
            Self::InvalidExpiration(_) => "invalid_expiration",
            Self::InvalidPrice(_) => "invalid_price",
            Self::InvalidAddress(_) => "invalid_address",
            Self::FinalizationError(_) => "finalization_error",
            Self::InvalidRequest(_) => "invalid_request",
            Self::InsufficientFunds(_) => "insufficient_funds",
            Self::Bank(_) => "bank",
            Self::Store(_) => "store",
            Self::Codec(_) => "codec",
            Self::InvalidSigner(_) => "invalid_signer",
        }
    }
}

impl From<bincode::Error> for ActionError {
    fn from(e: bincode::Error) -> Self {
        Self::Codec(e.to_string())
    }
}

/// Result alias for action operations.
pub type ActionResult<T> = Result<T, ActionError>;
