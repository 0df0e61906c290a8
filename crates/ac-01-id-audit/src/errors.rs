//! Error types for the ID codec and audit.

use thiserror::Error;

/// ID codec and audit errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdAuditError {
    /// zstd rejected the input.
    #[error("failed to zstd compress data: {0}")]
    Compression(String),

    /// No identifiers were submitted.
    #[error("ids list is empty")]
    EmptyIds,

    /// The signatures string used as derivation input is empty.
    #[error("signatures are empty")]
    EmptySignatures,

    /// Counter max must be positive.
    #[error("counter max must be positive, got {0}")]
    InvalidCounterMax(u64),

    /// Submitted list length does not match the counter window.
    #[error("expected {expected} ids, got {actual}")]
    CountMismatch { expected: u64, actual: usize },

    /// A submitted identifier is empty.
    #[error("id at index {index} is empty")]
    EmptyEntry { index: usize },

    /// The sampled identifier does not match its derivation.
    #[error("id at index {index} does not match: expected {expected}, got {actual}")]
    Mismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    /// `counter_ic + index` does not fit in u64.
    #[error("counter overflow at ic {ic} + index {index}")]
    CounterOverflow { ic: u64, index: u64 },
}

/// Result alias for codec and audit operations.
pub type IdAuditResult<T> = Result<T, IdAuditError>;
