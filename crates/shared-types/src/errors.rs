//! # Error Types
//!
//! Parsing errors for the shared ledger primitives.

use thiserror::Error;

/// Errors raised while parsing addresses and coins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Address is empty.
    #[error("empty address")]
    EmptyAddress,

    /// Address does not carry the expected human-readable prefix.
    #[error("invalid address prefix: expected {expected}, got {address}")]
    InvalidPrefix { expected: String, address: String },

    /// Address contains characters outside the lowercase alphanumeric set.
    #[error("invalid address character in {0}")]
    InvalidAddressCharacter(String),

    /// Address length outside the accepted range.
    #[error("invalid address length {length}: must be between {min} and {max}")]
    InvalidAddressLength { length: usize, min: usize, max: usize },

    /// Coin string has no leading amount.
    #[error("invalid coin expression: {0}")]
    InvalidCoin(String),

    /// Denomination fails validation.
    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    /// Amount does not fit the integer range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
