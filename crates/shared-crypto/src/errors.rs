//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key or signature byte length does not match the scheme
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Public key bytes are not a valid curve point
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Secret key bytes are out of range
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature bytes are malformed or not canonical
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature is well-formed but does not verify
    #[error("Signature verification failed")]
    SignatureVerificationFailed,
}
