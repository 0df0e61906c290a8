//! # Shared Crypto - Account Key Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ed25519` | Ed25519 | Account signatures |
//! | `secp256k1` | secp256k1 ECDSA | Account signatures (SHA-256 prehash) |
//! | `account` | dispatch | Verify with whichever scheme the account uses |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - **secp256k1**: RFC 6979 deterministic, low-S enforced on verify
//! - Secret material is zeroized on drop

#![warn(clippy::all)]

pub mod account;
pub mod ed25519;
pub mod errors;
pub mod secp256k1;

// Re-exports
pub use account::{AccountKeyPair, AccountPublicKey};
pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey};
pub use errors::CryptoError;
pub use secp256k1::{Secp256k1KeyPair, Secp256k1PublicKey};
