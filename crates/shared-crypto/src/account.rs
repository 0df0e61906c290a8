//! # Account Keys
//!
//! An account signs with exactly one native scheme. `AccountPublicKey`
//! dispatches verification to that scheme so callers never branch on it.

use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey};
use crate::secp256k1::{Secp256k1KeyPair, Secp256k1PublicKey};
use crate::CryptoError;

/// Public key of an on-chain account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountPublicKey {
    Ed25519(Ed25519PublicKey),
    Secp256k1(Secp256k1PublicKey),
}

impl AccountPublicKey {
    /// Verify `signature` over `message` with the account's native scheme.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            Self::Ed25519(pk) => pk.verify(message, signature),
            Self::Secp256k1(pk) => pk.verify(message, signature),
        }
    }

    /// Scheme name, as used in account type URLs.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "ed25519",
            Self::Secp256k1(_) => "secp256k1",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(pk) => pk.as_bytes().to_vec(),
            Self::Secp256k1(pk) => pk.as_bytes().to_vec(),
        }
    }
}

impl From<Ed25519PublicKey> for AccountPublicKey {
    fn from(pk: Ed25519PublicKey) -> Self {
        Self::Ed25519(pk)
    }
}

impl From<Secp256k1PublicKey> for AccountPublicKey {
    fn from(pk: Secp256k1PublicKey) -> Self {
        Self::Secp256k1(pk)
    }
}

/// Signing half of an account key.
pub enum AccountKeyPair {
    Ed25519(Ed25519KeyPair),
    Secp256k1(Secp256k1KeyPair),
}

impl AccountKeyPair {
    pub fn generate_ed25519() -> Self {
        Self::Ed25519(Ed25519KeyPair::generate())
    }

    pub fn generate_secp256k1() -> Self {
        Self::Secp256k1(Secp256k1KeyPair::generate())
    }

    pub fn public_key(&self) -> AccountPublicKey {
        match self {
            Self::Ed25519(kp) => kp.public_key().into(),
            Self::Secp256k1(kp) => kp.public_key().into(),
        }
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Ed25519(kp) => kp.sign(message).to_vec(),
            Self::Secp256k1(kp) => kp.sign(message).to_vec(),
        }
    }
}
