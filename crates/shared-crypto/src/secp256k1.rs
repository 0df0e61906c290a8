//! # ECDSA Account Keys (secp256k1)
//!
//! Messages are SHA-256 prehashed before signing. Signatures are 64-byte
//! `r||s` and must be low-S; high-S signatures are rejected as malleable.

use crate::CryptoError;
use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use zeroize::Zeroize;

/// Compressed SEC1 public key length.
pub const SECP256K1_PUBLIC_KEY_LEN: usize = 33;
/// Signature length in bytes (`r||s`).
pub const SECP256K1_SIGNATURE_LEN: usize = 64;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey([u8; SECP256K1_PUBLIC_KEY_LEN]);

impl Secp256k1PublicKey {
    /// Create from SEC1 bytes, compressed (33) or uncompressed (65).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self::from_verifying_key(&verifying_key))
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let sec1 = key.to_sec1_bytes();
        let mut bytes = [0u8; SECP256K1_PUBLIC_KEY_LEN];
        bytes.copy_from_slice(&sec1[..SECP256K1_PUBLIC_KEY_LEN]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SECP256K1_PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Verify a 64-byte low-S signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        if signature.len() != SECP256K1_SIGNATURE_LEN {
            return Err(CryptoError::InvalidLength {
                expected: SECP256K1_SIGNATURE_LEN,
                actual: signature.len(),
            });
        }

        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;
        let sig = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;

        // normalize_s returns Some only for high-S input
        if sig.normalize_s().is_some() {
            return Err(CryptoError::InvalidSignature);
        }

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Create from secret scalar bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign a message (RFC 6979 deterministic, low-S).
    pub fn sign(&self, message: &[u8]) -> [u8; SECP256K1_SIGNATURE_LEN] {
        let sig: Signature = self.signing_key.sign(message);
        let sig = sig.normalize_s().unwrap_or(sig);
        sig.to_bytes().into()
    }
}

impl Drop for Secp256k1KeyPair {
    fn drop(&mut self) {
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}
