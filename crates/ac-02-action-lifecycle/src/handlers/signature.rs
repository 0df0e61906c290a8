//! # Signature Verifier
//!
//! Signatures embedded in metadata are dot-separated base64 strings:
//!
//! | Format | Signer |
//! |--------|--------|
//! | `data.sig` | action creator (Cascade registration) |
//! | `data.sig1.sig2.sig3` | finalizing supernode (Sense) |
//!
//! `data` is signed as its base64 text, not the decoded bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use shared_types::Address;
use tracing::debug;

use crate::domain::errors::{ActionError, ActionResult};
use crate::ports::outbound::AccountKeeper;

/// Verify a base64 `signature` by `signer` over `data`.
///
/// Every failure (unknown account, missing key, bad encoding, bad signature)
/// is reported as `InvalidSignature`.
pub fn verify_signature(
    accounts: &dyn AccountKeeper,
    signer: &Address,
    data: &[u8],
    signature_b64: &str,
) -> ActionResult<()> {
    let account = accounts
        .get_account(signer)
        .ok_or_else(|| ActionError::InvalidSignature(format!("account {signer} not found")))?;

    let public_key = account
        .public_key
        .ok_or_else(|| ActionError::InvalidSignature(format!("account {signer} has no public key")))?;

    let signature = BASE64
        .decode(signature_b64)
        .map_err(|e| ActionError::InvalidSignature(format!("signature is not base64: {e}")))?;

    public_key.verify(data, &signature).map_err(|e| {
        debug!(signer = %signer, algorithm = public_key.algorithm(), "Signature rejected: {e}");
        ActionError::InvalidSignature(format!("verification failed for {signer}: {e}"))
    })
}

/// `data.sig` as signed by an action creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorSignature<'a> {
    pub data: &'a str,
    pub signature: &'a str,
}

impl<'a> CreatorSignature<'a> {
    pub fn parse(value: &'a str) -> ActionResult<Self> {
        match value.split('.').collect::<Vec<_>>().as_slice() {
            [data, signature] if !data.is_empty() && !signature.is_empty() => Ok(Self {
                data: *data,
                signature: *signature,
            }),
            _ => Err(ActionError::InvalidSignature(
                "invalid signature format: expected data.signature".into(),
            )),
        }
    }

    pub fn verify(&self, accounts: &dyn AccountKeeper, signer: &Address) -> ActionResult<()> {
        verify_signature(accounts, signer, self.data.as_bytes(), self.signature)
    }
}

/// `data.sig1.sig2.sig3` as submitted by a finalizing supernode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupernodeSignatures<'a> {
    pub data: &'a str,
    pub signatures: [&'a str; 3],
}

impl<'a> SupernodeSignatures<'a> {
    pub fn parse(value: &'a str) -> ActionResult<Self> {
        match value.split('.').collect::<Vec<_>>().as_slice() {
            [data, a, b, c] if !data.is_empty() => Ok(Self {
                data: *data,
                signatures: [*a, *b, *c],
            }),
            _ => Err(ActionError::InvalidSignature(
                "invalid signature format: expected data.sig1.sig2.sig3".into(),
            )),
        }
    }

    /// Succeeds if any embedded signature verifies for `signer`.
    pub fn verify_any(&self, accounts: &dyn AccountKeeper, signer: &Address) -> ActionResult<()> {
        let mut last_error = None;
        for signature in self.signatures.iter().filter(|s| !s.is_empty()) {
            match verify_signature(accounts, signer, self.data.as_bytes(), signature) {
                Ok(()) => return Ok(()),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| {
            ActionError::InvalidSignature("no signature from supernode".into())
        }))
    }
}
