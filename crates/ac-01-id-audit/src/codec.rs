//! # ID Codec
//!
//! `create_id(signatures, counter) = base58(sha3_256(zstd("{signatures}.{counter}")))`
//!
//! The compression level is pinned so that every replica derives byte-identical
//! compressed frames and therefore identical identifiers.

use sha3::{Digest, Sha3_256};

use crate::errors::{IdAuditError, IdAuditResult};

/// zstd level used for identifier derivation.
pub const ID_COMPRESSION_LEVEL: i32 = 3;

/// Derive the identifier for `counter` from a signatures string.
pub fn create_id(signatures: &str, counter: u64) -> IdAuditResult<String> {
    let input = format!("{signatures}.{counter}");

    let compressed = zstd::encode_all(input.as_bytes(), ID_COMPRESSION_LEVEL)
        .map_err(|e| IdAuditError::Compression(e.to_string()))?;

    let digest = Sha3_256::digest(&compressed);
    Ok(bs58::encode(digest).into_string())
}

/// Derive `count` consecutive identifiers starting at `counter_ic`.
///
/// This is what an honest prover submits for a `(ic, max)` window.
pub fn create_ids(signatures: &str, counter_ic: u64, count: u64) -> IdAuditResult<Vec<String>> {
    (0..count)
        .map(|offset| {
            let counter = counter_ic
                .checked_add(offset)
                .ok_or(IdAuditError::CounterOverflow {
                    ic: counter_ic,
                    index: offset,
                })?;
            create_id(signatures, counter)
        })
        .collect()
}
