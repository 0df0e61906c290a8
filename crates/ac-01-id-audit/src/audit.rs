//! # ID List Audit
//!
//! A prover submits `counter_max` identifiers claimed to be
//! `create_id(signatures, counter_ic + i)`. Recomputing all of them costs
//! O(max) compressions and hashes, so the audit checks one position chosen by
//! an [`AuditSeed`]. A list with a fraction `f` of forged entries is caught
//! with probability `f` per submission.
//!
//! The position is derived from transaction context rather than local
//! randomness: every replica samples the same index and reaches the same
//! verdict.

use sha3::{Digest, Sha3_256};
use tracing::debug;

use crate::codec::create_id;
use crate::errors::{IdAuditError, IdAuditResult};

const SEED_DOMAIN: &[u8] = b"action-id-audit/v1";

/// Transaction context that determines the audited position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditSeed {
    pub block_height: u64,
    pub action_id: String,
    pub submitter: String,
}

impl AuditSeed {
    pub fn new(block_height: u64, action_id: impl Into<String>, submitter: impl Into<String>) -> Self {
        Self {
            block_height,
            action_id: action_id.into(),
            submitter: submitter.into(),
        }
    }

    /// Index in `[0, counter_max)` audited for this context.
    ///
    /// Returns 0 when `counter_max` is 0; callers reject that case first.
    pub fn sample_index(&self, counter_ic: u64, counter_max: u64) -> u64 {
        if counter_max == 0 {
            return 0;
        }

        let mut hasher = Sha3_256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update(self.block_height.to_be_bytes());
        hasher.update((self.action_id.len() as u64).to_be_bytes());
        hasher.update(self.action_id.as_bytes());
        hasher.update((self.submitter.len() as u64).to_be_bytes());
        hasher.update(self.submitter.as_bytes());
        hasher.update(counter_ic.to_be_bytes());
        hasher.update(counter_max.to_be_bytes());
        let digest = hasher.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(word) % counter_max
    }
}

/// Audit a submitted identifier list against its derivation window.
pub fn verify_ids(
    ids: &[String],
    signatures: &str,
    counter_ic: u64,
    counter_max: u64,
    seed: &AuditSeed,
) -> IdAuditResult<()> {
    if ids.is_empty() {
        return Err(IdAuditError::EmptyIds);
    }
    if signatures.is_empty() {
        return Err(IdAuditError::EmptySignatures);
    }
    if counter_max == 0 {
        return Err(IdAuditError::InvalidCounterMax(counter_max));
    }
    if ids.len() as u64 != counter_max {
        return Err(IdAuditError::CountMismatch {
            expected: counter_max,
            actual: ids.len(),
        });
    }
    if let Some(index) = ids.iter().position(|id| id.is_empty()) {
        return Err(IdAuditError::EmptyEntry { index });
    }

    let index = seed.sample_index(counter_ic, counter_max);
    let counter = counter_ic
        .checked_add(index)
        .ok_or(IdAuditError::CounterOverflow {
            ic: counter_ic,
            index,
        })?;

    let expected = create_id(signatures, counter)?;
    // index < counter_max == ids.len(), so the cast and lookup are in range
    let position = index as usize;
    let actual = &ids[position];

    debug!(
        action_id = %seed.action_id,
        submitter = %seed.submitter,
        index,
        counter,
        "Audited submitted id"
    );

    if *actual != expected {
        return Err(IdAuditError::Mismatch {
            index: position,
            expected,
            actual: actual.clone(),
        });
    }

    Ok(())
}
