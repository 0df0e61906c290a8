//! # ID Codec & Audit
//!
//! Content-derived identifiers for Sense fingerprints and Cascade symbol
//! files, and the single-sample audit that checks a submitted list of them.
//!
//! ## Derivation
//!
//! ```text
//! id(signatures, counter) = base58( sha3_256( zstd( "{signatures}.{counter}" ) ) )
//! ```
//!
//! ## Audit
//!
//! | Check | Error |
//! |-------|-------|
//! | list non-empty | `EmptyIds` |
//! | signatures non-empty | `EmptySignatures` |
//! | `counter_max > 0` | `InvalidCounterMax` |
//! | `len(ids) == counter_max` | `CountMismatch` |
//! | no empty entry | `EmptyEntry` |
//! | sampled entry matches | `Mismatch` |

pub mod audit;
pub mod codec;
pub mod errors;

pub use audit::{verify_ids, AuditSeed};
pub use codec::{create_id, create_ids, ID_COMPRESSION_LEVEL};
pub use errors::{IdAuditError, IdAuditResult};
