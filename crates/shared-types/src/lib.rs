//! # Shared Types Crate
//!
//! Ledger primitives used across the action-chain crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: addresses, coins and events are defined once
//!   here and re-used by the lifecycle engine and its collaborators.
//! - **Validated Construction**: `Address` and `Coin` can only be parsed from
//!   strings that pass the same rules the ledger applies to messages.

pub mod entities;
pub mod errors;
pub mod events;

pub use entities::*;
pub use errors::*;
pub use events::{Event, EventAttribute};
