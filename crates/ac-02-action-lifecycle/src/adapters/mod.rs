//! # Adapters
//!
//! In-memory implementations of the outbound ports, used by the test
//! harness and by hosts that embed the keeper without a chain.

mod accounts;
mod audit;
mod bank;
mod events;
mod memory;
mod supernodes;

pub use accounts::InMemoryAccounts;
pub use audit::InMemoryAuditLog;
pub use bank::InMemoryBank;
pub use events::RecordingEventSink;
pub use memory::InMemoryKVStore;
pub use supernodes::StaticSupernodes;
