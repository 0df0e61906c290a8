//! # Action Lifecycle Engine (ac-02)
//!
//! Registers paid off-chain jobs ("actions"), lets authorized supernodes
//! finalize them, pays the supernodes out of escrow and expires whatever is
//! left open too long.
//!
//! ## Lifecycle
//!
//! ```text
//!              request_action           finalize (Cascade, or Sense quorum)
//!  (creator) ───────────────→ PENDING ─────────────────────────────→ DONE ──approve──→ APPROVED
//!                                │  \                                  ↑
//!                                │   └─ first Sense vote → PROCESSING ─┘
//!                                │                           │
//!                                │                           └─ no majority → FAILED
//!                                └── expiration_time passed (end block) → EXPIRED (refund)
//! ```
//!
//! ## Domain Invariants
//!
//! | # | Invariant | Enforced in |
//! |---|-----------|-------------|
//! | 1 | Price is escrowed before the action exists | `service::register` |
//! | 2 | A supernode finalizes an action at most once | `service::finalize` |
//! | 3 | Only top-N active supernodes may finalize | `service::finalize` |
//! | 4 | Hard errors write nothing | `store::WriteBatch` |
//! | 5 | Flagged supernodes are never paid | `domain::fees` |
//! | 6 | Terminal states are never left | `domain::state_machine` |
//! | 7 | Expiry refunds the full price | `service::expiration` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, params, errors, consensus and fee math
//! - `handlers/` - Per-type metadata validation and finalization
//! - `ports/` - Inbound API traits, outbound host-chain traits
//! - `service/` - The keeper: every mutating operation
//! - `msg_server`, `queries` - Transaction and query entry points
//! - `adapters/` - In-memory port implementations
//!
//! ## Usage
//!
//! ```ignore
//! use ac_02_action_lifecycle::{ActionKeeper, ActionMsgApi, KeeperConfig, MsgServer};
//!
//! let mut keeper = ActionKeeper::new(store, KeeperConfig::new(gov, module_account), ports)?;
//! let response = MsgServer::new(&mut keeper).request_action(block, msg)?;
//! MsgServer::new(&mut keeper).end_block(next_block);
//! ```

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod metrics;
pub mod msg_server;
pub mod msgs;
pub mod ports;
pub mod queries;
pub mod service;
pub mod store;
pub mod test_utils;

// Re-export key types for convenience
pub use domain::config::KeeperConfig;
pub use domain::entities::{
    Action, ActionMetadata, ActionState, ActionType, CascadeMetadata, Finalization, SenseMetadata,
};
pub use domain::errors::{ActionError, ActionResult, KVStoreError};
pub use domain::params::{FeeShare, Params};
pub use handlers::{ActionHandler, ActionRegistry};
pub use msg_server::MsgServer;
pub use msgs::*;
pub use ports::inbound::{
    ActionFilter, ActionMsgApi, ActionPage, ActionQueryApi, PageRequest, PageResponse,
};
pub use ports::outbound::KeyValueStore;
pub use service::{ActionKeeper, KeeperPorts};
