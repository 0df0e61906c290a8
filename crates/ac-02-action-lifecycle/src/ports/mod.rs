//! # Ports Layer
//!
//! - `inbound.rs` - Driving ports (messages and queries exposed to the host)
//! - `outbound.rs` - Driven ports (store and host-chain collaborators)

pub mod inbound;
pub mod outbound;
