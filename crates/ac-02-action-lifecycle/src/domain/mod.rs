//! # Domain Layer
//!
//! Pure domain logic for the action module. No store or collaborator
//! access happens here.
//!
//! ## Modules
//!
//! - `entities` - Action record, type/state enums, tagged metadata
//! - `state_machine` - Lifecycle transition graph
//! - `consensus` - Majority vote over Sense fingerprints
//! - `params` - Governance parameters and fee shares
//! - `fees` - Fee split planning
//! - `config` - Keeper construction settings
//! - `events` - Event kinds and builders
//! - `errors` - Error taxonomy with stable codes

pub mod config;
pub mod consensus;
pub mod entities;
pub mod errors;
pub mod events;
pub mod fees;
pub mod params;
pub mod state_machine;
