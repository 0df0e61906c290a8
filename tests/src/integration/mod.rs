//! # Integration Scenarios
//!
//! Each scenario drives the keeper only through `MsgServer` and the query
//! API, the way a host chain would, against the in-memory adapters.

pub mod cascade;
pub mod expiration;
pub mod queries;
pub mod sense;
