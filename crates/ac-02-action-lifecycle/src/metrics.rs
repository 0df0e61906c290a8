//! # Action Metrics
//!
//! Prometheus counters, enabled with the `metrics` feature:
//! ```toml
//! ac-02-action-lifecycle = { path = "...", features = ["metrics"] }
//! ```
//!
//! - `action_registered_total` - Actions registered, by type
//! - `action_finalized_total` - Actions reaching Done, by type
//! - `action_finalization_rejected_total` - Refused or rejected submissions, by reason
//! - `action_expired_total` - Actions expired by the sweep
//! - `action_fees_distributed_total` - Fee amount paid out of escrow

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref ACTIONS_REGISTERED: IntCounterVec = register_int_counter_vec!(
        "action_registered_total",
        "Total number of actions registered",
        &["type"]
    )
    .expect("Failed to create ACTIONS_REGISTERED metric");

    pub static ref ACTIONS_FINALIZED: IntCounterVec = register_int_counter_vec!(
        "action_finalized_total",
        "Total number of actions finalized",
        &["type"]
    )
    .expect("Failed to create ACTIONS_FINALIZED metric");

    pub static ref FINALIZATION_REJECTED: IntCounterVec = register_int_counter_vec!(
        "action_finalization_rejected_total",
        "Total number of finalization submissions rejected",
        &["reason"]
    )
    .expect("Failed to create FINALIZATION_REJECTED metric");

    pub static ref ACTIONS_EXPIRED: IntCounter = register_int_counter!(
        "action_expired_total",
        "Total number of actions expired"
    )
    .expect("Failed to create ACTIONS_EXPIRED metric");

    /// Saturates at u64::MAX per increment.
    pub static ref FEES_DISTRIBUTED: IntCounter = register_int_counter!(
        "action_fees_distributed_total",
        "Total fee amount distributed from escrow"
    )
    .expect("Failed to create FEES_DISTRIBUTED metric");
}

#[cfg(feature = "metrics")]
pub fn record_registered(action_type: &str) {
    ACTIONS_REGISTERED.with_label_values(&[action_type]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_finalized(action_type: &str) {
    ACTIONS_FINALIZED.with_label_values(&[action_type]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_finalization_rejected(reason: &str) {
    FINALIZATION_REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_expired() {
    ACTIONS_EXPIRED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_fees_distributed(amount: u128) {
    FEES_DISTRIBUTED.inc_by(u64::try_from(amount).unwrap_or(u64::MAX));
}

#[cfg(not(feature = "metrics"))]
pub fn record_registered(_action_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_finalized(_action_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_finalization_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_expired() {}

#[cfg(not(feature = "metrics"))]
pub fn record_fees_distributed(_amount: u128) {}
