//! # Module Parameters
//!
//! Governance-controlled settings. Stored under `Params/` and replaced
//! wholesale by `update_params`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::{validate_denom, Coin};

use super::errors::{ActionError, ActionResult};

/// Fixed-point decimal scale for fee shares (18 places).
pub const SHARE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Decimal fraction in `[0, 1]` with 18 places of precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeeShare(u128);

impl FeeShare {
    pub const ZERO: FeeShare = FeeShare(0);
    pub const ONE: FeeShare = FeeShare(SHARE_SCALE);

    /// Parse a decimal such as `"0.25"` or `"1.0"`.
    pub fn parse(value: &str) -> ActionResult<Self> {
        let invalid = || ActionError::InvalidRequest(format!("invalid fee share {value:?}"));

        let value = value.trim();
        let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
        if int_part.is_empty()
            || frac_part.len() > 18
            || !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: u128 = int_part.parse().map_err(|_| invalid())?;
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{frac_part:0<18}");
            padded.parse().map_err(|_| invalid())?
        };

        let scaled = whole
            .checked_mul(SHARE_SCALE)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(invalid)?;
        if scaled > SHARE_SCALE {
            return Err(ActionError::InvalidRequest(format!(
                "fee share {value} exceeds 1"
            )));
        }
        Ok(Self(scaled))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `floor(amount * share)` without overflow.
    pub fn apply(&self, amount: u128) -> u128 {
        (amount / SHARE_SCALE) * self.0 + (amount % SHARE_SCALE) * self.0 / SHARE_SCALE
    }
}

impl fmt::Display for FeeShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / SHARE_SCALE, self.0 % SHARE_SCALE)
    }
}

/// Action module parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Minimum price; its denom is the only accepted fee denom.
    pub base_action_fee: Coin,
    pub fee_per_byte: Coin,
    pub max_actions_per_block: u64,
    /// Agreeing Sense submissions required before a consensus round.
    pub min_super_nodes: u64,
    pub max_dd_and_fingerprints: u64,
    pub max_raptor_q_symbols: u64,
    pub expiration_duration: Duration,
    pub min_processing_time: Duration,
    pub max_processing_time: Duration,
    pub super_node_fee_share: String,
    pub foundation_fee_share: String,
    /// Size of the authorized supernode set per block.
    pub top_supernodes_limit: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            base_action_fee: Coin {
                denom: "ulume".to_string(),
                amount: 10_000,
            },
            fee_per_byte: Coin {
                denom: "ulume".to_string(),
                amount: 100,
            },
            max_actions_per_block: 10,
            min_super_nodes: 3,
            max_dd_and_fingerprints: 50,
            max_raptor_q_symbols: 50,
            expiration_duration: Duration::from_secs(24 * 60 * 60),
            min_processing_time: Duration::from_secs(60),
            max_processing_time: Duration::from_secs(60 * 60),
            super_node_fee_share: "1.0".to_string(),
            foundation_fee_share: "0.0".to_string(),
            top_supernodes_limit: 10,
        }
    }
}

impl Params {
    pub fn with_base_action_fee(mut self, fee: Coin) -> Self {
        self.base_action_fee = fee;
        self
    }

    pub fn with_fee_per_byte(mut self, fee: Coin) -> Self {
        self.fee_per_byte = fee;
        self
    }

    pub fn with_expiration_duration(mut self, duration: Duration) -> Self {
        self.expiration_duration = duration;
        self
    }

    pub fn with_fee_shares(mut self, super_node: &str, foundation: &str) -> Self {
        self.super_node_fee_share = super_node.to_string();
        self.foundation_fee_share = foundation.to_string();
        self
    }

    pub fn with_max_actions_per_block(mut self, max: u64) -> Self {
        self.max_actions_per_block = max;
        self
    }

    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> ActionResult<()> {
        for (name, coin) in [
            ("base_action_fee", &self.base_action_fee),
            ("fee_per_byte", &self.fee_per_byte),
        ] {
            validate_denom(&coin.denom)
                .map_err(|e| ActionError::InvalidRequest(format!("{name}: {e}")))?;
        }

        for (name, value) in [
            ("max_actions_per_block", self.max_actions_per_block),
            ("min_super_nodes", self.min_super_nodes),
            ("max_dd_and_fingerprints", self.max_dd_and_fingerprints),
            ("max_raptor_q_symbols", self.max_raptor_q_symbols),
            ("top_supernodes_limit", u64::from(self.top_supernodes_limit)),
        ] {
            if value == 0 {
                return Err(ActionError::InvalidRequest(format!(
                    "{name} must be positive"
                )));
            }
        }

        for (name, duration) in [
            ("expiration_duration", self.expiration_duration),
            ("min_processing_time", self.min_processing_time),
            ("max_processing_time", self.max_processing_time),
        ] {
            if duration.is_zero() {
                return Err(ActionError::InvalidRequest(format!(
                    "{name} must be positive"
                )));
            }
        }

        if self.min_processing_time >= self.max_processing_time {
            return Err(ActionError::InvalidRequest(
                "min_processing_time must be less than max_processing_time".into(),
            ));
        }

        let super_node = FeeShare::parse(&self.super_node_fee_share)?;
        let foundation = FeeShare::parse(&self.foundation_fee_share)?;
        if super_node.0 + foundation.0 != SHARE_SCALE {
            return Err(ActionError::InvalidRequest(format!(
                "fee shares must sum to 1: {super_node} + {foundation}"
            )));
        }

        Ok(())
    }

    pub fn foundation_share(&self) -> ActionResult<FeeShare> {
        FeeShare::parse(&self.foundation_fee_share)
    }

    /// `base_action_fee + fee_per_byte * data_size`, in the base denom.
    pub fn action_fee(&self, data_size: u64) -> ActionResult<Coin> {
        let amount = self
            .fee_per_byte
            .amount
            .checked_mul(u128::from(data_size))
            .and_then(|per_byte| per_byte.checked_add(self.base_action_fee.amount))
            .ok_or_else(|| ActionError::InvalidRequest("fee overflow".into()))?;
        Ok(self.base_action_fee.with_amount(amount))
    }
}
