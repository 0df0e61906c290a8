//! # Core Domain Entities
//!
//! Addresses, coins and the per-block execution context.

use crate::errors::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Human-readable prefix carried by every account address.
pub const ADDRESS_PREFIX: &str = "lumera";

const ADDRESS_MIN_LEN: usize = 10;
const ADDRESS_MAX_LEN: usize = 90;

/// Account address in `<prefix>1<data>` form.
///
/// Supernode entries in an action's supernode list share this representation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and validate an address string.
    pub fn parse(value: &str) -> Result<Self, TypesError> {
        if value.is_empty() {
            return Err(TypesError::EmptyAddress);
        }

        let expected = format!("{ADDRESS_PREFIX}1");
        let Some(data) = value.strip_prefix(&expected) else {
            return Err(TypesError::InvalidPrefix {
                expected,
                address: value.to_string(),
            });
        };

        if !(ADDRESS_MIN_LEN..=ADDRESS_MAX_LEN).contains(&value.len()) {
            return Err(TypesError::InvalidAddressLength {
                length: value.len(),
                min: ADDRESS_MIN_LEN,
                max: ADDRESS_MAX_LEN,
            });
        }

        if !data
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(TypesError::InvalidAddressCharacter(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single-denomination token amount.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    /// Build a coin after validating the denomination.
    pub fn new(denom: impl Into<String>, amount: u128) -> Result<Self, TypesError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self { denom, amount })
    }

    /// Parse a `<amount><denom>` expression such as `10000ulume`.
    pub fn parse(expr: &str) -> Result<Self, TypesError> {
        let expr = expr.trim();
        let split = expr
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TypesError::InvalidCoin(expr.to_string()))?;
        if split == 0 {
            return Err(TypesError::InvalidCoin(expr.to_string()));
        }

        let (amount, denom) = expr.split_at(split);
        let amount = amount
            .parse::<u128>()
            .map_err(|_| TypesError::InvalidAmount(amount.to_string()))?;
        Self::new(denom.trim(), amount)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Same denomination with a different amount.
    pub fn with_amount(&self, amount: u128) -> Self {
        Self {
            denom: self.denom.clone(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Denominations are 3-128 chars, start with a lowercase letter and contain
/// only lowercase alphanumerics or `/:._-`.
pub fn validate_denom(denom: &str) -> Result<(), TypesError> {
    let mut chars = denom.chars();
    let valid_head = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_tail = chars.all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '/' | ':' | '.' | '_' | '-')
    });

    if valid_head && valid_tail && (3..=128).contains(&denom.len()) {
        Ok(())
    } else {
        Err(TypesError::InvalidDenom(denom.to_string()))
    }
}

/// Execution context of the block currently being processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Block height.
    pub height: u64,
    /// Block time in unix seconds.
    pub time_unix: i64,
}

impl BlockContext {
    pub fn new(height: u64, time_unix: i64) -> Self {
        Self { height, time_unix }
    }

    /// Context of the next block, `seconds` later.
    pub fn advance(&self, seconds: i64) -> Self {
        Self {
            height: self.height + 1,
            time_unix: self.time_unix + seconds,
        }
    }
}
