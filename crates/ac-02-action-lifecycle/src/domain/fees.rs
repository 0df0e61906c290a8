//! Fee split for a completed action.
//!
//! The foundation share (if any) is taken first; the rest is divided equally
//! among rewarded supernodes. Integer-division remainder stays in escrow.

use super::params::FeeShare;

/// Planned payouts for one action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeDistribution {
    pub community_pool: u128,
    pub per_supernode: u128,
    pub payees: Vec<String>,
    /// Left in the module account.
    pub remainder: u128,
}

impl FeeDistribution {
    pub fn total_paid(&self) -> u128 {
        self.community_pool + self.per_supernode * self.payees.len() as u128
    }
}

pub fn plan_distribution(price: u128, payees: Vec<String>, foundation: FeeShare) -> FeeDistribution {
    let community_pool = foundation.apply(price);
    let pool = price - community_pool;

    let per_supernode = match payees.len() as u128 {
        0 => 0,
        n => pool / n,
    };
    let remainder = pool - per_supernode * payees.len() as u128;

    FeeDistribution {
        community_pool,
        per_supernode,
        payees,
        remainder,
    }
}
