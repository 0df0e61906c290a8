//! Fixed supernode and validator sets.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::ports::outbound::{
    StakingKeeper, SupernodeInfo, SupernodeKeeper, SupernodeQueryError, SupernodeState,
    ValidatorInfo,
};

#[derive(Default)]
struct Registry {
    /// Ranking order; the same for every height.
    supernodes: Vec<SupernodeInfo>,
    validators: HashMap<String, ValidatorInfo>,
}

/// A supernode set whose ranking does not change between blocks.
///
/// Registering a supernode also registers a bonded, unjailed validator for
/// it.
#[derive(Default)]
pub struct StaticSupernodes {
    registry: RwLock<Registry>,
}

impl StaticSupernodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, info: SupernodeInfo) {
        let mut registry = self.registry.write();
        registry.validators.insert(
            info.validator_address.clone(),
            ValidatorInfo {
                operator_address: info.validator_address.clone(),
                jailed: false,
                bonded: true,
            },
        );
        registry
            .supernodes
            .retain(|sn| sn.validator_address != info.validator_address);
        registry.supernodes.push(info);
    }

    pub fn set_state(&self, validator_address: &str, state: SupernodeState) {
        if let Some(sn) = self
            .registry
            .write()
            .supernodes
            .iter_mut()
            .find(|sn| sn.validator_address == validator_address)
        {
            sn.state = state;
        }
    }

    pub fn jail(&self, validator_address: &str) {
        if let Some(v) = self.registry.write().validators.get_mut(validator_address) {
            v.jailed = true;
        }
    }
}

impl SupernodeKeeper for StaticSupernodes {
    fn get_top_supernodes_for_block(
        &self,
        _height: u64,
        limit: usize,
        state: SupernodeState,
    ) -> Result<Vec<SupernodeInfo>, SupernodeQueryError> {
        Ok(self
            .registry
            .read()
            .supernodes
            .iter()
            .filter(|sn| sn.state == state)
            .take(limit)
            .cloned()
            .collect())
    }

    fn query_supernode(&self, validator_address: &str) -> Option<SupernodeInfo> {
        self.registry
            .read()
            .supernodes
            .iter()
            .find(|sn| sn.validator_address == validator_address)
            .cloned()
    }
}

impl StakingKeeper for StaticSupernodes {
    fn get_validator(&self, operator_address: &str) -> Option<ValidatorInfo> {
        self.registry.read().validators.get(operator_address).cloned()
    }
}
