//! Keeper configuration, fixed at construction.

use shared_types::Address;

use super::errors::{ActionError, ActionResult};

/// Name of the escrow module account.
pub const MODULE_NAME: &str = "action";

/// Suffix appended to supernode entries rejected by consensus.
pub const DEFAULT_BAD_MARKER: &str = " (bad)";

#[derive(Debug, Clone)]
pub struct KeeperConfig {
    /// Governance address allowed to update params.
    pub authority: Address,
    /// Module name used for bank escrow transfers.
    pub module_name: String,
    /// Address of the escrow module account.
    pub module_account: Address,
    pub bad_marker: String,
}

impl KeeperConfig {
    pub fn new(authority: Address, module_account: Address) -> Self {
        Self {
            authority,
            module_name: MODULE_NAME.to_string(),
            module_account,
            bad_marker: DEFAULT_BAD_MARKER.to_string(),
        }
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_bad_marker(mut self, marker: impl Into<String>) -> Self {
        self.bad_marker = marker.into();
        self
    }

    pub fn validate(&self) -> ActionResult<()> {
        if self.module_name.is_empty() {
            return Err(ActionError::Internal("module name is empty".into()));
        }
        // An empty marker would make every entry look flagged.
        if self.bad_marker.trim().is_empty() {
            return Err(ActionError::Internal("bad marker is empty".into()));
        }
        if self.authority == self.module_account {
            return Err(ActionError::Internal(
                "authority must differ from the module account".into(),
            ));
        }
        Ok(())
    }
}
