//! # Action Keeper
//!
//! The stateful core of the module. Every mutating operation:
//! 1. reads what it needs from the store,
//! 2. validates and stages its writes in a [`WriteBatch`],
//! 3. moves funds through the bank port,
//! 4. commits the batch atomically,
//! 5. emits events.
//!
//! A hard error before step 4 leaves the store untouched. If the commit
//! itself fails after funds moved, the transfer is reversed.

mod approve;
mod expiration;
mod fees;
mod finalize;
mod register;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use shared_types::{Address, BlockContext, Coin, Event};
use tracing::{error, info};

use crate::domain::config::KeeperConfig;
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;
use crate::handlers::{ActionRegistry, HandlerContext};
use crate::ports::outbound::{
    AccountKeeper, AuditKeeper, BankKeeper, DistributionKeeper, EventSink, KeyValueStore,
    StakingKeeper, SupernodeKeeper,
};
use crate::store::{self, WriteBatch};

/// Host-chain collaborators.
#[derive(Clone)]
pub struct KeeperPorts {
    pub bank: Arc<dyn BankKeeper>,
    pub distribution: Arc<dyn DistributionKeeper>,
    pub accounts: Arc<dyn AccountKeeper>,
    pub supernodes: Arc<dyn SupernodeKeeper>,
    pub staking: Arc<dyn StakingKeeper>,
    /// Evidence for refused finalizations is dropped when unset.
    pub audit: Option<Arc<dyn AuditKeeper>>,
    pub events: Arc<dyn EventSink>,
}

pub struct ActionKeeper<S: KeyValueStore> {
    pub(crate) store: S,
    pub(crate) config: KeeperConfig,
    pub(crate) registry: ActionRegistry,
    pub(crate) ports: KeeperPorts,
}

impl<S: KeyValueStore> ActionKeeper<S> {
    /// Build a keeper with the Cascade and Sense handlers registered.
    pub fn new(store: S, config: KeeperConfig, ports: KeeperPorts) -> ActionResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            registry: ActionRegistry::default(),
            ports,
        })
    }

    pub fn with_registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn get_params(&self) -> ActionResult<Params> {
        store::load_params(&self.store)
    }

    /// Validate and persist `params`.
    pub fn set_params(&mut self, params: &Params) -> ActionResult<()> {
        params.validate()?;
        let mut batch = WriteBatch::new();
        batch.put_params(params)?;
        batch.commit(&mut self.store)?;
        info!(
            base_action_fee = %params.base_action_fee,
            top_supernodes_limit = params.top_supernodes_limit,
            "Action params updated"
        );
        Ok(())
    }

    /// Governance update; only the configured authority may call it.
    pub fn update_params(&mut self, authority: &Address, params: &Params) -> ActionResult<()> {
        if *authority != self.config.authority {
            return Err(ActionError::InvalidSigner(format!(
                "invalid authority; expected {}, got {authority}",
                self.config.authority
            )));
        }
        self.set_params(params)
    }

    pub(crate) fn handler_context<'a>(
        &'a self,
        block: BlockContext,
        params: &'a Params,
    ) -> HandlerContext<'a> {
        HandlerContext {
            block,
            params,
            accounts: self.ports.accounts.as_ref(),
        }
    }

    pub(crate) fn emit(&self, events: Vec<Event>) {
        for event in events {
            self.ports.events.emit(event);
        }
    }

    /// Commit `batch`; if that fails, return `amount` from the module to
    /// `account` and surface the store error.
    pub(crate) fn commit_or_refund(
        &mut self,
        batch: WriteBatch,
        account: &Address,
        amount: &Coin,
    ) -> ActionResult<()> {
        let Err(commit_err) = batch.commit(&mut self.store) else {
            return Ok(());
        };
        if !amount.is_zero() {
            if let Err(e) = self.ports.bank.send_coins_from_module_to_account(
                &self.config.module_name,
                account,
                amount,
            ) {
                error!(account = %account, amount = %amount, "Failed to reverse escrow transfer: {e}");
            }
        }
        Err(commit_err)
    }

    /// Commit `batch`; if that fails, move `amount` from `account` back into
    /// the module.
    pub(crate) fn commit_or_reescrow(
        &mut self,
        batch: WriteBatch,
        account: &Address,
        amount: &Coin,
    ) -> ActionResult<()> {
        let Err(commit_err) = batch.commit(&mut self.store) else {
            return Ok(());
        };
        if !amount.is_zero() {
            if let Err(e) = self.ports.bank.send_coins_from_account_to_module(
                account,
                &self.config.module_name,
                amount,
            ) {
                error!(account = %account, amount = %amount, "Failed to reverse refund transfer: {e}");
            }
        }
        Err(commit_err)
    }
}
