//! In-memory bank and distribution keepers.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use shared_types::{Address, Coin};

use crate::ports::outbound::{BankError, BankKeeper, DistributionKeeper};

#[derive(Default)]
struct Ledger {
    balances: HashMap<(Address, String), u128>,
    modules: HashMap<String, Address>,
    community_pool: HashMap<String, u128>,
    blocked: HashSet<Address>,
}

impl Ledger {
    fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.balances
            .get(&(address.clone(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn debit(&mut self, address: &Address, amount: &Coin) -> Result<(), BankError> {
        let available = self.balance(address, &amount.denom);
        if available < amount.amount {
            return Err(BankError::InsufficientFunds {
                address: address.to_string(),
                denom: amount.denom.clone(),
                available,
                required: amount.amount,
            });
        }
        self.balances
            .insert((address.clone(), amount.denom.clone()), available - amount.amount);
        Ok(())
    }

    fn credit(&mut self, address: &Address, amount: &Coin) {
        *self
            .balances
            .entry((address.clone(), amount.denom.clone()))
            .or_default() += amount.amount;
    }

    fn module(&self, name: &str) -> Result<Address, BankError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| BankError::UnknownModule(name.to_string()))
    }
}

/// Balances, module accounts and the community pool behind one lock.
#[derive(Default)]
pub struct InMemoryBank {
    ledger: Mutex<Ledger>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module account so transfers can address it by name.
    pub fn with_module(self, name: impl Into<String>, address: Address) -> Self {
        self.ledger.lock().modules.insert(name.into(), address);
        self
    }

    pub fn fund(&self, address: &Address, amount: &Coin) {
        self.ledger.lock().credit(address, amount);
    }

    pub fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.ledger.lock().balance(address, denom)
    }

    pub fn community_pool(&self, denom: &str) -> u128 {
        self.ledger
            .lock()
            .community_pool
            .get(denom)
            .copied()
            .unwrap_or(0)
    }

    /// Refuse all transfers to `address`.
    pub fn block(&self, address: &Address) {
        self.ledger.lock().blocked.insert(address.clone());
    }
}

impl BankKeeper for InMemoryBank {
    fn spendable_balance(&self, address: &Address, denom: &str) -> u128 {
        self.balance(address, denom)
    }

    fn get_balance(&self, address: &Address, denom: &str) -> u128 {
        self.balance(address, denom)
    }

    fn send_coins_from_account_to_module(
        &self,
        sender: &Address,
        module: &str,
        amount: &Coin,
    ) -> Result<(), BankError> {
        let mut ledger = self.ledger.lock();
        let module_account = ledger.module(module)?;
        ledger.debit(sender, amount)?;
        ledger.credit(&module_account, amount);
        Ok(())
    }

    fn send_coins_from_module_to_account(
        &self,
        module: &str,
        recipient: &Address,
        amount: &Coin,
    ) -> Result<(), BankError> {
        let mut ledger = self.ledger.lock();
        if ledger.blocked.contains(recipient) {
            return Err(BankError::Blocked(recipient.to_string()));
        }
        let module_account = ledger.module(module)?;
        ledger.debit(&module_account, amount)?;
        ledger.credit(recipient, amount);
        Ok(())
    }
}

impl DistributionKeeper for InMemoryBank {
    fn fund_community_pool(&self, amount: &Coin, sender: &Address) -> Result<(), BankError> {
        let mut ledger = self.ledger.lock();
        ledger.debit(sender, amount)?;
        *ledger
            .community_pool
            .entry(amount.denom.clone())
            .or_default() += amount.amount;
        Ok(())
    }
}
