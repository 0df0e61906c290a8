use std::collections::HashMap;

use parking_lot::Mutex;
use shared_crypto::AccountPublicKey;
use shared_types::Address;

use crate::ports::outbound::{AccountInfo, AccountKeeper};

/// Account registry keyed by address. Account numbers are assigned in
/// insertion order.
#[derive(Default)]
pub struct InMemoryAccounts {
    accounts: Mutex<HashMap<Address, AccountInfo>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account.
    pub fn insert(&self, address: Address, public_key: Option<AccountPublicKey>) {
        let mut accounts = self.accounts.lock();
        let account_number = accounts
            .get(&address)
            .map_or(accounts.len() as u64, |a| a.account_number);
        accounts.insert(
            address.clone(),
            AccountInfo {
                address,
                account_number,
                public_key,
            },
        );
    }
}

impl AccountKeeper for InMemoryAccounts {
    fn get_account(&self, address: &Address) -> Option<AccountInfo> {
        self.accounts.lock().get(address).cloned()
    }
}
