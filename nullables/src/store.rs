//! Nullable store: thread-safe in-memory ledger storage for testing.

use rebase_store::{LedgerStore, StoreError};
use rebase_types::AccountId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory [`LedgerStore`].
pub struct NullLedgerStore {
    accounts: Mutex<HashMap<AccountId, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl NullLedgerStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
        }
    }

    /// Number of account records currently stored.
    pub fn account_count(&self) -> usize {
        self.accounts.lock().map(|a| a.len()).unwrap_or(0)
    }
}

impl Default for NullLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("null store lock poisoned".into())
}

impl LedgerStore for NullLedgerStore {
    fn put_account(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .map_err(poisoned)?
            .insert(account.clone(), record.to_vec());
        Ok(())
    }

    fn iter_accounts(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .map_err(poisoned)?
            .iter()
            .map(|(id, bytes)| (id.clone(), bytes.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .map_err(poisoned)?
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
