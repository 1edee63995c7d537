//! Snapshot persistence through a [`LedgerStore`].

use crate::account::Account;
use crate::auth::Authority;
use crate::engine::AccrualLedger;
use crate::error::LedgerError;
use crate::event::EventBus;
use crate::rate::RateController;
use rebase_store::{LedgerStore, StoreError};
use rebase_types::AccountId;
use std::collections::HashMap;

const META_RATES: &[u8] = b"rate_controller";
const META_AUTHORITY: &[u8] = b"authority";
const META_ALLOWANCES: &[u8] = b"allowances";

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    bincode::serialize(value).map_err(|e| LedgerError::Serialization(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LedgerError> {
    bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
}

impl AccrualLedger {
    /// Persist every account record plus the global state to `store`.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        store.put_meta(META_RATES, &encode(&self.rates)?)?;
        store.put_meta(META_AUTHORITY, &encode(&self.authority)?)?;

        let allowances: Vec<(&(AccountId, AccountId), &u128)> = self.allowances.iter().collect();
        store.put_meta(META_ALLOWANCES, &encode(&allowances)?)?;

        for (id, record) in &self.accounts {
            store.put_account(id, &encode(record)?)?;
        }
        tracing::debug!(accounts = self.accounts.len(), "ledger snapshot saved");
        Ok(())
    }

    /// Restore a ledger from `store`. Event listeners are not persisted.
    pub fn load_from_store(store: &dyn LedgerStore) -> Result<Self, LedgerError> {
        let rates: RateController = match store.get_meta(META_RATES)? {
            Some(bytes) => decode(&bytes)?,
            None => return Err(StoreError::NotFound("rate_controller".into()).into()),
        };
        let authority: Authority = match store.get_meta(META_AUTHORITY)? {
            Some(bytes) => decode(&bytes)?,
            None => return Err(StoreError::NotFound("authority".into()).into()),
        };
        let allowances: HashMap<(AccountId, AccountId), u128> =
            match store.get_meta(META_ALLOWANCES)? {
                Some(bytes) => decode::<Vec<((AccountId, AccountId), u128)>>(&bytes)?
                    .into_iter()
                    .collect(),
                None => HashMap::new(),
            };

        let mut accounts = HashMap::new();
        for (id, bytes) in store.iter_accounts()? {
            let record: Account = decode(&bytes)?;
            accounts.insert(id, record);
        }
        tracing::debug!(accounts = accounts.len(), "ledger snapshot loaded");

        Ok(Self {
            accounts,
            allowances,
            rates,
            authority,
            events: EventBus::new(),
        })
    }
}
