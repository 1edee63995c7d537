use crate::StoreError;
use rebase_types::AccountId;

/// Store trait for persisting a domain's ledger state.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on `rebase-ledger`
/// (which would create a circular dependency). The ledger serializes and
/// deserializes its own records.
pub trait LedgerStore {
    fn put_account(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError>;
    fn iter_accounts(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
