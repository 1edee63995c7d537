//! Cross-domain adapter for the rebase ledger.
//!
//! A transfer to another domain burns the value on the source ledger and
//! carries the original sender's personal rate in the message payload. The
//! destination adapter mints at exactly that rate, so the holder keeps the
//! rate they locked in at home. Delivery, ordering and retries belong to the
//! transport; the adapter only validates, burns and mints.

pub mod adapter;
pub mod error;
pub mod message;
pub mod payload;
pub mod policy;

pub use adapter::BridgeAdapter;
pub use error::BridgeError;
pub use message::{
    CrossDomainMessage, LockOrBurnRequest, LockOrBurnResult, ReleaseOrMintRequest,
    ReleaseOrMintResult,
};
pub use payload::{decode_rate, encode_rate, RATE_WORD_LEN};
pub use policy::{PoolPolicy, RemoteDomain, TransferPolicy};
