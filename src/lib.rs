//! In-memory banking core: accounts with a fixed-scale decimal balance, a
//! bank that keeps a roster of them and transfers between any two, and an
//! async ledger for callers that need concurrent transfers.

pub mod engine;
pub mod error;
pub mod models;

pub use engine::worker::Ledger;
pub use error::{AccountError, TransactError};
pub use models::account::{Account, BALANCE_SCALE, SharedAccount};
pub use models::bank::{Bank, BankLink};
pub use models::transaction::{AccountId, Transaction};
