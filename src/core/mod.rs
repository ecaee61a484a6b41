//! Core ledger machinery
//!
//! The stores are building blocks; [`WalletLedger`] is the operation
//! surface callers use.

pub mod ledger;
pub mod settings_store;
pub mod transaction_log;
pub mod wallet_store;

pub use ledger::{LedgerReceipt, WalletLedger, WalletStats};
pub use settings_store::SettingsStore;
pub use transaction_log::TransactionLog;
pub use wallet_store::WalletStore;
