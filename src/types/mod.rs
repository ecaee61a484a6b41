//! Core types for the wallet ledger
//!
//! This module contains all domain types used throughout the system:
//! wallets, transactions, per-store settings, notification events, and errors.

pub mod error;
pub mod event;
pub mod settings;
pub mod transaction;
pub mod wallet;

pub use error::LedgerError;
pub use event::{LedgerEvent, LedgerEventKind};
pub use settings::StoreSettings;
pub use transaction::{StoreId, Transaction, TransactionId, TransactionStatus, TransactionType};
pub use wallet::{Wallet, DEFAULT_CURRENCY};
