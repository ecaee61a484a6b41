//! # Wallet Ledger
//!
//! A prepaid wallet ledger for marketplace stores: balance tracking with an
//! append-only transaction audit log, commission deduction with
//! insufficient-funds rejection, automatic gating of cash payments on
//! balance thresholds, per-store settings, and fire-and-forget notification
//! events.
//!
//! ## Design
//!
//! - **Per-wallet serialization**: every mutating operation runs its
//!   read-check-mutate-append sequence under the owning wallet's entry
//!   lock. Operations on different wallets never contend.
//! - **All-or-nothing deductions**: a commission deduction that would
//!   overdraw the wallet persists nothing, disables cash payments in the
//!   same critical section, and returns a typed error.
//! - **Audit trail**: the transaction log is append-only; the only
//!   permitted mutation is the `Confirmed -> Cancelled` flip a reversal
//!   performs on its target.
//! - **Decoupled notifications**: events go through the
//!   [`notify::NotificationDispatcher`] seam; dispatch never blocks or
//!   fails an operation.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rust_decimal::Decimal;
//! use serde_json::json;
//! use wallet_ledger::core::WalletLedger;
//! use wallet_ledger::notify::LogDispatcher;
//!
//! let ledger = WalletLedger::new(Arc::new(LogDispatcher));
//!
//! ledger.create_wallet("store-42");
//! ledger
//!     .recharge("store-42", Decimal::new(50000, 2), "admin-1", json!({}))
//!     .unwrap();
//!
//! let receipt = ledger
//!     .deduct_commission(
//!         "store-42",
//!         Decimal::new(2500, 2),
//!         Some("order-1001"),
//!         "ORD-1001",
//!         Decimal::new(500, 2),
//!     )
//!     .unwrap();
//!
//! assert_eq!(receipt.new_balance, Decimal::new(47500, 2));
//! assert!(ledger.can_process_cash_payment("store-42", Decimal::new(100, 2)));
//! ```

pub mod core;
pub mod notify;
pub mod types;

pub use self::core::{LedgerReceipt, WalletLedger, WalletStats};
pub use self::notify::{ChannelDispatcher, DispatchError, LogDispatcher, NotificationDispatcher};
pub use self::types::{
    LedgerError, LedgerEvent, LedgerEventKind, StoreId, StoreSettings, Transaction, TransactionId,
    TransactionStatus, TransactionType, Wallet,
};
