//! Wallet types for the store wallet ledger
//!
//! This module defines the Wallet structure that tracks a store's prepaid
//! balance and its cash-payment gating flags.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::StoreId;

/// The single currency unit supported by the ledger.
///
/// Multi-currency conversion is out of scope; every wallet tracks an
/// internal balance in this unit only.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Prepaid wallet state, one per store
///
/// The balance is the derived sum of the store's confirmed transactions.
/// A commission deduction can never drive it negative; administrative
/// adjustments and reversals can (see [`crate::core::WalletLedger`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// The owning store's identifier (unique key, 1:1)
    pub store_id: StoreId,

    /// Current balance in functional currency units
    pub balance: Decimal,

    /// Currency code; fixed to [`DEFAULT_CURRENCY`]
    pub currency: String,

    /// If false, no mutating operation succeeds (queries still do)
    pub is_active: bool,

    /// Whether the store may accept cash-collected orders
    ///
    /// Toggled automatically: disabled when a commission deduction is
    /// rejected for insufficient funds, or when the post-deduction balance
    /// falls to or below the store's critical threshold.
    pub cash_payment_enabled: bool,

    /// Below this balance the wallet is reported as low
    pub minimum_balance: Decimal,

    /// Timestamp of the most recent balance mutation
    pub last_transaction_at: Option<DateTime<Utc>>,

    /// When the wallet record was created
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a new wallet with zero balance, active and cash-enabled
    pub fn new(store_id: impl Into<StoreId>) -> Self {
        Wallet {
            store_id: store_id.into(),
            balance: Decimal::ZERO,
            currency: DEFAULT_CURRENCY.to_string(),
            is_active: true,
            cash_payment_enabled: true,
            minimum_balance: Decimal::ZERO,
            last_transaction_at: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the balance has fallen below the wallet's minimum
    pub fn is_low(&self) -> bool {
        self.balance < self.minimum_balance
    }
}
