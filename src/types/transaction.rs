//! Transaction types for the store wallet ledger
//!
//! A transaction is the immutable record of one balance-changing operation.
//! The ledger appends exactly one per accepted mutation; rejected commission
//! deductions append nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store identifier
///
/// Caller-supplied; the wallet ledger treats it as an opaque unique key.
pub type StoreId = String;

/// Transaction identifier, assigned by the ledger on append
pub type TransactionId = Uuid;

/// The kinds of balance-changing operation recorded in the log
///
/// The sign convention lives in `amount`, not in the type: recharges carry
/// positive amounts, commission deductions negative ones, and manual
/// adjustments either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Credit from a store topping up its prepaid balance
    Recharge,

    /// The marketplace's fee on a completed order (always a debit)
    CommissionDeduction,

    /// Administrative correction, credit or debit
    ManualAdjustment,

    /// Credit returned to the store for a refunded order
    Refund,

    /// Store withdrawing balance out of the wallet
    Withdrawal,

    /// Promotional or goodwill credit
    Bonus,

    /// Punitive debit applied by an administrator
    Penalty,

    /// Automated correction applied by the platform itself
    SystemAdjustment,
}

/// Lifecycle status of a transaction
///
/// Records are immutable after append except for the `Confirmed -> Cancelled`
/// flip performed by a reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
    Cancelled,
    Reversed,
}

/// One immutable ledger entry
///
/// `balance_before` and `balance_after` snapshot the wallet around this
/// mutation; the invariant `balance_after == balance_before + amount` holds
/// for every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id
    pub id: TransactionId,

    /// The wallet/store this entry belongs to
    pub store_id: StoreId,

    /// The order that triggered this entry, when there is one
    pub order_id: Option<String>,

    /// What kind of operation this records
    pub tx_type: TransactionType,

    /// Signed amount: positive credits, negative debits
    pub amount: Decimal,

    /// Wallet balance immediately before this entry applied
    pub balance_before: Decimal,

    /// Wallet balance immediately after this entry applied
    pub balance_after: Decimal,

    /// Lifecycle status; only confirmed entries count toward the balance
    pub status: TransactionStatus,

    /// Human-readable description of the operation
    pub description: String,

    /// External reference (order number, reversal target, ...)
    pub reference: Option<String>,

    /// Free-form structured context attached by the caller
    pub metadata: serde_json::Value,

    /// Actor identifier: a user id or the `"system"` marker
    pub processed_by: String,

    /// When this entry was appended
    pub processed_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a confirmed transaction with the required fields
    ///
    /// Optional fields (`order_id`, `reference`, `metadata`) default to
    /// empty; callers fill them in before appending.
    pub fn new(
        store_id: impl Into<StoreId>,
        tx_type: TransactionType,
        amount: Decimal,
        balance_before: Decimal,
        balance_after: Decimal,
        description: impl Into<String>,
        processed_by: impl Into<String>,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            store_id: store_id.into(),
            order_id: None,
            tx_type,
            amount,
            balance_before,
            balance_after,
            status: TransactionStatus::Confirmed,
            description: description.into(),
            reference: None,
            metadata: serde_json::Value::Null,
            processed_by: processed_by.into(),
            processed_at: Utc::now(),
        }
    }
}
