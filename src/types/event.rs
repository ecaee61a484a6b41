//! Notification events emitted by the wallet ledger
//!
//! Events are fire-and-forget value objects handed to the
//! [`crate::notify::NotificationDispatcher`]. The ledger does not know or
//! care how (or whether) they are delivered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::transaction::StoreId;

/// What happened, from the notification consumer's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEventKind {
    /// A wallet (and its default settings) was created for a store
    WalletCreated,

    /// A recharge was confirmed
    RechargeCompleted,

    /// A commission deduction was rejected for insufficient funds;
    /// cash payments were disabled as a side effect
    InsufficientBalance,

    /// The post-deduction balance fell to or below the critical threshold
    /// and cash payments were disabled
    CashPaymentBlocked,

    /// The post-deduction balance fell to or below the low threshold
    LowBalance,
}

/// A domain event emitted by one ledger operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// The store the event concerns
    pub store_id: StoreId,

    /// Event kind
    pub kind: LedgerEventKind,

    /// Structured payload; shape depends on `kind`
    pub payload: serde_json::Value,

    /// When the event was emitted
    pub timestamp: DateTime<Utc>,
}

impl LedgerEvent {
    pub fn new(
        store_id: impl Into<StoreId>,
        kind: LedgerEventKind,
        payload: serde_json::Value,
    ) -> Self {
        LedgerEvent {
            store_id: store_id.into(),
            kind,
            payload,
            timestamp: Utc::now(),
        }
    }
}
