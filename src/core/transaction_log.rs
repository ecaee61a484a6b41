//! Append-only transaction history
//!
//! This module provides the `TransactionLog`, the audit trail that explains
//! every wallet balance. One record is appended per accepted mutating
//! operation; records are never removed and never modified except for the
//! `Confirmed -> Cancelled` status flip performed by a reversal.
//!
//! # Locking
//!
//! The log keeps a per-store index for history queries. Appends happen while
//! the ledger holds the owning wallet's entry lock, so per-store index order
//! matches the order balance mutations were applied. Lock order is always
//! wallet entry first, then log entry; the log never takes a wallet lock.

use dashmap::DashMap;

use crate::types::{LedgerError, StoreId, Transaction, TransactionId, TransactionStatus};

/// Append-only store of transaction records with a per-store index
#[derive(Debug, Default)]
pub struct TransactionLog {
    /// All transactions by id
    transactions: DashMap<TransactionId, Transaction>,

    /// Append-ordered transaction ids per store
    by_store: DashMap<StoreId, Vec<TransactionId>>,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
            by_store: DashMap::new(),
        }
    }

    /// Append a transaction record
    ///
    /// Ids are assigned by the ledger (UUID v4), so collisions do not occur;
    /// the record is stored as-is and indexed under its store.
    pub fn append(&self, tx: Transaction) {
        self.by_store
            .entry(tx.store_id.clone())
            .or_default()
            .push(tx.id);
        self.transactions.insert(tx.id, tx);
    }

    /// Get a snapshot of a transaction by id
    pub fn get(&self, tx_id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&tx_id).map(|entry| entry.clone())
    }

    /// All transactions for a store, in append order
    pub fn for_store(&self, store_id: &str) -> Vec<Transaction> {
        match self.by_store.get(store_id) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.transactions.get(id).map(|entry| entry.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Flip a confirmed transaction to cancelled (reversal bookkeeping)
    ///
    /// The status check happens under the entry lock, so two racing
    /// reversals of the same transaction cannot both succeed.
    ///
    /// # Errors
    ///
    /// * `TransactionNotFound` if the id is unknown
    /// * `InvalidTransactionState` if the record is not `Confirmed`
    pub fn mark_cancelled(&self, tx_id: TransactionId) -> Result<(), LedgerError> {
        let mut entry = self
            .transactions
            .get_mut(&tx_id)
            .ok_or_else(|| LedgerError::transaction_not_found(tx_id))?;
        let tx = entry.value_mut();
        if tx.status != TransactionStatus::Confirmed {
            return Err(LedgerError::invalid_transaction_state(tx_id, tx.status));
        }
        tx.status = TransactionStatus::Cancelled;
        Ok(())
    }

    /// Number of records in the log
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the log holds no records
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use rust_decimal::Decimal;

    fn sample_tx(store_id: &str, amount: i64) -> Transaction {
        Transaction::new(
            store_id,
            TransactionType::Recharge,
            Decimal::new(amount, 2),
            Decimal::ZERO,
            Decimal::new(amount, 2),
            "test recharge",
            "system",
        )
    }

    #[test]
    fn test_append_and_get() {
        let log = TransactionLog::new();
        let tx = sample_tx("store-1", 10000);
        let id = tx.id;

        log.append(tx.clone());

        let retrieved = log.get(id).unwrap();
        assert_eq!(retrieved, tx);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let log = TransactionLog::new();
        assert!(log.get(uuid::Uuid::new_v4()).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_for_store_preserves_append_order() {
        let log = TransactionLog::new();

        let first = sample_tx("store-1", 10000);
        let second = sample_tx("store-1", 2000);
        let other = sample_tx("store-2", 5000);

        log.append(first.clone());
        log.append(other);
        log.append(second.clone());

        let history = log.for_store("store-1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.id);
        assert_eq!(history[1].id, second.id);
    }

    #[test]
    fn test_for_store_unknown_store_is_empty() {
        let log = TransactionLog::new();
        assert!(log.for_store("nobody").is_empty());
    }

    #[test]
    fn test_mark_cancelled_flips_confirmed() {
        let log = TransactionLog::new();
        let tx = sample_tx("store-1", 10000);
        let id = tx.id;
        log.append(tx);

        log.mark_cancelled(id).unwrap();

        assert_eq!(log.get(id).unwrap().status, TransactionStatus::Cancelled);
    }

    #[test]
    fn test_mark_cancelled_twice_fails() {
        let log = TransactionLog::new();
        let tx = sample_tx("store-1", 10000);
        let id = tx.id;
        log.append(tx);

        log.mark_cancelled(id).unwrap();
        let result = log.mark_cancelled(id);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InvalidTransactionState {
                status: TransactionStatus::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn test_mark_cancelled_missing_transaction() {
        let log = TransactionLog::new();

        let result = log.mark_cancelled(uuid::Uuid::new_v4());

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::TransactionNotFound { .. }
        ));
    }

    #[test]
    fn test_mark_cancelled_rejects_pending() {
        let log = TransactionLog::new();
        let mut tx = sample_tx("store-1", 10000);
        tx.status = TransactionStatus::Pending;
        let id = tx.id;
        log.append(tx);

        let result = log.mark_cancelled(id);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InvalidTransactionState {
                status: TransactionStatus::Pending,
                ..
            }
        ));
    }

    #[test]
    fn test_concurrent_appends_different_stores() {
        use std::sync::Arc;
        use std::thread;

        let log = Arc::new(TransactionLog::new());
        let mut handles = vec![];

        for i in 0..10 {
            let log = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                let store_id = format!("store-{}", i);
                for _ in 0..10 {
                    log.append(sample_tx(&store_id, 100));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.len(), 100);
        for i in 0..10 {
            assert_eq!(log.for_store(&format!("store-{}", i)).len(), 10);
        }
    }
}
