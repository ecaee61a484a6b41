//! Thread-safe wallet persistence
//!
//! This module provides the `WalletStore`, which holds one [`Wallet`] record
//! per store using a concurrent map with fine-grained locking.
//!
//! # Serialization unit
//!
//! The `DashMap` entry lock is the per-wallet serialization primitive the
//! ledger relies on: [`WalletStore::update`] runs the caller's closure while
//! holding the entry's write lock, so two mutating operations on the *same*
//! store never interleave their read-modify-write sequence, while operations
//! on different stores proceed fully in parallel.

use dashmap::DashMap;

use crate::types::{LedgerError, StoreId, Wallet};

/// Concurrent store of wallet records, keyed by store id
#[derive(Debug, Default)]
pub struct WalletStore {
    /// One wallet per store; entry locks serialize same-store mutations
    wallets: DashMap<StoreId, Wallet>,
}

impl WalletStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
        }
    }

    /// Insert a fresh wallet for the store, or return the existing one
    ///
    /// Idempotent: a second call for the same store returns the record the
    /// first call created, never a duplicate. The boolean reports whether
    /// this call performed the creation.
    ///
    /// # Returns
    ///
    /// A snapshot of the wallet and `true` if it was created by this call.
    pub fn create(&self, store_id: &str) -> (Wallet, bool) {
        let mut created = false;
        let entry = self
            .wallets
            .entry(store_id.to_string())
            .or_insert_with(|| {
                created = true;
                Wallet::new(store_id)
            });
        (entry.clone(), created)
    }

    /// Get a snapshot of the wallet for a store
    pub fn get(&self, store_id: &str) -> Option<Wallet> {
        self.wallets.get(store_id).map(|entry| entry.clone())
    }

    /// Whether a wallet exists for the store
    pub fn contains(&self, store_id: &str) -> bool {
        self.wallets.contains_key(store_id)
    }

    /// Mutate a wallet under its entry lock
    ///
    /// The closure runs while holding the wallet's write lock; no other
    /// thread can observe or produce a partially-applied update. The closure
    /// may return a value (typically the operation receipt) which is passed
    /// through on success.
    ///
    /// # Errors
    ///
    /// * `WalletNotFound` if no wallet exists for the store
    /// * Whatever error the closure returns; the wallet keeps any changes the
    ///   closure made before failing, so closures must mutate only after all
    ///   checks have passed (or when the mutation is itself the required
    ///   side effect, as with cash-payment gating)
    pub fn update<T, F>(&self, store_id: &str, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Wallet) -> Result<T, LedgerError>,
    {
        let mut entry = self
            .wallets
            .get_mut(store_id)
            .ok_or_else(|| LedgerError::wallet_not_found(store_id))?;
        f(entry.value_mut())
    }

    /// Snapshots of all wallets, in arbitrary order
    pub fn all(&self) -> Vec<Wallet> {
        self.wallets.iter().map(|entry| entry.clone()).collect()
    }

    /// Number of wallets in the store
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Whether the store holds no wallets
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_create_new_wallet() {
        let store = WalletStore::new();

        let (wallet, created) = store.create("store-1");

        assert!(created);
        assert_eq!(wallet.store_id, "store-1");
        assert_eq!(wallet.balance, Decimal::ZERO);
        assert!(wallet.is_active);
        assert!(wallet.cash_payment_enabled);
    }

    #[test]
    fn test_create_is_idempotent() {
        let store = WalletStore::new();

        let (first, created_first) = store.create("store-1");
        store
            .update("store-1", |wallet| {
                wallet.balance = Decimal::new(10000, 2);
                Ok(())
            })
            .unwrap();
        let (second, created_second) = store.create("store-1");

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(second.store_id, first.store_id);
        assert_eq!(second.created_at, first.created_at);
        // And the existing balance is preserved, not reset
        assert_eq!(second.balance, Decimal::new(10000, 2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_wallet() {
        let store = WalletStore::new();
        assert!(store.get("absent").is_none());
        assert!(!store.contains("absent"));
    }

    #[test]
    fn test_update_missing_wallet_fails() {
        let store = WalletStore::new();

        let result = store.update("absent", |_wallet| Ok(()));

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::WalletNotFound { .. }
        ));
    }

    #[test]
    fn test_update_passes_through_closure_value() {
        let store = WalletStore::new();
        store.create("store-1");

        let balance = store
            .update("store-1", |wallet| {
                wallet.balance = Decimal::new(5000, 2);
                Ok(wallet.balance)
            })
            .unwrap();

        assert_eq!(balance, Decimal::new(5000, 2));
        assert_eq!(store.get("store-1").unwrap().balance, Decimal::new(5000, 2));
    }

    #[test]
    fn test_update_propagates_closure_error() {
        let store = WalletStore::new();
        store.create("store-1");

        let result: Result<(), _> = store.update("store-1", |_wallet| {
            Err(LedgerError::wallet_inactive("store-1"))
        });

        assert_eq!(result.unwrap_err(), LedgerError::wallet_inactive("store-1"));
    }

    #[test]
    fn test_concurrent_create_same_store() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(WalletStore::new());
        let mut handles = vec![];

        // 10 threads race to create the same wallet
        for _ in 0..10 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let (wallet, _created) = store.create("store-1");
                assert_eq!(wallet.store_id, "store-1");
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_updates_same_wallet_no_lost_update() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(WalletStore::new());
        store.create("store-1");

        let mut handles = vec![];
        for _ in 0..100 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store
                    .update("store-1", |wallet| {
                        let amount = Decimal::new(100, 2);
                        wallet.balance = wallet
                            .balance
                            .checked_add(amount)
                            .ok_or_else(|| {
                                LedgerError::arithmetic_overflow("credit", "store-1")
                            })?;
                        Ok(())
                    })
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // 100 increments of 1.00 with no interleaving lost
        assert_eq!(store.get("store-1").unwrap().balance, Decimal::new(10000, 2));
    }

    #[test]
    fn test_concurrent_updates_different_wallets() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(WalletStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let store_id = format!("store-{}", i);
                store.create(&store_id);
                store
                    .update(&store_id, |wallet| {
                        wallet.balance = Decimal::new((i + 1) * 1000, 2);
                        Ok(())
                    })
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 10);
        for i in 0..10 {
            let wallet = store.get(&format!("store-{}", i)).unwrap();
            assert_eq!(wallet.balance, Decimal::new((i + 1) * 1000, 2));
        }
    }
}
