//! Per-store settings persistence
//!
//! Holds one [`StoreSettings`] record per store. Settings are created
//! together with the wallet and read by the ledger when it evaluates
//! balance thresholds after a commission deduction.

use dashmap::DashMap;

use crate::types::{LedgerError, StoreId, StoreSettings};

/// Concurrent store of per-store settings, keyed by store id
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: DashMap<StoreId, StoreSettings>,
}

impl SettingsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            settings: DashMap::new(),
        }
    }

    /// Insert default settings for the store, or return the existing record
    ///
    /// Idempotent, mirroring wallet creation.
    pub fn create(&self, store_id: &str) -> StoreSettings {
        self.settings
            .entry(store_id.to_string())
            .or_insert_with(|| StoreSettings::new(store_id))
            .clone()
    }

    /// Get a snapshot of the settings for a store
    pub fn get(&self, store_id: &str) -> Option<StoreSettings> {
        self.settings.get(store_id).map(|entry| entry.clone())
    }

    /// Mutate a store's settings under the entry lock
    ///
    /// # Errors
    ///
    /// * `WalletNotFound` if the store has no settings (settings are 1:1
    ///   with wallets, so an absent record means there is no wallet either)
    pub fn update<F>(&self, store_id: &str, f: F) -> Result<StoreSettings, LedgerError>
    where
        F: FnOnce(&mut StoreSettings),
    {
        let mut entry = self
            .settings
            .get_mut(store_id)
            .ok_or_else(|| LedgerError::wallet_not_found(store_id))?;
        f(entry.value_mut());
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_create_assigns_defaults() {
        let store = SettingsStore::new();

        let settings = store.create("store-1");

        assert_eq!(settings.store_id, "store-1");
        assert_eq!(settings.commission_rate, Decimal::new(500, 2));
    }

    #[test]
    fn test_create_is_idempotent() {
        let store = SettingsStore::new();

        store.create("store-1");
        store
            .update("store-1", |settings| {
                settings.critical_balance_threshold = Decimal::new(2500, 2);
            })
            .unwrap();
        let again = store.create("store-1");

        // The customized record survives the second create
        assert_eq!(again.critical_balance_threshold, Decimal::new(2500, 2));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = SettingsStore::new();
        assert!(store.get("absent").is_none());
    }

    #[test]
    fn test_update_missing_fails() {
        let store = SettingsStore::new();

        let result = store.update("absent", |_settings| {});

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::WalletNotFound { .. }
        ));
    }

    #[test]
    fn test_update_returns_new_snapshot() {
        let store = SettingsStore::new();
        store.create("store-1");

        let updated = store
            .update("store-1", |settings| {
                settings.low_balance_threshold = Decimal::new(10000, 2);
            })
            .unwrap();

        assert_eq!(updated.low_balance_threshold, Decimal::new(10000, 2));
        assert_eq!(
            store.get("store-1").unwrap().low_balance_threshold,
            Decimal::new(10000, 2)
        );
    }
}
