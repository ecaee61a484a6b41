//! Per-store configurable parameters
//!
//! Settings are created together with the wallet. The ledger itself only
//! consumes the two balance thresholds; the recharge limits and the
//! notification toggles are data for external collaborators (the recharge
//! flow and the notification delivery service).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::StoreId;

/// Configurable parameters for one store's wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// The owning store's identifier (unique key, 1:1)
    pub store_id: StoreId,

    /// Commission rate in percent, recorded on each deduction
    pub commission_rate: Decimal,

    /// Smallest recharge the recharge flow should accept
    pub minimum_recharge_amount: Decimal,

    /// Largest recharge the recharge flow should accept
    pub maximum_recharge_amount: Decimal,

    /// At or below this balance a low-balance warning is emitted
    pub low_balance_threshold: Decimal,

    /// At or below this balance cash payments are blocked
    pub critical_balance_threshold: Decimal,

    /// Whether the recharge flow should auto-top-up this wallet
    pub auto_recharge_enabled: bool,

    /// Top-up amount used when auto-recharge triggers
    pub auto_recharge_amount: Decimal,

    /// Notification channel toggles, consumed by the dispatcher's consumer
    pub notify_email: bool,
    pub notify_sms: bool,
    pub notify_push: bool,
}

impl StoreSettings {
    /// Default settings assigned when a wallet is first created
    pub fn new(store_id: impl Into<StoreId>) -> Self {
        StoreSettings {
            store_id: store_id.into(),
            commission_rate: Decimal::new(500, 2),            // 5.00 %
            minimum_recharge_amount: Decimal::new(1000, 2),   // 10.00
            maximum_recharge_amount: Decimal::new(1000000, 2), // 10,000.00
            low_balance_threshold: Decimal::new(5000, 2),     // 50.00
            critical_balance_threshold: Decimal::new(1000, 2), // 10.00
            auto_recharge_enabled: false,
            auto_recharge_amount: Decimal::new(10000, 2), // 100.00
            notify_email: true,
            notify_sms: false,
            notify_push: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = StoreSettings::new("store-1");

        assert_eq!(settings.store_id, "store-1");
        assert_eq!(settings.commission_rate, Decimal::new(500, 2));
        assert!(settings.critical_balance_threshold < settings.low_balance_threshold);
        assert!(!settings.auto_recharge_enabled);
    }

    #[test]
    fn test_settings_roundtrip_serde() {
        let settings = StoreSettings::new("store-1");
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: StoreSettings = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, settings);
    }
}
