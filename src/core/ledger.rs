//! Wallet ledger orchestrator
//!
//! [`WalletLedger`] ties the wallet store, transaction log and settings
//! store together and exposes the operation surface: wallet creation,
//! recharge, commission deduction with balance gating, manual adjustment,
//! reversal, and read-only queries.
//!
//! # Atomicity
//!
//! Every mutating operation does its read-check-mutate-append sequence
//! inside the owning wallet's entry lock, so the balance update, the
//! appended audit record and any gating-flag change land as one unit.
//! Lock order is always wallet entry first, then log entry.
//!
//! # Notifications
//!
//! Events are emitted after the critical section completes. Dispatch
//! failures are logged at `warn` and never fail the operation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::settings_store::SettingsStore;
use crate::core::transaction_log::TransactionLog;
use crate::core::wallet_store::WalletStore;
use crate::notify::{LogDispatcher, NotificationDispatcher};
use crate::types::{
    LedgerError, LedgerEvent, LedgerEventKind, StoreSettings, Transaction, TransactionId,
    TransactionStatus, TransactionType, Wallet, DEFAULT_CURRENCY,
};

/// Actor recorded on transactions the ledger itself originates
const SYSTEM_ACTOR: &str = "system";

/// Result of an accepted mutating operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    /// Balance after the operation
    pub new_balance: Decimal,

    /// The audit record the operation appended
    pub transaction: Transaction,
}

/// Aggregates over a store's confirmed transactions in a trailing window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStats {
    /// Confirmed transactions in the window
    pub total_transactions: usize,

    /// Sum of recharge amounts
    pub total_recharges: Decimal,

    /// Sum of commission deduction magnitudes (positive)
    pub total_commissions: Decimal,

    /// Sum of refund amounts
    pub total_refunds: Decimal,
}

/// What a commission deduction decided inside the wallet lock
///
/// Carried out of the critical section so events are emitted after the
/// lock is released.
enum DeductOutcome {
    Applied {
        receipt: LedgerReceipt,
        events: Vec<LedgerEvent>,
    },
    Rejected {
        balance: Decimal,
    },
}

/// The prepaid wallet ledger
///
/// Cheap to clone; clones share the same underlying stores and dispatcher.
#[derive(Clone)]
pub struct WalletLedger {
    wallets: Arc<WalletStore>,
    transactions: Arc<TransactionLog>,
    settings: Arc<SettingsStore>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl Default for WalletLedger {
    fn default() -> Self {
        Self::new(Arc::new(LogDispatcher))
    }
}

impl WalletLedger {
    /// Create a ledger with empty stores and the given event sink
    pub fn new(notifier: Arc<dyn NotificationDispatcher>) -> Self {
        Self {
            wallets: Arc::new(WalletStore::new()),
            transactions: Arc::new(TransactionLog::new()),
            settings: Arc::new(SettingsStore::new()),
            notifier,
        }
    }

    /// Create a ledger over pre-built stores
    ///
    /// Used when the stores are shared with other components or pre-seeded
    /// in tests.
    pub fn with_stores(
        wallets: Arc<WalletStore>,
        transactions: Arc<TransactionLog>,
        settings: Arc<SettingsStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            wallets,
            transactions,
            settings,
            notifier,
        }
    }

    fn emit(&self, event: LedgerEvent) {
        let store_id = event.store_id.clone();
        if let Err(err) = self.notifier.dispatch(event) {
            log::warn!("notification dispatch failed for store {store_id}: {err}");
        }
    }

    /// Create a wallet and default settings for a store
    ///
    /// Idempotent: a repeat call returns the existing wallet untouched and
    /// emits nothing. Only the first call emits `WalletCreated`.
    pub fn create_wallet(&self, store_id: &str) -> Wallet {
        let (wallet, created) = self.wallets.create(store_id);
        self.settings.create(store_id);
        if created {
            log::info!("created wallet for store {store_id}");
            self.emit(LedgerEvent::new(
                store_id,
                LedgerEventKind::WalletCreated,
                json!({ "currency": DEFAULT_CURRENCY }),
            ));
        }
        wallet
    }

    /// Credit a wallet
    ///
    /// # Arguments
    ///
    /// * `amount` - must be strictly positive
    /// * `actor_id` - who initiated the recharge
    /// * `metadata` - free-form context recorded on the transaction
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` if `amount <= 0`
    /// * `WalletNotFound` / `WalletInactive`
    /// * `ArithmeticOverflow` if the balance cannot hold the result
    pub fn recharge(
        &self,
        store_id: &str,
        amount: Decimal,
        actor_id: &str,
        metadata: serde_json::Value,
    ) -> Result<LedgerReceipt, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount("recharge", amount));
        }

        let receipt = self.wallets.update(store_id, |wallet| {
            if !wallet.is_active {
                return Err(LedgerError::wallet_inactive(store_id));
            }

            let balance_before = wallet.balance;
            let new_balance = balance_before
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("recharge", store_id))?;

            let mut tx = Transaction::new(
                store_id,
                TransactionType::Recharge,
                amount,
                balance_before,
                new_balance,
                format!("wallet recharge of {amount}"),
                actor_id,
            );
            tx.metadata = metadata;

            wallet.balance = new_balance;
            wallet.last_transaction_at = Some(tx.processed_at);
            self.transactions.append(tx.clone());

            Ok(LedgerReceipt {
                new_balance,
                transaction: tx,
            })
        })?;

        log::info!(
            "recharged store {store_id} by {amount}, balance now {}",
            receipt.new_balance
        );
        self.emit(LedgerEvent::new(
            store_id,
            LedgerEventKind::RechargeCompleted,
            json!({
                "amount": amount,
                "new_balance": receipt.new_balance,
                "transaction_id": receipt.transaction.id,
            }),
        ));

        Ok(receipt)
    }

    /// Deduct an order commission from a wallet
    ///
    /// The deduction is all-or-nothing: if the balance cannot cover the
    /// full amount, no transaction is persisted, cash payments are disabled
    /// in the same critical section, and `InsufficientBalance` is returned.
    /// A successful deduction is followed by threshold checks on the
    /// post-deduction balance: at or below the critical threshold, cash
    /// payments are disabled and `CashPaymentBlocked` is emitted; otherwise
    /// at or below the low threshold, `LowBalance` is emitted.
    ///
    /// # Arguments
    ///
    /// * `amount` - the commission to deduct, strictly positive
    /// * `order_id` - optional order identifier recorded on the transaction
    /// * `order_ref` - human-readable order reference for the description
    /// * `commission_rate` - the rate that produced `amount`, recorded in
    ///   the transaction metadata for audit
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` if `amount <= 0`
    /// * `WalletNotFound` / `WalletInactive`
    /// * `InsufficientBalance` if `balance < amount` (cash payments are
    ///   disabled as a side effect)
    pub fn deduct_commission(
        &self,
        store_id: &str,
        amount: Decimal,
        order_id: Option<&str>,
        order_ref: &str,
        commission_rate: Decimal,
    ) -> Result<LedgerReceipt, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount("deduct_commission", amount));
        }

        let settings = self
            .settings
            .get(store_id)
            .unwrap_or_else(|| StoreSettings::new(store_id));

        let outcome = self.wallets.update(store_id, |wallet| {
            if !wallet.is_active {
                return Err(LedgerError::wallet_inactive(store_id));
            }

            let balance_before = wallet.balance;
            if balance_before < amount {
                // Rejection still gates cash payments, inside the same
                // critical section as the decision.
                wallet.cash_payment_enabled = false;
                return Ok(DeductOutcome::Rejected {
                    balance: balance_before,
                });
            }

            let new_balance = balance_before
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::arithmetic_underflow("deduct_commission", store_id))?;

            let mut tx = Transaction::new(
                store_id,
                TransactionType::CommissionDeduction,
                -amount,
                balance_before,
                new_balance,
                format!("commission for order {order_ref}"),
                SYSTEM_ACTOR,
            );
            tx.order_id = order_id.map(str::to_string);
            tx.reference = Some(order_ref.to_string());
            tx.metadata = json!({ "commission_rate": commission_rate });

            wallet.balance = new_balance;
            wallet.last_transaction_at = Some(tx.processed_at);
            self.transactions.append(tx.clone());

            let mut events = Vec::new();
            if new_balance <= settings.critical_balance_threshold {
                wallet.cash_payment_enabled = false;
                events.push(LedgerEvent::new(
                    store_id,
                    LedgerEventKind::CashPaymentBlocked,
                    json!({
                        "balance": new_balance,
                        "critical_threshold": settings.critical_balance_threshold,
                    }),
                ));
            } else if new_balance <= settings.low_balance_threshold {
                events.push(LedgerEvent::new(
                    store_id,
                    LedgerEventKind::LowBalance,
                    json!({
                        "balance": new_balance,
                        "low_threshold": settings.low_balance_threshold,
                    }),
                ));
            }

            Ok(DeductOutcome::Applied {
                receipt: LedgerReceipt {
                    new_balance,
                    transaction: tx,
                },
                events,
            })
        })?;

        match outcome {
            DeductOutcome::Applied { receipt, events } => {
                log::info!(
                    "deducted commission {amount} from store {store_id}, balance now {}",
                    receipt.new_balance
                );
                for event in events {
                    self.emit(event);
                }
                Ok(receipt)
            }
            DeductOutcome::Rejected { balance } => {
                log::warn!(
                    "commission deduction of {amount} rejected for store {store_id}: balance {balance}"
                );
                let resulting_balance = balance.checked_sub(amount).unwrap_or(Decimal::MIN);
                self.emit(LedgerEvent::new(
                    store_id,
                    LedgerEventKind::InsufficientBalance,
                    json!({
                        "balance": balance,
                        "required": amount,
                        "resulting_balance": resulting_balance,
                        "order_ref": order_ref,
                    }),
                ));
                Err(LedgerError::insufficient_balance(store_id, balance, amount))
            }
        }
    }

    /// Apply an administrative adjustment, positive or negative
    ///
    /// Skips the active check and allows the balance to go negative; this
    /// is the operator escape hatch for corrections. The amount must be
    /// nonzero.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` if `amount == 0`
    /// * `WalletNotFound`
    /// * `ArithmeticOverflow` / `ArithmeticUnderflow`
    pub fn manual_adjustment(
        &self,
        store_id: &str,
        amount: Decimal,
        description: &str,
        actor_id: &str,
        metadata: serde_json::Value,
    ) -> Result<LedgerReceipt, LedgerError> {
        if amount == Decimal::ZERO {
            return Err(LedgerError::invalid_amount("manual_adjustment", amount));
        }

        let receipt = self.wallets.update(store_id, |wallet| {
            let balance_before = wallet.balance;
            let new_balance = balance_before.checked_add(amount).ok_or_else(|| {
                if amount > Decimal::ZERO {
                    LedgerError::arithmetic_overflow("manual_adjustment", store_id)
                } else {
                    LedgerError::arithmetic_underflow("manual_adjustment", store_id)
                }
            })?;

            let mut tx = Transaction::new(
                store_id,
                TransactionType::ManualAdjustment,
                amount,
                balance_before,
                new_balance,
                description,
                actor_id,
            );
            tx.metadata = metadata;

            wallet.balance = new_balance;
            wallet.last_transaction_at = Some(tx.processed_at);
            self.transactions.append(tx.clone());

            Ok(LedgerReceipt {
                new_balance,
                transaction: tx,
            })
        })?;

        log::info!(
            "manual adjustment of {amount} on store {store_id} by {actor_id}, balance now {}",
            receipt.new_balance
        );
        Ok(receipt)
    }

    /// Reverse a confirmed transaction
    ///
    /// Applies the negation of the original amount against the wallet's
    /// *current* balance (not a rollback to the pre-transaction balance)
    /// and flips the original record to `Cancelled`. The original must be
    /// `Confirmed`; cancelled, reversed, pending or failed records cannot
    /// be reversed, which also makes a double reversal impossible.
    ///
    /// No threshold checks run after a reversal; the next commission
    /// deduction re-evaluates gating.
    ///
    /// # Errors
    ///
    /// * `TransactionNotFound` if the id is unknown
    /// * `InvalidTransactionState` if the original is not `Confirmed`
    /// * `WalletNotFound` if the owning wallet is gone
    /// * `ArithmeticOverflow` / `ArithmeticUnderflow`
    pub fn reverse_transaction(
        &self,
        transaction_id: TransactionId,
        reason: &str,
        actor_id: &str,
    ) -> Result<Transaction, LedgerError> {
        let original = self
            .transactions
            .get(transaction_id)
            .ok_or_else(|| LedgerError::transaction_not_found(transaction_id))?;
        if original.status != TransactionStatus::Confirmed {
            return Err(LedgerError::invalid_transaction_state(
                transaction_id,
                original.status,
            ));
        }

        let reversal = self.wallets.update(&original.store_id, |wallet| {
            // Claim the original under the wallet lock; a racing reversal
            // loses here with InvalidTransactionState.
            self.transactions.mark_cancelled(transaction_id)?;

            let balance_before = wallet.balance;
            let delta = -original.amount;
            let new_balance = balance_before.checked_add(delta).ok_or_else(|| {
                if delta > Decimal::ZERO {
                    LedgerError::arithmetic_overflow("reverse_transaction", &original.store_id)
                } else {
                    LedgerError::arithmetic_underflow("reverse_transaction", &original.store_id)
                }
            })?;

            let mut tx = Transaction::new(
                original.store_id.clone(),
                TransactionType::ManualAdjustment,
                delta,
                balance_before,
                new_balance,
                format!("reversal of {transaction_id}: {reason}"),
                actor_id,
            );
            tx.reference = Some(transaction_id.to_string());

            wallet.balance = new_balance;
            wallet.last_transaction_at = Some(tx.processed_at);
            self.transactions.append(tx.clone());

            Ok(tx)
        })?;

        log::info!(
            "reversed transaction {transaction_id} on store {} ({reason})",
            original.store_id
        );
        Ok(reversal)
    }

    /// Toggle whether a wallet accepts recharges and deductions
    ///
    /// # Errors
    ///
    /// * `WalletNotFound`
    pub fn set_wallet_active(&self, store_id: &str, active: bool) -> Result<Wallet, LedgerError> {
        self.wallets.update(store_id, |wallet| {
            wallet.is_active = active;
            Ok(wallet.clone())
        })
    }

    /// Update a store's settings
    ///
    /// # Errors
    ///
    /// * `WalletNotFound` if the store has no settings record
    pub fn update_settings<F>(&self, store_id: &str, f: F) -> Result<StoreSettings, LedgerError>
    where
        F: FnOnce(&mut StoreSettings),
    {
        self.settings.update(store_id, f)
    }

    /// Settings snapshot for a store
    pub fn get_settings(&self, store_id: &str) -> Option<StoreSettings> {
        self.settings.get(store_id)
    }

    /// Whether the store can take an order settled with cash
    ///
    /// Requires an existing, active wallet with the cash-payment flag on
    /// and a positive balance covering the expected commission.
    pub fn can_process_cash_payment(&self, store_id: &str, expected_commission: Decimal) -> bool {
        match self.wallets.get(store_id) {
            Some(wallet) => {
                wallet.is_active
                    && wallet.cash_payment_enabled
                    && wallet.balance > Decimal::ZERO
                    && wallet.balance >= expected_commission
            }
            None => false,
        }
    }

    /// Current balance for a store, zero when no wallet exists
    pub fn get_balance(&self, store_id: &str) -> Decimal {
        self.wallets
            .get(store_id)
            .map(|wallet| wallet.balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Wallet snapshot for a store
    pub fn get_wallet(&self, store_id: &str) -> Option<Wallet> {
        self.wallets.get(store_id)
    }

    /// Transaction snapshot by id
    pub fn get_transaction(&self, transaction_id: TransactionId) -> Option<Transaction> {
        self.transactions.get(transaction_id)
    }

    /// Full transaction history for a store, oldest first
    pub fn get_transactions(&self, store_id: &str) -> Vec<Transaction> {
        self.transactions.for_store(store_id)
    }

    /// Aggregates over confirmed transactions in the trailing window
    pub fn get_stats(&self, store_id: &str, period_days: i64) -> WalletStats {
        let cutoff = Utc::now() - Duration::days(period_days);
        let mut stats = WalletStats {
            total_transactions: 0,
            total_recharges: Decimal::ZERO,
            total_commissions: Decimal::ZERO,
            total_refunds: Decimal::ZERO,
        };

        for tx in self.transactions.for_store(store_id) {
            if tx.status != TransactionStatus::Confirmed || tx.processed_at < cutoff {
                continue;
            }
            stats.total_transactions += 1;
            match tx.tx_type {
                TransactionType::Recharge => stats.total_recharges += tx.amount,
                TransactionType::CommissionDeduction => stats.total_commissions += tx.amount.abs(),
                TransactionType::Refund => stats.total_refunds += tx.amount,
                _ => {}
            }
        }

        stats
    }
}
