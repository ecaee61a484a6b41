//! Error types for the wallet ledger
//!
//! All expected business failures are returned as typed `Result` errors so
//! callers can branch on the kind without exception handling.
//!
//! # Error Categories
//!
//! - **Lookup errors**: wallet or transaction not found
//! - **State errors**: inactive wallet, non-reversible transaction
//! - **Validation errors**: non-positive or zero amounts
//! - **Balance errors**: insufficient funds for a commission deduction
//! - **Arithmetic errors**: overflow/underflow in balance calculations

use rust_decimal::Decimal;
use thiserror::Error;

use super::transaction::{TransactionId, TransactionStatus};

/// Main error type for wallet ledger operations
///
/// Each variant carries the context a caller needs to act on the failure.
/// `InsufficientBalance` is special: by the time it is returned, the
/// wallet's cash-payment flag has already been disabled (the one failure
/// that intentionally mutates state).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No wallet exists for the store
    #[error("No wallet found for store {store_id}")]
    WalletNotFound {
        /// The store that has no wallet
        store_id: String,
    },

    /// The wallet exists but is deactivated; only queries succeed
    #[error("Wallet for store {store_id} is inactive")]
    WalletInactive {
        /// The store whose wallet is inactive
        store_id: String,
    },

    /// A commission deduction would drive the balance negative
    ///
    /// The operation is rejected without persisting a transaction, and
    /// cash payments are disabled for the store as a required side effect.
    #[error("Insufficient balance for store {store_id}: balance {balance}, required {required}")]
    InsufficientBalance {
        /// The store whose wallet cannot cover the deduction
        store_id: String,
        /// Balance at the time of the attempt
        balance: Decimal,
        /// Amount the deduction required
        required: Decimal,
    },

    /// Amount failed validation (non-positive where positive is required,
    /// or zero where non-zero is required)
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// Operation that rejected the amount
        operation: String,
        /// The offending amount
        amount: Decimal,
    },

    /// No transaction exists with the given id
    #[error("Transaction {transaction_id} not found")]
    TransactionNotFound {
        /// The id that was looked up
        transaction_id: TransactionId,
    },

    /// The transaction is not in a state the operation accepts
    /// (only confirmed transactions can be reversed)
    #[error("Transaction {transaction_id} is {status:?} and cannot be reversed")]
    InvalidTransactionState {
        /// The transaction in the wrong state
        transaction_id: TransactionId,
        /// The state it was found in
        status: TransactionStatus,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for store {store_id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// The store being operated on
        store_id: String,
    },

    /// Balance arithmetic would underflow
    #[error("Arithmetic underflow in {operation} for store {store_id}")]
    ArithmeticUnderflow {
        /// Operation that would underflow
        operation: String,
        /// The store being operated on
        store_id: String,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a WalletNotFound error
    pub fn wallet_not_found(store_id: &str) -> Self {
        LedgerError::WalletNotFound {
            store_id: store_id.to_string(),
        }
    }

    /// Create a WalletInactive error
    pub fn wallet_inactive(store_id: &str) -> Self {
        LedgerError::WalletInactive {
            store_id: store_id.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(store_id: &str, balance: Decimal, required: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            store_id: store_id.to_string(),
            balance,
            required,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(operation: &str, amount: Decimal) -> Self {
        LedgerError::InvalidAmount {
            operation: operation.to_string(),
            amount,
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(transaction_id: TransactionId) -> Self {
        LedgerError::TransactionNotFound { transaction_id }
    }

    /// Create an InvalidTransactionState error
    pub fn invalid_transaction_state(
        transaction_id: TransactionId,
        status: TransactionStatus,
    ) -> Self {
        LedgerError::InvalidTransactionState {
            transaction_id,
            status,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, store_id: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            store_id: store_id.to_string(),
        }
    }

    /// Create an ArithmeticUnderflow error
    pub fn arithmetic_underflow(operation: &str, store_id: &str) -> Self {
        LedgerError::ArithmeticUnderflow {
            operation: operation.to_string(),
            store_id: store_id.to_string(),
        }
    }
}
