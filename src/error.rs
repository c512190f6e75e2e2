use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by balance mutations on a single account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The debit would have driven the balance below zero.
    #[error("Dinero Insuficiente")]
    InsufficientFunds { balance: Decimal, amount: Decimal },

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Balance overflow")]
    Overflow,
}

impl AccountError {
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, AccountError::InsufficientFunds { .. })
    }
}

/// Errors raised by the ledger while checking or applying a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactError {
    #[error("Transaction value must be positive")]
    NonPositiveValue,

    #[error("Target and Source same")]
    SameAccount,

    #[error("Source account not found")]
    SourceNotFound,

    #[error("Target account not found")]
    TargetNotFound,

    #[error("Both accounts not found")]
    AccountsNotFound,

    #[error(transparent)]
    Account(#[from] AccountError),
}
