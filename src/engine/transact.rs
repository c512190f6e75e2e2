use crate::error::TransactError;
use crate::models::transaction::Transaction;
use rust_decimal::Decimal;

/// Checks that need no account state: a positive value between two
/// distinct accounts.
pub fn verify(transaction: &Transaction) -> Result<(), TransactError> {
    if transaction.value() <= Decimal::ZERO {
        return Err(TransactError::NonPositiveValue);
    }

    if transaction.source() == transaction.target() {
        return Err(TransactError::SameAccount);
    }

    Ok(())
}
