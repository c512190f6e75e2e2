use crate::engine::transact;
use crate::error::{AccountError, TransactError};
use crate::models::account::Account;
use crate::models::bank;
use crate::models::transaction::{AccountId, Transaction};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::join;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

type AccountSlot = Arc<Mutex<Account>>;

/// Holds accounts by id and applies transactions from concurrent tasks.
///
/// Each account sits behind its own lock. A transaction locks its two
/// accounts in ascending id order, so transfers running in opposite
/// directions can not deadlock.
#[derive(Debug)]
pub struct Ledger {
    accounts: RwLock<HashMap<AccountId, AccountSlot>>,
    next_id: AtomicI32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Takes ownership of `account` and returns the id it is filed under.
    pub async fn open(&self, account: Account) -> AccountId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.accounts
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(account)));
        id
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    pub async fn balance(&self, id: AccountId) -> Option<Decimal> {
        let slot = self.slot(id).await?;
        let balance = slot.lock().await.balance();
        Some(balance)
    }

    /// A copy of the account as it stands now.
    pub async fn account(&self, id: AccountId) -> Option<Account> {
        let slot = self.slot(id).await?;
        let account = slot.lock().await.clone();
        Some(account)
    }

    async fn slot(&self, id: AccountId) -> Option<AccountSlot> {
        self.accounts.read().await.get(&id).cloned()
    }

    async fn slots(
        &self,
        transaction: &Transaction,
    ) -> Result<(AccountSlot, AccountSlot), TransactError> {
        let (source, target) = join!(
            self.slot(transaction.source()),
            self.slot(transaction.target())
        );

        match (source, target) {
            (Some(source), Some(target)) => Ok((source, target)),
            (None, Some(_)) => Err(TransactError::SourceNotFound),
            (Some(_), None) => Err(TransactError::TargetNotFound),
            (None, None) => Err(TransactError::AccountsNotFound),
        }
    }

    /// Checks `transaction` against the current balances without applying
    /// it. The answer may be stale by the time the caller acts on it.
    pub async fn verify(&self, transaction: &Transaction) -> Result<(), TransactError> {
        transact::verify(transaction)?;
        let (source, _target) = self.slots(transaction).await?;

        let balance = source.lock().await.balance();
        if balance < transaction.value() {
            return Err(AccountError::InsufficientFunds {
                balance,
                amount: transaction.value(),
            }
            .into());
        }
        Ok(())
    }

    /// Applies `transaction` as one bank transfer under both account locks.
    pub async fn transact(&self, transaction: Transaction) -> Result<(), TransactError> {
        transact::verify(&transaction)?;
        let (source, target) = self.slots(&transaction).await?;

        // lock order: lower id first
        let source_first = transaction.source() < transaction.target();
        let (first, second) = if source_first {
            (&source, &target)
        } else {
            (&target, &source)
        };
        let mut first = first.lock().await;
        let mut second = second.lock().await;
        let (from, to) = if source_first {
            (&mut *first, &mut *second)
        } else {
            (&mut *second, &mut *first)
        };

        bank::transfer(from, to, transaction.value())?;
        info!(
            id = %transaction.id(),
            source = transaction.source(),
            target = transaction.target(),
            value = %transaction.value(),
            "transaction committed"
        );
        Ok(())
    }
}
