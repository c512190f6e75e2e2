use crate::error::AccountError;
use crate::models::account::{Account, SharedAccount};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::debug;

/// State an account can look up through its [`BankLink`].
#[derive(Debug)]
struct BankProfile {
    name: RwLock<String>,
}

impl BankProfile {
    fn name(&self) -> String {
        self.name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Non-owning link from an account back to the bank it was registered with.
///
/// The bank owns its roster; the link only points at the bank's profile, so
/// no reference cycle forms between the two.
#[derive(Debug, Clone)]
pub struct BankLink(Weak<BankProfile>);

impl BankLink {
    /// Current name of the linked bank, `None` once the bank is dropped.
    pub fn name(&self) -> Option<String> {
        self.0.upgrade().map(|profile| profile.name())
    }

    /// Whether this link points at `bank`.
    pub fn is(&self, bank: &Bank) -> bool {
        Weak::ptr_eq(&self.0, &Arc::downgrade(&bank.profile))
    }
}

/// A named bank with a roster of accounts.
#[derive(Debug)]
pub struct Bank {
    profile: Arc<BankProfile>,
    accounts: Vec<SharedAccount>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            profile: Arc::new(BankProfile {
                name: RwLock::new(name.into()),
            }),
            accounts: Vec::new(),
        }
    }

    pub fn name(&self) -> String {
        self.profile.name()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        *self
            .profile
            .name
            .write()
            .unwrap_or_else(PoisonError::into_inner) = name.into();
    }

    /// Registered accounts in insertion order.
    pub fn accounts(&self) -> &[SharedAccount] {
        &self.accounts
    }

    /// Appends `account` to the roster and links it back to this bank.
    ///
    /// Registering the same account twice adds a second roster entry.
    pub fn add_account(&mut self, account: SharedAccount) {
        account
            .borrow_mut()
            .link_bank(BankLink(Arc::downgrade(&self.profile)));
        self.accounts.push(account);
        debug!(bank = %self.name(), accounts = self.accounts.len(), "account registered");
    }

    /// Moves `amount` from `from` to `to`. The accounts need not be
    /// registered with this bank.
    pub fn transfer(
        &self,
        from: &mut Account,
        to: &mut Account,
        amount: Decimal,
    ) -> Result<(), AccountError> {
        transfer(from, to, amount)
    }
}

/// Debits `from`, then credits `to` only if the debit went through.
///
/// A failed debit is returned as is and `to` is never touched. A failed
/// credit puts `from` back to its balance before the debit.
pub fn transfer(from: &mut Account, to: &mut Account, amount: Decimal) -> Result<(), AccountError> {
    let before = from.balance();
    from.debit(amount)?;
    if let Err(err) = to.credit(amount) {
        from.restore_balance(before);
        return Err(err);
    }
    debug!(from = %from.owner(), to = %to.owner(), %amount, "transfer applied");
    Ok(())
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} accounts)", self.name(), self.accounts.len())
    }
}
