use crate::error::AccountError;
use crate::models::bank::BankLink;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Number of decimal digits every balance carries after a mutation.
pub const BALANCE_SCALE: u32 = 5;

/// An account handle shared between its caller and a bank roster.
pub type SharedAccount = Rc<RefCell<Account>>;

/// A person's account holding a fixed-scale decimal balance.
///
/// Balances are rounded half-up to [`BALANCE_SCALE`] digits on every debit
/// and credit. The balance given at construction is kept as is until the
/// first mutation.
#[derive(Debug, Clone)]
pub struct Account {
    owner: String,
    balance: Decimal,
    bank: Option<BankLink>,
}

impl Account {
    pub fn new(owner: impl Into<String>, balance: Decimal) -> Self {
        Self {
            owner: owner.into(),
            balance,
            bank: None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// The bank this account was registered with, if any.
    pub fn bank(&self) -> Option<&BankLink> {
        self.bank.as_ref()
    }

    pub(crate) fn link_bank(&mut self, link: BankLink) {
        self.bank = Some(link);
    }

    /// Puts back a balance read before a debit whose paired credit failed.
    pub(crate) fn restore_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    pub fn into_shared(self) -> SharedAccount {
        Rc::new(RefCell::new(self))
    }

    /// Subtracts `amount` from the balance.
    ///
    /// Fails with [`AccountError::InsufficientFunds`] when the rounded result
    /// would be negative, leaving the balance untouched.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        check_amount(amount)?;
        let new_balance = self
            .balance
            .checked_sub(amount)
            .and_then(round_balance)
            .ok_or(AccountError::Overflow)?;
        debug!(owner = %self.owner, %new_balance, "debit computed");

        if new_balance < Decimal::ZERO {
            warn!(owner = %self.owner, balance = %self.balance, %amount, "debit rejected");
            return Err(AccountError::InsufficientFunds {
                balance: self.balance,
                amount,
            });
        }

        self.balance = new_balance;
        Ok(())
    }

    /// Adds `amount` to the balance. There is no upper bound besides what
    /// the decimal type can hold at [`BALANCE_SCALE`] digits.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        check_amount(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .and_then(round_balance)
            .ok_or(AccountError::Overflow)?;
        debug!(owner = %self.owner, balance = %self.balance, "credit applied");
        Ok(())
    }
}

fn check_amount(amount: Decimal) -> Result<(), AccountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AccountError::NegativeAmount(amount));
    }
    Ok(())
}

/// Rounds half-up to [`BALANCE_SCALE`] and pads to exactly that scale.
///
/// `None` when the value is too large to carry that many fractional digits.
fn round_balance(value: Decimal) -> Option<Decimal> {
    let mut rounded =
        value.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(BALANCE_SCALE);
    if rounded.scale() != BALANCE_SCALE {
        return None;
    }
    // -0.00000 after rounding a tiny negative result is plain zero
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    Some(rounded)
}

/// Owner and balance decide equality; the bank link does not. Balances must
/// match in value and in scale, so `2500` and `2500.00000` differ.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.balance == other.balance
            && self.balance.scale() == other.balance.scale()
    }
}

impl Eq for Account {}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.owner, self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn andres() -> Account {
        Account::new("Andres", dec!(1000.12345))
    }

    #[test]
    fn test_owner_and_initial_balance() {
        let account = andres();
        assert_eq!(account.owner(), "Andres");
        assert_eq!(account.balance(), dec!(1000.12345));
        assert!(account.balance() > Decimal::ZERO);
        assert!(account.bank().is_none());
    }

    #[test]
    fn test_set_owner() {
        let mut account = andres();
        account.set_owner("John Doe");
        assert_eq!(account.owner(), "John Doe");
    }

    #[test]
    fn test_debit() {
        let mut account = andres();
        account.debit(dec!(100)).unwrap();
        assert_eq!(account.balance().trunc(), dec!(900));
        assert_eq!(account.balance().to_string(), "900.12345");
    }

    #[test]
    fn test_credit() {
        let mut account = andres();
        account.credit(dec!(100)).unwrap();
        assert_eq!(account.balance().trunc(), dec!(1100));
        assert_eq!(account.balance().to_string(), "1100.12345");
    }

    #[test]
    fn test_debit_insufficient_funds() {
        let mut account = andres();
        let err = account.debit(dec!(1500)).unwrap_err();

        assert_eq!(err.to_string(), "Dinero Insuficiente");
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                balance: dec!(1000.12345),
                amount: dec!(1500),
            }
        );
        assert_eq!(account.balance(), dec!(1000.12345));
    }

    #[test]
    fn test_debit_whole_balance_yields_zero() {
        let mut account = andres();
        account.debit(dec!(1000.12345)).unwrap();
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.balance().to_string(), "0.00000");
    }

    #[test]
    fn test_debit_just_above_balance_fails() {
        let mut account = andres();
        assert!(account.debit(dec!(1000.12346)).is_err());
        assert_eq!(account.balance().to_string(), "1000.12345");
    }

    #[test]
    fn test_mutation_pads_scale() {
        let mut account = Account::new("Jhon Doe", dec!(2500));
        assert_eq!(account.balance().to_string(), "2500");

        account.credit(dec!(500)).unwrap();
        assert_eq!(account.balance().to_string(), "3000.00000");
        assert_eq!(account.balance().scale(), BALANCE_SCALE);
    }

    #[rstest]
    #[case(dec!(0), dec!(0.000005), "0.00001")]
    #[case(dec!(0), dec!(0.0000049), "0.00000")]
    #[case(dec!(1.123455), dec!(0), "1.12346")]
    #[case(dec!(10.5), dec!(0.1234567), "10.62346")]
    fn test_credit_rounds_half_up(
        #[case] balance: Decimal,
        #[case] amount: Decimal,
        #[case] expected: &str,
    ) {
        let mut account = Account::new("Andres", balance);
        account.credit(amount).unwrap();
        assert_eq!(account.balance().to_string(), expected);
    }

    #[test]
    fn test_debit_rounds_half_up() {
        let mut account = Account::new("Andres", dec!(1));
        account.debit(dec!(0.000005)).unwrap();
        assert_eq!(account.balance().to_string(), "1.00000");
    }

    #[test]
    fn test_debit_rounding_to_zero_is_not_negative() {
        let mut account = Account::new("Andres", dec!(0.000004));
        account.debit(dec!(0.000008)).unwrap();
        assert_eq!(account.balance().to_string(), "0.00000");
    }

    #[rstest]
    #[case(dec!(1000.12345), dec!(100))]
    #[case(dec!(2500), dec!(500))]
    #[case(dec!(10.123456), dec!(1))]
    #[case(dec!(0.00001), dec!(99999.99999))]
    fn test_credit_then_debit_restores_rounded_balance(
        #[case] balance: Decimal,
        #[case] amount: Decimal,
    ) {
        let mut account = Account::new("Andres", balance);
        account.credit(amount).unwrap();
        account.debit(amount).unwrap();
        assert_eq!(account.balance(), round_balance(balance).unwrap());
    }

    // balance, amount, owner rows for repeated debits against a fresh account
    #[rstest]
    #[case("100", "100", "Jhon")]
    #[case("200", "200", "Pepe")]
    #[case("300", "300", "Maria")]
    #[case("510", "500", "Pepa")]
    #[case("750", "700", "Lucas")]
    #[case("1000.12345", "1000.12345", "Cata")]
    fn test_debit_rows(#[case] balance: &str, #[case] amount: &str, #[case] owner: &str) {
        let balance: Decimal = balance.parse().unwrap();
        let amount: Decimal = amount.parse().unwrap();
        let mut account = Account::new(owner, balance);

        account.debit(amount).unwrap();

        assert_eq!(account.owner(), owner);
        assert!(account.balance() >= Decimal::ZERO);
        assert_eq!(account.balance(), round_balance(balance - amount).unwrap());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut account = andres();
        assert_eq!(
            account.debit(dec!(-10)),
            Err(AccountError::NegativeAmount(dec!(-10)))
        );
        assert_eq!(
            account.credit(dec!(-10)),
            Err(AccountError::NegativeAmount(dec!(-10)))
        );
        assert_eq!(account.balance(), dec!(1000.12345));
    }

    #[test]
    fn test_zero_amount_accepted() {
        let mut account = andres();
        account.debit(dec!(0)).unwrap();
        account.credit(-dec!(0)).unwrap();
        assert_eq!(account.balance().to_string(), "1000.12345");
    }

    #[test]
    fn test_credit_overflow() {
        let mut account = Account::new("Andres", Decimal::MAX);
        assert_eq!(account.credit(dec!(1)), Err(AccountError::Overflow));
        assert_eq!(account.balance(), Decimal::MAX);
    }

    #[test]
    fn test_credit_too_large_for_scale() {
        let mut account = Account::new("Andres", dec!(1000000000000000000000000));
        assert_eq!(account.credit(dec!(1)), Err(AccountError::Overflow));
        assert_eq!(account.balance(), dec!(1000000000000000000000000));
        assert_eq!(account.balance().scale(), 0);
    }

    #[test]
    fn test_debit_too_large_for_scale() {
        let mut account = Account::new("Andres", dec!(1000000000000000000000000));
        assert_eq!(account.debit(dec!(1)), Err(AccountError::Overflow));
        assert_eq!(account.balance(), dec!(1000000000000000000000000));
    }

    #[test]
    fn test_large_balance_keeps_scale() {
        let mut account = Account::new("Andres", dec!(700000000000000000000000));
        account.credit(dec!(1)).unwrap();
        assert_eq!(account.balance().scale(), BALANCE_SCALE);
        assert_eq!(
            account.balance().to_string(),
            "700000000000000000000001.00000"
        );
    }

    #[test]
    fn test_equality() {
        let first = Account::new("John Doe", dec!(8900.9997));
        let second = Account::new("John Doe", dec!(8900.9997));
        assert_eq!(first, second);

        assert_ne!(first, Account::new("Jane Doe", dec!(8900.9997)));
        assert_ne!(first, Account::new("John Doe", dec!(8900.9996)));
    }

    #[test]
    fn test_equality_compares_scale() {
        let plain = Account::new("Andres", dec!(2500));
        assert_ne!(plain, Account::new("Andres", dec!(2500.00000)));

        let mut credited = Account::new("Andres", dec!(2000));
        credited.credit(dec!(500)).unwrap();
        assert_ne!(credited, plain);
        assert_eq!(credited, Account::new("Andres", dec!(2500.00000)));
    }

    #[test]
    fn test_display() {
        assert_eq!(andres().to_string(), "Andres\t1000.12345");
    }
}
