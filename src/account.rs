//! Account model.
//!
//! Maintains the invariant: `balance >= 0` at all times.

use crate::digest;
use crate::money::Money;
use std::fmt;
use std::str::FromStr;

/// The kinds of account a holder can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Savings,
    Checking,
}

impl AccountType {
    /// Text form used in `accounts.csv`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checking => "Checking",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

/// A registered account.
///
/// # Invariants
///
/// - `balance` never drops below zero; only [`Account::deposit`] and
///   [`Account::withdraw`] change it
/// - `pin_digest` holds the hex digest of the PIN, never the PIN itself
/// - `locked` is read at login; nothing in the ledger sets it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// `"ACC"` followed by a sequence number. Immutable.
    pub account_number: String,
    pub holder_name: String,
    pub account_type: AccountType,
    pub balance: Money,
    pub pin_digest: String,
    pub locked: bool,
}

impl Account {
    /// Creates an unlocked account with zero balance.
    pub fn new(
        account_number: impl Into<String>,
        holder_name: impl Into<String>,
        account_type: AccountType,
        pin_digest: impl Into<String>,
    ) -> Self {
        Account {
            account_number: account_number.into(),
            holder_name: holder_name.into(),
            account_type,
            balance: Money::ZERO,
            pin_digest: pin_digest.into(),
            locked: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns `true` if `pin` matches the stored digest.
    pub fn pin_matches(&self, pin: &str) -> bool {
        digest::verify(pin, &self.pin_digest)
    }

    /// Adds `amount` to the balance.
    ///
    /// Returns `false` and leaves the balance untouched if the sum is out of range.
    pub fn deposit(&mut self, amount: Money) -> bool {
        match self.balance.checked_add(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Removes `amount` from the balance.
    ///
    /// Returns `false` and leaves the balance untouched if `amount` exceeds it.
    pub fn withdraw(&mut self, amount: Money) -> bool {
        if amount > self.balance {
            return false;
        }

        match self.balance.checked_sub(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn account() -> Account {
        Account::new("ACC1001", "Alice", AccountType::Savings, digest::digest("1234"))
    }

    #[test]
    fn test_new_account_is_empty_and_unlocked() {
        let acc = account();
        assert_eq!(acc.account_number, "ACC1001");
        assert_eq!(acc.balance, Money::ZERO);
        assert!(!acc.is_locked());
        assert!(acc.pin_matches("1234"));
        assert!(!acc.pin_matches("1235"));
    }

    #[test]
    fn test_deposit_then_withdraw() {
        let mut acc = account();
        assert!(acc.deposit(money("500")));
        assert!(acc.withdraw(money("200")));
        assert_eq!(acc.balance.to_string(), "300.00");
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let mut acc = account();
        assert!(acc.deposit(money("10")));
        assert!(acc.withdraw(money("10")));
        assert!(acc.balance.is_zero());
    }

    #[test]
    fn test_overdraw_is_refused() {
        let mut acc = account();
        assert!(acc.deposit(money("10")));
        assert!(!acc.withdraw(money("10.01")));
        assert_eq!(acc.balance, money("10"));
    }

    #[test]
    fn test_deposit_past_range_is_refused() {
        let mut acc = account();
        let huge = money("50000000000000000000000000000");
        assert!(acc.deposit(huge));
        assert!(!acc.deposit(huge));
        assert_eq!(acc.balance, huge);
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!("Savings".parse::<AccountType>(), Ok(AccountType::Savings));
        assert_eq!(" checking ".parse::<AccountType>(), Ok(AccountType::Checking));
        assert!("Brokerage".parse::<AccountType>().is_err());
        assert_eq!(AccountType::Checking.to_string(), "Checking");
    }
}
