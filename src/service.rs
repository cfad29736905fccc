//! Account service: the operations that enforce the ledger's rules.
//!
//! Every business-rule check runs before anything is mutated. Each successful
//! mutation is flushed to disk right away. If that flush fails, the error is
//! returned but the in-memory change stays applied.

use crate::account::{Account, AccountType};
use crate::config::Storage;
use crate::digest::digest;
use crate::error::{AtmError, Result};
use crate::ledger::{Ledger, ACCOUNT_PREFIX, TX_PREFIX};
use crate::money::Money;
use crate::persistence;
use crate::transaction::{now_timestamp, Transaction, TxKind};
use log::{debug, warn};

/// Length of a valid PIN.
pub const PIN_LEN: usize = 4;

/// Returns `true` if `pin` is exactly four ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == PIN_LEN && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Registration, login and balance operations over one ledger.
///
/// Each service owns its ledger and file locations; independent instances
/// never share state.
#[derive(Debug)]
pub struct AtmService {
    ledger: Ledger,
    storage: Storage,
}

impl AtmService {
    /// Loads the ledger from `storage` and returns a service over it.
    pub fn open(storage: Storage) -> Self {
        let ledger = persistence::load_all(&storage);
        AtmService { ledger, storage }
    }

    /// Wraps an already-built ledger.
    pub fn with_ledger(storage: Storage, ledger: Ledger) -> Self {
        AtmService { ledger, storage }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Opens a new account with zero balance.
    ///
    /// Checks run in order and the first failure is reported: name present,
    /// PIN present, PIN matches its confirmation, PIN is four digits. Only the
    /// accounts file is rewritten; registration records no transaction.
    pub fn register(
        &mut self,
        name: &str,
        account_type: AccountType,
        pin: &str,
        pin_confirm: &str,
    ) -> Result<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AtmError::Validation("Enter full name".into()));
        }
        if pin.is_empty() {
            return Err(AtmError::Validation("Enter PIN".into()));
        }
        if pin != pin_confirm {
            return Err(AtmError::Validation("PINs do not match".into()));
        }
        if !is_valid_pin(pin) {
            return Err(AtmError::Validation("PIN must be 4 digits".into()));
        }

        let number = self
            .ledger
            .next_account_number()
            .ok_or(AtmError::SequenceExhausted(ACCOUNT_PREFIX))?;
        let account = Account::new(number, name, account_type, digest(pin));
        self.ledger.insert_account(account.clone());
        debug!(
            "Registered {} ({}) for {}",
            account.account_number, account.account_type, account.holder_name
        );

        persistence::save_accounts(&self.storage, &self.ledger)?;
        Ok(account)
    }

    /// Checks an account number and PIN. Mutates nothing.
    pub fn authenticate(&self, account_number: &str, pin: &str) -> Result<&Account> {
        let account_number = account_number.trim();
        let account = self
            .ledger
            .account(account_number)
            .ok_or_else(|| AtmError::NotFound(account_number.to_string()))?;

        if account.is_locked() {
            warn!("Login refused for locked account {}", account_number);
            return Err(AtmError::Locked(account_number.to_string()));
        }
        if !account.pin_matches(pin) {
            warn!("Login refused for {}: wrong PIN", account_number);
            return Err(AtmError::InvalidCredentials);
        }

        debug!("Authenticated {}", account_number);
        Ok(account)
    }

    /// Credits `amount` and records a deposit.
    ///
    /// An amount that would push the balance out of range is rejected like a
    /// non-positive one and changes nothing.
    pub fn deposit(&mut self, account_number: &str, amount: Money) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount(amount));
        }

        self.ensure_transaction_id()?;
        let account = self.account_mut(account_number)?;
        if !account.deposit(amount) {
            warn!(
                "Deposit of {} to {} refused: balance out of range",
                amount, account_number
            );
            return Err(AtmError::InvalidAmount(amount));
        }
        debug!("Deposited {} to {}", amount, account_number);

        let tx = self.record(account_number, TxKind::Deposit, amount)?;
        self.persist()?;
        Ok(tx)
    }

    /// Debits `amount` and records a withdrawal.
    ///
    /// Overdrawing leaves the balance untouched and records nothing.
    pub fn withdraw(&mut self, account_number: &str, amount: Money) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount(amount));
        }

        self.ensure_transaction_id()?;
        let account = self.account_mut(account_number)?;
        if !account.withdraw(amount) {
            debug!(
                "Withdrawal of {} from {} failed (insufficient funds)",
                amount, account_number
            );
            return Err(AtmError::InsufficientFunds {
                requested: amount,
                available: account.balance,
            });
        }
        debug!("Withdrew {} from {}", amount, account_number);

        let tx = self.record(account_number, TxKind::Withdraw, amount)?;
        self.persist()?;
        Ok(tx)
    }

    /// Replaces the PIN after checking the current one.
    pub fn change_pin(
        &mut self,
        account_number: &str,
        old_pin: &str,
        new_pin: &str,
        new_pin_confirm: &str,
    ) -> Result<Transaction> {
        let account = self.account(account_number)?;
        if !account.pin_matches(old_pin) {
            warn!("PIN change refused for {}: wrong current PIN", account_number);
            return Err(AtmError::InvalidCredentials);
        }
        if new_pin != new_pin_confirm || !is_valid_pin(new_pin) {
            return Err(AtmError::Validation(
                "New PIN must be 4 digits and match confirmation".into(),
            ));
        }

        self.ensure_transaction_id()?;
        let account = self.account_mut(account_number)?;
        account.pin_digest = digest(new_pin);
        debug!("Changed PIN for {}", account_number);

        let tx = self.record(account_number, TxKind::PinChange, Money::ZERO)?;
        self.persist()?;
        Ok(tx)
    }

    /// Current balance of an account.
    pub fn balance(&self, account_number: &str) -> Result<Money> {
        self.account(account_number).map(|a| a.balance)
    }

    /// Transactions of an account, most recent first.
    pub fn history(&self, account_number: &str) -> Result<Vec<&Transaction>> {
        let account = self.account(account_number)?;
        Ok(self
            .ledger
            .transactions_for(&account.account_number)
            .collect())
    }

    fn account(&self, account_number: &str) -> Result<&Account> {
        self.ledger
            .account(account_number)
            .ok_or_else(|| AtmError::NotFound(account_number.to_string()))
    }

    fn account_mut(&mut self, account_number: &str) -> Result<&mut Account> {
        self.ledger
            .account_mut(account_number)
            .ok_or_else(|| AtmError::NotFound(account_number.to_string()))
    }

    fn ensure_transaction_id(&self) -> Result<()> {
        if self.ledger.has_next_transaction_id() {
            Ok(())
        } else {
            Err(AtmError::SequenceExhausted(TX_PREFIX))
        }
    }

    fn record(
        &mut self,
        account_number: &str,
        kind: TxKind,
        amount: Money,
    ) -> Result<Transaction> {
        let id = self
            .ledger
            .next_transaction_id()
            .ok_or(AtmError::SequenceExhausted(TX_PREFIX))?;
        let tx = Transaction::new(id, account_number, kind, amount, now_timestamp());
        self.ledger.append_transaction(tx.clone());
        Ok(tx)
    }

    fn persist(&self) -> Result<()> {
        persistence::save_all(&self.storage, &self.ledger)
    }
}
