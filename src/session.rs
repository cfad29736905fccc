//! Single-user session over an [`AtmService`].
//!
//! `Anonymous` → login → `Authenticated(account)` → logout → `Anonymous`.
//! At most one account is active at a time.

use crate::account::{Account, AccountType};
use crate::error::{AtmError, Result};
use crate::money::Money;
use crate::service::AtmService;
use crate::transaction::Transaction;
use log::debug;

/// Who, if anyone, is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(String),
}

#[derive(Debug)]
pub struct Session {
    service: AtmService,
    state: SessionState,
}

impl Session {
    pub fn new(service: AtmService) -> Self {
        Session {
            service,
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn service(&self) -> &AtmService {
        &self.service
    }

    pub fn into_service(self) -> AtmService {
        self.service
    }

    /// Registers an account. The session state is left as it was; the new
    /// holder still has to log in.
    pub fn register(
        &mut self,
        name: &str,
        account_type: AccountType,
        pin: &str,
        pin_confirm: &str,
    ) -> Result<Account> {
        self.service.register(name, account_type, pin, pin_confirm)
    }

    /// Authenticates and makes the account current. A failed attempt leaves
    /// the previous state in place.
    pub fn login(&mut self, account_number: &str, pin: &str) -> Result<&Account> {
        let number = self
            .service
            .authenticate(account_number, pin)?
            .account_number
            .clone();
        debug!("Session opened for {}", number);
        self.state = SessionState::Authenticated(number);
        self.current()
    }

    pub fn logout(&mut self) {
        if let SessionState::Authenticated(number) = &self.state {
            debug!("Session closed for {}", number);
        }
        self.state = SessionState::Anonymous;
    }

    /// The logged-in account.
    pub fn current(&self) -> Result<&Account> {
        let number = self.require_login()?;
        self.service
            .ledger()
            .account(number)
            .ok_or_else(|| AtmError::NotFound(number.to_string()))
    }

    pub fn deposit(&mut self, amount: Money) -> Result<Transaction> {
        let number = self.require_login()?.to_string();
        self.service.deposit(&number, amount)
    }

    pub fn withdraw(&mut self, amount: Money) -> Result<Transaction> {
        let number = self.require_login()?.to_string();
        self.service.withdraw(&number, amount)
    }

    pub fn change_pin(
        &mut self,
        old_pin: &str,
        new_pin: &str,
        new_pin_confirm: &str,
    ) -> Result<Transaction> {
        let number = self.require_login()?.to_string();
        self.service
            .change_pin(&number, old_pin, new_pin, new_pin_confirm)
    }

    /// The current account's transactions, most recent first.
    pub fn history(&self) -> Result<Vec<&Transaction>> {
        let number = self.require_login()?;
        self.service.history(number)
    }

    fn require_login(&self) -> Result<&str> {
        match &self.state {
            SessionState::Authenticated(number) => Ok(number.as_str()),
            SessionState::Anonymous => Err(AtmError::NotLoggedIn),
        }
    }
}
