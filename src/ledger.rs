//! In-memory ledger store.
//!
//! Owns the accounts (in registration order) and the append-only transaction
//! log, plus the counters that mint new account numbers and transaction IDs.
//! The store does no validation; that belongs to the account service.

use crate::account::Account;
use crate::transaction::Transaction;
use std::collections::HashMap;

/// Prefix of every account number.
pub const ACCOUNT_PREFIX: &str = "ACC";

/// Prefix of every transaction ID.
pub const TX_PREFIX: &str = "TX";

/// Account sequence floor; the first minted number on an empty ledger is one above it.
pub const ACCOUNT_SEQ_BASE: u64 = 1000;

/// Transaction sequence floor; the first minted ID on an empty ledger is one above it.
pub const TX_SEQ_BASE: u64 = 1;

/// The authoritative accounts and transactions of a running process.
///
/// # Output Ordering
///
/// Accounts iterate in insertion order and transactions in append order, so
/// the files written from a ledger are deterministic.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Accounts in insertion order.
    accounts: Vec<Account>,

    /// Position of each account in `accounts`, keyed by account number.
    index: HashMap<String, usize>,

    /// Append-only transaction log.
    transactions: Vec<Transaction>,

    /// Sequence number the next minted account number will use, `None` once
    /// the sequence has run out.
    next_account_seq: Option<u64>,

    /// Sequence number the next minted transaction ID will use, `None` once
    /// the sequence has run out.
    next_tx_seq: Option<u64>,
}

impl Ledger {
    /// Creates an empty ledger with counters at their bases.
    pub fn new() -> Self {
        Ledger {
            accounts: Vec::new(),
            index: HashMap::new(),
            transactions: Vec::new(),
            next_account_seq: Some(ACCOUNT_SEQ_BASE + 1),
            next_tx_seq: Some(TX_SEQ_BASE + 1),
        }
    }

    /// Seeds both counters from the highest suffixes seen while loading.
    ///
    /// The next minted IDs are `max(base, highest) + 1`, so they can't collide
    /// with any loaded record. A highest suffix of `u64::MAX` leaves that
    /// sequence exhausted.
    pub fn seed_counters(&mut self, highest_account: Option<u64>, highest_tx: Option<u64>) {
        let acc = highest_account.map_or(ACCOUNT_SEQ_BASE, |h| h.max(ACCOUNT_SEQ_BASE));
        let tx = highest_tx.map_or(TX_SEQ_BASE, |h| h.max(TX_SEQ_BASE));
        self.next_account_seq = acc.checked_add(1);
        self.next_tx_seq = tx.checked_add(1);
    }

    /// Mints a fresh account number, skipping any that are already taken.
    ///
    /// Returns `None` once the sequence is exhausted.
    pub fn next_account_number(&mut self) -> Option<String> {
        loop {
            let seq = self.next_account_seq?;
            self.next_account_seq = seq.checked_add(1);
            let candidate = format!("{}{}", ACCOUNT_PREFIX, seq);
            if !self.index.contains_key(&candidate) {
                return Some(candidate);
            }
        }
    }

    /// Returns `true` while [`Ledger::next_transaction_id`] can still mint.
    pub fn has_next_transaction_id(&self) -> bool {
        self.next_tx_seq.is_some()
    }

    /// Mints the next transaction ID. Relies on the counter alone for uniqueness.
    ///
    /// Returns `None` once the sequence is exhausted.
    pub fn next_transaction_id(&mut self) -> Option<String> {
        let seq = self.next_tx_seq?;
        self.next_tx_seq = seq.checked_add(1);
        Some(format!("{}{}", TX_PREFIX, seq))
    }

    /// Inserts an account. An existing account with the same number is replaced in place.
    pub fn insert_account(&mut self, account: Account) {
        match self.index.get(&account.account_number) {
            Some(&pos) => self.accounts[pos] = account,
            None => {
                self.index
                    .insert(account.account_number.clone(), self.accounts.len());
                self.accounts.push(account);
            }
        }
    }

    /// Appends a transaction to the log.
    pub fn append_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn contains_account(&self, account_number: &str) -> bool {
        self.index.contains_key(account_number)
    }

    pub fn account(&self, account_number: &str) -> Option<&Account> {
        self.index.get(account_number).map(|&pos| &self.accounts[pos])
    }

    pub fn account_mut(&mut self, account_number: &str) -> Option<&mut Account> {
        match self.index.get(account_number) {
            Some(&pos) => self.accounts.get_mut(pos),
            None => None,
        }
    }

    /// All accounts in insertion order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The full transaction log in append order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions of one account, most recently appended first.
    pub fn transactions_for<'a>(
        &'a self,
        account_number: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .rev()
            .filter(move |tx| tx.account_number == account_number)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use crate::money::Money;
    use crate::transaction::TxKind;
    use std::str::FromStr;

    fn account(no: &str) -> Account {
        Account::new(no, "Holder", AccountType::Checking, "digest")
    }

    fn tx(id: &str, acc: &str, kind: TxKind, amount: &str) -> Transaction {
        Transaction::new(
            id,
            acc,
            kind,
            Money::from_str(amount).unwrap(),
            "2024-01-01 00:00:00",
        )
    }

    #[test]
    fn test_empty_ledger_mints_from_base() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.next_account_number().unwrap(), "ACC1001");
        assert_eq!(ledger.next_account_number().unwrap(), "ACC1002");
        assert_eq!(ledger.next_transaction_id().unwrap(), "TX2");
        assert_eq!(ledger.next_transaction_id().unwrap(), "TX3");
    }

    #[test]
    fn test_account_minting_skips_taken_numbers() {
        let mut ledger = Ledger::new();
        ledger.insert_account(account("ACC1001"));
        ledger.insert_account(account("ACC1002"));
        assert_eq!(ledger.next_account_number().unwrap(), "ACC1003");
    }

    #[test]
    fn test_seed_counters_uses_highest_or_base() {
        let mut ledger = Ledger::new();
        ledger.seed_counters(Some(1042), Some(17));
        assert_eq!(ledger.next_account_number().unwrap(), "ACC1043");
        assert_eq!(ledger.next_transaction_id().unwrap(), "TX18");

        ledger.seed_counters(Some(5), None);
        assert_eq!(ledger.next_account_number().unwrap(), "ACC1001");
        assert_eq!(ledger.next_transaction_id().unwrap(), "TX2");
    }

    #[test]
    fn test_sequences_stop_at_u64_max() {
        let mut ledger = Ledger::new();
        ledger.insert_account(account(&format!("ACC{}", u64::MAX)));
        ledger.seed_counters(Some(u64::MAX - 1), Some(u64::MAX - 1));

        assert!(ledger.has_next_transaction_id());
        assert_eq!(
            ledger.next_transaction_id(),
            Some(format!("TX{}", u64::MAX))
        );
        assert!(!ledger.has_next_transaction_id());
        assert_eq!(ledger.next_transaction_id(), None);

        assert_eq!(ledger.next_account_number(), None);
        assert_eq!(ledger.next_account_number(), None);

        ledger.seed_counters(Some(u64::MAX), None);
        assert_eq!(ledger.next_account_number(), None);
        assert_eq!(ledger.next_transaction_id().unwrap(), "TX2");
    }

    #[test]
    fn test_accounts_keep_insertion_order() {
        let mut ledger = Ledger::new();
        for no in ["ACC1005", "ACC1001", "ACC1003"] {
            ledger.insert_account(account(no));
        }
        let order: Vec<_> = ledger
            .accounts()
            .iter()
            .map(|a| a.account_number.as_str())
            .collect();
        assert_eq!(order, ["ACC1005", "ACC1001", "ACC1003"]);
        assert!(ledger.contains_account("ACC1003"));
        assert!(ledger.account("ACC9999").is_none());
    }

    #[test]
    fn test_insert_existing_number_replaces() {
        let mut ledger = Ledger::new();
        ledger.insert_account(account("ACC1001"));
        let mut updated = account("ACC1001");
        updated.holder_name = "Renamed".to_string();
        ledger.insert_account(updated);

        assert_eq!(ledger.accounts().len(), 1);
        assert_eq!(ledger.account("ACC1001").unwrap().holder_name, "Renamed");
    }

    #[test]
    fn test_account_mut_changes_stored_account() {
        let mut ledger = Ledger::new();
        ledger.insert_account(account("ACC1001"));
        assert!(ledger
            .account_mut("ACC1001")
            .unwrap()
            .deposit(Money::from_str("5").unwrap()));
        assert_eq!(ledger.account("ACC1001").unwrap().balance.to_string(), "5.00");
    }

    #[test]
    fn test_transactions_for_is_filtered_newest_first() {
        let mut ledger = Ledger::new();
        ledger.append_transaction(tx("TX2", "ACC1001", TxKind::Deposit, "500"));
        ledger.append_transaction(tx("TX3", "ACC1002", TxKind::Deposit, "10"));
        ledger.append_transaction(tx("TX4", "ACC1001", TxKind::Withdraw, "200"));

        let ids: Vec<_> = ledger
            .transactions_for("ACC1001")
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["TX4", "TX2"]);
        assert_eq!(ledger.transactions().len(), 3);
        assert_eq!(ledger.transactions_for("ACC7777").count(), 0);
    }
}
