//! Loading and saving the ledger.
//!
//! Each save rewrites the whole file: header first, then one record per
//! entry in ledger order. Loading is best effort. A missing or unreadable
//! file gives an empty collection, and malformed rows are logged at warn
//! level and skipped.

use crate::account::{Account, AccountType};
use crate::config::Storage;
use crate::csv_codec::encode_record;
use crate::error::{AtmError, Result};
use crate::ledger::{Ledger, ACCOUNT_PREFIX, TX_PREFIX};
use crate::money::Money;
use crate::transaction::{Transaction, TxKind};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Header row of `accounts.csv`.
pub const ACCOUNTS_HEADER: &str = "accNo,holder,accType,balance,pinHash,locked";

/// Header row of `transactions.csv`.
pub const TRANSACTIONS_HEADER: &str = "txId,accNo,type,amount,time";

const ACCOUNT_FIELDS: usize = 6;
const TX_FIELDS: usize = 5;

/// Rebuilds a ledger from both files and seeds its ID counters.
pub fn load_all(storage: &Storage) -> Ledger {
    let mut ledger = Ledger::new();

    let highest_account = load_accounts(&storage.accounts_path, &mut ledger);
    let highest_tx = load_transactions(&storage.transactions_path, &mut ledger);
    ledger.seed_counters(highest_account, highest_tx);

    debug!(
        "Loaded {} accounts and {} transactions",
        ledger.accounts().len(),
        ledger.transactions().len()
    );
    ledger
}

/// Rewrites `accounts.csv` from the ledger.
pub fn save_accounts(storage: &Storage, ledger: &Ledger) -> Result<()> {
    let rows = ledger.accounts().iter().map(|a| {
        let balance = a.balance.to_string();
        encode_record([
            a.account_number.as_str(),
            a.holder_name.as_str(),
            a.account_type.as_str(),
            balance.as_str(),
            a.pin_digest.as_str(),
            if a.locked { "1" } else { "0" },
        ])
    });
    write_table(&storage.accounts_path, ACCOUNTS_HEADER, rows)
}

/// Rewrites `transactions.csv` from the ledger.
pub fn save_transactions(storage: &Storage, ledger: &Ledger) -> Result<()> {
    let rows = ledger.transactions().iter().map(|t| {
        let amount = t.amount.to_string();
        encode_record([
            t.id.as_str(),
            t.account_number.as_str(),
            t.kind.as_str(),
            amount.as_str(),
            t.timestamp.as_str(),
        ])
    });
    write_table(&storage.transactions_path, TRANSACTIONS_HEADER, rows)
}

/// Rewrites both files. Both are attempted; the first error is returned.
pub fn save_all(storage: &Storage, ledger: &Ledger) -> Result<()> {
    let accounts = save_accounts(storage, ledger);
    let transactions = save_transactions(storage, ledger);
    accounts.and(transactions)
}

fn write_table<I>(path: &Path, header: &str, rows: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    fn write_all<I: IntoIterator<Item = String>>(
        path: &Path,
        header: &str,
        rows: I,
    ) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", header)?;
        for row in rows {
            writeln!(writer, "{}", row)?;
        }
        writer.flush()
    }

    write_all(path, header, rows).map_err(|e| {
        warn!("Failed to save {}: {}", path.display(), e);
        AtmError::persistence(path, e)
    })
}

/// Reads every data record of a file (header skipped) and hands it to `visit`.
///
/// Quoted fields may span lines.
fn read_table<F>(path: &Path, mut visit: F)
where
    F: FnMut(&StringRecord, u64),
{
    if !path.exists() {
        debug!("{} does not exist, starting empty", path.display());
        return;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            return;
        }
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line());
                visit(&record, line);
            }
            Err(e) => {
                let fatal = matches!(e.kind(), csv::ErrorKind::Io(_));
                warn!("{}: skipping unreadable record: {}", path.display(), e);
                if fatal {
                    break;
                }
            }
        }
    }
}

fn load_accounts(path: &Path, ledger: &mut Ledger) -> Option<u64> {
    let mut highest = None;

    read_table(path, |record, line| {
        let Some(account) = parse_account(record, line) else {
            return;
        };
        if let Some(seq) = sequence_suffix(&account.account_number, ACCOUNT_PREFIX) {
            highest = highest.max(Some(seq));
        }
        ledger.insert_account(account);
    });

    highest
}

fn load_transactions(path: &Path, ledger: &mut Ledger) -> Option<u64> {
    let mut highest = None;

    read_table(path, |record, line| {
        let Some(tx) = parse_transaction(record, line) else {
            return;
        };
        if let Some(seq) = sequence_suffix(&tx.id, TX_PREFIX) {
            highest = highest.max(Some(seq));
        }
        ledger.append_transaction(tx);
    });

    highest
}

fn parse_account(record: &StringRecord, line: u64) -> Option<Account> {
    if record.len() < ACCOUNT_FIELDS {
        warn!(
            "accounts line {}: expected {} fields, found {}",
            line,
            ACCOUNT_FIELDS,
            record.len()
        );
        return None;
    }

    let account_type = match AccountType::from_str(&record[2]) {
        Ok(t) => t,
        Err(e) => {
            warn!("accounts line {}: {}", line, e);
            return None;
        }
    };

    let mut account = Account::new(&record[0], &record[1], account_type, &record[4]);
    account.balance = parse_amount(&record[3], line);
    account.locked = &record[5] == "1";
    Some(account)
}

fn parse_transaction(record: &StringRecord, line: u64) -> Option<Transaction> {
    if record.len() < TX_FIELDS {
        warn!(
            "transactions line {}: expected {} fields, found {}",
            line,
            TX_FIELDS,
            record.len()
        );
        return None;
    }

    let kind = match TxKind::from_str(&record[2]) {
        Ok(k) => k,
        Err(e) => {
            warn!("transactions line {}: {}", line, e);
            return None;
        }
    };

    Some(Transaction::new(
        &record[0],
        &record[1],
        kind,
        parse_amount(&record[3], line),
        &record[4],
    ))
}

/// Malformed amounts load as zero rather than dropping the row.
fn parse_amount(text: &str, line: u64) -> Money {
    Money::from_str(text).unwrap_or_else(|e| {
        warn!("line {}: bad amount '{}' ({}), using 0", line, text, e);
        Money::ZERO
    })
}

/// Numeric part of an identifier such as `ACC1001` or `TX42`.
fn sequence_suffix(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}
