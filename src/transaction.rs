//! Transaction records.
//!
//! Transactions are append-only: created by the account service, written to
//! `transactions.csv`, never edited or removed.

use crate::money::Money;
use chrono::Local;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// `YYYY-MM-DD HH:MM:SS`, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a transaction did to its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TxKind {
    /// Credit funds to the account.
    Deposit,

    /// Debit funds from the account.
    Withdraw,

    /// PIN digest replaced. Always carries a zero amount.
    #[serde(rename = "PIN_CHANGE")]
    PinChange,
}

impl TxKind {
    /// Text form used in `transactions.csv`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Deposit => "Deposit",
            TxKind::Withdraw => "Withdraw",
            TxKind::PinChange => "PIN_CHANGE",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Deposit" => Ok(TxKind::Deposit),
            "Withdraw" => Ok(TxKind::Withdraw),
            "PIN_CHANGE" => Ok(TxKind::PinChange),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// A single entry in the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// `"TX"` followed by a sequence number.
    #[serde(rename = "txId")]
    pub id: String,

    /// Account this entry belongs to. Association only.
    #[serde(rename = "accNo")]
    pub account_number: String,

    #[serde(rename = "type")]
    pub kind: TxKind,

    pub amount: Money,

    /// Wall-clock time of creation, see [`TIMESTAMP_FORMAT`].
    #[serde(rename = "time")]
    pub timestamp: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        account_number: impl Into<String>,
        kind: TxKind,
        amount: Money,
        timestamp: impl Into<String>,
    ) -> Self {
        Transaction {
            id: id.into(),
            account_number: account_number.into(),
            kind,
            amount,
            timestamp: timestamp.into(),
        }
    }
}

/// Current local time formatted with [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
