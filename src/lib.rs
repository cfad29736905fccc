//! # ATM Ledger
//!
//! The core of a single-user ATM simulator. It handles account registration,
//! PIN login, deposits, withdrawals, PIN changes and per-account history, and
//! persists everything to two CSV files.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Amounts use 2 decimal places via `rust_decimal`
//! - **Rewrite on every change**: Both files are rewritten after each mutation
//! - **Strict invariants**: Balances never go negative; transactions are append-only
//! - **No globals**: Each [`AtmService`] owns its own [`Ledger`]
//!
//! ## Example
//!
//! ```no_run
//! use atm_ledger::{AccountType, AtmService, Money, Storage};
//! use std::str::FromStr;
//!
//! let mut atm = AtmService::open(Storage::in_dir("."));
//! let acc = atm.register("Alice", AccountType::Savings, "1234", "1234").unwrap();
//! atm.deposit(&acc.account_number, Money::from_str("500").unwrap()).unwrap();
//! ```

pub mod account;
pub mod config;
pub mod csv_codec;
pub mod digest;
pub mod error;
pub mod ledger;
pub mod money;
pub mod persistence;
pub mod service;
pub mod session;
pub mod transaction;

pub use account::{Account, AccountType};
pub use config::Storage;
pub use error::{AtmError, Result};
pub use ledger::Ledger;
pub use money::Money;
pub use service::AtmService;
pub use session::{Session, SessionState};
pub use transaction::{Transaction, TxKind};
