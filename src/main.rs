//! ATM CLI
//!
//! Each invocation is one session: the ledger is loaded from the data
//! directory, the account logs in (except for `register`), the operation
//! runs, and its result is printed.
//!
//! # Usage
//!
//! ```bash
//! atm register --name Alice --type savings --pin 1234 --confirm 1234
//! atm deposit --account ACC1001 --pin 1234 --amount 500
//! atm history --account ACC1001 --pin 1234
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `ATM_DATA_DIR`: Directory holding `accounts.csv` and `transactions.csv`

use atm_ledger::persistence::TRANSACTIONS_HEADER;
use atm_ledger::{AccountType, AtmService, Money, Result, Session, Storage};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "atm", version, about = "ATM simulator over CSV-backed accounts")]
struct Cli {
    /// Directory holding accounts.csv and transactions.csv
    #[arg(long, env = "ATM_DATA_DIR", default_value = ".", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Login {
    /// Account number, e.g. ACC1001
    #[arg(long)]
    account: String,

    /// Current 4-digit PIN
    #[arg(long)]
    pin: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a new account
    Register {
        #[arg(long)]
        name: String,

        /// savings or checking
        #[arg(long = "type", default_value = "savings")]
        account_type: AccountType,

        #[arg(long)]
        pin: String,

        #[arg(long)]
        confirm: String,
    },

    /// Show the account and its balance
    Balance {
        #[command(flatten)]
        login: Login,
    },

    /// Deposit funds
    Deposit {
        #[command(flatten)]
        login: Login,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Money,
    },

    /// Withdraw funds
    Withdraw {
        #[command(flatten)]
        login: Login,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Money,
    },

    /// Change the account PIN
    ChangePin {
        #[command(flatten)]
        login: Login,

        #[arg(long)]
        new_pin: String,

        #[arg(long)]
        confirm: String,
    },

    /// Print the transaction history as CSV, most recent first
    History {
        #[command(flatten)]
        login: Login,
    },
}

/// Accepts thousands separators (`1,000.50`).
fn parse_amount(s: &str) -> std::result::Result<Money, String> {
    Money::from_str(&s.replace(',', "")).map_err(|e| format!("invalid amount '{}': {}", s, e))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let storage = Storage::in_dir(&cli.data_dir);
    storage.ensure_dirs()?;
    let mut session = Session::new(AtmService::open(storage));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Register {
            name,
            account_type,
            pin,
            confirm,
        } => {
            let account = session.register(&name, account_type, &pin, &confirm)?;
            writeln!(out, "Account created: {}", account.account_number)?;
            writeln!(out, "Keep your PIN secret.")?;
        }
        Command::Balance { login } => {
            let account = session.login(&login.account, &login.pin)?;
            writeln!(
                out,
                "Account: {} ({})",
                account.account_number, account.account_type
            )?;
            writeln!(out, "Holder: {}", account.holder_name)?;
            writeln!(out, "Balance: {}", account.balance)?;
        }
        Command::Deposit { login, amount } => {
            session.login(&login.account, &login.pin)?;
            let tx = session.deposit(amount)?;
            writeln!(out, "Deposited {} ({})", tx.amount, tx.id)?;
            writeln!(out, "Balance: {}", session.current()?.balance)?;
        }
        Command::Withdraw { login, amount } => {
            session.login(&login.account, &login.pin)?;
            let tx = session.withdraw(amount)?;
            writeln!(out, "Withdrew {} ({})", tx.amount, tx.id)?;
            writeln!(out, "Balance: {}", session.current()?.balance)?;
        }
        Command::ChangePin {
            login,
            new_pin,
            confirm,
        } => {
            session.login(&login.account, &login.pin)?;
            session.change_pin(&login.pin, &new_pin, &confirm)?;
            writeln!(out, "PIN changed successfully")?;
        }
        Command::History { login } => {
            session.login(&login.account, &login.pin)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut out);
            writer.write_record(TRANSACTIONS_HEADER.split(','))?;
            for tx in session.history()? {
                writer.serialize(tx)?;
            }
            writer.flush()?;
        }
    }

    out.flush()?;
    Ok(())
}
