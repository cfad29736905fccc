//! Data file locations.

use crate::error::{AtmError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the accounts table.
pub const ACCOUNTS_FILE: &str = "accounts.csv";

/// File name of the transaction log.
pub const TRANSACTIONS_FILE: &str = "transactions.csv";

/// Where the ledger lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    pub accounts_path: PathBuf,
    pub transactions_path: PathBuf,
}

impl Storage {
    /// Uses the standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Storage {
            accounts_path: dir.join(ACCOUNTS_FILE),
            transactions_path: dir.join(TRANSACTIONS_FILE),
        }
    }

    /// Creates the parent directories of both files if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for path in [&self.accounts_path, &self.transactions_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| AtmError::persistence(parent, e))?;
            }
        }
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Storage::in_dir(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_uses_standard_names() {
        let storage = Storage::in_dir("/data/atm");
        assert_eq!(storage.accounts_path, Path::new("/data/atm/accounts.csv"));
        assert_eq!(
            storage.transactions_path,
            Path::new("/data/atm/transactions.csv")
        );
    }

    #[test]
    fn test_ensure_dirs_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Storage::in_dir(tmp.path().join("nested").join("dir"));
        storage.ensure_dirs().unwrap();
        assert!(tmp.path().join("nested").join("dir").is_dir());
    }
}
