use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};
use uuid::Uuid;

use crate::utils::LedgerError;

pub mod ledger;
pub mod settings;

const LEDGER_FILE: &str = "riwayat_orderan.csv";
const SETTINGS_FILE: &str = "config.json";

/// Locations of the flat files backing the tracker
#[derive(Debug)]
pub struct Storage {
    data_dir: PathBuf,
    ledger_path: PathBuf,
    settings_path: PathBuf,
    write_lock: Mutex<()>,
}

impl Storage {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Storage {
            ledger_path: data_dir.join(LEDGER_FILE),
            settings_path: data_dir.join(SETTINGS_FILE),
            data_dir,
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Serializes ledger and settings writes. Hold it across read-modify-write sequences.
    pub fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create the data directory, write the ledger header and migrate old ledgers
pub fn init_storage(storage: &Storage) -> Result<(), LedgerError> {
    fs::create_dir_all(storage.data_dir())?;
    let _guard = storage.write_guard();

    if ledger::initialize_ledger(storage)? {
        info!("Created new ledger at {}", storage.ledger_path().display());
    }

    // Migration failure is not fatal
    match ledger::migrate_ledger(storage) {
        Ok(true) => info!("Migrated ledger: added custom date column"),
        Ok(false) => {}
        Err(e) => warn!("⚠️ Ledger migration failed: {}", e),
    }

    Ok(())
}

/// Replace `path` with `bytes` through a sibling temp file, so readers see the old or the new file
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LedgerError> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    fs::create_dir_all(parent)?;

    let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("file");
    let tmp = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));
    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
