use std::fs;
use std::io::ErrorKind;

use tracing::warn;

use super::{write_atomic, Storage};
use crate::models::Settings;
use crate::utils::LedgerError;

/// Read the settings file without writing. `None` when it is missing or unreadable.
pub fn read_settings(storage: &Storage) -> Option<Settings> {
    match fs::read_to_string(storage.settings_path()) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => return Some(settings),
            Err(e) => warn!("⚠️ Invalid {}: {}", storage.settings_path().display(), e),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("⚠️ Cannot read {}: {}", storage.settings_path().display(), e),
    }
    None
}

/// Load settings, writing the defaults when the file is missing or unreadable
pub fn load_settings(storage: &Storage) -> Result<Settings, LedgerError> {
    if let Some(settings) = read_settings(storage) {
        return Ok(settings);
    }

    let _guard = storage.write_guard();
    // Another writer may have fixed the file while we waited
    if let Some(settings) = read_settings(storage) {
        return Ok(settings);
    }

    warn!("⚠️ Restoring default settings at {}", storage.settings_path().display());
    let settings = Settings::default();
    save_settings(storage, &settings)?;
    Ok(settings)
}

/// Replace the settings file. Callers hold `Storage::write_guard`.
pub fn save_settings(storage: &Storage, settings: &Settings) -> Result<(), LedgerError> {
    let contents = serde_json::to_string_pretty(settings)?;
    write_atomic(storage.settings_path(), contents.as_bytes())
}
