//! Per-file display preferences persisted as JSON.
//!
//! The file maps a capture's file name (not its full path)
//! to its [`DisplaySettings`]:
//!
//! ```json
//! { "IMG_0042.raw": { "rotate_ccw": true } }
//! ```
//!
//! It is read once when the store is created and rewritten
//! in full on every change.
use std::{
    collections::BTreeMap,
    fs::{read_to_string, File},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde_derive::*;

use crate::error::{Error, Result};

/// Default file name of the settings store.
pub const SETTINGS_FILE_NAME: &str = "thermal_settings.json";

/// Environment variable overriding the settings location.
pub const SETTINGS_ENV: &str = "THERMAL_RAW_SETTINGS";

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Rotate the frame 90° counter-clockwise for display.
    #[serde(default)]
    pub rotate_ccw: bool,
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    entries: BTreeMap<String, DisplaySettings>,
}

impl SettingsStore {
    /// Settings path from an explicit argument, else
    /// [`SETTINGS_ENV`], else [`SETTINGS_FILE_NAME`] in the
    /// working directory.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(SETTINGS_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
    }

    /// Load the store at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or
    /// malformed file is reported as a warning and also
    /// yields an empty store.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("{}; using defaults", e);
                BTreeMap::new()
            }
        };
        debug!(
            "loaded {} display setting(s) from {}",
            entries.len(),
            path.display()
        );
        SettingsStore { path, entries }
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, DisplaySettings>> {
        let contents = match read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(Error::settings_load(path.to_path_buf(), e)),
        };
        serde_json::from_str(&contents).map_err(|e| Error::settings_load(path.to_path_buf(), e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored settings for `file_name`, or the defaults.
    /// Does not create an entry.
    pub fn get_or_default(&self, file_name: &str) -> DisplaySettings {
        self.entries.get(file_name).copied().unwrap_or_default()
    }

    /// Set the rotation flag of `file_name` and persist the
    /// store.
    ///
    /// The in-memory value is updated even if writing fails;
    /// the error is returned for the caller to report.
    pub fn set_rotate(&mut self, file_name: &str, rotate_ccw: bool) -> Result<()> {
        let unchanged = self
            .entries
            .get(file_name)
            .map_or(false, |s| s.rotate_ccw == rotate_ccw);
        if unchanged && self.path.exists() {
            return Ok(());
        }
        self.entries
            .entry(file_name.to_owned())
            .or_default()
            .rotate_ccw = rotate_ccw;
        self.save()
    }

    /// Rewrite the whole settings file.
    pub fn save(&self) -> Result<()> {
        let save_err = |e: Box<dyn std::error::Error + Send + Sync>| {
            Error::settings_save(self.path.clone(), e)
        };
        let file = File::create(&self.path).map_err(|e| save_err(e.into()))?;
        let mut wtr = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut wtr, &self.entries).map_err(|e| save_err(e.into()))?;
        wtr.flush().map_err(|e| save_err(e.into()))?;
        debug!("saved display settings to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(dir.path().join("nope.json"));
        assert!(store.is_empty());
        assert_eq!(store.get_or_default("a.raw"), DisplaySettings::default());
        assert!(!store.get_or_default("a.raw").rotate_ccw);
    }

    #[test]
    fn malformed_file_degrades_to_empty() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{ not json")?;
        let store = SettingsStore::load(&path);
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn save_then_reload() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let mut store = SettingsStore::load(&path);
        store.set_rotate("IMG_0001.raw", true)?;
        store.set_rotate("IMG_0002.raw", false)?;

        let reloaded = SettingsStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get_or_default("IMG_0001.raw").rotate_ccw);
        assert!(!reloaded.get_or_default("IMG_0002.raw").rotate_ccw);
        Ok(())
    }

    #[test]
    fn first_entry_with_default_value_is_written() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let mut store = SettingsStore::load(&path);
        assert_eq!(store.path(), path);
        store.set_rotate("IMG_0003.raw", false)?;
        assert_eq!(store.len(), 1);
        assert!(path.exists());

        let reloaded = SettingsStore::load(&path);
        assert_eq!(reloaded.len(), store.len());
        assert_eq!(
            reloaded.get_or_default("IMG_0003.raw"),
            store.get_or_default("IMG_0003.raw")
        );

        // repeating the same value on a stored entry keeps the file as is
        fs::write(&path, r#"{"IMG_0003.raw":{"rotate_ccw":false}}"#)?;
        store.set_rotate("IMG_0003.raw", false)?;
        assert_eq!(
            fs::read_to_string(&path)?,
            r#"{"IMG_0003.raw":{"rotate_ccw":false}}"#
        );
        Ok(())
    }

    #[test]
    fn file_format() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let mut store = SettingsStore::load(&path);
        store.set_rotate("a.raw", true)?;

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(json, serde_json::json!({ "a.raw": { "rotate_ccw": true } }));

        // entries without the field fall back to defaults
        fs::write(&path, r#"{ "b.raw": {} }"#)?;
        let store = SettingsStore::load(&path);
        assert_eq!(store.len(), 1);
        assert!(!store.get_or_default("b.raw").rotate_ccw);
        Ok(())
    }

    #[test]
    fn reads_do_not_create_entries() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(dir.path().join("s.json"));
        store.get_or_default("x.raw");
        assert!(store.is_empty());
    }

    #[test]
    fn unwritable_path_keeps_value_in_memory() {
        let dir = TempDir::new().unwrap();
        let mut store = SettingsStore::load(dir.path().join("missing-dir").join("s.json"));
        match store.set_rotate("a.raw", true) {
            Err(Error::SettingsSave { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(store.get_or_default("a.raw").rotate_ccw);
    }

    #[test]
    fn explicit_path_wins() {
        let p = SettingsStore::resolve_path(Some(Path::new("/tmp/x.json")));
        assert_eq!(p, PathBuf::from("/tmp/x.json"));
    }
}
