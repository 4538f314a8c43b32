//! Discover captures and recordings in a folder.
use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use log::{debug, warn};

use crate::error::{Error, Result};

pub const RAW_EXTENSION: &str = "raw";

/// Sorted `*.raw` files directly inside `folder` (extension
/// matched case-insensitively).
///
/// Fails with [`Error::InvalidFolder`] if `folder` is not an
/// existing directory.
pub fn scan_folder<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    scan_folder_for(folder, &[RAW_EXTENSION])
}

/// Sorted files directly inside `folder` whose extension is
/// one of `extensions`, ignoring case.
pub fn scan_folder_for<P: AsRef<Path>>(folder: P, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(Error::InvalidFolder(folder.to_path_buf()));
    }

    let mut opts = MatchOptions::new();
    opts.case_sensitive = false;
    let escaped = Pattern::escape(&folder.to_string_lossy());

    let mut files = vec![];
    for ext in extensions {
        let pattern = format!("{}/*.{}", escaped, ext);
        let entries = glob_with(&pattern, opts)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;
        files.extend(
            entries
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!("skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|path| path.is_file()),
        );
    }
    files.sort();
    files.dedup();

    debug!(
        "found {} file(s) matching {:?} in {}",
        files.len(),
        extensions,
        folder.display()
    );
    Ok(files)
}

/// File name used as the settings key for a capture.
pub fn file_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_raw_files_sorted() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        for name in ["b.raw", "a.raw", "c.RAW", "notes.txt", "d.raw.bak"].iter() {
            fs::write(dir.path().join(name), b"")?;
        }
        fs::create_dir(dir.path().join("sub.raw"))?;

        let files = scan_folder(dir.path())?;
        let names: Vec<_> = files.iter().map(|p| file_key(p)).collect();
        assert_eq!(names, vec!["a.raw", "b.raw", "c.RAW"]);
        Ok(())
    }

    #[test]
    fn missing_folder_is_invalid() {
        let dir = TempDir::new().unwrap();
        match scan_folder(dir.path().join("missing")) {
            Err(Error::InvalidFolder(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn file_is_not_a_folder() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("x.raw");
        fs::write(&file, b"")?;
        assert!(matches!(scan_folder(&file), Err(Error::InvalidFolder(_))));
        Ok(())
    }

    #[test]
    fn empty_folder_is_valid() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        assert!(scan_folder(dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn several_extensions() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        for name in ["a.mjpeg", "b.MJPG", "c.Mjpeg", "d.mp4", "e.raw"].iter() {
            fs::write(dir.path().join(name), b"")?;
        }
        let files = scan_folder_for(dir.path(), &["mjpeg", "mjpg"])?;
        let names: Vec<_> = files.iter().map(|p| file_key(p)).collect();
        assert_eq!(names, vec!["a.mjpeg", "b.MJPG", "c.Mjpeg"]);
        Ok(())
    }

    #[test]
    fn folder_names_with_glob_characters() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let odd = dir.path().join("[set] *");
        fs::create_dir(&odd)?;
        fs::write(odd.join("x.raw"), b"")?;
        assert_eq!(scan_folder(&odd)?.len(), 1);
        Ok(())
    }
}
