//! Viewer state: the scanned folder, the selected file,
//! persisted per-file settings and session-wide view
//! options.
//!
//! All mutation goes through explicit methods; a failure
//! while rendering one file leaves navigation and settings
//! untouched.
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::{
    error::{Error, Result},
    pipeline::{render_file, Rendered, ViewOptions},
    render::{export_path, write_png},
    scan::{file_key, scan_folder},
    settings::{DisplaySettings, SettingsStore},
};

/// Index of the selected file in a list of `count` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
    count: usize,
}

impl Navigator {
    /// Starts at the last (most recent) file.
    pub fn new(count: usize) -> Self {
        Navigator {
            index: count.saturating_sub(1),
            count,
        }
    }

    /// `None` when there are no files.
    pub fn index(&self) -> Option<usize> {
        if self.count == 0 {
            None
        } else {
            Some(self.index)
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn has_prev(&self) -> bool {
        self.count > 0 && self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.count
    }

    /// Returns `false` if already at the first file.
    pub fn prev(&mut self) -> bool {
        let moved = self.has_prev();
        if moved {
            self.index -= 1;
        }
        moved
    }

    /// Returns `false` if already at the last file.
    pub fn next(&mut self) -> bool {
        let moved = self.has_next();
        if moved {
            self.index += 1;
        }
        moved
    }

    /// Jump to a 1-based position, clamped to the list.
    pub fn jump(&mut self, one_based: usize) {
        if self.count > 0 {
            self.index = one_based.max(1).min(self.count) - 1;
        }
    }
}

#[derive(Debug)]
pub struct Session {
    folder: Option<PathBuf>,
    files: Vec<PathBuf>,
    nav: Navigator,
    settings: SettingsStore,
    pub view: ViewOptions,
}

impl Session {
    pub fn new(settings: SettingsStore) -> Self {
        Session {
            folder: None,
            files: vec![],
            nav: Navigator::new(0),
            settings,
            view: ViewOptions::default(),
        }
    }

    /// Scan `folder` and select its last file. On failure the
    /// file list is emptied.
    pub fn open_folder<P: AsRef<Path>>(&mut self, folder: P) -> Result<usize> {
        let folder = folder.as_ref();
        self.folder = Some(folder.to_path_buf());
        match scan_folder(folder) {
            Ok(files) => {
                info!("found {} .raw file(s) in {}", files.len(), folder.display());
                self.nav = Navigator::new(files.len());
                self.files = files;
                Ok(self.files.len())
            }
            Err(e) => {
                self.files.clear();
                self.nav = Navigator::new(0);
                Err(e)
            }
        }
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.nav
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.nav
            .index()
            .and_then(|idx| self.files.get(idx))
            .map(PathBuf::as_path)
    }

    fn current_key(&self) -> Result<String> {
        self.current_file().map(file_key).ok_or(Error::NoFiles)
    }

    pub fn current_settings(&self) -> Option<DisplaySettings> {
        self.current_file()
            .map(|p| self.settings.get_or_default(&file_key(p)))
    }

    /// Set the rotation of the current file and persist it.
    ///
    /// A failure to write the settings file is logged; the
    /// new value still applies for this session.
    pub fn set_rotation(&mut self, rotate_ccw: bool) -> Result<()> {
        let key = self.current_key()?;
        if let Err(e) = self.settings.set_rotate(&key, rotate_ccw) {
            warn!("{}", e);
        }
        Ok(())
    }

    /// Flip the rotation of the current file; returns the new
    /// value.
    pub fn toggle_rotation(&mut self) -> Result<bool> {
        let rotate = !self.current_settings().ok_or(Error::NoFiles)?.rotate_ccw;
        self.set_rotation(rotate)?;
        Ok(rotate)
    }

    pub fn render_current(&self) -> Result<Rendered> {
        let path = self.current_file().ok_or(Error::NoFiles)?;
        let settings = self.settings.get_or_default(&file_key(path));
        render_file(path, settings.rotate_ccw, &self.view)
    }

    /// Render the current file and write
    /// `<stem>_heatmap.png` into `out_dir`.
    pub fn export_current(&self, out_dir: &Path) -> Result<PathBuf> {
        let path = self.current_file().ok_or(Error::NoFiles)?;
        let rendered = self.render_current()?;
        let out = export_path(path, out_dir);
        write_png(&rendered.image, &out)?;
        info!("exported {}", out.display());
        Ok(out)
    }
}
