//! Error kinds surfaced by the library.
//!
//! Every error is recoverable at the boundary of a single
//! file's render: callers report it and carry on with the
//! next folder or file.
use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("path is not an existing folder: {}", .0.display())]
    InvalidFolder(PathBuf),

    #[error("file size mismatch: expected {expected} bytes, found {actual} bytes")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("non-finite value {value} at (row={row}, col={col})")]
    NonFinite { row: usize, col: usize, value: f32 },

    #[error("no .raw files to show")]
    NoFiles,

    #[error("frame has no values")]
    EmptyFrame,

    #[error("could not load settings from {}: {source}", path.display())]
    SettingsLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("could not save settings to {}: {source}", path.display())]
    SettingsSave {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("unexpected grid shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

impl Error {
    pub(crate) fn settings_load<E: Into<BoxError>>(path: PathBuf, err: E) -> Self {
        Error::SettingsLoad {
            path,
            source: err.into(),
        }
    }

    pub(crate) fn settings_save<E: Into<BoxError>>(path: PathBuf, err: E) -> Self {
        Error::SettingsSave {
            path,
            source: err.into(),
        }
    }
}
