//! Helpers to parse CLI arguments in the accompanying
//! binaries.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
pub use clap::{App, Arg};
use indicatif::{ProgressBar, ProgressStyle};
pub use inflector::Inflector;
use itertools::Either;
use rayon::iter::{once, IntoParallelIterator, ParallelIterator};

use crate::{scan::scan_folder, ThermalFrame};

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Initialize `env_logger` at `info` unless `RUST_LOG` says
/// otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

pub struct RawInput {
    pub path: PathBuf,
    pub frame: ThermalFrame,
}

impl RawInput {
    fn try_from_path(path: PathBuf) -> Result<Self> {
        let frame = ThermalFrame::from_path(&path)
            .with_context(|| format!("could not decode {}", path.display()))?;
        Ok(RawInput { path, frame })
    }
}

/// Expand folders into the raw files they contain; other
/// paths are kept as given.
fn expand_path(path: PathBuf) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        Ok(scan_folder(&path)?)
    } else {
        Ok(vec![path])
    }
}

/// Decode `paths` in parallel, with a progress bar on
/// stderr. Folders are expanded to their `*.raw` files.
pub fn process_paths_par(
    paths: Vec<PathBuf>,
) -> impl IntoParallelIterator<Item = Result<RawInput>> {
    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );
    let bar_dup = bar.clone();

    paths
        .into_par_iter()
        .map(move |p| match expand_path(p) {
            Ok(files) => {
                if files.len() != 1 {
                    bar.inc_length(files.len() as u64);
                    bar.inc(1);
                }
                Either::Left(files.into_par_iter().map(RawInput::try_from_path))
            }
            Err(e) => Either::Right(once(Err(e))),
        })
        .flatten()
        .inspect(move |_| bar_dup.inc(1))
}

/// Output path for `input` inside `out_dir`, refusing to
/// overwrite the input itself.
pub fn output_path_for(input: &Path, out_dir: &Path) -> Result<PathBuf> {
    let out = crate::render::export_path(input, out_dir);
    anyhow::ensure!(
        out != input,
        "output would overwrite input {}",
        input.display()
    );
    Ok(out)
}
