mod args;

use anyhow::{Context, Result};
use args::Args;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde_derive::*;

use thermal_raw::cli::{init_logging, process_paths_par, RawInput};
use thermal_raw::stats::{FrameStats, Stats};
use thermal_raw::transform::apply_transformations;

fn main() -> Result<()> {
    init_logging();
    let Args {
        paths,
        rotate,
        pretty,
    } = Args::from_cmd_line()?;

    let (mut stats, cumulative) = process_paths_par(paths)
        .into_par_iter()
        .map(|try_raw| -> Result<_> { FileStats::from_raw(try_raw?, rotate) })
        .try_fold(
            || (vec![], Stats::default()),
            |mut acc, try_stats| -> Result<_> {
                let (item, pixels) = try_stats?;
                acc.0.push(item);
                acc.1 += &pixels;
                Ok(acc)
            },
        )
        .try_reduce(
            || (vec![], Stats::default()),
            |mut acc1, acc2| -> Result<_> {
                acc1.0.extend(acc2.0);
                acc1.1 += &acc2.1;
                Ok(acc1)
            },
        )?;
    stats.sort_by(|a, b| a.path.cmp(&b.path));

    #[derive(Debug, Serialize)]
    struct OutputJson {
        file_stats: Vec<FileStats>,
        cumulative: Stats,
    }
    let out = OutputJson {
        file_stats: stats,
        cumulative,
    };

    let stdout = std::io::stdout();
    if pretty {
        serde_json::to_writer_pretty(stdout.lock(), &out)?;
    } else {
        serde_json::to_writer(stdout.lock(), &out)?;
    }
    println!();

    Ok(())
}

#[derive(Serialize, Debug)]
pub struct FileStats {
    path: String,
    width: usize,
    height: usize,
    #[serde(flatten)]
    stats: FrameStats,
    std_dev: Option<f64>,
}

impl FileStats {
    /// Per-file summary, plus the running pixel stats used for
    /// the cumulative figures.
    fn from_raw(raw: RawInput, rotate: bool) -> Result<(Self, Stats)> {
        let RawInput { path, frame } = raw;
        frame
            .ensure_finite()
            .with_context(|| format!("could not use {}", path.display()))?;
        let frame = apply_transformations(frame, rotate);
        let (ht, wid) = frame.dim();

        let mut pixels = Stats::default();
        for val in frame.values() {
            pixels += f64::from(val);
        }
        let stats = FrameStats::of(&frame)
            .ok_or_else(|| anyhow::anyhow!("{}: empty frame", path.display()))?;

        Ok((
            FileStats {
                path: format!("{}", path.display()),
                width: wid,
                height: ht,
                stats,
                std_dev: pixels.std_dev(),
            },
            pixels,
        ))
    }
}
