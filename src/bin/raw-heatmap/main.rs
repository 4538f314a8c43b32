mod args;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use thermal_raw::{
    cli::{init_logging, output_path_for, process_paths_par, RawInput},
    pipeline::{render_frame, ViewOptions},
    render::write_png,
};

use crate::args::Args;

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;

    fs::create_dir_all(&args.output)
        .with_context(|| format!("could not create {}", args.output.display()))?;

    let view = ViewOptions {
        palette: args.palette,
        use_manual_range: args.manual_range.is_some(),
        manual_range: args.manual_range,
        annotate_extrema: args.annotate,
        scale: args.scale,
        ..ViewOptions::default()
    };

    let count = process_paths_par(args.paths.clone())
        .into_par_iter()
        .map(|try_raw| -> Result<PathBuf> {
            export_one(try_raw?, &args.output, args.rotate, &view)
        })
        .try_fold(
            || 0usize,
            |acc, res: Result<PathBuf>| -> Result<_> {
                res?;
                Ok(acc + 1)
            },
        )
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    info!("wrote {} heatmap(s) to {}", count, args.output.display());
    Ok(())
}

/// Render one decoded capture into `out_dir`.
fn export_one(raw: RawInput, out_dir: &Path, rotate: bool, view: &ViewOptions) -> Result<PathBuf> {
    let RawInput { path, frame } = raw;
    let out = output_path_for(&path, out_dir)?;
    let rendered = render_frame(frame, rotate, view)
        .with_context(|| format!("could not render {}", path.display()))?;
    write_png(&rendered.image, &out)
        .with_context(|| format!("could not write {}", out.display()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use thermal_raw::{frame::EXPECTED_SIZE, ThermalFrame};

    fn raw_input(name: &str, bytes: &[u8]) -> Result<RawInput> {
        Ok(RawInput {
            path: Path::new("/captures").join(name),
            frame: ThermalFrame::decode(bytes)?,
        })
    }

    #[test]
    fn writes_named_png() -> Result<()> {
        let out = TempDir::new()?;
        let raw = raw_input("IMG_0005.raw", &vec![0; EXPECTED_SIZE])?;
        let written = export_one(raw, out.path(), true, &ViewOptions::default())?;
        assert_eq!(written, out.path().join("IMG_0005_heatmap.png"));
        assert!(fs::read(&written)?.starts_with(b"\x89PNG"));
        Ok(())
    }

    #[test]
    fn render_error_names_the_file() -> Result<()> {
        let out = TempDir::new()?;
        let mut bytes = vec![0; EXPECTED_SIZE];
        bytes[..4].copy_from_slice(&f32::NAN.to_ne_bytes());
        let raw = raw_input("bad.raw", &bytes)?;
        let err = export_one(raw, out.path(), false, &ViewOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.raw"));
        assert!(!out.path().join("bad_heatmap.png").exists());
        Ok(())
    }
}
