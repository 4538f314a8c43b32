mod args;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use thermal_raw::{cli::init_logging, scan::scan_folder_for};

use args::Args;

const MJPEG_EXTENSIONS: [&str; 2] = ["mjpeg", "mjpg"];

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;

    let files = scan_folder_for(&args.folder, &MJPEG_EXTENSIONS)
        .with_context(|| format!("could not scan {}", args.folder.display()))?;
    if files.is_empty() {
        info!("no .mjpeg recordings in {}", args.folder.display());
        return Ok(());
    }
    info!("found {} recording(s), converting", files.len());

    let converter = Converter {
        ffmpeg: args.ffmpeg,
        preset: args.preset,
        crf: args.crf,
    };
    let summary = converter.convert_all(&files)?;
    eprintln!(
        "Converted {}/{} recordings ({} skipped, {} failed)",
        summary.converted,
        files.len(),
        summary.skipped,
        summary.failed
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    converted: usize,
    skipped: usize,
    failed: usize,
}

struct Converter {
    ffmpeg: String,
    preset: String,
    crf: u32,
}

impl Converter {
    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-i")
            .arg(input)
            .args(&["-c:v", "libx264", "-preset", self.preset.as_str()])
            .arg("-crf")
            .arg(self.crf.to_string())
            .args(&["-pix_fmt", "yuv420p"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    /// Convert each recording whose `.mp4` does not exist yet.
    /// A missing ffmpeg aborts; a failed conversion is logged
    /// and counted.
    fn convert_all(&self, files: &[PathBuf]) -> Result<Summary> {
        let mut summary = Summary::default();
        for input in files {
            let output = input.with_extension("mp4");
            if output.exists() {
                info!("skipping {} (exists)", output.display());
                summary.skipped += 1;
                continue;
            }

            info!("converting {} -> {}", input.display(), output.display());
            match self.command(input, &output).status() {
                Ok(status) if status.success() => summary.converted += 1,
                Ok(status) => {
                    warn!("ffmpeg failed on {} ({})", input.display(), status);
                    summary.failed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    bail!("{} not found; install ffmpeg or pass --ffmpeg", self.ffmpeg)
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("could not run {}", self.ffmpeg))
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn converter(ffmpeg: &str) -> Converter {
        Converter {
            ffmpeg: ffmpeg.into(),
            preset: "fast".into(),
            crf: 23,
        }
    }

    fn recordings() -> Result<(TempDir, Vec<PathBuf>)> {
        let dir = TempDir::new()?;
        for name in ["a.mjpeg", "b.MJPG", "c.mjpeg"].iter() {
            fs::write(dir.path().join(name), b"")?;
        }
        fs::write(dir.path().join("c.mp4"), b"")?;
        let files = scan_folder_for(dir.path(), &MJPEG_EXTENSIONS)?;
        Ok((dir, files))
    }

    #[test]
    fn command_line() {
        let cmd = converter("ffmpeg").command(Path::new("in.mjpeg"), Path::new("in.mp4"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-i", "in.mjpeg", "-c:v", "libx264", "-preset", "fast", "-crf", "23", "-pix_fmt",
                "yuv420p", "in.mp4"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn existing_outputs_are_skipped() -> Result<()> {
        let (_dir, files) = recordings()?;
        assert_eq!(files.len(), 3);
        let summary = converter("true").convert_all(&files)?;
        assert_eq!(
            summary,
            Summary {
                converted: 2,
                skipped: 1,
                failed: 0
            }
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn failures_are_counted() -> Result<()> {
        let (_dir, files) = recordings()?;
        let summary = converter("false").convert_all(&files)?;
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.converted, 0);
        Ok(())
    }

    #[test]
    fn missing_ffmpeg_aborts() -> Result<()> {
        let (_dir, files) = recordings()?;
        let err = converter("no-such-ffmpeg-binary").convert_all(&files).unwrap_err();
        assert!(err.to_string().contains("not found"));
        Ok(())
    }
}
