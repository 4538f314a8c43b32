use anyhow::{bail, Result};
use clap::value_t_or_exit;
use std::path::PathBuf;
use thermal_raw::{arg, args_parser, colormap::Palette, opt, render::DEFAULT_SCALE};

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub output: PathBuf,
    pub palette: Palette,
    pub rotate: bool,
    pub manual_range: Option<(f32, f32)>,
    pub annotate: bool,
    pub scale: u32,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("raw-heatmap")
            .setting(clap::AppSettings::AllowLeadingHyphen)
            .about("Render raw captures to <stem>_heatmap.png files.")
            .arg(
                opt!("output")
                    .short("o")
                    .required(true)
                    .help("Output folder"),
            )
            .arg(
                opt!("cmap")
                    .short("c")
                    .help("Palette: inferno, gray, magma, jet or coolwarm.  Default is inferno"),
            )
            .arg(
                opt!("rotate")
                    .short("r")
                    .takes_value(false)
                    .help("Rotate every frame 90° counter-clockwise"),
            )
            .arg(
                opt!("vmin")
                    .requires("vmax")
                    .help("Manual lower bound of the color range (clamped to each frame)"),
            )
            .arg(
                opt!("vmax")
                    .requires("vmin")
                    .help("Manual upper bound of the color range (clamped to each frame)"),
            )
            .arg(
                opt!("annotate")
                    .short("a")
                    .takes_value(false)
                    .help("Label the hottest and coldest points"),
            )
            .arg(opt!("scale").help("Pixels per sample.  Default is 4"))
            .arg(
                arg!("paths")
                    .required(true)
                    .multiple(true)
                    .help("Raw files or folders of raw files"),
            )
            .get_matches();

        let paths = matches
            .values_of("paths")
            .unwrap()
            .map(|f| f.into())
            .collect();
        let output = value_t_or_exit!(matches, "output", PathBuf);
        let palette = matches
            .is_present("cmap")
            .then(|| value_t_or_exit!(matches.value_of("cmap"), Palette))
            .unwrap_or_default();
        let manual_range = matches.is_present("vmin").then(|| {
            (
                value_t_or_exit!(matches.value_of("vmin"), f32),
                value_t_or_exit!(matches.value_of("vmax"), f32),
            )
        });
        if let Some((lo, hi)) = manual_range {
            if !lo.is_finite() || !hi.is_finite() {
                bail!("--vmin/--vmax must be finite numbers");
            }
        }
        let scale = matches
            .is_present("scale")
            .then(|| value_t_or_exit!(matches.value_of("scale"), u32))
            .unwrap_or(DEFAULT_SCALE);
        if scale == 0 {
            bail!("--scale must be at least 1");
        }

        Ok(Args {
            paths,
            output,
            palette,
            rotate: matches.is_present("rotate"),
            manual_range,
            annotate: matches.is_present("annotate"),
            scale,
        })
    }
}
