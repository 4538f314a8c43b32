use anyhow::Result;
use clap::value_t_or_exit;
use std::path::PathBuf;
use thermal_raw::{arg, args_parser, colormap::Palette, opt};

pub struct Args {
    pub folder: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub preview: Option<PathBuf>,
    pub palette: Palette,
    pub scale: u32,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("raw-viewer")
            .about("Browse a folder of raw thermal captures interactively.")
            .arg(
                opt!("settings")
                    .short("s")
                    .help("Settings file (default: $THERMAL_RAW_SETTINGS or ./thermal_settings.json)"),
            )
            .arg(
                opt!("preview")
                    .short("p")
                    .help("PNG path rewritten with the heatmap of the current file"),
            )
            .arg(
                opt!("cmap")
                    .short("c")
                    .help("Initial palette: inferno, gray, magma, jet or coolwarm"),
            )
            .arg(opt!("scale").help("Pixels per sample in the heatmap.  Default is 4"))
            .arg(arg!("folder").help("Folder with .raw captures"))
            .get_matches();

        let folder = matches.value_of("folder").map(PathBuf::from);
        let settings = matches.value_of("settings").map(PathBuf::from);
        let preview = matches.value_of("preview").map(PathBuf::from);
        let palette = matches
            .is_present("cmap")
            .then(|| value_t_or_exit!(matches.value_of("cmap"), Palette))
            .unwrap_or_default();
        let scale = matches
            .is_present("scale")
            .then(|| value_t_or_exit!(matches.value_of("scale"), u32))
            .unwrap_or(thermal_raw::render::DEFAULT_SCALE);

        Ok(Args {
            folder,
            settings,
            preview,
            palette,
            scale,
        })
    }
}
