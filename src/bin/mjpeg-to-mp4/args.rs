use anyhow::Result;
use clap::value_t_or_exit;
use std::path::PathBuf;
use thermal_raw::{arg, args_parser, opt};

pub struct Args {
    pub folder: PathBuf,
    pub ffmpeg: String,
    pub preset: String,
    pub crf: u32,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("mjpeg-to-mp4")
            .about("Convert the camera's .mjpeg recordings to H.264 .mp4 next to them.")
            .arg(opt!("ffmpeg").help("ffmpeg executable.  Default is ffmpeg from PATH"))
            .arg(opt!("preset").help("x264 preset.  Default is fast"))
            .arg(opt!("crf").help("x264 constant rate factor (18-28, lower is better).  Default is 23"))
            .arg(
                arg!("folder")
                    .required(true)
                    .help("Folder with .mjpeg / .mjpg recordings"),
            )
            .get_matches();

        let folder = value_t_or_exit!(matches, "folder", PathBuf);
        let ffmpeg = matches.value_of("ffmpeg").unwrap_or("ffmpeg").to_string();
        let preset = matches.value_of("preset").unwrap_or("fast").to_string();
        let crf = matches
            .is_present("crf")
            .then(|| value_t_or_exit!(matches.value_of("crf"), u32))
            .unwrap_or(23);

        Ok(Args {
            folder,
            ffmpeg,
            preset,
            crf,
        })
    }
}
