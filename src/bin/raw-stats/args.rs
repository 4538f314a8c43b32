use anyhow::Result;
use std::path::PathBuf;
use thermal_raw::{arg, args_parser, opt};

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub rotate: bool,
    pub pretty: bool,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("raw-stats")
            .about("Compute temperature stats from raw captures.")
            .arg(
                opt!("rotate")
                    .short("r")
                    .takes_value(false)
                    .help("Rotate every frame 90° counter-clockwise first"),
            )
            .arg(
                opt!("pretty")
                    .takes_value(false)
                    .help("Pretty-print the json output"),
            )
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

        Ok(Args {
            paths,
            rotate: matches.is_present("rotate"),
            pretty: matches.is_present("pretty"),
        })
    }
}
