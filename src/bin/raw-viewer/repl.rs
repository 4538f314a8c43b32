use std::path::PathBuf;

use lazy_static::lazy_static;
use regex::Regex;
use thermal_raw::colormap::Palette;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Prev,
    Jump(usize),
    Rotate,
    RangeAuto,
    RangeManual(f32, f32),
    Cmap(Palette),
    Annotate(bool),
    Stats,
    Hist,
    Export(Option<PathBuf>),
    Folder(PathBuf),
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  next | n              select the next file
  prev | p              select the previous file
  jump N                select file N (1-based)
  rotate | r            toggle 90° counter-clockwise rotation (saved)
  range auto            color range from the 1st/99th percentiles
  range LO HI           manual color range, clamped to the frame
  cmap NAME             inferno, gray, magma, jet, coolwarm
  annotate on|off       label the hottest and coldest points
  stats                 print statistics of the current file
  hist                  print a histogram of the current file
  export [DIR]          write <stem>_heatmap.png (default: the folder)
  folder PATH           open another folder
  list                  list files
  help                  this text
  quit | q              exit";

lazy_static! {
    static ref JUMP: Regex = Regex::new(r"^jump\s+(\d+)$").unwrap();
    static ref RANGE: Regex = Regex::new(r"^range\s+(\S+)\s+(\S+)$").unwrap();
    static ref CMAP: Regex = Regex::new(r"^cmap\s+(\S+)$").unwrap();
    static ref ANNOTATE: Regex = Regex::new(r"^annotate\s+(on|off)$").unwrap();
    static ref EXPORT: Regex = Regex::new(r"^export(?:\s+(.+))?$").unwrap();
    static ref FOLDER: Regex = Regex::new(r"^folder\s+(.+)$").unwrap();
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let cmd = match line {
        "" => return Ok(None),
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "rotate" | "r" => Command::Rotate,
        "range auto" => Command::RangeAuto,
        "stats" => Command::Stats,
        "hist" => Command::Hist,
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return parse_with_args(line).map(Some),
    };
    Ok(Some(cmd))
}

fn parse_with_args(line: &str) -> Result<Command, String> {
    if let Some(caps) = JUMP.captures(line) {
        let idx = caps[1]
            .parse()
            .map_err(|e| format!("bad index {}: {}", &caps[1], e))?;
        return Ok(Command::Jump(idx));
    }
    if let Some(caps) = RANGE.captures(line) {
        let lo = parse_bound(&caps[1])?;
        let hi = parse_bound(&caps[2])?;
        return Ok(Command::RangeManual(lo, hi));
    }
    if let Some(caps) = CMAP.captures(line) {
        return caps[1].parse().map(Command::Cmap);
    }
    if let Some(caps) = ANNOTATE.captures(line) {
        return Ok(Command::Annotate(&caps[1] == "on"));
    }
    if let Some(caps) = EXPORT.captures(line) {
        return Ok(Command::Export(caps.get(1).map(|m| m.as_str().into())));
    }
    if let Some(caps) = FOLDER.captures(line) {
        return Ok(Command::Folder(caps[1].into()));
    }
    Err(format!("unknown command: {} (try `help`)", line))
}

fn parse_bound(s: &str) -> Result<f32, String> {
    let val: f32 = s.parse().map_err(|_| format!("not a number: {}", s))?;
    if val.is_finite() {
        Ok(val)
    } else {
        Err(format!("not a finite number: {}", s))
    }
}
