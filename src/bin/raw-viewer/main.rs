mod args;
mod repl;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};
use thermal_raw::{
    cli::init_logging,
    pipeline::Rendered,
    render::write_png,
    scan::file_key,
    session::Session,
    settings::SettingsStore,
};

use args::Args;
use repl::{parse_command, Command, HELP};

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;

    let settings = SettingsStore::load(SettingsStore::resolve_path(args.settings.as_deref()));
    info!(
        "{} display setting(s) from {}",
        settings.len(),
        settings.path().display()
    );

    let mut session = Session::new(settings);
    session.view.palette = args.palette;
    session.view.scale = args.scale;

    let mut viewer = Viewer {
        session,
        preview: args.preview,
    };
    if let Some(folder) = args.folder {
        viewer.open(&folder);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line.context("could not read command")?,
            None => break,
        };
        match parse_command(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => viewer.run(cmd),
            Ok(None) => {}
            Err(msg) => eprintln!("{}", msg),
        }
    }
    Ok(())
}

struct Viewer {
    session: Session,
    preview: Option<PathBuf>,
}

impl Viewer {
    fn open(&mut self, folder: &Path) {
        match self.session.open_folder(folder) {
            Ok(0) => println!("no .raw files in {}", folder.display()),
            Ok(_) => self.show(),
            Err(e) => error!("{}", e),
        }
    }

    fn run(&mut self, cmd: Command) {
        match cmd {
            Command::Next => {
                if self.session.navigator_mut().next() {
                    self.show();
                } else {
                    println!("already at the last file");
                }
            }
            Command::Prev => {
                if self.session.navigator_mut().prev() {
                    self.show();
                } else {
                    println!("already at the first file");
                }
            }
            Command::Jump(idx) => {
                self.session.navigator_mut().jump(idx);
                self.show();
            }
            Command::Rotate => match self.session.toggle_rotation() {
                Ok(rotate) => {
                    info!("rotate_ccw = {}", rotate);
                    self.show();
                }
                Err(e) => error!("{}", e),
            },
            Command::RangeAuto => {
                self.session.view.use_manual_range = false;
                self.show();
            }
            Command::RangeManual(lo, hi) => {
                self.session.view.use_manual_range = true;
                self.session.view.manual_range = Some((lo, hi));
                self.show();
            }
            Command::Cmap(palette) => {
                self.session.view.palette = palette;
                self.show();
            }
            Command::Annotate(on) => {
                self.session.view.annotate_extrema = on;
                self.show();
            }
            Command::Stats => {
                if let Some(r) = self.render() {
                    println!("{}", r.stats);
                }
            }
            Command::Hist => {
                if let Some(r) = self.render() {
                    print!("{}", r.histogram);
                }
            }
            Command::Export(dir) => self.export(dir),
            Command::Folder(path) => self.open(&path),
            Command::List => self.list(),
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    fn render(&self) -> Option<Rendered> {
        match self.session.render_current() {
            Ok(r) => Some(r),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Print a one-line summary of the current file and refresh
    /// the preview image.
    fn show(&self) {
        let nav = self.session.navigator();
        let (idx, path) = match (nav.index(), self.session.current_file()) {
            (Some(idx), Some(path)) => (idx, path),
            _ => {
                println!("no file selected");
                return;
            }
        };
        let rotate = self
            .session
            .current_settings()
            .map(|s| s.rotate_ccw)
            .unwrap_or_default();
        println!(
            "[{}/{}] {}{}",
            idx + 1,
            nav.count(),
            file_key(path),
            if rotate { " (rotated)" } else { "" }
        );

        let rendered = match self.render() {
            Some(r) => r,
            None => return,
        };
        let (ht, wid) = rendered.frame.dim();
        println!(
            "{}x{}, {} range {:.1} .. {:.1}, palette {}",
            wid,
            ht,
            if self.session.view.use_manual_range {
                "manual"
            } else {
                "auto"
            },
            rendered.range.vmin,
            rendered.range.vmax,
            self.session.view.palette
        );
        println!("{}", rendered.stats);
        if let Some(preview) = &self.preview {
            if let Err(e) = write_png(&rendered.image, preview) {
                warn!("could not write preview {}: {}", preview.display(), e);
            }
        }
    }

    fn export(&self, dir: Option<PathBuf>) {
        let dir = match dir.or_else(|| self.session.folder().map(Path::to_path_buf)) {
            Some(dir) => dir,
            None => {
                error!("no folder open");
                return;
            }
        };
        match self.session.export_current(&dir) {
            Ok(out) => println!("saved {}", out.display()),
            Err(e) => error!("{}", e),
        }
    }

    fn list(&self) {
        let current = self.session.navigator().index();
        for (idx, path) in self.session.files().iter().enumerate() {
            let marker = if Some(idx) == current { '*' } else { ' ' };
            println!("{} {:>4} {}", marker, idx + 1, file_key(path));
        }
    }
}
