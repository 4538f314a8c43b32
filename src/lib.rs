//! Library to view fixed-format raw thermal captures.
//!
//! A capture is a headerless file of exactly 76,800 bytes:
//! 120 rows by 160 columns of 32-bit floats (temperature in
//! celsius), row-major, native byte order. This crate
//! provides:
//!
//! 1. [Decoding][frame::ThermalFrame::decode] captures with
//! strict size validation, and an optional [90°
//! counter-clockwise rotation][transform::rotate_ccw].
//!
//! 2. [Statistics][stats::FrameStats] (extrema with their
//! positions, mean, center value), a
//! [histogram][stats::Histogram], and the [color
//! range][range::ColorRange] either from the 1st/99th
//! percentiles or from manual bounds.
//!
//! 3. [Placement][annotate] of extrema labels so they stay
//! inside the image, and [rendering][render] of the heatmap
//! with a color bar to PNG.
//!
//! 4. A [session][session::Session] tying together folder
//! scanning, navigation and [per-file display
//! settings][settings::SettingsStore] persisted as JSON.
//!
//! # Usage
//!
//! ```rust
//! # fn test_compile() -> anyhow::Result<()> {
//! use thermal_raw::{pipeline::{render_file, ViewOptions}, render::write_png};
//!
//! let rendered = render_file("frame.raw".as_ref(), false, &ViewOptions::default())?;
//! println!("{}", rendered.stats);
//! write_png(&rendered.image, "frame_heatmap.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! The accompanying binaries are `raw-viewer` (interactive
//! browsing of a folder), `raw-stats` (JSON statistics),
//! `raw-heatmap` (batch PNG export) and `mjpeg-to-mp4`
//! (converting the camera's video recordings with ffmpeg).

pub mod error;
pub mod frame;
pub mod transform;
pub mod stats;
pub mod range;
pub mod annotate;
pub mod colormap;
pub mod render;
pub mod settings;
pub mod scan;
pub mod pipeline;
pub mod session;

pub mod cli;

pub use crate::error::{Error, Result};
pub use crate::frame::ThermalFrame;
