//! The per-file render pipeline: decode, orient, measure,
//! map to colors.
use std::path::Path;

use image::RgbImage;
use log::debug;
use serde_derive::*;

use crate::{
    annotate::{annotate_extrema, Annotation},
    colormap::Palette,
    error::{Error, Result},
    frame::ThermalFrame,
    range::{ColorRange, RangeMode},
    render::{render_heatmap, RenderOptions, DEFAULT_SCALE},
    stats::{FrameStats, Histogram},
    transform::apply_transformations,
};

/// Session-wide display choices. Not persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub palette: Palette,
    /// Use `manual_range` instead of the percentile range.
    pub use_manual_range: bool,
    /// `(vmin, vmax)`; seeded from the automatic range when
    /// unset.
    pub manual_range: Option<(f32, f32)>,
    pub annotate_extrema: bool,
    pub scale: u32,
    pub histogram_bins: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            palette: Palette::default(),
            use_manual_range: false,
            manual_range: None,
            annotate_extrema: false,
            scale: DEFAULT_SCALE,
            histogram_bins: Histogram::DEFAULT_BINS,
        }
    }
}

/// Everything produced by one pass over one file.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub frame: ThermalFrame,
    pub stats: FrameStats,
    pub histogram: Histogram,
    /// The range requested by the options, before clamping.
    pub mode: RangeMode,
    pub range: ColorRange,
    /// Percentile range of the frame, offered as the default
    /// manual bounds.
    pub auto_range: ColorRange,
    pub annotations: Vec<Annotation>,
    pub image: RgbImage,
}

/// Run the full pipeline on an already decoded frame.
pub fn render_frame(frame: ThermalFrame, rotate_ccw: bool, view: &ViewOptions) -> Result<Rendered> {
    frame.ensure_finite()?;
    let frame = apply_transformations(frame, rotate_ccw);

    let stats = FrameStats::of(&frame).ok_or(Error::EmptyFrame)?;
    let histogram = Histogram::compute(&frame, view.histogram_bins).ok_or(Error::EmptyFrame)?;
    let auto_range = ColorRange::auto(&frame).ok_or(Error::EmptyFrame)?;

    let mode = match (view.use_manual_range, view.manual_range) {
        (false, _) => RangeMode::Auto,
        (true, Some((vmin, vmax))) => RangeMode::Manual { vmin, vmax },
        (true, None) => auto_range.as_manual(),
    };
    let range = match mode {
        RangeMode::Auto => auto_range,
        manual => ColorRange::resolve(&frame, manual).ok_or(Error::EmptyFrame)?,
    };

    let annotations = if view.annotate_extrema {
        annotate_extrema(frame.dim(), &stats.extrema).to_vec()
    } else {
        vec![]
    };

    let image = render_heatmap(
        &frame,
        &annotations,
        &RenderOptions {
            palette: view.palette,
            range,
            scale: view.scale,
        },
    );

    Ok(Rendered {
        frame,
        stats,
        histogram,
        mode,
        range,
        auto_range,
        annotations,
        image,
    })
}

/// Read, decode and render the capture at `path`.
pub fn render_file(path: &Path, rotate_ccw: bool, view: &ViewOptions) -> Result<Rendered> {
    debug!(
        "rendering {} (rotate_ccw={}, palette={})",
        path.display(),
        rotate_ccw,
        view.palette
    );
    let frame = ThermalFrame::from_path(path)?;
    render_frame(frame, rotate_ccw, view)
}
