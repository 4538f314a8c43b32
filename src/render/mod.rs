//! Rasterize frames into heatmap images and write them as
//! PNG.
//!
//! The image consists of the color-mapped grid (upscaled by
//! an integer factor with nearest-neighbour sampling), a
//! vertical color bar with tick labels on its right, and
//! optionally a cross marker plus value label for each
//! extremum.
pub mod text;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};
use itertools::iproduct;
use rusttype::Scale;

use crate::{
    annotate::{Annotation, HAlign, VAlign},
    colormap::Palette,
    error::Result,
    frame::ThermalFrame,
    range::ColorRange,
};

const MARGIN: u32 = 8;
const BAR_GAP: u32 = 10;
const BAR_WIDTH: u32 = 12;
const TICK_GAP: u32 = 4;
const TICK_LEN: u32 = 3;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const MARKER: Rgb<u8> = Rgb([0, 128, 0]);

pub const DEFAULT_SCALE: u32 = 4;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub palette: Palette,
    pub range: ColorRange,
    /// Output pixels per grid cell along each axis.
    pub scale: u32,
}

impl RenderOptions {
    fn scale(&self) -> u32 {
        self.scale.max(1)
    }

    fn text_scale(&self) -> Scale {
        text::label_scale(self.scale())
    }
}

/// Pixel area covered by the color-mapped grid.
#[derive(Debug, Clone, Copy)]
struct MapArea {
    scale: u32,
    width: u32,
    height: u32,
}

impl MapArea {
    fn cell_center(&self, (row, col): (usize, usize)) -> (i64, i64) {
        (
            i64::from(MARGIN + col as u32 * self.scale + self.scale / 2),
            i64::from(MARGIN + row as u32 * self.scale + self.scale / 2),
        )
    }

    /// `[lo, hi]` clamped to the columns of the map.
    fn clamp_x(&self, lo: i64, hi: i64) -> (i64, i64) {
        let first = i64::from(MARGIN);
        let last = first + i64::from(self.width) - 1;
        (lo.max(first), hi.min(last))
    }

    fn clamp_y(&self, lo: i64, hi: i64) -> (i64, i64) {
        let first = i64::from(MARGIN);
        let last = first + i64::from(self.height) - 1;
        (lo.max(first), hi.min(last))
    }
}

/// Render `frame` with the given extrema `annotations`
/// (pass an empty slice to disable them).
pub fn render_heatmap(
    frame: &ThermalFrame,
    annotations: &[Annotation],
    options: &RenderOptions,
) -> RgbImage {
    let scale = options.scale();
    let (ht, wid) = frame.dim();
    let map = MapArea {
        scale,
        width: wid as u32 * scale,
        height: ht as u32 * scale,
    };

    let ticks = tick_labels(&options.range);
    let text_scale = options.text_scale();
    let label_w = ticks
        .iter()
        .map(|t| text::text_size(t, text_scale).0)
        .max()
        .unwrap_or(0);

    let bar_x = MARGIN + map.width + BAR_GAP;
    let width = bar_x + BAR_WIDTH + TICK_GAP + label_w + MARGIN;
    let height = map.height + 2 * MARGIN;
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let data = frame.data();
    for (row, col) in iproduct!(0..ht, 0..wid) {
        let color = Rgb(options.palette.apply(options.range.normalize(data[(row, col)])));
        let cell = Rect::at(
            (MARGIN + col as u32 * scale) as i32,
            (MARGIN + row as u32 * scale) as i32,
        )
        .of_size(scale, scale);
        draw_filled_rect_mut(&mut img, cell, color);
    }

    draw_color_bar(&mut img, bar_x, map.height, &ticks, options);

    for ann in annotations {
        draw_annotation(&mut img, ann, &map, text_scale);
    }

    img
}

/// Labels for the top, middle and bottom of the color bar.
fn tick_labels(range: &ColorRange) -> [String; 3] {
    [
        format!("{:.1}", range.vmax),
        format!("{:.1}", (range.vmin + range.vmax) / 2.),
        format!("{:.1}", range.vmin),
    ]
}

fn draw_color_bar(
    img: &mut RgbImage,
    bar_x: u32,
    bar_h: u32,
    ticks: &[String; 3],
    options: &RenderOptions,
) {
    if bar_h == 0 {
        return;
    }
    let span = bar_h.saturating_sub(1).max(1) as f32;
    let (x0, x1) = (bar_x as f32, (bar_x + BAR_WIDTH - 1) as f32);
    for y in 0..bar_h {
        let t = 1. - y as f32 / span;
        let py = (MARGIN + y) as f32;
        draw_line_segment_mut(img, (x0, py), (x1, py), Rgb(options.palette.apply(t)));
    }
    draw_hollow_rect_mut(
        img,
        Rect::at(bar_x as i32, MARGIN as i32).of_size(BAR_WIDTH, bar_h),
        INK,
    );

    let text_scale = options.text_scale();
    let tick_ys = [0, (bar_h - 1) / 2, bar_h - 1];
    for (label, &dy) in ticks.iter().zip(tick_ys.iter()) {
        let y = MARGIN + dy;
        let tick_x = (bar_x + BAR_WIDTH) as f32;
        draw_line_segment_mut(
            img,
            (tick_x, y as f32),
            (tick_x + (TICK_LEN - 1) as f32, y as f32),
            INK,
        );
        let (_, th) = text::text_size(label, text_scale);
        text::draw_text(
            img,
            label,
            i64::from(bar_x + BAR_WIDTH + TICK_GAP),
            i64::from(y) - i64::from(th / 2),
            INK,
            text_scale,
        );
    }
}

/// A cross on the extremum, clipped to the map, and its value
/// label at the anchor chosen by the placement rules.
fn draw_annotation(img: &mut RgbImage, ann: &Annotation, map: &MapArea, text_scale: Scale) {
    let (mx, my) = map.cell_center(ann.marker);
    let arm = i64::from(2 * map.scale + 1);
    let thick = i64::from((map.scale / 2).max(1));
    let off = thick / 2;

    let (x0, x1) = map.clamp_x(mx - arm, mx + arm);
    let (y0, y1) = map.clamp_y(my - off, my - off + thick - 1);
    fill_span(img, (x0, y0), (x1, y1), MARKER);
    let (x0, x1) = map.clamp_x(mx - off, mx - off + thick - 1);
    let (y0, y1) = map.clamp_y(my - arm, my + arm);
    fill_span(img, (x0, y0), (x1, y1), MARKER);

    let label = ann.label();
    let (tw, th) = text::text_size(&label, text_scale);
    let (ax, ay) = map.cell_center(ann.anchor);
    let x = match ann.align.h {
        HAlign::Left => ax,
        HAlign::Center => ax - i64::from(tw / 2),
        HAlign::Right => ax - i64::from(tw),
    };
    let y = match ann.align.v {
        VAlign::Top => ay,
        VAlign::Bottom => ay - i64::from(th),
    };
    text::draw_text(img, &label, x, y, MARKER, text_scale);
}

/// Fill the inclusive pixel box `from..=to`; empty boxes are
/// skipped.
fn fill_span(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    if to.0 < from.0 || to.1 < from.1 {
        return;
    }
    let rect = Rect::at(from.0 as i32, from.1 as i32)
        .of_size((to.0 - from.0 + 1) as u32, (to.1 - from.1 + 1) as u32);
    draw_filled_rect_mut(img, rect, color);
}

/// Encode `img` as an 8-bit RGB PNG into `wtr`.
pub fn write_png_to<W: Write>(img: &RgbImage, wtr: W) -> Result<()> {
    let mut encoder = png::Encoder::new(wtr, img.width(), img.height());
    encoder.set_color(png::ColorType::RGB);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(img.as_raw())?;
    Ok(())
}

pub fn write_png<P: AsRef<Path>>(img: &RgbImage, path: P) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_png_to(img, file)
}

/// `<stem>_heatmap.png` for a raw capture path.
pub fn export_name(raw_path: &Path) -> String {
    let stem = raw_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".into());
    format!("{}_heatmap.png", stem)
}

pub fn export_path(raw_path: &Path, out_dir: &Path) -> PathBuf {
    out_dir.join(export_name(raw_path))
}
