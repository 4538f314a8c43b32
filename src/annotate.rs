//! Placement of the extrema labels on the heatmap.
//!
//! Each axis is decided independently: labels go below
//! markers in the top half and above them in the bottom
//! half, and are pushed inward near the left and right edges
//! so the text stays inside the image.
//!
//! The max and min labels are placed without regard to each
//! other and may overlap when the extrema are close.
use serde_derive::*;

use crate::stats::{Extrema, Position};

/// Distance, in grid cells, between a marker and its label.
pub const LABEL_OFFSET: usize = 5;

/// Columns from either side within which labels are pushed
/// inward.
pub const EDGE_MARGIN: usize = 10;

/// Which edge of the text box sits on the anchor
/// horizontally.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Which edge of the text box sits on the anchor vertically.
/// `Top` hangs the text below the anchor, `Bottom` stands it
/// above.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Bottom,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub h: HAlign,
    pub v: VAlign,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Max,
    Min,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub kind: ExtremumKind,
    pub value: f32,
    /// The extremum itself.
    pub marker: Position,
    /// Where the label is attached.
    pub anchor: Position,
    pub align: Alignment,
}

impl Annotation {
    /// Text drawn at the anchor.
    pub fn label(&self) -> String {
        format!("{:.1}C", self.value)
    }
}

/// Label row for a marker at `row` in a frame `height` rows
/// tall.
pub fn vertical_anchor(row: usize, height: usize) -> (usize, VAlign) {
    if row <= height / 2 {
        (
            (row + LABEL_OFFSET).min(height.saturating_sub(1)),
            VAlign::Top,
        )
    } else {
        (row.saturating_sub(LABEL_OFFSET), VAlign::Bottom)
    }
}

/// Label column for a marker at `col` in a frame `width`
/// columns wide.
pub fn horizontal_anchor(col: usize, width: usize) -> (usize, HAlign) {
    if col < EDGE_MARGIN {
        (col + LABEL_OFFSET, HAlign::Left)
    } else if col + EDGE_MARGIN > width {
        (col - LABEL_OFFSET, HAlign::Right)
    } else {
        (col, HAlign::Center)
    }
}

/// Place the label of one extremum in a `(rows, cols)` frame.
pub fn place(kind: ExtremumKind, value: f32, marker: Position, dims: (usize, usize)) -> Annotation {
    let (ht, wid) = dims;
    let (row, col) = marker;
    let (anchor_row, v) = vertical_anchor(row, ht);
    let (anchor_col, h) = horizontal_anchor(col, wid);
    Annotation {
        kind,
        value,
        marker,
        anchor: (anchor_row, anchor_col),
        align: Alignment { h, v },
    }
}

/// Labels for the maximum and minimum, in that order.
pub fn annotate_extrema(dims: (usize, usize), extrema: &Extrema) -> [Annotation; 2] {
    [
        place(ExtremumKind::Max, extrema.max, extrema.max_pos, dims),
        place(ExtremumKind::Min, extrema.min, extrema.min_pos, dims),
    ]
}
