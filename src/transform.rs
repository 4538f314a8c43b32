//! Orientation transforms applied before display.
use ndarray::Array2;

use crate::frame::ThermalFrame;

/// Rotate 90° counter-clockwise.
///
/// A `(rows, cols)` frame becomes `(cols, rows)` with
/// `out[i][j] = in[j][cols - 1 - i]`: the left column of the
/// input ends up as the bottom row.
pub fn rotate_ccw(frame: &ThermalFrame) -> ThermalFrame {
    let data = frame.data();
    let (ht, wid) = data.dim();
    ThermalFrame::from_array(Array2::from_shape_fn((wid, ht), |(row, col)| {
        data[(col, wid - 1 - row)]
    }))
}

pub fn apply_transformations(frame: ThermalFrame, rotate: bool) -> ThermalFrame {
    if rotate {
        rotate_ccw(&frame)
    } else {
        frame
    }
}
