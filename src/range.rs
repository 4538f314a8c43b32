//! Resolve the value range mapped onto the color scale.
use serde_derive::*;

use crate::{
    frame::ThermalFrame,
    stats::{percentiles, Extrema},
};

/// Percentiles used for the automatic range. Clipping the
/// tails keeps a few hot or cold pixels from washing out the
/// rest of the image.
pub const AUTO_PERCENTILES: (f64, f64) = (1., 99.);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum RangeMode {
    Auto,
    Manual { vmin: f32, vmax: f32 },
}

impl Default for RangeMode {
    fn default() -> Self {
        RangeMode::Auto
    }
}

/// `(vmin, vmax)` with `vmin <= vmax`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub vmin: f32,
    pub vmax: f32,
}

impl ColorRange {
    /// `None` only for an empty frame.
    pub fn resolve(frame: &ThermalFrame, mode: RangeMode) -> Option<Self> {
        match mode {
            RangeMode::Auto => Self::auto(frame),
            RangeMode::Manual { vmin, vmax } => {
                let Extrema { min, max, .. } = Extrema::of(frame)?;
                let clamp = |v: f32| v.max(min).min(max);
                let (vmin, vmax) = (clamp(vmin), clamp(vmax));
                Some(if vmin <= vmax {
                    ColorRange { vmin, vmax }
                } else {
                    ColorRange {
                        vmin: vmax,
                        vmax: vmin,
                    }
                })
            }
        }
    }

    /// 1st and 99th percentile of the frame.
    pub fn auto(frame: &ThermalFrame) -> Option<Self> {
        let values: Vec<f32> = frame.values().collect();
        let (lo, hi) = AUTO_PERCENTILES;
        let bounds = percentiles(&values, &[lo, hi])?;
        Some(ColorRange {
            vmin: bounds[0],
            vmax: bounds[1],
        })
    }

    /// These bounds as a manual range; the automatic range
    /// seeds manual mode this way.
    pub fn as_manual(&self) -> RangeMode {
        RangeMode::Manual {
            vmin: self.vmin,
            vmax: self.vmax,
        }
    }

    pub fn width(&self) -> f32 {
        self.vmax - self.vmin
    }

    /// Map `val` into `[0, 1]`. A zero-width range maps
    /// everything to `0`.
    pub fn normalize(&self, val: f32) -> f32 {
        let width = self.width();
        if width > 0. {
            ((val - self.vmin) / width).max(0.).min(1.)
        } else {
            0.
        }
    }
}
