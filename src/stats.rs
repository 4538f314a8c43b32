//! Per-frame statistics: extrema, mean, center value,
//! percentiles and the histogram panel. Also a mergeable
//! [`Stats`] accumulator for summaries across many files.
use std::{fmt, ops::AddAssign};

use serde_derive::*;

use crate::frame::ThermalFrame;

/// `(row, col)` within a frame.
pub type Position = (usize, usize);

/// Maximum and minimum with the position of their first
/// occurrence in row-major scan order.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub max: f32,
    pub min: f32,
    pub max_pos: Position,
    pub min_pos: Position,
}

impl Extrema {
    /// `None` only for an empty frame.
    pub fn of(frame: &ThermalFrame) -> Option<Self> {
        let mut iter = frame.data().indexed_iter();
        let (first_pos, &first) = iter.next()?;
        let mut ext = Extrema {
            max: first,
            min: first,
            max_pos: first_pos,
            min_pos: first_pos,
        };
        // strict comparisons keep the first occurrence
        for (pos, &val) in iter {
            if val > ext.max {
                ext.max = val;
                ext.max_pos = pos;
            }
            if val < ext.min {
                ext.min = val;
                ext.min_pos = pos;
            }
        }
        Some(ext)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    #[serde(flatten)]
    pub extrema: Extrema,
    pub mean: f32,
    /// Value at `(rows / 2, cols / 2)`.
    pub center: f32,
}

impl FrameStats {
    pub fn of(frame: &ThermalFrame) -> Option<Self> {
        let extrema = Extrema::of(frame)?;
        let (ht, wid) = frame.dim();
        let sum: f64 = frame.values().map(f64::from).sum();
        let center = frame.get(ht / 2, wid / 2)?;
        Some(FrameStats {
            extrema,
            mean: (sum / frame.len() as f64) as f32,
            center,
        })
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Extrema {
            max,
            min,
            max_pos,
            min_pos,
        } = self.extrema;
        writeln!(f, "max:    {:.2} C at (x={}, y={})", max, max_pos.1, max_pos.0)?;
        writeln!(f, "min:    {:.2} C at (x={}, y={})", min, min_pos.1, min_pos.0)?;
        writeln!(f, "mean:   {:.2} C", self.mean)?;
        write!(f, "center: {:.2} C", self.center)
    }
}

/// The `qs`-th percentiles (each 0..=100) of `values`,
/// interpolating linearly between the two closest ranks.
///
/// Returns `None` for an empty slice. Values are expected to
/// be finite.
pub fn percentiles(values: &[f32], qs: &[f64]) -> Option<Vec<f32>> {
    let mut sorted: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    qs.iter()
        .map(|&q| percentile_of_sorted(&sorted, q).map(|v| v as f32))
        .collect()
}

fn percentile_of_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (q.max(0.).min(100.) / 100.) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Equal-width histogram over `[min, max]` of a frame.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f32,
    pub max: f32,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub const DEFAULT_BINS: usize = 50;

    /// The maximum value lands in the last bin. A frame with
    /// a single distinct value puts everything in bin 0.
    pub fn compute(frame: &ThermalFrame, bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let Extrema { min, max, .. } = Extrema::of(frame)?;
        let mut counts = vec![0; bins];
        let width = f64::from(max) - f64::from(min);
        for val in frame.values() {
            let idx = if width > 0. {
                (((f64::from(val) - f64::from(min)) / width) * bins as f64) as usize
            } else {
                0
            };
            counts[idx.min(bins - 1)] += 1;
        }
        Some(Histogram { min, max, counts })
    }

    pub fn bin_width(&self) -> f32 {
        (self.max - self.min) / self.counts.len() as f32
    }

    /// `[lo, hi)` edges of bin `idx`.
    pub fn bin_edges(&self, idx: usize) -> (f32, f32) {
        let w = self.bin_width();
        (self.min + w * idx as f32, self.min + w * (idx + 1) as f32)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for Histogram {
    /// One line per bin with a bar scaled to the fullest bin.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const BAR: usize = 40;
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        for (idx, &count) in self.counts.iter().enumerate() {
            let (lo, hi) = self.bin_edges(idx);
            let len = (count * BAR + peak - 1) / peak;
            writeln!(
                f,
                "{:>8.2} .. {:>8.2} | {:>6} {}",
                lo,
                hi,
                count,
                "#".repeat(len)
            )?;
        }
        Ok(())
    }
}

/// Running summary of a stream of values; two summaries
/// merge with `+=`.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Stats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    sum: f64,
    sum_squares: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.,
            sum_squares: 0.,
        }
    }
}

impl Stats {
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var = self.sum_squares / self.count as f64 - mean * mean;
        Some(var.max(0.).sqrt())
    }
}

impl AddAssign<f64> for Stats {
    fn add_assign(&mut self, val: f64) {
        self.count += 1;
        self.min = self.min.min(val);
        self.max = self.max.max(val);
        self.sum += val;
        self.sum_squares += val * val;
    }
}

impl AddAssign<&Stats> for Stats {
    fn add_assign(&mut self, other: &Stats) {
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.sum_squares += other.sum_squares;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Result,
        frame::{tests::frame_bytes, EXPECTED_SIZE, HEIGHT, WIDTH},
        transform::rotate_ccw,
    };

    #[test]
    fn zero_frame() -> Result<()> {
        let frame = ThermalFrame::decode(&vec![0; EXPECTED_SIZE])?;
        let stats = FrameStats::of(&frame).unwrap();
        assert_eq!(stats.extrema.max, 0.0);
        assert_eq!(stats.extrema.min, 0.0);
        assert_eq!(stats.extrema.max_pos, (0, 0));
        assert_eq!(stats.extrema.min_pos, (0, 0));
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.center, 0.0);
        Ok(())
    }

    #[test]
    fn extrema_positions_match_values() -> Result<()> {
        let frame = ThermalFrame::decode(&frame_bytes(|r, c| {
            ((r * 7 + c * 13) % 97) as f32 - 40.
        }))?;
        for frame in [frame.clone(), rotate_ccw(&frame)].iter() {
            let ext = Extrema::of(frame).unwrap();
            assert_eq!(frame.get(ext.max_pos.0, ext.max_pos.1), Some(ext.max));
            assert_eq!(frame.get(ext.min_pos.0, ext.min_pos.1), Some(ext.min));
            assert_eq!(ext.max, 56.);
            assert_eq!(ext.min, -40.);
        }
        Ok(())
    }

    #[test]
    fn ties_resolve_to_first_occurrence() -> Result<()> {
        let frame = ThermalFrame::decode(&frame_bytes(|r, c| match (r, c) {
            (5, 9) | (5, 100) | (80, 3) => 99.,
            (2, 150) | (119, 0) => -5.,
            _ => 10.,
        }))?;
        let ext = Extrema::of(&frame).unwrap();
        assert_eq!(ext.max_pos, (5, 9));
        assert_eq!(ext.min_pos, (2, 150));
        Ok(())
    }

    #[test]
    fn center_follows_rotation() -> Result<()> {
        let frame = ThermalFrame::decode(&frame_bytes(|r, c| (r * WIDTH + c) as f32))?;
        let stats = FrameStats::of(&frame).unwrap();
        assert_eq!(stats.center, frame.get(HEIGHT / 2, WIDTH / 2).unwrap());

        let rotated = rotate_ccw(&frame);
        let stats = FrameStats::of(&rotated).unwrap();
        assert_eq!(stats.center, rotated.get(WIDTH / 2, HEIGHT / 2).unwrap());
        Ok(())
    }

    #[test]
    fn mean_of_ramp() -> Result<()> {
        let frame = ThermalFrame::decode(&frame_bytes(|_, c| c as f32))?;
        let stats = FrameStats::of(&frame).unwrap();
        assert!((stats.mean - 79.5).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        let values: Vec<f32> = vec![5., 1., 4., 2., 3.];
        let qs = percentiles(&values, &[0., 50., 100., 10.]).unwrap();
        assert_eq!(&qs[..3], &[1., 3., 5.]);
        // rank = 0.1 * 4 = 0.4
        assert!((qs[3] - 1.4).abs() < 1e-6);
        assert_eq!(percentiles(&[], &[50.]), None);
        assert_eq!(percentiles(&[7.], &[1., 99.]), Some(vec![7., 7.]));
    }

    #[test]
    fn percentiles_of_shuffled_ramp() {
        // 0.0, 0.1, .., 99.9 in scrambled order
        let values: Vec<f32> = (0..1000).map(|v| ((v * 37) % 1000) as f32 / 10.).collect();
        let both = percentiles(&values, &[1., 99.]).unwrap();
        // ranks 9.99 and 989.01
        assert!((both[0] - 0.999).abs() < 1e-4);
        assert!((both[1] - 98.901).abs() < 1e-3);
    }

    #[test]
    fn histogram_counts_every_sample() -> Result<()> {
        let frame = ThermalFrame::decode(&frame_bytes(|_, c| c as f32))?;
        let hist = Histogram::compute(&frame, Histogram::DEFAULT_BINS).unwrap();
        assert_eq!(hist.counts.len(), 50);
        assert_eq!(hist.total(), HEIGHT * WIDTH);
        assert_eq!(hist.min, 0.);
        assert_eq!(hist.max, 159.);
        // the maximum falls into the last bin
        assert!(hist.counts[49] >= HEIGHT);
        assert!(hist.to_string().lines().count() == 50);
        Ok(())
    }

    #[test]
    fn histogram_of_flat_frame() -> Result<()> {
        let frame = ThermalFrame::decode(&frame_bytes(|_, _| 25.))?;
        let hist = Histogram::compute(&frame, 10).unwrap();
        assert_eq!(hist.counts[0], HEIGHT * WIDTH);
        assert_eq!(hist.counts[1..].iter().sum::<usize>(), 0);
        Ok(())
    }

    #[test]
    fn stats_merge() {
        let mut a = Stats::default();
        let mut b = Stats::default();
        for v in [1., 2., 3.].iter() {
            a += *v;
        }
        for v in [4., 5.].iter() {
            b += *v;
        }
        a += &b;
        assert_eq!(a.count, 5);
        assert_eq!(a.min, 1.);
        assert_eq!(a.max, 5.);
        assert_eq!(a.mean(), Some(3.));
        assert!((a.std_dev().unwrap() - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(Stats::default().mean(), None);
    }
}
