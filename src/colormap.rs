//! The fixed set of palettes offered for heatmaps.
use std::{fmt, str::FromStr};

use serde_derive::*;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Inferno,
    Gray,
    Magma,
    Jet,
    Coolwarm,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Inferno
    }
}

/// Color stops `(position, rgb)` with increasing positions
/// from `0.0` to `1.0`.
type Stops = &'static [(f32, [u8; 3])];

const INFERNO: Stops = &[
    (0.000, [0, 0, 4]),
    (0.125, [31, 12, 72]),
    (0.250, [85, 15, 109]),
    (0.375, [136, 34, 106]),
    (0.500, [186, 54, 85]),
    (0.625, [227, 89, 51]),
    (0.750, [249, 140, 10]),
    (0.875, [249, 201, 50]),
    (1.000, [252, 255, 164]),
];

const MAGMA: Stops = &[
    (0.000, [0, 0, 4]),
    (0.125, [28, 16, 68]),
    (0.250, [79, 18, 123]),
    (0.375, [129, 37, 129]),
    (0.500, [181, 54, 122]),
    (0.625, [229, 80, 100]),
    (0.750, [251, 135, 97]),
    (0.875, [254, 194, 135]),
    (1.000, [252, 253, 191]),
];

const GRAY: Stops = &[(0., [0, 0, 0]), (1., [255, 255, 255])];

const JET: Stops = &[
    (0.000, [0, 0, 128]),
    (0.110, [0, 0, 255]),
    (0.125, [0, 0, 255]),
    (0.340, [0, 219, 255]),
    (0.350, [0, 229, 247]),
    (0.375, [20, 255, 226]),
    (0.640, [246, 255, 0]),
    (0.660, [255, 234, 0]),
    (0.890, [255, 18, 0]),
    (0.910, [232, 0, 0]),
    (1.000, [128, 0, 0]),
];

const COOLWARM: Stops = &[
    (0.000, [59, 76, 192]),
    (0.125, [98, 130, 234]),
    (0.250, [141, 176, 254]),
    (0.375, [184, 208, 249]),
    (0.500, [221, 221, 221]),
    (0.625, [245, 196, 173]),
    (0.750, [244, 154, 123]),
    (0.875, [222, 96, 77]),
    (1.000, [180, 4, 38]),
];

impl Palette {
    /// In the order they are offered to the user.
    pub const ALL: [Palette; 5] = [
        Palette::Inferno,
        Palette::Gray,
        Palette::Magma,
        Palette::Jet,
        Palette::Coolwarm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Palette::Inferno => "inferno",
            Palette::Gray => "gray",
            Palette::Magma => "magma",
            Palette::Jet => "jet",
            Palette::Coolwarm => "coolwarm",
        }
    }

    fn stops(&self) -> Stops {
        match self {
            Palette::Inferno => INFERNO,
            Palette::Gray => GRAY,
            Palette::Magma => MAGMA,
            Palette::Jet => JET,
            Palette::Coolwarm => COOLWARM,
        }
    }

    /// Color for a normalized value; `t` is clamped to
    /// `[0, 1]` and NaN maps to the low end.
    pub fn apply(&self, t: f32) -> [u8; 3] {
        let t = if t.is_nan() { 0. } else { t.max(0.).min(1.) };
        let stops = self.stops();
        let idx = stops
            .iter()
            .position(|&(pos, _)| pos >= t)
            .unwrap_or(stops.len() - 1);
        if idx == 0 {
            return stops[0].1;
        }

        let (p0, c0) = stops[idx - 1];
        let (p1, c1) = stops[idx];
        let frac = (t - p0) / (p1 - p0);
        let mut out = [0u8; 3];
        for ch in 0..3 {
            let v = f32::from(c0[ch]) + (f32::from(c1[ch]) - f32::from(c0[ch])) * frac;
            out[ch] = v.round().max(0.).min(255.) as u8;
        }
        out
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Palette::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Palette::ALL.iter().map(|p| p.name()).collect();
                format!("unknown palette `{}` (expected one of {})", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        assert_eq!(Palette::Gray.apply(0.), [0, 0, 0]);
        assert_eq!(Palette::Gray.apply(1.), [255, 255, 255]);
        assert_eq!(Palette::Inferno.apply(0.), [0, 0, 4]);
        assert_eq!(Palette::Inferno.apply(1.), [252, 255, 164]);
        assert_eq!(Palette::Jet.apply(0.), [0, 0, 128]);
        assert_eq!(Palette::Coolwarm.apply(0.5), [221, 221, 221]);
    }

    #[test]
    fn out_of_range_is_clamped() {
        for p in Palette::ALL.iter() {
            assert_eq!(p.apply(-3.), p.apply(0.));
            assert_eq!(p.apply(7.), p.apply(1.));
            assert_eq!(p.apply(f32::NAN), p.apply(0.));
        }
    }

    #[test]
    fn gray_is_linear() {
        assert_eq!(Palette::Gray.apply(0.5), [128, 128, 128]);
    }

    #[test]
    fn inferno_brightens_monotonically() {
        let luma = |c: [u8; 3]| c.iter().map(|&v| u32::from(v)).sum::<u32>();
        let mut prev = 0;
        for i in 0..=8 {
            let cur = luma(Palette::Inferno.apply(i as f32 / 8.));
            assert!(cur >= prev);
            prev = cur;
        }
    }

    #[test]
    fn names_round_trip() {
        for p in Palette::ALL.iter() {
            assert_eq!(p.to_string().parse::<Palette>(), Ok(*p));
        }
        assert_eq!("Jet".parse::<Palette>(), Ok(Palette::Jet));
        assert!("viridis".parse::<Palette>().is_err());
        assert_eq!(Palette::default(), Palette::Inferno);
    }
}
