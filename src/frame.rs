//! Decode fixed-format raw thermal captures.
//!
//! A capture is a headerless blob of `HEIGHT * WIDTH`
//! 32-bit IEEE-754 floats in row-major order and native
//! byte order: exactly [`EXPECTED_SIZE`] bytes.
use std::{fs::read, mem::size_of, path::Path};

use byteordered::ByteOrdered;
use ndarray::Array2;

use crate::error::{Error, Result};

pub const HEIGHT: usize = 120;
pub const WIDTH: usize = 160;
pub const EXPECTED_SIZE: usize = HEIGHT * WIDTH * size_of::<f32>();

/// One decoded capture: a grid of temperatures in celsius.
///
/// The shape is `(HEIGHT, WIDTH)` straight from the decoder
/// and `(WIDTH, HEIGHT)` after a rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalFrame {
    data: Array2<f32>,
}

impl ThermalFrame {
    /// Reinterpret `bytes` as a `HEIGHT x WIDTH` grid.
    ///
    /// Fails with [`Error::SizeMismatch`] unless the buffer
    /// is exactly [`EXPECTED_SIZE`] bytes long. Values are
    /// taken as-is; see [`ensure_finite`][Self::ensure_finite].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != EXPECTED_SIZE {
            return Err(Error::SizeMismatch {
                expected: EXPECTED_SIZE,
                actual: bytes.len(),
            });
        }

        let mut rdr = ByteOrdered::native(bytes);
        let mut values = Vec::with_capacity(HEIGHT * WIDTH);
        for _ in 0..HEIGHT {
            for _ in 0..WIDTH {
                values.push(rdr.read_f32()?);
            }
        }

        Ok(Self::from_array(Array2::from_shape_vec(
            (HEIGHT, WIDTH),
            values,
        )?))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::decode(&read(path)?)
    }

    pub(crate) fn from_array(data: Array2<f32>) -> Self {
        ThermalFrame { data }
    }

    /// Inverse of [`decode`][Self::decode].
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() * size_of::<f32>());
        for val in self.values() {
            bytes.extend_from_slice(&val.to_ne_bytes());
        }
        bytes
    }

    /// Fails on the first NaN or infinite value, in
    /// row-major order.
    pub fn ensure_finite(&self) -> Result<()> {
        match self.data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            Some(((row, col), &value)) => Err(Error::NonFinite { row, col, value }),
            None => Ok(()),
        }
    }

    /// `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.data.get((row, col)).copied()
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
