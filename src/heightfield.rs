//! Heightfield grid sampled from an external heightmap source.
//!
//! The grid is a dense row-major array of heights scaled into a caller-chosen
//! `[min_y, max_y]` range. Image decoding is not this crate's concern: any
//! source that can report its dimensions and a normalized sample per texel
//! can back a grid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a heightfield cannot be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeightfieldError {
    /// The source must provide at least 2x2 samples to form one cell.
    #[error("heightmap source too small: {width}x{height} (need at least 2x2)")]
    SourceTooSmall { width: usize, height: usize },
}

/// Provider of normalized height samples, typically backed by a decoded
/// heightmap image. `sample(row, col)` must return a value in `[0, 1]`.
pub trait HeightmapSource {
    /// Number of sample columns.
    fn width(&self) -> usize;
    /// Number of sample rows.
    fn height(&self) -> usize;
    /// Normalized height at `(row, col)`, in `[0, 1]`.
    fn sample(&self, row: usize, col: usize) -> f32;
}

/// In-memory heightmap source over a flat row-major buffer of normalized
/// samples. Useful for procedural terrain and for tests.
#[derive(Debug, Clone)]
pub struct BufferSource {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl BufferSource {
    /// Wrap a row-major buffer of `width * height` normalized samples.
    ///
    /// # Panics
    /// Panics if `samples.len() != width * height`.
    pub fn new(width: usize, height: usize, samples: Vec<f32>) -> Self {
        assert_eq!(
            samples.len(),
            width * height,
            "sample buffer must be width * height"
        );
        Self {
            width,
            height,
            samples,
        }
    }

    /// A source where every sample is the same normalized value.
    pub fn flat(width: usize, height: usize, value: f32) -> Self {
        Self::new(width, height, vec![value; width * height])
    }
}

impl HeightmapSource for BufferSource {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample(&self, row: usize, col: usize) -> f32 {
        self.samples[row * self.width + col]
    }
}

/// Dense grid of height samples, immutable after construction.
///
/// Heights are stored already scaled into `[min_y, max_y]`; block-level world
/// placement (uniform scale, world offset) is applied by the terrain on top
/// of these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightfieldGrid {
    /// Number of sample columns.
    width: usize,
    /// Number of sample rows.
    height: usize,
    /// Row-major height samples in `[min_y, max_y]`.
    heights: Vec<f32>,
}

impl HeightfieldGrid {
    /// Sample every texel of `source`, scaling normalized values into
    /// `[min_y, max_y]`.
    pub fn from_source<S: HeightmapSource>(
        source: &S,
        min_y: f32,
        max_y: f32,
    ) -> Result<Self, HeightfieldError> {
        let width = source.width();
        let height = source.height();
        if width < 2 || height < 2 {
            return Err(HeightfieldError::SourceTooSmall { width, height });
        }

        let range = max_y - min_y;
        let mut heights = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                heights.push(min_y + range * source.sample(row, col));
            }
        }

        Ok(Self {
            width,
            height,
            heights,
        })
    }

    /// Number of sample columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of sample rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Height at `(row, col)`, already scaled into the construction range.
    #[inline]
    pub fn height_at(&self, row: usize, col: usize) -> f32 {
        self.heights[row * self.width + col]
    }
}
