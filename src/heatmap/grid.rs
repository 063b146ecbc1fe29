//! Density grid accumulation

use crate::geometry::Point;

/// Row-major 2D field of non-negative densities, indexed `(x, y)`
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

/// Outcome of feeding samples into a grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulateStats {
    /// Samples added (every sample counts, clamped ones included)
    pub samples: usize,
    /// Samples that fell outside the grid and were pulled to the border
    pub clamped: usize,
}

impl AccumulateStats {
    pub fn merge(&mut self, other: AccumulateStats) {
        self.samples += other.samples;
        self.clamped += other.clamped;
    }
}

impl DensityGrid {
    /// All-zero grid; zero dimensions are bumped to 1
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    pub(crate) fn from_values(width: usize, height: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let idx = self.index(x, y);
        self.values[idx] = value;
    }

    /// Map a grid-space point to its cell by flooring, clamped into bounds.
    /// Returns the cell and whether clamping was needed.
    pub fn cell_of(&self, point: Point) -> ((usize, usize), bool) {
        let (x, cx) = clamp_axis(point.x, self.width);
        let (y, cy) = clamp_axis(point.y, self.height);
        ((x, y), cx || cy)
    }

    /// Add one hit at the cell containing `point`; returns true if it was clamped
    pub fn accumulate(&mut self, point: Point) -> bool {
        let ((x, y), clamped) = self.cell_of(point);
        let idx = self.index(x, y);
        self.values[idx] += 1.0;
        clamped
    }

    /// Add one hit per sample
    pub fn accumulate_all(&mut self, samples: impl IntoIterator<Item = Point>) -> AccumulateStats {
        let mut stats = AccumulateStats::default();
        for sample in samples {
            stats.samples += 1;
            if self.accumulate(sample) {
                stats.clamped += 1;
            }
        }
        stats
    }

    pub fn total(&self) -> f64 {
        self.values.iter().map(|&v| v as f64).sum()
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }
}

/// Floor a coordinate to a cell index in `0..len`. NaN lands in cell 0.
fn clamp_axis(value: f32, len: usize) -> (usize, bool) {
    let cell = value.floor();
    if cell.is_nan() || cell < 0.0 {
        (0, true)
    } else if cell >= len as f32 {
        (len - 1, true)
    } else {
        (cell as usize, false)
    }
}
