//! Trajectory densification
//!
//! Consecutive waypoints are sub-sampled so every grid cell the path crosses
//! gets at least one hit. Segment `(p_i, p_i+1)` emits
//! `p_i + (p_i+1 - p_i) * (s / steps)` for `s = 1..=steps`: the segment start
//! is left to the previous segment, the end point is included.

use crate::geometry::Point;

/// How a trajectory is trimmed and sub-sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensifyParams {
    /// Sub-samples per segment
    pub steps: usize,
    /// Points skipped at the start (spawn/settling transients)
    pub start_cut: usize,
    /// Points dropped at the end
    pub end_cut: usize,
}

impl DensifyParams {
    /// Number of segments walked for a trajectory of `len` points
    pub fn segment_count(&self, len: usize) -> usize {
        len.saturating_sub(self.start_cut + self.end_cut)
            .saturating_sub(1)
    }

    /// Number of samples emitted for a trajectory of `len` points
    pub fn sample_count(&self, len: usize) -> usize {
        self.segment_count(len) * self.steps
    }
}

/// Lazy iterator over densified samples, in traversal order
#[derive(Debug, Clone)]
pub struct Densify<'a> {
    points: &'a [Point],
    segment: usize,
    end: usize,
    step: usize,
    steps: usize,
}

impl Iterator for Densify<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.segment >= self.end {
            return None;
        }
        let start = self.points[self.segment];
        let delta = self.points[self.segment + 1] - start;
        self.step += 1;
        let sample = start + delta * (self.step as f32 / self.steps as f32);
        if self.step == self.steps {
            self.step = 0;
            self.segment += 1;
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.segment >= self.end {
            0
        } else {
            (self.end - self.segment) * self.steps - self.step
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Densify<'_> {}

/// Densify one (already scaled) trajectory.
///
/// Short trajectories (fewer than `start_cut + end_cut + 2` points) yield nothing.
pub fn densify(points: &[Point], params: DensifyParams) -> Densify<'_> {
    let segments = if params.steps == 0 {
        0
    } else {
        params.segment_count(points.len())
    };
    Densify {
        points,
        segment: params.start_cut,
        end: params.start_cut + segments,
        step: 0,
        steps: params.steps.max(1),
    }
}
