//! Heatmap construction: densify -> accumulate -> smooth

pub mod densify;
pub mod grid;
pub mod smooth;

pub use densify::{Densify, DensifyParams, densify};
pub use grid::{AccumulateStats, DensityGrid};
pub use smooth::{SmoothParams, gaussian_blur, gaussian_kernel, grey_dilation, smooth};

use crate::config::RenderConfig;
use crate::geometry::{Point, grid_dimensions, scale_points};

impl From<&RenderConfig> for DensifyParams {
    fn from(config: &RenderConfig) -> Self {
        Self {
            steps: config.interpolation_steps,
            start_cut: config.start_end_cut,
            end_cut: config.end_cut,
        }
    }
}

impl From<&RenderConfig> for SmoothParams {
    fn from(config: &RenderConfig) -> Self {
        Self {
            dilation: config.dilation_size,
            sigma: config.gaussian_sigma,
            truncate: config.gaussian_truncate,
        }
    }
}

/// Accumulate every trajectory of a room into a fresh grid.
///
/// `trajectories` are in room-space; each is scaled then densified on its
/// own, so interpolation never bridges two trajectories.
pub fn accumulate_room(
    room_size: Point,
    trajectories: &[Vec<Point>],
    config: &RenderConfig,
) -> (DensityGrid, AccumulateStats) {
    let (width, height) = grid_dimensions(room_size, config.map_scale);
    let mut grid = DensityGrid::new(width, height);
    let params = DensifyParams::from(config);
    let mut stats = AccumulateStats::default();

    for trajectory in trajectories.iter().filter(|t| !t.is_empty()) {
        let scaled = scale_points(trajectory, config.map_scale);
        stats.merge(grid.accumulate_all(densify(&scaled, params)));
    }

    (grid, stats)
}

/// Full density field for a room: accumulate, then smooth once
pub fn density_field(
    room_size: Point,
    trajectories: &[Vec<Point>],
    config: &RenderConfig,
) -> (DensityGrid, AccumulateStats) {
    let (grid, stats) = accumulate_room(room_size, trajectories, config);
    (smooth(grid, &SmoothParams::from(config)), stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(map_scale: f32, steps: usize, cut: usize) -> RenderConfig {
        RenderConfig {
            map_scale,
            interpolation_steps: steps,
            start_end_cut: cut,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_grid_matches_scaled_room() {
        let (grid, stats) = accumulate_room(Point::new(2.5, 1.2), &[], &config(100.0, 100, 5));
        assert_eq!((grid.width(), grid.height()), (250, 120));
        assert_eq!(stats, AccumulateStats::default());
    }

    #[test]
    fn test_total_equals_sample_count_across_trajectories() {
        let trajectories = vec![
            (0..12).map(|i| Point::new(0.1 + 0.3 * i as f32, 0.5)).collect::<Vec<_>>(),
            Vec::new(),
            (0..8).map(|i| Point::new(1.0, 0.2 + 0.4 * i as f32)).collect(),
        ];
        let cfg = config(10.0, 25, 5);
        let (grid, stats) = accumulate_room(Point::new(4.0, 4.0), &trajectories, &cfg);
        // (12 - 5 - 1) + (8 - 5 - 1) segments, 25 samples each
        assert_eq!(stats.samples, (6 + 2) * 25);
        assert_eq!(grid.total(), stats.samples as f64);
    }

    #[test]
    fn test_empty_trajectories_leave_zero_field() {
        let trajectories = vec![Vec::new()];
        let (grid, stats) = density_field(Point::new(1.0, 1.0), &trajectories, &config(50.0, 10, 0));
        assert_eq!(stats.samples, 0);
        assert!(grid.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_peaks_on_path() {
        let trajectory = vec![Point::new(0.0, 1.0), Point::new(3.0, 1.0)];
        let (grid, _) = density_field(Point::new(3.0, 2.0), &[trajectory], &config(20.0, 100, 0));
        let on_path = grid.get(30, 20);
        let off_path = grid.get(30, 2);
        assert!(on_path > off_path, "{} <= {}", on_path, off_path);
    }
}
