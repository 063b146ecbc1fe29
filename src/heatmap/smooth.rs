//! Density smoothing: grey dilation followed by Gaussian blur
//!
//! Both filters are separable and run row-parallel with rayon. Borders use
//! half-sample symmetric reflection (`d c b a | a b c d | d c b a`).

use rayon::prelude::*;

use super::grid::DensityGrid;

/// Smoothing parameters, in grid cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Dilation window (x, y)
    pub dilation: [usize; 2],
    /// Gaussian standard deviation; 0 disables the blur
    pub sigma: f32,
    /// Kernel radius in multiples of sigma
    pub truncate: f32,
}

/// Dilate then blur. Runs once, after all accumulation.
pub fn smooth(grid: DensityGrid, params: &SmoothParams) -> DensityGrid {
    let dilated = grey_dilation(&grid, params.dilation);
    gaussian_blur(&dilated, params.sigma, params.truncate)
}

/// Replace every cell with the maximum over its `size[0] x size[1]` window.
///
/// An even window reaches one cell further towards lower indices.
pub fn grey_dilation(grid: &DensityGrid, size: [usize; 2]) -> DensityGrid {
    let (width, height) = (grid.width(), grid.height());
    let src = grid.values();
    let (below_x, above_x) = window_extent(size[0]);
    let (below_y, above_y) = window_extent(size[1]);

    let mut rows = vec![0.0; src.len()];
    rows.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let line = &src[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            let lo = x.saturating_sub(below_x);
            let hi = (x + above_x).min(width - 1);
            *out = line[lo..=hi].iter().copied().fold(f32::MIN, f32::max);
        }
    });

    let mut out = vec![0.0; src.len()];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let lo = y.saturating_sub(below_y);
        let hi = (y + above_y).min(height - 1);
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = (lo..=hi).map(|yy| rows[yy * width + x]).fold(f32::MIN, f32::max);
        }
    });

    DensityGrid::from_values(width, height, out)
}

/// Cells covered below and above the centre for a window of `size`
fn window_extent(size: usize) -> (usize, usize) {
    let size = size.max(1);
    (size / 2, size - 1 - size / 2)
}

/// Normalized 1D Gaussian weights, index 0 is offset `-radius`
pub fn gaussian_kernel(sigma: f32, truncate: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (truncate * sigma + 0.5) as i64;
    let weights: Vec<f32> = (-radius..=radius)
        .map(|k| {
            let t = k as f32 / sigma;
            (-0.5 * t * t).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Isotropic Gaussian blur with standard deviation `sigma` cells
pub fn gaussian_blur(grid: &DensityGrid, sigma: f32, truncate: f32) -> DensityGrid {
    let kernel = gaussian_kernel(sigma, truncate);
    if kernel.len() == 1 {
        return grid.clone();
    }
    let radius = (kernel.len() / 2) as isize;
    let (width, height) = (grid.width(), grid.height());
    let src = grid.values();

    let mut rows = vec![0.0; src.len()];
    rows.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let line = &src[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * line[reflect(x as isize + k as isize - radius, width)])
                .sum();
        }
    });

    let mut out = vec![0.0; src.len()];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            let value: f32 = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let yy = reflect(y as isize + k as isize - radius, height);
                    w * rows[yy * width + x]
                })
                .sum();
            // Rounding can leave tiny negatives next to empty regions
            *cell = value.max(0.0);
        }
    });

    DensityGrid::from_values(width, height, out)
}

/// Fold an out-of-range index back into `0..len` by mirroring at the edges
fn reflect(i: isize, len: usize) -> usize {
    let n = len as isize;
    let m = i.rem_euclid(2 * n);
    if m < n { m as usize } else { (2 * n - 1 - m) as usize }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn defaults() -> SmoothParams {
        SmoothParams {
            dilation: [3, 3],
            sigma: 5.0,
            truncate: 4.0,
        }
    }

    fn impulse(width: usize, height: usize, x: usize, y: usize) -> DensityGrid {
        let mut grid = DensityGrid::new(width, height);
        grid.set(x, y, 1.0);
        grid
    }

    #[test]
    fn test_reflect_mirrors_edges() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(9, 4), 1);
        assert_eq!(reflect(-7, 1), 0);
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(5.0, 4.0);
        assert_eq!(kernel.len(), 41);
        assert_relative_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(kernel[0], kernel[40]);
        assert!(kernel[20] > kernel[19]);
    }

    #[test]
    fn test_dilation_spreads_impulse_to_window() {
        let dilated = grey_dilation(&impulse(5, 5, 2, 2), [3, 3]);
        for y in 0..5 {
            for x in 0..5 {
                let inside = (1..=3).contains(&x) && (1..=3).contains(&y);
                assert_eq!(dilated.get(x, y), if inside { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_dilation_at_corner() {
        let dilated = grey_dilation(&impulse(4, 3, 0, 0), [3, 3]);
        assert_eq!(dilated.get(1, 1), 1.0);
        assert_eq!(dilated.get(2, 0), 0.0);
    }

    #[test]
    fn test_anisotropic_dilation_window() {
        let dilated = grey_dilation(&impulse(7, 7, 3, 3), [5, 1]);
        assert_eq!(dilated.get(1, 3), 1.0);
        assert_eq!(dilated.get(5, 3), 1.0);
        assert_eq!(dilated.get(3, 2), 0.0);
    }

    #[test]
    fn test_blur_preserves_mass_away_from_edges() {
        let blurred = gaussian_blur(&impulse(61, 61, 30, 30), 5.0, 4.0);
        assert_relative_eq!(blurred.total(), 1.0, epsilon = 1e-4);
        assert!(blurred.get(30, 30) > blurred.get(31, 30));
        assert_relative_eq!(blurred.get(25, 30), blurred.get(35, 30), epsilon = 1e-7);
        assert_relative_eq!(blurred.get(30, 25), blurred.get(25, 30), epsilon = 1e-7);
    }

    #[test]
    fn test_reflective_border_keeps_mass() {
        let blurred = gaussian_blur(&impulse(8, 6, 0, 5), 3.0, 4.0);
        assert_relative_eq!(blurred.total(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let grid = impulse(3, 3, 1, 1);
        assert_eq!(gaussian_blur(&grid, 0.0, 4.0), grid);
    }

    #[test]
    fn test_smooth_keeps_shape_and_sign() {
        let mut grid = DensityGrid::new(37, 23);
        for i in 0..23 {
            grid.set(i, i, (i * 3) as f32);
        }
        let smoothed = smooth(grid, &defaults());
        assert_eq!(smoothed.width(), 37);
        assert_eq!(smoothed.height(), 23);
        assert!(smoothed.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_zero_grid_stays_zero() {
        let smoothed = smooth(DensityGrid::new(40, 30), &defaults());
        assert!(smoothed.values().iter().all(|&v| v == 0.0));
    }
}
