//! Furniture affordance density maps
//!
//! Affordance statistics are positions relative to a furniture item's
//! centre. Each item's positions are filtered to a square window, binned
//! into a coarse 2D histogram, upsampled for display and colour-mapped.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{AffordanceConfig, RenderConfig};
use crate::constants::AFFORDANCE_SUBDIR;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::heatmap::DensityGrid;
use crate::pipeline::{BatchSummary, RoomOutcome, RoomReport, output_path};
use crate::render::Canvas;

/// Furniture name -> relative positions
pub type AffordanceStats = BTreeMap<String, Vec<Vec<f64>>>;

/// Read the statistics file
pub fn load_stats(path: &Path) -> Result<AffordanceStats> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&contents).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Keep positions strictly inside `(-range, range)` on both axes
pub fn filter_positions(name: &str, positions: &[Vec<f64>], range: f32) -> Result<Vec<Point>> {
    let mut kept = Vec::with_capacity(positions.len());
    for position in positions {
        let [x, y, ..] = position.as_slice() else {
            return Err(Error::malformed(
                name,
                format!("affordance position {:?} has < 2 components", position),
            ));
        };
        let point = Point::new(*x as f32, *y as f32);
        if point.x.abs() < range && point.y.abs() < range {
            kept.push(point);
        }
    }
    Ok(kept)
}

/// `bins x bins` histogram over `[-range, range]^2`
pub fn histogram(points: &[Point], range: f32, bins: usize) -> DensityGrid {
    let mut grid = DensityGrid::new(bins, bins);
    let to_bins = bins as f32 / (2.0 * range);
    grid.accumulate_all(
        points
            .iter()
            .map(|p| Point::new((p.x + range) * to_bins, (p.y + range) * to_bins)),
    );
    grid
}

/// Lanczos upsample of a histogram to `size x size`.
///
/// The result is relative: the histogram is scaled so its peak is 1.0,
/// matching the 0..1 range float images are resampled in.
pub fn upsample(grid: &DensityGrid, size: u32) -> DensityGrid {
    let peak = grid.max();
    let norm = if peak > 0.0 { 1.0 / peak } else { 0.0 };
    let source: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_fn(
        grid.width() as u32,
        grid.height() as u32,
        |x, y| Luma([grid.get(x as usize, y as usize) * norm]),
    );
    let resized = imageops::resize(&source, size, size, FilterType::Lanczos3);
    // Lanczos lobes ring slightly negative around sharp bins
    let values = resized.into_raw().into_iter().map(|v| v.clamp(0.0, 1.0)).collect();
    DensityGrid::from_values(size as usize, size as usize, values)
}

/// Render one furniture item's affordance map
pub fn render_affordance(name: &str, positions: &[Vec<f64>], config: &AffordanceConfig) -> Result<Canvas> {
    let points = filter_positions(name, positions, config.range)?;
    let hist = histogram(&points, config.range, config.bins);
    tracing::debug!(
        furniture = name,
        total = positions.len(),
        kept = points.len(),
        "Binned affordance positions"
    );
    Canvas::from_field(&upsample(&hist, config.upscale))
}

/// Furniture names become file names
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

/// Render every furniture item in `config.affordance.stats_file`
/// into `{output_dir}/affordance_plot/`
pub fn run_affordance(config: &RenderConfig) -> Result<BatchSummary> {
    let stats = load_stats(&config.affordance.stats_file)?;
    let dir: PathBuf = config.output_dir.join(AFFORDANCE_SUBDIR);
    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

    tracing::info!(
        furniture = stats.len(),
        output = %dir.display(),
        "Rendering affordance maps"
    );

    let outcomes = stats
        .par_iter()
        .map(|(name, positions)| {
            let rendered = render_affordance(name, positions, &config.affordance).and_then(|canvas| {
                let path = output_path(&dir, &file_stem(name), "", &config.image_extension);
                canvas.save(&path)?;
                Ok(path)
            });
            match rendered {
                Ok(path) => RoomOutcome::Rendered(RoomReport {
                    room: name.clone(),
                    samples: positions.len(),
                    outputs: vec![path],
                    ..RoomReport::default()
                }),
                Err(error) => {
                    tracing::warn!(furniture = %name, error = %error, "Skipping affordance map");
                    RoomOutcome::Skipped {
                        room: name.clone(),
                        error,
                    }
                }
            }
        })
        .collect();

    Ok(BatchSummary { outcomes })
}
