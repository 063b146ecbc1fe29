//! Per-room render pipeline and batch driver
//!
//! Per room, strictly sequential:
//! load -> scale -> trajectory overlay -> accumulate -> smooth -> heatmap.
//! Rooms share nothing mutable, so the batch runs them on the rayon pool.
//! A failing room is logged and reported; it never aborts the batch.

use ab_glyph::FontArc;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RenderConfig;
use crate::constants::{HEATMAP_SUFFIX, TRAJECTORIES_SUFFIX};
use crate::error::{Error, Result};
use crate::geometry::{grid_cell_count, grid_dimensions};
use crate::heatmap::density_field;
use crate::render::{Canvas, load_font, render_heatmap, render_layout, render_trajectory_overlay};
use crate::room::{Room, discover_rooms, room_id_from_path};

/// Which artifacts a batch produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// `{id}_trajectories` and `{id}_heatmap` per room
    Heatmaps,
    /// `{id}` floor-plan sketch per room
    Layouts,
}

/// What happened to one rendered room
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomReport {
    pub room: String,
    pub trajectories: usize,
    pub empty_trajectories: usize,
    /// Densified samples accumulated into the grid
    pub samples: usize,
    /// Samples pulled back inside the grid
    pub clamped: usize,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum RoomOutcome {
    Rendered(RoomReport),
    Skipped { room: String, error: Error },
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<RoomOutcome>,
}

impl BatchSummary {
    pub fn rendered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RoomOutcome::Rendered(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.rendered()
    }
}

/// Set the rayon worker count (0 keeps rayon's default)
pub fn init_parallel(threads: usize) {
    if threads == 0 {
        return;
    }
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        tracing::warn!(threads, error = %e, "Could not configure thread pool");
    }
}

/// `{dir}/{room_id}{suffix}.{ext}`
pub fn output_path(dir: &Path, room_id: &str, suffix: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}{}.{}", room_id, suffix, ext))
}

fn write_canvas(canvas: &Canvas, path: PathBuf) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        // Idempotent; other workers may be creating it concurrently
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    canvas.save(&path)?;
    Ok(path)
}

/// Grid dimensions for a room, rejecting grids over `config.max_grid_cells`
pub fn checked_grid(room: &Room, config: &RenderConfig) -> Result<(usize, usize)> {
    let dims = grid_dimensions(room.size, config.map_scale);
    match grid_cell_count(dims) {
        Some(cells) if cells <= config.max_grid_cells => Ok(dims),
        _ => Err(Error::malformed(
            &room.id,
            format!(
                "roomSize {:?} at scale {} needs a {}x{} grid, over the {} cell limit",
                room.size, config.map_scale, dims.0, dims.1, config.max_grid_cells
            ),
        )),
    }
}

/// Render both artifacts for a validated room
pub fn render_room(room: &Room, config: &RenderConfig, font: Option<&FontArc>) -> Result<RoomReport> {
    checked_grid(room, config)?;
    let ext = &config.image_extension;
    let mut report = RoomReport {
        room: room.id.clone(),
        trajectories: room.trajectories.len(),
        empty_trajectories: room.empty_trajectories,
        ..RoomReport::default()
    };

    let overlay = render_trajectory_overlay(room, config, font)?;
    report.outputs.push(write_canvas(
        &overlay,
        output_path(&config.output_dir, &room.id, TRAJECTORIES_SUFFIX, ext),
    )?);

    let (field, stats) = density_field(room.size, &room.trajectories, config);
    report.samples = stats.samples;
    report.clamped = stats.clamped;
    tracing::debug!(
        room = %room.id,
        width = field.width(),
        height = field.height(),
        samples = stats.samples,
        clamped = stats.clamped,
        empty_trajectories = room.empty_trajectories,
        "Accumulated density grid"
    );

    let heatmap = render_heatmap(room, &field, config, font)?;
    report.outputs.push(write_canvas(
        &heatmap,
        output_path(&config.output_dir, &room.id, HEATMAP_SUFFIX, ext),
    )?);

    Ok(report)
}

/// Render the floor-plan sketch for a validated room
pub fn render_room_layout(
    room: &Room,
    config: &RenderConfig,
    font: Option<&FontArc>,
) -> Result<RoomReport> {
    checked_grid(room, config)?;
    let canvas = render_layout(room, config, font)?;
    let path = write_canvas(
        &canvas,
        output_path(&config.output_dir, &room.id, "", &config.image_extension),
    )?;
    Ok(RoomReport {
        room: room.id.clone(),
        trajectories: room.trajectories.len(),
        empty_trajectories: room.empty_trajectories,
        outputs: vec![path],
        ..RoomReport::default()
    })
}

/// Load one room file and render it
pub fn process_room(
    path: &Path,
    kind: BatchKind,
    config: &RenderConfig,
    font: Option<&FontArc>,
) -> Result<RoomReport> {
    let room = Room::load(path, config.axes)?;
    match kind {
        BatchKind::Heatmaps => render_room(&room, config, font),
        BatchKind::Layouts => render_room_layout(&room, config, font),
    }
}

/// Render every room file in `config.input_dir`.
///
/// Fails only when the input directory can't be listed or the label font
/// can't be loaded; per-room failures become `RoomOutcome::Skipped`.
pub fn run_batch(config: &RenderConfig, kind: BatchKind) -> Result<BatchSummary> {
    let paths = discover_rooms(&config.input_dir)?;
    let font = config.label_font.as_deref().map(load_font).transpose()?;

    tracing::info!(
        rooms = paths.len(),
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        map_scale = config.map_scale,
        "Rendering rooms"
    );

    let outcomes = paths
        .par_iter()
        .map(|path| match process_room(path, kind, config, font.as_ref()) {
            Ok(report) => {
                tracing::debug!(room = %report.room, outputs = report.outputs.len(), "Rendered room");
                RoomOutcome::Rendered(report)
            }
            Err(error) => {
                let room = room_id_from_path(path);
                tracing::warn!(room = %room, error = %error, "Skipping room");
                RoomOutcome::Skipped { room, error }
            }
        })
        .collect();

    Ok(BatchSummary { outcomes })
}
