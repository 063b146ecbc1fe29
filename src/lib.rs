//! Roomviz - trajectory heatmaps and furniture overlays for simulated rooms
//!
//! Turns per-room JSON records (room size, furniture footprints, agent
//! trajectories) into raster images: a trajectory overlay, a smoothed
//! traversal heatmap, furniture affordance maps and layout sketches.

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod room;

// Rendering pipeline
pub mod affordance;
pub mod heatmap;
pub mod pipeline;
pub mod render;

// Re-export commonly used types for convenience
pub use config::{AffordanceConfig, RenderConfig};
pub use constants::*;
pub use error::{Error, Result};
pub use geometry::{
    Point, centroid, close_polygon, grid_cell_count, grid_dimensions, scale_point, scale_points,
};
pub use heatmap::{
    AccumulateStats, DensifyParams, DensityGrid, SmoothParams, accumulate_room, densify,
    density_field, smooth,
};
pub use pipeline::{
    BatchKind, BatchSummary, RoomOutcome, RoomReport, checked_grid, init_parallel, process_room,
    render_room, run_batch,
};
pub use render::{Canvas, load_font, render_heatmap, render_layout, render_trajectory_overlay};
pub use room::{Footprint, Room, discover_rooms, room_id_from_path};

/// Set up `tracing` output for the command line tools (`RUST_LOG`, default `info`)
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
