//! Default values for rendering
//!
//! Everything here can be overridden through `RenderConfig`.

use image::Rgb;

// =============================================================================
// COORDINATE FRAME
// =============================================================================

/// Grid cells (and pixels) per room unit
pub const DEFAULT_MAP_SCALE: f32 = 100.0;

/// Vertex components used as the 2D plane (x, y)
pub const DEFAULT_AXES: [usize; 2] = [0, 1];

/// Sampled layouts store 3D vertices with y up; the floor plane is (x, z)
pub const LAYOUT_AXES: [usize; 2] = [0, 2];

/// Rooms needing more grid cells than this are skipped (about 5000 x 5000)
pub const DEFAULT_MAX_GRID_CELLS: usize = 25_000_000;

// =============================================================================
// DENSIFICATION
// =============================================================================

pub const DEFAULT_INTERPOLATION_STEPS: usize = 100;
pub const DEFAULT_START_CUT: usize = 5; // Spawn/settling samples
pub const DEFAULT_END_CUT: usize = 0;

// =============================================================================
// SMOOTHING
// =============================================================================

pub const DEFAULT_DILATION_SIZE: [usize; 2] = [3, 3];
pub const DEFAULT_GAUSSIAN_SIGMA: f32 = 5.0;
pub const DEFAULT_GAUSSIAN_TRUNCATE: f32 = 4.0; // Kernel radius in sigmas

// =============================================================================
// AFFORDANCE MAPS
// =============================================================================

pub const DEFAULT_AFFORDANCE_RANGE: f32 = 2.0;
pub const DEFAULT_AFFORDANCE_BINS: usize = 20;
pub const DEFAULT_AFFORDANCE_UPSCALE: u32 = 200;

// =============================================================================
// FILES
// =============================================================================

pub const CONFIG_FILE: &str = "config/roomviz.toml";
pub const DEFAULT_INPUT_DIR: &str = "heatmaps";
pub const DEFAULT_OUTPUT_DIR: &str = "heatmaps/figures";
pub const DEFAULT_AFFORDANCE_FILE: &str = "metadata/stats/furnitureAffordance.json";
pub const AFFORDANCE_SUBDIR: &str = "affordance_plot";
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

pub const TRAJECTORIES_SUFFIX: &str = "_trajectories";
pub const HEATMAP_SUFFIX: &str = "_heatmap";

// =============================================================================
// COLORS
// =============================================================================

pub const FURNITURE_FILL: Rgb<u8> = Rgb([112, 128, 144]); // Slate gray
pub const FURNITURE_EDGE: Rgb<u8> = Rgb([0, 0, 0]);
pub const TRAJECTORY_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
pub const LAYOUT_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const LAYOUT_WALL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

pub const LABEL_SIZE: f32 = 18.0;
pub const LAYOUT_WALL_THICKNESS: u32 = 5;
