//! Raster rendering of rooms and density fields

pub mod canvas;
pub mod colormap;
pub mod scene;

pub use canvas::Canvas;
pub use colormap::{Normalize, viridis};
pub use scene::{
    ScaledFootprint, render_heatmap, render_layout, render_trajectory_overlay, scale_footprint,
};

use ab_glyph::FontArc;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Load a TTF/OTF font for furniture labels
pub fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    FontArc::try_from_vec(bytes).map_err(|e| Error::Font {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
