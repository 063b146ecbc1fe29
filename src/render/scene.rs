//! Scene composition for one room
//!
//! Layering, bottom to top: background (blank or density field), furniture
//! footprints, raw trajectories (overlay artifact only), labels.

use ab_glyph::FontArc;

use super::canvas::Canvas;
use super::colormap;
use crate::config::RenderConfig;
use crate::constants::*;
use crate::error::Result;
use crate::geometry::{Point, centroid, close_polygon, grid_dimensions, scale_points};
use crate::heatmap::DensityGrid;
use crate::room::{Footprint, Room};

/// Furniture footprint in grid-space, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFootprint<'a> {
    /// Closed outline (first vertex repeated last)
    pub outline: Vec<Point>,
    /// Label anchor at the vertex mean
    pub anchor: Point,
    pub name: Option<&'a str>,
}

/// Scale a footprint into grid-space and close it
pub fn scale_footprint(footprint: &Footprint, map_scale: f32) -> ScaledFootprint<'_> {
    let scaled = scale_points(&footprint.outline, map_scale);
    let anchor = centroid(&scaled).unwrap_or_default();
    ScaledFootprint {
        outline: close_polygon(&scaled),
        anchor,
        name: footprint.name.as_deref(),
    }
}

fn draw_furniture(canvas: &mut Canvas, room: &Room, map_scale: f32) -> Vec<(Point, String)> {
    let mut labels = Vec::new();
    for footprint in &room.furnitures {
        let scaled = scale_footprint(footprint, map_scale);
        canvas.fill_polygon(&scaled.outline, FURNITURE_FILL, FURNITURE_EDGE);
        if let Some(name) = scaled.name {
            labels.push((scaled.anchor, name.to_string()));
        }
    }
    labels
}

fn draw_labels(canvas: &mut Canvas, labels: &[(Point, String)], font: Option<&FontArc>) {
    let Some(font) = font else {
        return;
    };
    for (anchor, name) in labels {
        canvas.draw_label(*anchor, name, font, LABEL_SIZE, LABEL_COLOR);
    }
}

/// Blank background, furniture, then raw (non-interpolated) trajectories on top
pub fn render_trajectory_overlay(
    room: &Room,
    config: &RenderConfig,
    font: Option<&FontArc>,
) -> Result<Canvas> {
    let (width, height) = grid_dimensions(room.size, config.map_scale);
    let mut canvas = Canvas::blank(width, height, colormap::background())?;
    let labels = draw_furniture(&mut canvas, room, config.map_scale);
    for trajectory in &room.trajectories {
        canvas.draw_polyline(&scale_points(trajectory, config.map_scale), TRAJECTORY_COLOR);
    }
    draw_labels(&mut canvas, &labels, font);
    Ok(canvas)
}

/// Smoothed density field with furniture occluding it
pub fn render_heatmap(
    room: &Room,
    field: &DensityGrid,
    config: &RenderConfig,
    font: Option<&FontArc>,
) -> Result<Canvas> {
    let mut canvas = Canvas::from_field(field)?;
    let labels = draw_furniture(&mut canvas, room, config.map_scale);
    draw_labels(&mut canvas, &labels, font);
    Ok(canvas)
}

/// Floor-plan sketch: white background, room boundary, labelled furniture
pub fn render_layout(room: &Room, config: &RenderConfig, font: Option<&FontArc>) -> Result<Canvas> {
    let (width, height) = grid_dimensions(room.size, config.map_scale);
    let mut canvas = Canvas::blank(width, height, LAYOUT_BACKGROUND)?;
    let labels = draw_furniture(&mut canvas, room, config.map_scale);
    canvas.draw_frame(
        Point::default(),
        Point::new(width as f32, height as f32),
        LAYOUT_WALL_THICKNESS,
        LAYOUT_WALL_COLOR,
    );
    draw_labels(&mut canvas, &labels, font);
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::density_field;

    fn room() -> Room {
        let json = r#"{
            "roomSize": [4, 4],
            "furnitures": [[[1, 1], [2, 1], [2, 2], [1, 2]]],
            "trajectories": [[[0.25, 3.55], [3.85, 3.55]], [[0.55, 0.55], [1.45, 1.45]]]
        }"#;
        Room::from_json("scene", json, [0, 1]).unwrap()
    }

    fn config() -> RenderConfig {
        RenderConfig {
            map_scale: 10.0,
            start_end_cut: 0,
            gaussian_sigma: 1.0,
            ..RenderConfig::default()
        }
    }

    fn fixture_font() -> FontArc {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts/DejaVuSans.ttf");
        crate::render::load_font(&path).expect("bundled font")
    }

    fn named_room() -> Room {
        let json = r#"{
            "roomSize": [8, 6],
            "furnitures": {"sofa": [[[2, 2], [6, 2], [6, 4], [2, 4]]]}
        }"#;
        Room::from_json("labelled", json, [0, 1]).unwrap()
    }

    #[test]
    fn test_labels_drawn_at_footprint_centre() {
        let room = named_room();
        let plain = render_layout(&room, &config(), None).unwrap();
        let labelled = render_layout(&room, &config(), Some(&fixture_font())).unwrap();

        // Anchor is the vertex mean, grid (40, 30)
        let changed: Vec<(u32, u32)> = (0..plain.width())
            .flat_map(|x| (0..plain.height()).map(move |y| (x, y)))
            .filter(|&(x, y)| plain.cell(x, y) != labelled.cell(x, y))
            .collect();
        assert!(!changed.is_empty());
        assert!(changed.iter().any(|&(x, y)| x.abs_diff(40) <= 8 && y.abs_diff(30) <= 6));
        // Nothing drawn far from the anchor
        assert!(changed.iter().all(|&(x, y)| x.abs_diff(40) <= 30 && y.abs_diff(30) <= 15));
    }

    #[test]
    fn test_overlay_and_heatmap_carry_labels() {
        let room = named_room();
        let config = config();
        let font = fixture_font();
        let plain = render_trajectory_overlay(&room, &config, None).unwrap();
        let labelled = render_trajectory_overlay(&room, &config, Some(&font)).unwrap();
        assert_ne!(plain.image(), labelled.image());

        let (field, _) = density_field(room.size, &room.trajectories, &config);
        let plain = render_heatmap(&room, &field, &config, None).unwrap();
        let labelled = render_heatmap(&room, &field, &config, Some(&font)).unwrap();
        assert_ne!(plain.image(), labelled.image());
    }

    #[test]
    fn test_unit_square_scaled_and_closed() {
        let footprint = Footprint {
            name: Some("table".to_string()),
            outline: vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ],
        };
        let scaled = scale_footprint(&footprint, 100.0);
        assert_eq!(
            scaled.outline,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
                Point::new(0.0, 0.0),
            ]
        );
        assert_eq!(scaled.anchor, Point::new(50.0, 50.0));
        assert_eq!(scaled.name, Some("table"));
    }

    #[test]
    fn test_overlay_layers() {
        let canvas = render_trajectory_overlay(&room(), &config(), None).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (40, 40));
        // Furniture interior
        assert_eq!(canvas.cell(15, 15), Some(FURNITURE_FILL));
        // Trajectory row, away from furniture
        assert_eq!(canvas.cell(20, 35), Some(TRAJECTORY_COLOR));
        // Untouched background
        assert_eq!(canvas.cell(35, 10), Some(colormap::background()));
    }

    #[test]
    fn test_trajectories_drawn_above_furniture() {
        // Second trajectory crosses the furniture diagonally
        let canvas = render_trajectory_overlay(&room(), &config(), None).unwrap();
        assert_eq!(canvas.cell(12, 12), Some(TRAJECTORY_COLOR));
    }

    #[test]
    fn test_heatmap_furniture_occludes_field() {
        let room = room();
        let config = config();
        let (field, _) = density_field(room.size, &room.trajectories, &config);
        let canvas = render_heatmap(&room, &field, &config, None).unwrap();
        assert_eq!(canvas.cell(15, 15), Some(FURNITURE_FILL));
        assert_ne!(canvas.cell(20, 35), Some(colormap::background()));
    }

    #[test]
    fn test_layout_has_walls() {
        let canvas = render_layout(&room(), &config(), None).unwrap();
        assert_eq!(canvas.cell(0, 20), Some(LAYOUT_WALL_COLOR));
        assert_eq!(canvas.cell(30, 30), Some(LAYOUT_BACKGROUND));
        assert_eq!(canvas.cell(15, 15), Some(FURNITURE_FILL));
    }
}
