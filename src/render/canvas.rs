//! Raster surface sharing the density grid's coordinate frame
//!
//! One pixel per grid cell. Grid-space y grows upwards, image rows grow
//! downwards, so every drawing call flips y (origin in the lower-left).
//! Cell `(x, y)` is pixel `(x, height - 1 - y)`; pixel centres sit on integer
//! image coordinates, so the cell centre `(x + 0.5, y + 0.5)` maps exactly
//! onto its pixel.

use ab_glyph::{Font, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut, draw_text_mut, text_size,
};
use imageproc::point::Point as PixelPoint;
use imageproc::rect::Rect;
use std::path::Path;

use super::colormap::{Normalize, viridis};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::heatmap::DensityGrid;

/// Pixel dimensions, rejecting sizes whose RGB buffer can't be addressed
fn image_size(width: usize, height: usize) -> Result<(u32, u32)> {
    let too_large = || Error::CanvasSize { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(too_large)?;
    Ok((w, h))
}

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Uniform background
    pub fn blank(width: usize, height: usize, color: Rgb<u8>) -> Result<Self> {
        let (width, height) = image_size(width.max(1), height.max(1))?;
        Ok(Self {
            image: RgbImage::from_pixel(width, height, color),
        })
    }

    /// Density field as background, colour-mapped over its own range
    pub fn from_field(grid: &DensityGrid) -> Result<Self> {
        let norm = Normalize::from_values(grid.values());
        let (width, height) = image_size(grid.width(), grid.height())?;
        let image = RgbImage::from_fn(width, height, |px, py| {
            let y = (height - 1 - py) as usize;
            viridis(norm.apply(grid.get(px as usize, y)))
        });
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Grid-space point to image coordinates (pixel centres on integers)
    pub fn to_pixel(&self, point: Point) -> (f32, f32) {
        (point.x - 0.5, self.image.height() as f32 - point.y - 0.5)
    }

    /// Grid-space point to the nearest pixel boundary
    fn to_edge(&self, point: Point) -> (i32, i32) {
        (
            point.x.round() as i32,
            (self.image.height() as f32 - point.y).round() as i32,
        )
    }

    /// Colour at a grid-space cell
    pub fn cell(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(*self.image.get_pixel(x, self.height() - 1 - y))
    }

    /// Fill a closed outline and stroke its edges.
    /// Outlines that collapse to fewer than 3 pixels are only stroked.
    pub fn fill_polygon(&mut self, closed: &[Point], fill: Rgb<u8>, edge: Rgb<u8>) {
        let mut pixels: Vec<PixelPoint<i32>> = Vec::with_capacity(closed.len());
        for &p in closed {
            let (x, y) = self.to_pixel(p);
            let px = PixelPoint::new(x.round() as i32, y.round() as i32);
            if pixels.last() != Some(&px) {
                pixels.push(px);
            }
        }
        while pixels.len() > 1 && pixels.first() == pixels.last() {
            pixels.pop();
        }
        if pixels.len() >= 3 {
            draw_polygon_mut(&mut self.image, &pixels, fill);
        }
        self.draw_polyline(closed, edge);
    }

    /// Connect consecutive points with 1px segments
    pub fn draw_polyline(&mut self, points: &[Point], color: Rgb<u8>) {
        // Snap to pixel centres; the line iterator truncates
        let snap = |(x, y): (f32, f32)| (x.round(), y.round());
        for pair in points.windows(2) {
            let start = snap(self.to_pixel(pair[0]));
            let end = snap(self.to_pixel(pair[1]));
            draw_line_segment_mut(&mut self.image, start, end, color);
        }
    }

    /// Draw `text` centred on a grid-space point
    pub fn draw_label(&mut self, at: Point, text: &str, font: &impl Font, size: f32, color: Rgb<u8>) {
        if text.is_empty() {
            return;
        }
        let scale = PxScale::from(size);
        let (w, h) = text_size(scale, font, text);
        let (x, y) = self.to_pixel(at);
        let left = x.round() as i32 - (w / 2) as i32;
        let top = y.round() as i32 - (h / 2) as i32;
        draw_text_mut(&mut self.image, color, left, top, scale, font, text);
    }

    /// Axis-aligned frame of `thickness` pixels around the grid-space box `min..max`
    pub fn draw_frame(&mut self, min: Point, max: Point, thickness: u32, color: Rgb<u8>) {
        let (x0, y1) = self.to_edge(min);
        let (x1, y0) = self.to_edge(max);
        let t = thickness.max(1);
        let w = (x1 - x0).max(1) as u32;
        let h = (y1 - y0).max(1) as u32;

        draw_filled_rect_mut(&mut self.image, Rect::at(x0, y0).of_size(w, t), color);
        draw_filled_rect_mut(&mut self.image, Rect::at(x0, y1 - t as i32).of_size(w, t), color);
        draw_filled_rect_mut(&mut self.image, Rect::at(x0, y0).of_size(t, h), color);
        draw_filled_rect_mut(&mut self.image, Rect::at(x1 - t as i32, y0).of_size(t, h), color);
    }

    /// Encode to `path`; the format follows the extension
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn test_y_axis_is_flipped() {
        let canvas = Canvas::blank(10, 20, BLACK).unwrap();
        assert_eq!(canvas.to_pixel(Point::new(3.5, 0.5)), (3.0, 19.0));
        assert_eq!(canvas.to_pixel(Point::new(3.5, 19.5)), (3.0, 0.0));
    }

    #[test]
    fn test_field_background_orientation() {
        let mut grid = DensityGrid::new(4, 3);
        grid.set(0, 0, 1.0);
        let canvas = Canvas::from_field(&grid).unwrap();
        assert_eq!(canvas.cell(0, 0), Some(viridis(1.0)));
        assert_eq!(canvas.cell(0, 2), Some(viridis(0.0)));
        // Grid-space (0, 0) is the bottom-left pixel
        assert_eq!(*canvas.image().get_pixel(0, 2), viridis(1.0));
    }

    #[test]
    fn test_fill_polygon_covers_interior() {
        let mut canvas = Canvas::blank(20, 20, BLACK).unwrap();
        let square = [
            Point::new(5.0, 5.0),
            Point::new(15.0, 5.0),
            Point::new(15.0, 15.0),
            Point::new(5.0, 15.0),
            Point::new(5.0, 5.0),
        ];
        canvas.fill_polygon(&square, WHITE, RED);
        assert_eq!(canvas.cell(10, 10), Some(WHITE));
        assert_eq!(canvas.cell(2, 2), Some(BLACK));
        assert_eq!(canvas.cell(18, 10), Some(BLACK));
    }

    #[test]
    fn test_degenerate_polygon_does_not_panic() {
        let mut canvas = Canvas::blank(10, 10, BLACK).unwrap();
        let sliver = [
            Point::new(2.0, 2.0),
            Point::new(2.1, 2.1),
            Point::new(2.2, 1.9),
            Point::new(2.0, 2.0),
        ];
        canvas.fill_polygon(&sliver, WHITE, RED);
        let outside = [Point::new(-50.0, -50.0), Point::new(80.0, -50.0), Point::new(80.0, 90.0)];
        canvas.fill_polygon(&outside, WHITE, RED);
    }

    #[test]
    fn test_polyline_marks_pixels() {
        let mut canvas = Canvas::blank(10, 10, BLACK).unwrap();
        canvas.draw_polyline(&[Point::new(0.5, 5.5), Point::new(9.5, 5.5)], WHITE);
        assert_eq!(*canvas.image().get_pixel(4, 4), WHITE);
        assert_eq!(canvas.cell(4, 5), Some(WHITE));
        assert_eq!(*canvas.image().get_pixel(4, 1), BLACK);
    }

    #[test]
    fn test_oversized_canvas_is_an_error() {
        assert!(matches!(
            Canvas::blank(usize::MAX, usize::MAX, BLACK),
            Err(Error::CanvasSize { .. })
        ));
        assert!(matches!(
            Canvas::blank(1 << 33, 1, BLACK),
            Err(Error::CanvasSize { .. })
        ));
    }

    #[test]
    fn test_frame_outlines_box() {
        let mut canvas = Canvas::blank(30, 30, WHITE).unwrap();
        canvas.draw_frame(Point::new(0.0, 0.0), Point::new(30.0, 30.0), 3, BLACK);
        assert_eq!(*canvas.image().get_pixel(1, 15), BLACK);
        assert_eq!(*canvas.image().get_pixel(28, 15), BLACK);
        assert_eq!(*canvas.image().get_pixel(15, 1), BLACK);
        assert_eq!(*canvas.image().get_pixel(15, 28), BLACK);
        assert_eq!(*canvas.image().get_pixel(15, 15), WHITE);
    }
}
