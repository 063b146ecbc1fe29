//! Room-space geometry and the coordinate scaler
//!
//! Room-space is continuous (room units). Grid-space is room-space multiplied
//! by `map_scale`; cell `(i, j)` covers `[i, i+1) x [j, j+1)` in grid-space.

use std::ops::{Add, Mul, Sub};

const GRID_EPSILON: f32 = 1e-3;

/// A 2D point in room-space or grid-space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Scale a room-space point into grid-space. No bounds checking.
pub fn scale_point(point: Point, map_scale: f32) -> Point {
    point * map_scale
}

/// Scale every vertex of a polygon or polyline
pub fn scale_points(points: &[Point], map_scale: f32) -> Vec<Point> {
    points.iter().map(|&p| scale_point(p, map_scale)).collect()
}

/// Return the outline with the first vertex repeated at the end.
/// Already-closed outlines are returned unchanged.
pub fn close_polygon(points: &[Point]) -> Vec<Point> {
    let mut closed = points.to_vec();
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if points.len() > 1 && first != last {
            closed.push(first);
        }
    }
    closed
}

/// Mean of the vertices (label anchor), `None` for an empty outline
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point::default(), |acc, &p| acc + p);
    Some(sum * (1.0 / points.len() as f32))
}

/// Grid dimensions for a room: `ceil(size * map_scale)` per axis, at least 1.
///
/// Products within `GRID_EPSILON` above an integer are not rounded up, so a
/// 1.2 unit room at scale 100 gets 120 cells rather than 121.
pub fn grid_dimensions(room_size: Point, map_scale: f32) -> (usize, usize) {
    let scaled = scale_point(room_size, map_scale);
    let dim = |v: f32| ((v - GRID_EPSILON).ceil().max(1.0)) as usize;
    (dim(scaled.x), dim(scaled.y))
}

/// Cells in a `width x height` grid, `None` on overflow
pub fn grid_cell_count((width, height): (usize, usize)) -> Option<usize> {
    width.checked_mul(height)
}
