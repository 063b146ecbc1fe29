//! Room record loading and validation
//!
//! A room JSON looks like:
//! ```json
//! {
//!   "roomSize": [4.2, 3.1],
//!   "furnitures": [[[0.1, 0.2], [1.0, 0.2], [1.0, 0.9]]],
//!   "trajectories": [[[0.5, 0.5], [0.6, 0.55]], [], null]
//! }
//! ```
//! `furnitures` may also be an object mapping furniture name to a list of
//! footprints (sampled layouts). Records are validated here so the numeric
//! stages never see missing or short geometry.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::geometry::Point;

type RawPolygon = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
struct RawRoom {
    #[serde(rename = "roomSize")]
    room_size: Option<Vec<f64>>,
    furnitures: Option<RawFurnitures>,
    trajectories: Option<Vec<Option<Vec<Vec<f64>>>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFurnitures {
    List(Vec<RawPolygon>),
    Named(BTreeMap<String, Vec<RawPolygon>>),
}

/// Furniture outline in room-space, open (first vertex not repeated)
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub name: Option<String>,
    pub outline: Vec<Point>,
}

/// One validated room instance
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Source file name without extension
    pub id: String,
    /// Room-space width/depth on the selected axes
    pub size: Point,
    pub furnitures: Vec<Footprint>,
    /// Non-empty trajectories only
    pub trajectories: Vec<Vec<Point>>,
    /// Entries that were empty or null and got skipped
    pub empty_trajectories: usize,
}

impl Room {
    /// Read and validate a room record from disk
    pub fn load(path: &Path, axes: [usize; 2]) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let raw: RawRoom = serde_json::from_str(&contents).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let room = Self::from_raw(room_id_from_path(path), raw, axes)?;
        tracing::debug!(
            room = %room.id,
            furnitures = room.furnitures.len(),
            trajectories = room.trajectories.len(),
            empty = room.empty_trajectories,
            "Loaded room"
        );
        Ok(room)
    }

    /// Parse and validate a room record from a JSON string
    pub fn from_json(id: &str, json: &str, axes: [usize; 2]) -> Result<Self> {
        let raw: RawRoom = serde_json::from_str(json).map_err(|source| Error::Json {
            path: PathBuf::from(id),
            source,
        })?;
        Self::from_raw(id.to_string(), raw, axes)
    }

    fn from_raw(id: String, raw: RawRoom, axes: [usize; 2]) -> Result<Self> {
        let Some(size) = raw.room_size else {
            return Err(Error::malformed(&id, "missing roomSize"));
        };
        let size = select_axes(&size, axes)
            .ok_or_else(|| Error::malformed(&id, format!("roomSize {:?} too short", size)))?;
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return Err(Error::malformed(
                &id,
                format!("roomSize must be positive, got ({}, {})", size.x, size.y),
            ));
        }

        let mut furnitures = Vec::new();
        match raw.furnitures {
            Some(RawFurnitures::List(polygons)) => {
                for (i, polygon) in polygons.iter().enumerate() {
                    furnitures.push(Footprint {
                        name: None,
                        outline: parse_outline(&id, &format!("furniture {}", i), polygon, axes)?,
                    });
                }
            }
            Some(RawFurnitures::Named(named)) => {
                for (name, polygons) in &named {
                    for polygon in polygons {
                        furnitures.push(Footprint {
                            name: Some(name.clone()),
                            outline: parse_outline(&id, name, polygon, axes)?,
                        });
                    }
                }
            }
            None => {}
        }

        let mut trajectories = Vec::new();
        let mut empty_trajectories = 0;
        for (i, trajectory) in raw.trajectories.unwrap_or_default().into_iter().enumerate() {
            let Some(points) = trajectory.filter(|t| !t.is_empty()) else {
                empty_trajectories += 1;
                continue;
            };
            let points = points
                .iter()
                .map(|p| select_axes(p, [0, 1]))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    Error::malformed(&id, format!("trajectory {} has a point with < 2 components", i))
                })?;
            trajectories.push(points);
        }

        Ok(Self {
            id,
            size,
            furnitures,
            trajectories,
            empty_trajectories,
        })
    }
}

fn select_axes(coords: &[f64], axes: [usize; 2]) -> Option<Point> {
    let x = *coords.get(axes[0])?;
    let y = *coords.get(axes[1])?;
    Some(Point::new(x as f32, y as f32))
}

fn parse_outline(room: &str, label: &str, raw: &RawPolygon, axes: [usize; 2]) -> Result<Vec<Point>> {
    if raw.len() < 3 {
        return Err(Error::malformed(
            room,
            format!("{} has {} vertices, need at least 3", label, raw.len()),
        ));
    }
    raw.iter()
        .map(|v| {
            select_axes(v, axes).ok_or_else(|| {
                Error::malformed(
                    room,
                    format!("{} vertex {:?} lacks axes {:?}", label, v, axes),
                )
            })
        })
        .collect()
}

/// Room identifier: file name with the extension stripped
pub fn room_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// List the `.json` files directly inside `dir`, sorted by name
pub fn discover_rooms(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
