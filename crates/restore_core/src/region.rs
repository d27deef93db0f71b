//! Brush geometry: world rectangles, terrain-local normalization and
//! per-resolution cell rectangles.

use restore_data::Rect;
use serde::{Deserialize, Serialize};

/// Number of preview markers along each side of the brush footprint.
pub const PREVIEW_STEPS: i32 = 10;

/// World-space placement of a terrain on the x/z plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainBounds {
    /// World position of the terrain's minimum corner, `(x, z)`.
    pub origin: [f32; 2],
    /// World extent along x and z.
    pub size: [f32; 2],
}

impl TerrainBounds {
    #[must_use]
    pub const fn new(origin: [f32; 2], size: [f32; 2]) -> Self {
        Self { origin, size }
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.origin[0]
            && x <= self.origin[0] + self.size[0]
            && z >= self.origin[1]
            && z <= self.origin[1] + self.size[1]
    }

    /// Converts a world rectangle into fractional terrain coordinates.
    ///
    /// Each of the four corner coordinates is clamped to `[0, 1]`
    /// independently, so a rectangle entirely off the terrain collapses to a
    /// zero-area rectangle on the nearest edge.
    pub fn normalize(&self, world: &Rect) -> Rect {
        let x_min = (world.x - self.origin[0]) / self.size[0];
        let y_min = (world.y - self.origin[1]) / self.size[1];
        let x_max = x_min + world.width / self.size[0];
        let y_max = y_min + world.height / self.size[1];

        Rect::from_min_max(unit(x_min), unit(y_min), unit(x_max), unit(y_max))
    }
}

// NaN (zero-sized terrain) clamps to 0; `f32::clamp` would keep it NaN.
#[allow(clippy::manual_clamp)]
fn unit(value: f32) -> f32 {
    value.max(0.0).min(1.0)
}

/// Square brush footprint of side `size` centred on `center` (world x, z).
pub fn rect_from_brush(center: [f32; 2], size: f32) -> Rect {
    let half = size / 2.0;
    Rect::new(center[0] - half, center[1] - half, size, size)
}

/// World `(x, z)` points of the brush preview lattice that lie on at least
/// one of the given terrains.
pub fn preview_points(center: [f32; 2], size: f32, terrains: &[TerrainBounds]) -> Vec<[f32; 2]> {
    let step = size / PREVIEW_STEPS as f32;
    let half = PREVIEW_STEPS / 2;
    let mut points = Vec::new();

    for x in -half..half {
        for z in -half..half {
            let point = [center[0] + x as f32 * step, center[1] + z as f32 * step];
            if terrains.iter().any(|t| t.contains(point[0], point[1])) {
                points.push(point);
            }
        }
    }

    points
}

/// Integer cell rectangle in one grid's own resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    /// Maps a fractional rectangle onto a `width` x `height` grid.
    ///
    /// Corners are scaled and truncated, then clamped to the grid. Returns
    /// `None` when nothing is left.
    pub fn from_fraction(rect: &Rect, width: usize, height: usize) -> Option<Self> {
        let x = scale(rect.x, width);
        let y = scale(rect.y, height);
        let xx = scale(rect.x_max(), width);
        let yy = scale(rect.y_max(), height);

        Self::from_corners(x, y, xx, yy)
    }

    fn from_corners(x: usize, y: usize, xx: usize, yy: usize) -> Option<Self> {
        (xx > x && yy > y).then_some(Self {
            x,
            y,
            width: xx - x,
            height: yy - y,
        })
    }

    /// Shrinks the rectangle so it fits inside a `width` x `height` grid.
    pub fn clamp_to(&self, width: usize, height: usize) -> Option<Self> {
        Self::from_corners(
            self.x.min(width),
            self.y.min(height),
            (self.x + self.width).min(width),
            (self.y + self.height).min(height),
        )
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

fn scale(fraction: f32, resolution: usize) -> usize {
    // `as` saturates, so negative and NaN products land on 0.
    let cell = (fraction * resolution as f32) as i64;
    cell.clamp(0, resolution as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERRAIN: TerrainBounds = TerrainBounds::new([100.0, 200.0], [50.0, 50.0]);

    #[test]
    fn test_brush_rect_is_centred() {
        let rect = rect_from_brush([10.0, 20.0], 4.0);
        assert_eq!(rect, Rect::new(8.0, 18.0, 4.0, 4.0));
    }

    #[test]
    fn test_normalize_inside() {
        let rect = TERRAIN.normalize(&Rect::new(110.0, 210.0, 10.0, 5.0));
        assert!((rect.x - 0.2).abs() < 1e-6);
        assert!((rect.y - 0.2).abs() < 1e-6);
        assert!((rect.width - 0.2).abs() < 1e-6);
        assert!((rect.height - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_clamps_corners_independently() {
        let rect = TERRAIN.normalize(&Rect::new(90.0, 190.0, 20.0, 100.0));
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert!((rect.x_max() - 0.2).abs() < 1e-6);
        assert_eq!(rect.y_max(), 1.0);
    }

    #[test]
    fn test_normalize_outside_is_empty() {
        let rect = TERRAIN.normalize(&Rect::new(400.0, 210.0, 10.0, 10.0));
        assert_eq!(rect.x, 1.0);
        assert_eq!(rect.width, 0.0);
        assert!(rect.is_empty());
        assert!(CellRect::from_fraction(&rect, 33, 33).is_none());
    }

    #[test]
    fn test_zero_sized_terrain_normalizes_to_empty() {
        let flat = TerrainBounds::new([0.0, 0.0], [0.0, 0.0]);
        assert!(flat.normalize(&Rect::new(0.0, 0.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_unit_maps_nan_to_zero() {
        assert_eq!(unit(f32::NAN), 0.0);
        assert_eq!(unit(-0.5), 0.0);
        assert_eq!(unit(0.25), 0.25);
        assert_eq!(unit(f32::INFINITY), 1.0);
    }

    #[test]
    fn test_cell_rect_truncates() {
        let cells = CellRect::from_fraction(&Rect::new(0.1, 0.5, 0.5, 0.5), 10, 4).unwrap();
        assert_eq!(
            cells,
            CellRect {
                x: 1,
                y: 2,
                width: 5,
                height: 2
            }
        );
    }

    #[test]
    fn test_full_rect_covers_grid() {
        let cells = CellRect::from_fraction(&Rect::new(0.0, 0.0, 1.0, 1.0), 3, 3).unwrap();
        assert_eq!(cells.area(), 9);
    }

    #[test]
    fn test_clamp_to_smaller_grid() {
        let cells = CellRect {
            x: 2,
            y: 0,
            width: 4,
            height: 4,
        };
        assert_eq!(
            cells.clamp_to(4, 3),
            Some(CellRect {
                x: 2,
                y: 0,
                width: 2,
                height: 3
            })
        );
        assert_eq!(cells.clamp_to(2, 3), None);
    }

    #[test]
    fn test_preview_points_filtered_by_terrain() {
        let all = preview_points([125.0, 225.0], 10.0, &[TERRAIN]);
        assert_eq!(all.len(), 100);

        let edge = preview_points([100.0, 225.0], 10.0, &[TERRAIN]);
        // x offsets -5..=-1 fall off the terrain, 0..=4 stay on it.
        assert_eq!(edge.len(), 50);
        assert!(preview_points([0.0, 0.0], 10.0, &[TERRAIN]).is_empty());
    }
}
