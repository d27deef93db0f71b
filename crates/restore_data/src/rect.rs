use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with its origin at the minimum corner.
///
/// Used both for world-space brush footprints (x/z plane) and for
/// terrain-local fractional regions in `[0, 1]²`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_min_max(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self::new(x_min, y_min, x_max - x_min, y_max - y_min)
    }

    #[inline]
    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// Containment with both edges included.
    pub fn contains_inclusive(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x_max() && py >= self.y && py <= self.y_max()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_inclusive() {
        let rect = Rect::new(0.25, 0.25, 0.5, 0.5);
        assert!(rect.contains_inclusive(0.25, 0.25));
        assert!(rect.contains_inclusive(0.75, 0.75));
        assert!(!rect.contains_inclusive(0.76, 0.5));
    }

    #[test]
    fn test_from_min_max() {
        let rect = Rect::from_min_max(1.0, 2.0, 4.0, 3.0);
        assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 1.0));
        assert!(Rect::from_min_max(1.0, 1.0, 1.0, 2.0).is_empty());
    }
}
