use crate::grid::{Grid2, Grid3};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color, as stored on placed instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const WHITE: Color32 = Color32::new(255, 255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A single placed object (tree) on a terrain.
///
/// `position` is terrain-local and fractional: `x` and `z` are in `[0, 1]`
/// across the terrain, `y` is the normalized height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeInstance {
    pub position: [f32; 3],
    pub width_scale: f32,
    pub height_scale: f32,
    pub rotation: f32,
    pub color: Color32,
    pub lightmap_color: Color32,
    /// Index into the owning terrain's tree prototype list.
    pub prototype_index: i32,
}

impl TreeInstance {
    /// An instance with unit scale, no rotation and white colors.
    #[must_use]
    pub fn at(position: [f32; 3], prototype_index: i32) -> Self {
        Self {
            position,
            width_scale: 1.0,
            height_scale: 1.0,
            rotation: 0.0,
            color: Color32::WHITE,
            lightmap_color: Color32::WHITE,
            prototype_index,
        }
    }
}

/// Content identifiers of one live detail prototype.
///
/// Either identifier may be empty when the host could not resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailPrototypeIds {
    pub texture_id: String,
    pub object_id: String,
}

impl DetailPrototypeIds {
    #[must_use]
    pub fn new(texture_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            texture_id: texture_id.into(),
            object_id: object_id.into(),
        }
    }
}

/// Captured density grid of one detail prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteLayer {
    pub texture_id: String,
    pub object_id: String,
    pub density: Grid2<i32>,
}

/// Full captured state of one terrain.
///
/// Grid dimensions are fixed at construction. At capture time the depth of
/// `weighted_layers` equals `weighted_layer_ids.len()` and `discrete_layers`
/// has one entry per live detail prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSnapshot {
    pub tree_prototype_ids: Vec<String>,
    pub weighted_layer_ids: Vec<String>,
    /// Alphamap weights, `height` rows by `width` columns by layer.
    pub weighted_layers: Grid3<f32>,
    /// Square heightmap, `heightmap_resolution` on each side.
    pub heights: Grid2<f32>,
    pub detail_width: usize,
    pub detail_height: usize,
    pub discrete_layers: Vec<DiscreteLayer>,
    pub instances: Vec<TreeInstance>,
}

impl TerrainSnapshot {
    #[inline]
    pub fn alphamap_width(&self) -> usize {
        self.weighted_layers.width()
    }

    #[inline]
    pub fn alphamap_height(&self) -> usize {
        self.weighted_layers.height()
    }

    #[inline]
    pub fn heightmap_resolution(&self) -> usize {
        self.heights.width()
    }
}

/// One snapshot per configured terrain, index-aligned with the live list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllTerrainsSnapshot {
    pub terrains: Vec<TerrainSnapshot>,
}

impl AllTerrainsSnapshot {
    #[must_use]
    pub fn new(terrains: Vec<TerrainSnapshot>) -> Self {
        Self { terrains }
    }

    pub fn len(&self) -> usize {
        self.terrains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrains.is_empty()
    }
}
