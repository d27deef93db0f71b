//! Host collaborator interface for live terrain data.
//!
//! The editor owns the live grids; the restore core only reads and writes
//! them through [`LiveTerrain`]. [`MemoryTerrain`] is a plain in-memory
//! implementation used by tools and tests.

use crate::region::TerrainBounds;
use restore_data::{DetailPrototypeIds, Grid2, Grid3, TerrainSnapshot, TreeInstance};

/// Read/write access to one live terrain.
///
/// Sub-rectangle reads return a grid of exactly the requested size; cells
/// outside the terrain read as zero. Writes ignore cells outside the terrain.
pub trait LiveTerrain {
    fn bounds(&self) -> TerrainBounds;

    fn heightmap_resolution(&self) -> usize;
    fn heights(&self, x: usize, y: usize, width: usize, height: usize) -> Grid2<f32>;
    fn set_heights(&mut self, x: usize, y: usize, heights: &Grid2<f32>);

    /// Alphamap `(width, height)` in cells.
    fn alphamap_size(&self) -> (usize, usize);
    fn weighted_layer_ids(&self) -> Vec<String>;
    fn alphamaps(&self, x: usize, y: usize, width: usize, height: usize) -> Grid3<f32>;
    fn set_alphamaps(&mut self, x: usize, y: usize, weights: &Grid3<f32>);

    /// Detail `(width, height)` in cells.
    fn detail_size(&self) -> (usize, usize);
    fn detail_prototype_ids(&self) -> Vec<DetailPrototypeIds>;
    fn detail_layer(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        layer: usize,
    ) -> Grid2<i32>;
    fn set_detail_layer(&mut self, x: usize, y: usize, layer: usize, density: &Grid2<i32>);

    fn tree_prototype_ids(&self) -> Vec<String>;
    fn tree_instances(&self) -> Vec<TreeInstance>;
    fn set_tree_instances(&mut self, instances: Vec<TreeInstance>);

    /// Toggles the terrain's collision/physics queries.
    fn set_collision_enabled(&mut self, enabled: bool);
}

/// In-memory terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTerrain {
    pub bounds: TerrainBounds,
    pub heights: Grid2<f32>,
    pub weighted_layer_ids: Vec<String>,
    pub alphamaps: Grid3<f32>,
    pub detail_width: usize,
    pub detail_height: usize,
    pub detail_prototypes: Vec<DetailPrototypeIds>,
    pub detail_layers: Vec<Grid2<i32>>,
    pub tree_prototype_ids: Vec<String>,
    pub instances: Vec<TreeInstance>,
    pub collision_enabled: bool,
    /// Number of collision state changes, for observing merge bracketing.
    pub collision_toggles: usize,
}

impl MemoryTerrain {
    /// A flat terrain with no prototypes.
    #[must_use]
    pub fn new(
        bounds: TerrainBounds,
        heightmap_resolution: usize,
        alphamap_size: (usize, usize),
        detail_size: (usize, usize),
    ) -> Self {
        Self {
            bounds,
            heights: Grid2::new(heightmap_resolution, heightmap_resolution),
            weighted_layer_ids: Vec::new(),
            alphamaps: Grid3::new(alphamap_size.0, alphamap_size.1, 0),
            detail_width: detail_size.0,
            detail_height: detail_size.1,
            detail_prototypes: Vec::new(),
            detail_layers: Vec::new(),
            tree_prototype_ids: Vec::new(),
            instances: Vec::new(),
            collision_enabled: true,
            collision_toggles: 0,
        }
    }

    /// Replaces the weighted layers; all weights are reset to zero.
    #[must_use]
    pub fn with_weighted_layers(mut self, ids: &[&str]) -> Self {
        self.weighted_layer_ids = ids.iter().map(|s| s.to_string()).collect();
        self.alphamaps = Grid3::new(self.alphamaps.width(), self.alphamaps.height(), ids.len());
        self
    }

    /// Replaces the detail prototypes; all densities are reset to zero.
    #[must_use]
    pub fn with_detail_prototypes(mut self, prototypes: Vec<DetailPrototypeIds>) -> Self {
        self.detail_layers = prototypes
            .iter()
            .map(|_| Grid2::new(self.detail_width, self.detail_height))
            .collect();
        self.detail_prototypes = prototypes;
        self
    }

    #[must_use]
    pub fn with_tree_prototypes(mut self, ids: &[&str]) -> Self {
        self.tree_prototype_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Rebuilds a live terrain from a captured snapshot.
    ///
    /// Detail prototypes take the identifiers stored on each discrete layer.
    #[must_use]
    pub fn from_snapshot(bounds: TerrainBounds, snapshot: &TerrainSnapshot) -> Self {
        Self {
            bounds,
            heights: snapshot.heights.clone(),
            weighted_layer_ids: snapshot.weighted_layer_ids.clone(),
            alphamaps: snapshot.weighted_layers.clone(),
            detail_width: snapshot.detail_width,
            detail_height: snapshot.detail_height,
            detail_prototypes: snapshot
                .discrete_layers
                .iter()
                .map(|layer| DetailPrototypeIds::new(&layer.texture_id, &layer.object_id))
                .collect(),
            detail_layers: snapshot
                .discrete_layers
                .iter()
                .map(|layer| layer.density.clone())
                .collect(),
            tree_prototype_ids: snapshot.tree_prototype_ids.clone(),
            instances: snapshot.instances.clone(),
            collision_enabled: true,
            collision_toggles: 0,
        }
    }
}

impl LiveTerrain for MemoryTerrain {
    fn bounds(&self) -> TerrainBounds {
        self.bounds
    }

    fn heightmap_resolution(&self) -> usize {
        self.heights.width()
    }

    fn heights(&self, x: usize, y: usize, width: usize, height: usize) -> Grid2<f32> {
        self.heights.copy_region(x, y, width, height)
    }

    fn set_heights(&mut self, x: usize, y: usize, heights: &Grid2<f32>) {
        self.heights.paste(x, y, heights);
    }

    fn alphamap_size(&self) -> (usize, usize) {
        (self.alphamaps.width(), self.alphamaps.height())
    }

    fn weighted_layer_ids(&self) -> Vec<String> {
        self.weighted_layer_ids.clone()
    }

    fn alphamaps(&self, x: usize, y: usize, width: usize, height: usize) -> Grid3<f32> {
        let depth = self.alphamaps.depth();
        let mut out = Grid3::new(width, height, depth);
        for yy in 0..height {
            for xx in 0..width {
                if let Some(cell) = self.alphamaps.cell(x + xx, y + yy) {
                    for (z, weight) in cell.iter().enumerate() {
                        out.set(xx, yy, z, *weight);
                    }
                }
            }
        }
        out
    }

    fn set_alphamaps(&mut self, x: usize, y: usize, weights: &Grid3<f32>) {
        self.alphamaps.paste(x, y, weights);
    }

    fn detail_size(&self) -> (usize, usize) {
        (self.detail_width, self.detail_height)
    }

    fn detail_prototype_ids(&self) -> Vec<DetailPrototypeIds> {
        self.detail_prototypes.clone()
    }

    fn detail_layer(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        layer: usize,
    ) -> Grid2<i32> {
        match self.detail_layers.get(layer) {
            Some(grid) => grid.copy_region(x, y, width, height),
            None => Grid2::new(width, height),
        }
    }

    fn set_detail_layer(&mut self, x: usize, y: usize, layer: usize, density: &Grid2<i32>) {
        if let Some(grid) = self.detail_layers.get_mut(layer) {
            grid.paste(x, y, density);
        }
    }

    fn tree_prototype_ids(&self) -> Vec<String> {
        self.tree_prototype_ids.clone()
    }

    fn tree_instances(&self) -> Vec<TreeInstance> {
        self.instances.clone()
    }

    fn set_tree_instances(&mut self, instances: Vec<TreeInstance>) {
        self.instances = instances;
    }

    fn set_collision_enabled(&mut self, enabled: bool) {
        if self.collision_enabled != enabled {
            self.collision_toggles += 1;
        }
        self.collision_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: TerrainBounds = TerrainBounds::new([0.0, 0.0], [10.0, 10.0]);

    fn terrain() -> MemoryTerrain {
        MemoryTerrain::new(BOUNDS, 3, (2, 2), (2, 2))
    }

    #[test]
    fn test_alphamap_reads_pad_outside_cells() {
        let mut t = terrain().with_weighted_layers(&["a", "b"]);
        t.alphamaps.set(1, 1, 1, 0.5);
        let block = t.alphamaps(1, 1, 2, 2);
        assert_eq!(block.depth(), 2);
        assert_eq!(block.get(0, 0, 1), Some(&0.5));
        assert_eq!(block.get(1, 1, 1), Some(&0.0));
    }

    #[test]
    fn test_detail_layer_out_of_range_reads_zero() {
        let t = terrain().with_detail_prototypes(vec![DetailPrototypeIds::new("t", "o")]);
        assert_eq!(t.detail_layer(0, 0, 2, 2, 5), Grid2::new(2, 2));
    }

    #[test]
    fn test_collision_toggles_counted_on_change() {
        let mut t = terrain();
        t.set_collision_enabled(true);
        t.set_collision_enabled(false);
        t.set_collision_enabled(true);
        assert_eq!(t.collision_toggles, 2);
        assert!(t.collision_enabled);
    }
}
