pub mod macros;

use restore_core::region::TerrainBounds;
use restore_core::{AppConfig, MemoryTerrain};
use restore_data::{DetailPrototypeIds, TreeInstance};
use std::path::Path;

type TerrainMod = Box<dyn FnOnce(&mut MemoryTerrain)>;

#[allow(dead_code)]
pub struct TerrainBuilder {
    bounds: TerrainBounds,
    heightmap_resolution: usize,
    alphamap_size: (usize, usize),
    detail_size: (usize, usize),
    weighted_layers: Vec<&'static str>,
    detail_prototypes: Vec<DetailPrototypeIds>,
    tree_prototypes: Vec<&'static str>,
    mods: Vec<TerrainMod>,
}

#[allow(dead_code)]
impl TerrainBuilder {
    pub fn new() -> Self {
        Self {
            bounds: TerrainBounds::new([0.0, 0.0], [3.0, 3.0]),
            heightmap_resolution: 3,
            alphamap_size: (3, 3),
            detail_size: (3, 3),
            weighted_layers: Vec::new(),
            detail_prototypes: Vec::new(),
            tree_prototypes: Vec::new(),
            mods: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, origin: [f32; 2], size: [f32; 2]) -> Self {
        self.bounds = TerrainBounds::new(origin, size);
        self
    }

    pub fn with_resolution(mut self, heightmap: usize, alphamap: usize, detail: usize) -> Self {
        self.heightmap_resolution = heightmap;
        self.alphamap_size = (alphamap, alphamap);
        self.detail_size = (detail, detail);
        self
    }

    pub fn with_weighted_layers(mut self, ids: &[&'static str]) -> Self {
        self.weighted_layers = ids.to_vec();
        self
    }

    pub fn with_detail_prototype(mut self, texture_id: &str, object_id: &str) -> Self {
        self.detail_prototypes
            .push(DetailPrototypeIds::new(texture_id, object_id));
        self
    }

    pub fn with_tree_prototypes(mut self, ids: &[&'static str]) -> Self {
        self.tree_prototypes = ids.to_vec();
        self
    }

    pub fn with_heights(mut self, height: f32) -> Self {
        self.mods
            .push(Box::new(move |terrain| terrain.heights.fill(height)));
        self
    }

    /// Sets every cell of one weighted layer.
    pub fn with_weight(mut self, layer: usize, weight: f32) -> Self {
        self.mods.push(Box::new(move |terrain| {
            for y in 0..terrain.alphamaps.height() {
                for x in 0..terrain.alphamaps.width() {
                    terrain.alphamaps.set(x, y, layer, weight);
                }
            }
        }));
        self
    }

    pub fn with_density(mut self, layer: usize, density: i32) -> Self {
        self.mods.push(Box::new(move |terrain| {
            if let Some(grid) = terrain.detail_layers.get_mut(layer) {
                grid.fill(density);
            }
        }));
        self
    }

    pub fn with_tree(mut self, position: [f32; 3], prototype_index: i32) -> Self {
        self.mods.push(Box::new(move |terrain| {
            terrain
                .instances
                .push(TreeInstance::at(position, prototype_index));
        }));
        self
    }

    pub fn build(self) -> MemoryTerrain {
        let mut terrain = MemoryTerrain::new(
            self.bounds,
            self.heightmap_resolution,
            self.alphamap_size,
            self.detail_size,
        )
        .with_weighted_layers(&self.weighted_layers)
        .with_detail_prototypes(self.detail_prototypes)
        .with_tree_prototypes(&self.tree_prototypes);

        for modifier in self.mods {
            modifier(&mut terrain);
        }
        terrain
    }
}

/// Default config pointing the store at `dir`.
#[allow(dead_code)]
pub fn config_in(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.store.directory = dir.to_path_buf();
    config.store.scene_name = "TestScene".to_string();
    config
}
