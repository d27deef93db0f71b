//! Full-state capture of live terrains into snapshots.

use crate::host::LiveTerrain;
use restore_data::{AllTerrainsSnapshot, DiscreteLayer, TerrainSnapshot};

/// Deep-copies everything the restore paths need from one terrain.
pub fn capture_terrain<T: LiveTerrain + ?Sized>(terrain: &T) -> TerrainSnapshot {
    let resolution = terrain.heightmap_resolution();
    let (alphamap_width, alphamap_height) = terrain.alphamap_size();
    let (detail_width, detail_height) = terrain.detail_size();

    let discrete_layers = terrain
        .detail_prototype_ids()
        .into_iter()
        .enumerate()
        .map(|(n, ids)| DiscreteLayer {
            texture_id: ids.texture_id,
            object_id: ids.object_id,
            density: terrain.detail_layer(0, 0, detail_width, detail_height, n),
        })
        .collect();

    TerrainSnapshot {
        tree_prototype_ids: terrain.tree_prototype_ids(),
        weighted_layer_ids: terrain.weighted_layer_ids(),
        weighted_layers: terrain.alphamaps(0, 0, alphamap_width, alphamap_height),
        heights: terrain.heights(0, 0, resolution, resolution),
        detail_width,
        detail_height,
        discrete_layers,
        instances: terrain.tree_instances(),
    }
}

/// Captures every terrain of the group, in order.
pub fn capture_all<T: LiveTerrain>(terrains: &[T]) -> AllTerrainsSnapshot {
    let snapshot = AllTerrainsSnapshot::new(terrains.iter().map(capture_terrain).collect());
    tracing::debug!(terrains = snapshot.len(), "Captured terrain state");
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryTerrain;
    use crate::region::TerrainBounds;
    use restore_data::{DetailPrototypeIds, TreeInstance};

    #[test]
    fn test_capture_then_rebuild_is_identical() {
        let bounds = TerrainBounds::new([0.0, 0.0], [8.0, 8.0]);
        let mut terrain = MemoryTerrain::new(bounds, 3, (2, 2), (2, 1))
            .with_weighted_layers(&["grass", "rock"])
            .with_detail_prototypes(vec![DetailPrototypeIds::new("tex", "mesh")])
            .with_tree_prototypes(&["oak"]);
        terrain.heights.set(1, 2, 0.75);
        terrain.alphamaps.set(1, 0, 1, 1.0);
        terrain.detail_layers[0].set(1, 0, 4);
        terrain.instances.push(TreeInstance::at([0.5, 0.0, 0.5], 0));

        let snapshot = capture_terrain(&terrain);
        assert_eq!(snapshot.heightmap_resolution(), 3);
        let depth = snapshot.weighted_layers.depth();
        assert_eq!(depth, snapshot.weighted_layer_ids.len());
        assert_eq!(snapshot.discrete_layers[0].object_id, "mesh");
        assert_eq!(snapshot.discrete_layers[0].density.get(1, 0), Some(&4));

        let rebuilt = MemoryTerrain::from_snapshot(terrain.bounds, &snapshot);
        assert_eq!(rebuilt, terrain);
    }
}
