//! JSON summaries of backup files.

use crate::error::Result;
use restore_data::{AllTerrainsSnapshot, TerrainSnapshot};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Dimensions and identifiers of one captured terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSummary {
    pub heightmap_resolution: usize,
    pub alphamap_size: [usize; 2],
    pub detail_size: [usize; 2],
    pub weighted_layer_ids: Vec<String>,
    /// `(texture_id, object_id)` per discrete layer.
    pub discrete_layer_ids: Vec<(String, String)>,
    pub tree_prototype_ids: Vec<String>,
    pub instance_count: usize,
    /// Instances whose prototype index does not resolve to an identifier.
    pub dangling_instances: usize,
}

impl From<&TerrainSnapshot> for TerrainSummary {
    fn from(terrain: &TerrainSnapshot) -> Self {
        let resolves = |index: i32| {
            usize::try_from(index)
                .ok()
                .and_then(|n| terrain.tree_prototype_ids.get(n))
                .is_some_and(|id| !id.is_empty())
        };
        let dangling_instances = terrain
            .instances
            .iter()
            .filter(|tree| !resolves(tree.prototype_index))
            .count();

        Self {
            heightmap_resolution: terrain.heightmap_resolution(),
            alphamap_size: [terrain.alphamap_width(), terrain.alphamap_height()],
            detail_size: [terrain.detail_width, terrain.detail_height],
            weighted_layer_ids: terrain.weighted_layer_ids.clone(),
            discrete_layer_ids: terrain
                .discrete_layers
                .iter()
                .map(|layer| (layer.texture_id.clone(), layer.object_id.clone()))
                .collect(),
            tree_prototype_ids: terrain.tree_prototype_ids.clone(),
            instance_count: terrain.instances.len(),
            dangling_instances,
        }
    }
}

/// Summary of a whole backup file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub id: String,
    pub size_bytes: usize,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
    pub terrains: Vec<TerrainSummary>,
}

impl SnapshotSummary {
    pub fn new(id: impl Into<String>, bytes: &[u8], snapshot: &AllTerrainsSnapshot) -> Self {
        Self {
            id: id.into(),
            size_bytes: bytes.len(),
            sha256: digest(bytes),
            terrains: snapshot.terrains.iter().map(TerrainSummary::from).collect(),
        }
    }
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use restore_data::{Grid2, Grid3, TreeInstance};

    fn terrain() -> TerrainSnapshot {
        TerrainSnapshot {
            tree_prototype_ids: vec!["oak".into(), "".into()],
            weighted_layer_ids: vec!["grass".into()],
            weighted_layers: Grid3::new(4, 2, 1),
            heights: Grid2::new(5, 5),
            detail_width: 3,
            detail_height: 6,
            discrete_layers: vec![],
            instances: vec![
                TreeInstance::at([0.5, 0.0, 0.5], 0),
                TreeInstance::at([0.5, 0.0, 0.5], 1),
                TreeInstance::at([0.5, 0.0, 0.5], 9),
            ],
        }
    }

    #[test]
    fn test_terrain_summary() {
        let summary = TerrainSummary::from(&terrain());
        assert_eq!(summary.heightmap_resolution, 5);
        assert_eq!(summary.alphamap_size, [4, 2]);
        assert_eq!(summary.detail_size, [3, 6]);
        assert_eq!(summary.instance_count, 3);
        assert_eq!(summary.dangling_instances, 2);
    }

    #[test]
    fn test_digest_known_value() {
        assert_eq!(
            digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_summary_json_fields() {
        let snapshot = AllTerrainsSnapshot::new(vec![terrain()]);
        let summary = SnapshotSummary::new("id", &[1, 2, 3], &snapshot);
        let json = to_json_pretty(&summary).unwrap();

        assert!(json.contains("\"size_bytes\": 3"));
        assert!(json.contains("\"dangling_instances\": 2"));
        let parsed: SnapshotSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
