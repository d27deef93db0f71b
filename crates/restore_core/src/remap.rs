//! Prototype remapping between a backup and the live terrain.
//!
//! Backups reference prototypes by content identifier, so the live terrain may
//! have reordered, added or removed prototypes since the backup was taken.
//! Every lookup is a linear scan returning the first match in declaration
//! order. Empty identifiers never match anything.

use restore_data::{DetailPrototypeIds, DiscreteLayer};

/// Finds the backup layer that corresponds to a live detail prototype.
///
/// The object identifier is tried first; if it is empty or has no match the
/// texture identifier is tried.
pub fn match_discrete_layer(
    layers: &[DiscreteLayer],
    target_object_id: &str,
    target_texture_id: &str,
) -> Option<usize> {
    let by_object = if target_object_id.is_empty() {
        None
    } else {
        layers
            .iter()
            .position(|layer| layer.object_id == target_object_id)
    };

    by_object.or_else(|| {
        if target_texture_id.is_empty() {
            None
        } else {
            layers
                .iter()
                .position(|layer| layer.texture_id == target_texture_id)
        }
    })
}

/// Convenience wrapper taking the live prototype's identifier pair.
pub fn match_detail_prototype(
    layers: &[DiscreteLayer],
    live: &DetailPrototypeIds,
) -> Option<usize> {
    match_discrete_layer(layers, &live.object_id, &live.texture_id)
}

/// Finds the first backup weighted layer with the given identifier.
pub fn match_weighted_layer(ids: &[String], target_id: &str) -> Option<usize> {
    if target_id.is_empty() {
        return None;
    }
    ids.iter().position(|id| id == target_id)
}

/// Maps every backup tree prototype index to a live index.
///
/// `None` marks a prototype that no longer exists on the live terrain;
/// instances referencing it are dropped by the merger.
pub fn build_tree_remap(backup_ids: &[String], live_ids: &[String]) -> Vec<Option<usize>> {
    backup_ids
        .iter()
        .map(|backup_id| {
            if backup_id.is_empty() {
                None
            } else {
                live_ids.iter().position(|live_id| live_id == backup_id)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use restore_data::Grid2;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn layer(texture_id: &str, object_id: &str) -> DiscreteLayer {
        DiscreteLayer {
            texture_id: texture_id.to_string(),
            object_id: object_id.to_string(),
            density: Grid2::new(1, 1),
        }
    }

    #[test]
    fn test_tree_remap_reorders_and_drops() {
        let remap = build_tree_remap(&ids(&["a", "b", "c"]), &ids(&["c", "a"]));
        assert_eq!(remap, vec![Some(1), None, Some(0)]);
    }

    #[test]
    fn test_tree_remap_ignores_unresolved_ids() {
        let remap = build_tree_remap(&ids(&["", "a"]), &ids(&["", "a"]));
        assert_eq!(remap, vec![None, Some(1)]);
    }

    #[test]
    fn test_weighted_layer_first_match() {
        let layers = ids(&["grass", "rock", "grass"]);
        assert_eq!(match_weighted_layer(&layers, "grass"), Some(0));
        assert_eq!(match_weighted_layer(&layers, "rock"), Some(1));
        assert_eq!(match_weighted_layer(&layers, "sand"), None);
        assert_eq!(match_weighted_layer(&ids(&[""]), ""), None);
    }

    #[test]
    fn test_discrete_layer_prefers_object_id() {
        let layers = vec![layer("tex-a", "obj-b"), layer("tex-b", "obj-a")];
        assert_eq!(match_discrete_layer(&layers, "obj-a", "tex-a"), Some(1));
    }

    #[test]
    fn test_discrete_layer_falls_back_to_texture_id() {
        let layers = vec![layer("tex-a", ""), layer("tex-b", "obj-b")];
        assert_eq!(match_discrete_layer(&layers, "obj-x", "tex-a"), Some(0));
        assert_eq!(match_discrete_layer(&layers, "", "tex-b"), Some(1));
        assert_eq!(match_discrete_layer(&layers, "", ""), None);
    }

    #[test]
    fn test_detail_prototype_wrapper() {
        let layers = vec![layer("tex-a", "obj-a")];
        let live = DetailPrototypeIds::new("tex-z", "obj-a");
        assert_eq!(match_detail_prototype(&layers, &live), Some(0));
    }
}
