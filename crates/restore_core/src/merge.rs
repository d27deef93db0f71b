//! Region-scoped restore of a backup into live terrains.
//!
//! A world-space rectangle is normalized per terrain, mapped onto each data
//! kind's own resolution and the covered cells are overwritten from the
//! backup. Prototype references are resolved by content identifier.
//!
//! Weighted layers and detail layers deliberately differ for live layers that
//! have no counterpart in the backup: weights are written as zero inside the
//! region (every cell's weight vector is replaced wholesale), while detail
//! densities are left as they are.

use crate::host::LiveTerrain;
use crate::region::CellRect;
use crate::remap::{build_tree_remap, match_detail_prototype, match_weighted_layer};
use restore_data::{AllTerrainsSnapshot, Grid3, Rect, TerrainSnapshot, TreeInstance};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which data kinds a restore writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreOptions {
    pub height: bool,
    pub texture: bool,
    pub details: bool,
    pub trees: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            height: true,
            texture: true,
            details: true,
            trees: true,
        }
    }
}

/// Grid kinds whose resolution can differ between backup and live data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Height,
    Weights,
    Details,
}

/// The live grid is smaller than the backup's along at least one axis, so the
/// restored rectangle had to be clamped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?} grid of terrain {terrain} is {live:?} live, {backup:?} in backup; clamped")]
pub struct DimensionMismatch {
    pub terrain: usize,
    pub kind: GridKind,
    pub backup: (usize, usize),
    pub live: (usize, usize),
}

/// What a single restore call changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub terrains_visited: usize,
    /// Live terrains or backup entries left without a partner.
    pub terrains_unpaired: usize,
    pub height_cells: usize,
    pub weight_cells: usize,
    pub detail_cells: usize,
    pub instances_removed: usize,
    pub instances_inserted: usize,
    /// Instances dropped because their prototype is missing on the live terrain.
    pub instances_dropped: usize,
    pub mismatches: Vec<DimensionMismatch>,
}

impl MergeReport {
    /// True when no live data was written.
    pub fn is_noop(&self) -> bool {
        self.height_cells == 0
            && self.weight_cells == 0
            && self.detail_cells == 0
            && self.instances_removed == 0
            && self.instances_inserted == 0
    }
}

/// Restores `world` from `backup` into every terrain of the group.
///
/// Terrains are paired with backup entries by position. Collision is disabled
/// on all terrains for the whole merge and re-enabled afterwards.
pub fn restore_region<T: LiveTerrain>(
    terrains: &mut [T],
    backup: &AllTerrainsSnapshot,
    world: &Rect,
    options: RestoreOptions,
) -> MergeReport {
    let mut report = MergeReport {
        terrains_unpaired: terrains.len().abs_diff(backup.len()),
        ..MergeReport::default()
    };

    for terrain in terrains.iter_mut() {
        terrain.set_collision_enabled(false);
    }

    for (index, (terrain, snapshot)) in terrains.iter_mut().zip(&backup.terrains).enumerate() {
        let rect = terrain.bounds().normalize(world);
        let mut merger = TerrainMerge {
            index,
            terrain,
            snapshot,
            rect,
            report: &mut report,
        };

        if options.texture {
            merger.weights();
        }
        if options.height {
            merger.heights();
        }
        if options.details {
            merger.details();
        }
        if options.trees {
            merger.trees();
        }
        report.terrains_visited += 1;
    }

    for terrain in terrains.iter_mut() {
        terrain.set_collision_enabled(true);
    }

    for mismatch in &report.mismatches {
        tracing::warn!("{mismatch}");
    }
    if report.instances_dropped > 0 {
        tracing::warn!(
            dropped = report.instances_dropped,
            "Backup instances reference tree prototypes missing on the live terrain"
        );
    }
    tracing::debug!(
        height = report.height_cells,
        weights = report.weight_cells,
        details = report.detail_cells,
        removed = report.instances_removed,
        inserted = report.instances_inserted,
        "Region restored"
    );

    report
}

struct TerrainMerge<'a, T: ?Sized> {
    index: usize,
    terrain: &'a mut T,
    snapshot: &'a TerrainSnapshot,
    rect: Rect,
    report: &'a mut MergeReport,
}

impl<T: LiveTerrain + ?Sized> TerrainMerge<'_, T> {
    /// Cell rectangle in backup resolution, clamped to the live grid.
    fn cells(
        &mut self,
        kind: GridKind,
        backup: (usize, usize),
        live: (usize, usize),
    ) -> Option<CellRect> {
        let cells = CellRect::from_fraction(&self.rect, backup.0, backup.1)?;
        if backup == live {
            return Some(cells);
        }

        let clamped = cells.clamp_to(live.0, live.1);
        if clamped != Some(cells) {
            self.report.mismatches.push(DimensionMismatch {
                terrain: self.index,
                kind,
                backup,
                live,
            });
        }
        clamped
    }

    fn weights(&mut self) {
        let snapshot = self.snapshot;
        let backup_size = (snapshot.alphamap_width(), snapshot.alphamap_height());
        let live_size = self.terrain.alphamap_size();
        let Some(cells) = self.cells(GridKind::Weights, backup_size, live_size) else {
            return;
        };

        let backup = &snapshot.weighted_layers;
        let live_ids = self.terrain.weighted_layer_ids();
        let mut staging = Grid3::<f32>::new(cells.width, cells.height, live_ids.len());

        for (z, id) in live_ids.iter().enumerate() {
            let Some(source) = match_weighted_layer(&snapshot.weighted_layer_ids, id) else {
                continue;
            };
            for yy in 0..cells.height {
                for xx in 0..cells.width {
                    if let Some(weight) = backup.get(cells.x + xx, cells.y + yy, source) {
                        staging.set(xx, yy, z, *weight);
                    }
                }
            }
        }

        self.terrain.set_alphamaps(cells.x, cells.y, &staging);
        self.report.weight_cells += cells.area();
    }

    fn heights(&mut self) {
        let resolution = self.snapshot.heightmap_resolution();
        let live = self.terrain.heightmap_resolution();
        let backup_size = (resolution, resolution);
        let Some(cells) = self.cells(GridKind::Height, backup_size, (live, live)) else {
            return;
        };

        let heights = &self.snapshot.heights;
        let staging = heights.copy_region(cells.x, cells.y, cells.width, cells.height);
        self.terrain.set_heights(cells.x, cells.y, &staging);
        self.report.height_cells += cells.area();
    }

    fn details(&mut self) {
        let backup_size = (self.snapshot.detail_width, self.snapshot.detail_height);
        let live_size = self.terrain.detail_size();
        let Some(cells) = self.cells(GridKind::Details, backup_size, live_size) else {
            return;
        };

        let layers = &self.snapshot.discrete_layers;
        for (n, prototype) in self.terrain.detail_prototype_ids().iter().enumerate() {
            let Some(source) = match_detail_prototype(layers, prototype) else {
                continue;
            };
            let density = &layers[source].density;
            let staging = density.copy_region(cells.x, cells.y, cells.width, cells.height);
            self.terrain.set_detail_layer(cells.x, cells.y, n, &staging);
            self.report.detail_cells += cells.area();
        }
    }

    fn trees(&mut self) {
        let rect = self.rect;
        if rect.is_empty() {
            return;
        }

        let live = self.terrain.tree_instances();
        let before = live.len();
        let mut instances: Vec<TreeInstance> = live
            .into_iter()
            .filter(|tree| {
                let [x, _, z] = tree.position;
                x < rect.x || x > rect.x_max() || z < rect.y || z > rect.y_max()
            })
            .collect();
        self.report.instances_removed += before - instances.len();

        let remap = build_tree_remap(
            &self.snapshot.tree_prototype_ids,
            &self.terrain.tree_prototype_ids(),
        );

        for tree in &self.snapshot.instances {
            let [x, _, z] = tree.position;
            if !rect.contains_inclusive(x, z) {
                continue;
            }

            let live_index = usize::try_from(tree.prototype_index)
                .ok()
                .and_then(|backup_index| remap.get(backup_index).copied().flatten())
                .and_then(|live_index| i32::try_from(live_index).ok());

            match live_index {
                Some(prototype_index) => {
                    instances.push(TreeInstance {
                        prototype_index,
                        ..*tree
                    });
                    self.report.instances_inserted += 1;
                }
                None => self.report.instances_dropped += 1,
            }
        }

        self.terrain.set_tree_instances(instances);
    }
}
