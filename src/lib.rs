//! # Terrain Restore
//!
//! Snapshot terrains to backup files and paint regions of a backup back onto
//! live terrains.
//!
//! The workspace is split into:
//! - `restore_data`: grids, rectangles and the snapshot model
//! - `restore_core`: remapping, region geometry, the merger and the session
//! - `restore_io`: the binary codec and the backup store
//!
//! [`TerrainRestore`] ties them together behind a small command interface.

pub mod app;

pub use app::TerrainRestore;
pub use restore_core::{
    init_logging, AppConfig, LiveTerrain, MemoryTerrain, MergeReport, RestoreOptions, TerrainBounds,
};
pub use restore_data::{AllTerrainsSnapshot, Rect};
