//! Core data structures for terrain snapshots.
//!
//! Grids are owned flat buffers with explicit dimensions; snapshot types hold
//! everything captured from one or more terrains at backup time.

pub mod grid;
pub mod rect;
pub mod snapshot;

pub use grid::{Grid2, Grid3};
pub use rect::Rect;
pub use snapshot::{
    AllTerrainsSnapshot, Color32, DetailPrototypeIds, DiscreteLayer, TerrainSnapshot, TreeInstance,
};
