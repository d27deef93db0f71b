//! # Restore Core
//!
//! Region-scoped restore of terrain data from a captured backup.
//!
//! This crate contains the pure logic of restore painting:
//! - Prototype remapping by content identifier
//! - Brush and region geometry (world rectangle to per-grid cells)
//! - The region merger for heights, weighted layers, detail layers and trees
//! - The host interface for live terrains and an in-memory implementation
//! - Full-state capture into snapshots
//! - The restore session with pointer gating
//! - Configuration, counters and logging setup
//!
//! ## Example
//!
//! ```
//! use restore_core::capture::capture_all;
//! use restore_core::host::MemoryTerrain;
//! use restore_core::merge::{restore_region, RestoreOptions};
//! use restore_core::region::TerrainBounds;
//! use restore_data::Rect;
//!
//! let bounds = TerrainBounds::new([0.0, 0.0], [4.0, 4.0]);
//! let mut saved = MemoryTerrain::new(bounds, 3, (2, 2), (2, 2));
//! saved.heights.fill(1.0);
//! let backup = capture_all(&[saved]);
//!
//! let mut live = vec![MemoryTerrain::new(bounds, 3, (2, 2), (2, 2))];
//! let region = Rect::new(0.0, 0.0, 4.0, 4.0);
//! let report = restore_region(&mut live, &backup, &region, RestoreOptions::default());
//! assert_eq!(report.height_cells, 9);
//! ```

/// Snapshot capture from live terrains
pub mod capture;
/// TOML configuration
pub mod config;
/// Live terrain interface and in-memory terrain
pub mod host;
/// The region merger
pub mod merge;
/// Restore counters and logging setup
pub mod metrics;
/// World rectangles, brush footprints and cell rectangles
pub mod region;
/// Identifier-based prototype matching
pub mod remap;
/// Active backup slot and pointer gating
pub mod session;

pub use config::{AppConfig, StringPrefix};
pub use host::{LiveTerrain, MemoryTerrain};
pub use merge::{restore_region, DimensionMismatch, MergeReport, RestoreOptions};
pub use metrics::{init_logging, RestoreMetrics};
pub use region::TerrainBounds;
pub use session::RestoreSession;
