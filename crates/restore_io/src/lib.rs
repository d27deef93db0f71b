//! # Restore IO
//!
//! Persistence for terrain backups.
//!
//! This crate provides:
//! - Structured error handling for backup files
//! - The little-endian binary backup codec
//! - The per-scene backup store (naming, listing, selection, deletion)
//! - JSON summaries and digests of backup files

/// Binary encoding of terrain snapshots
pub mod codec;
/// Error types and result aliases for backup operations
pub mod error;
/// Backup files of one scene
pub mod store;
/// JSON summaries and file digests
pub mod summary;

pub use codec::{decode, decode_with, encode, encode_with, CodecOptions};
pub use error::{BackupError, Result};
pub use store::BackupStore;
pub use summary::{digest, to_json_pretty, SnapshotSummary};
