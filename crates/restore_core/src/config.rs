//! Configuration for backups and restore painting.
//!
//! Maps to a `config.toml` file; every field has a default so a missing file
//! or a partial file is fine.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [store]
//! directory = "Assets/Scenes"
//! scene_name = "Island"
//! string_prefix = "i32"
//!
//! [brush]
//! size = 32.0
//!
//! [restore]
//! height = true
//! texture = true
//! details = false
//! trees = true
//!
//! [session]
//! min_interval_secs = 0.0333
//! ```

use crate::merge::RestoreOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest brush size the editor offers.
pub const MAX_BRUSH_SIZE: f32 = 128.0;

/// Length prefix used for strings in backup files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringPrefix {
    /// 32-bit little-endian byte count.
    #[default]
    I32,
    /// 7-bit variable-length byte count, as written by .NET `BinaryWriter`.
    Varint,
}

/// Where backups live and how they are named.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the scene and its backup files.
    pub directory: PathBuf,
    pub scene_name: String,
    pub string_prefix: StringPrefix,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            scene_name: "scene".to_string(),
            string_prefix: StringPrefix::I32,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BrushConfig {
    /// Side length of the square brush, in world units.
    pub size: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self { size: 20.0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum time between two restores while the pointer is held.
    pub min_interval_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: 1.0 / 30.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub brush: BrushConfig,
    pub restore: RestoreOptions,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Reads a TOML config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - Brush size must lie in `[0, 128]`
    /// - Scene name must be non-empty and contain no path separators
    /// - Minimum restore interval must be finite and non-negative
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.brush.size.is_finite() && (0.0..=MAX_BRUSH_SIZE).contains(&self.brush.size),
            "Brush size must be in [0, {}]",
            MAX_BRUSH_SIZE
        );
        anyhow::ensure!(
            !self.store.scene_name.is_empty(),
            "Scene name must not be empty"
        );
        anyhow::ensure!(
            !self.store.scene_name.contains(['/', '\\']),
            "Scene name must not contain path separators"
        );
        anyhow::ensure!(
            self.session.min_interval_secs.is_finite() && self.session.min_interval_secs >= 0.0,
            "Minimum restore interval must be non-negative"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.brush.size, 20.0);
        assert!(config.restore.trees);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [store]
            scene_name = "Island"
            string_prefix = "varint"

            [restore]
            details = false
            "#,
        )
        .unwrap();
        assert_eq!(config.store.scene_name, "Island");
        assert_eq!(config.store.string_prefix, StringPrefix::Varint);
        assert_eq!(config.store.directory, PathBuf::from("."));
        assert!(!config.restore.details);
        assert!(config.restore.height);
        assert!((config.session.min_interval_secs - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_large_brush() {
        let mut config = AppConfig::default();
        config.brush.size = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_scene_path() {
        let mut config = AppConfig::default();
        config.store.scene_name = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load("definitely/not/here/config.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
