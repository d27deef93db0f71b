//! Backup files of one scene.
//!
//! Backups live next to the scene as
//! `{directory}/terrain-backup-{scene}-{id}.dat`, where `id` is a local
//! timestamp `yyyy-MM-dd HH-mm-ss`. The store keeps the ids sorted newest
//! first and tracks which one is selected.

use crate::codec::{self, CodecOptions};
use crate::error::{BackupError, Result};
use restore_core::config::StoreConfig;
use restore_data::AllTerrainsSnapshot;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "terrain-backup-";
const FILE_SUFFIX: &str = ".dat";

/// `chrono` format of backup ids.
pub const ID_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

#[derive(Debug)]
pub struct BackupStore {
    directory: PathBuf,
    scene: String,
    options: CodecOptions,
    ids: Vec<String>,
    selected: Option<usize>,
}

impl BackupStore {
    /// Opens the store and scans the directory once.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if config.scene_name.is_empty() {
            return Err(BackupError::validation("scene name must not be empty"));
        }
        let mut store = Self {
            directory: config.directory.clone(),
            scene: config.scene_name.clone(),
            options: CodecOptions::new(config.string_prefix),
            ids: Vec::new(),
            selected: None,
        };
        store.refresh()?;
        Ok(store)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn codec_options(&self) -> CodecOptions {
        self.options
    }

    fn file_prefix(&self) -> String {
        format!("{FILE_PREFIX}{}-", self.scene)
    }

    /// Path of the backup file for `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.directory
            .join(format!("{}{id}{FILE_SUFFIX}", self.file_prefix()))
    }

    /// Rescans the directory. A missing directory lists as empty.
    ///
    /// The selection is kept when its id still exists, otherwise it moves to
    /// the newest backup.
    pub fn refresh(&mut self) -> Result<()> {
        let previous = self.selected_id().map(str::to_owned);
        let prefix = self.file_prefix();

        let mut ids = Vec::new();
        match std::fs::read_dir(&self.directory) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    if !entry.file_type()?.is_file() {
                        continue;
                    }
                    let name = entry.file_name();
                    let Some(name) = name.to_str() else {
                        continue;
                    };
                    if let Some(id) = name
                        .strip_prefix(prefix.as_str())
                        .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
                        .filter(|id| !id.is_empty())
                    {
                        ids.push(id.to_string());
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                let context = format!("listing backups in {:?}", self.directory);
                return Err(BackupError::from(e).with_context(context));
            }
        }

        ids.sort_unstable_by(|a, b| b.cmp(a));
        self.ids = ids;
        self.selected = previous
            .and_then(|id| self.position(&id))
            .or_else(|| (!self.ids.is_empty()).then_some(0));
        Ok(())
    }

    /// Rescans and returns the ids, newest first.
    pub fn list(&mut self) -> Result<&[String]> {
        self.refresh()?;
        Ok(&self.ids)
    }

    /// Ids as of the last scan or change, newest first.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected
            .and_then(|n| self.ids.get(n))
            .map(String::as_str)
    }

    /// Selects a known id. Returns false for unknown ids.
    pub fn select(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(n) => {
                self.selected = Some(n);
                true
            }
            None => false,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.ids.iter().position(|known| known == id)
    }

    /// Writes a new backup named after the current local time.
    pub fn create(&mut self, snapshot: &AllTerrainsSnapshot) -> Result<String> {
        let id = chrono::Local::now().format(ID_FORMAT).to_string();
        self.create_with_id(&id, snapshot)?;
        Ok(id)
    }

    /// Writes a backup under `id`, puts it first and selects it.
    ///
    /// An existing backup with the same id is overwritten.
    pub fn create_with_id(&mut self, id: &str, snapshot: &AllTerrainsSnapshot) -> Result<()> {
        if id.is_empty() || id.contains(['/', '\\']) {
            return Err(BackupError::validation(format!("invalid backup id {id:?}")));
        }

        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(id);
        let bytes = codec::encode_with(snapshot, self.options);
        std::fs::write(&path, &bytes)
            .map_err(|e| BackupError::from(e).with_context(format!("writing {:?}", path)))?;

        self.ids.retain(|known| known != id);
        self.ids.insert(0, id.to_string());
        self.selected = Some(0);
        tracing::info!(
            id,
            terrains = snapshot.len(),
            bytes = bytes.len(),
            "Backup created"
        );
        Ok(())
    }

    /// Reads and decodes a backup.
    pub fn load(&self, id: &str) -> Result<AllTerrainsSnapshot> {
        if id.is_empty() {
            return Err(BackupError::not_found(id));
        }
        let path = self.path_for(id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackupError::not_found(id));
            }
            Err(e) => return Err(e.into()),
        };
        codec::decode_with(&bytes, self.options)
            .map_err(|e| e.with_context(format!("decoding backup {id}")))
    }

    /// Loads the selected backup, if any.
    pub fn load_selected(&self) -> Option<Result<(String, AllTerrainsSnapshot)>> {
        let id = self.selected_id()?.to_string();
        Some(self.load(&id).map(|snapshot| (id, snapshot)))
    }

    /// Removes a backup file.
    ///
    /// On success the id is dropped and the newest remaining backup is
    /// selected. Failures are logged and leave the store unchanged.
    pub fn delete(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        let path = self.path_for(id);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!(id, error = %e, "Failed to delete backup {:?}", path);
            return false;
        }

        self.ids.retain(|known| known != id);
        self.selected = (!self.ids.is_empty()).then_some(0);
        tracing::info!(id, "Backup deleted");
        true
    }
}
