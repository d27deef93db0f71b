use anyhow::{Context, Result};
use restore_core::capture::capture_all;
use restore_core::region::TerrainBounds;
use restore_core::{AppConfig, LiveTerrain, MergeReport, RestoreSession};
use restore_data::{AllTerrainsSnapshot, Rect};
use restore_io::BackupStore;
use std::path::Path;

/// Command surface of the restore tool. UI layers drive everything through
/// these calls.
pub struct TerrainRestore {
    pub config: AppConfig,
    store: BackupStore,
    session: RestoreSession,
}

impl TerrainRestore {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let store = BackupStore::open(&config.store)
            .with_context(|| format!("Failed to open backups in {:?}", config.store.directory))?;
        let session = RestoreSession::from_config(&config);
        Ok(Self {
            config,
            store,
            session,
        })
    }

    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(AppConfig::load(path)?)
    }

    /// Captures every terrain and writes a new backup. Returns its id.
    pub fn backup<T: LiveTerrain>(&mut self, terrains: &[T]) -> Result<String> {
        let snapshot = capture_all(terrains);
        Ok(self.store.create(&snapshot)?)
    }

    /// Rescans the backup directory, newest first.
    pub fn list_backups(&mut self) -> Result<Vec<String>> {
        Ok(self.store.list()?.to_vec())
    }

    pub fn selected_backup(&self) -> Option<&str> {
        self.store.selected_id()
    }

    pub fn select_backup(&mut self, id: &str) -> bool {
        self.store.select(id)
    }

    pub fn load_backup(&self, id: &str) -> Result<AllTerrainsSnapshot> {
        Ok(self.store.load(id)?)
    }

    /// Writes `snapshot` as a new backup.
    pub fn save_snapshot(&mut self, snapshot: &AllTerrainsSnapshot) -> Result<String> {
        Ok(self.store.create(snapshot)?)
    }

    /// Deletes a backup file. Failures are logged and reported as `false`.
    pub fn delete_backup(&mut self, id: &str) -> bool {
        self.store.delete(id)
    }

    /// Enters or leaves restore painting.
    ///
    /// Entering loads the selected backup into the session; it does nothing
    /// when painting is already on or no backup is selected.
    pub fn set_painting(&mut self, painting: bool) -> Result<()> {
        if !painting {
            self.session.end();
            return Ok(());
        }
        if self.session.is_active() {
            return Ok(());
        }
        let Some(loaded) = self.store.load_selected() else {
            tracing::debug!("No backup selected; restore painting stays off");
            return Ok(());
        };
        let (id, snapshot) = loaded.context("Failed to load selected backup")?;
        self.session.start(id, snapshot);
        Ok(())
    }

    pub fn can_restore_paint(&self) -> bool {
        self.session.can_restore_paint()
    }

    pub fn session(&self) -> &RestoreSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut RestoreSession {
        &mut self.session
    }

    /// Restores a world rectangle from the active backup.
    pub fn restore_region<T: LiveTerrain>(
        &mut self,
        terrains: &mut [T],
        world: &Rect,
    ) -> Option<MergeReport> {
        self.session.restore_region(terrains, world)
    }

    pub fn on_pointer_tick<T: LiveTerrain>(
        &mut self,
        terrains: &mut [T],
        world_pos: Option<[f32; 3]>,
        is_down: bool,
        dt: f64,
    ) -> Option<MergeReport> {
        self.session
            .on_pointer_tick(terrains, world_pos, is_down, dt)
    }

    pub fn preview_points(&self, terrains: &[TerrainBounds]) -> Vec<[f32; 2]> {
        self.session.preview_points(terrains)
    }
}
