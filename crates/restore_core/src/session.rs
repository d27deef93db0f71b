//! Restore-paint session: the active backup slot and pointer gating.

use crate::config::{AppConfig, MAX_BRUSH_SIZE};
use crate::host::LiveTerrain;
use crate::merge::{restore_region, MergeReport, RestoreOptions};
use crate::metrics::RestoreMetrics;
use crate::region::{self, rect_from_brush, TerrainBounds};
use restore_data::{AllTerrainsSnapshot, Rect};

/// Holds the backup being painted from and decides when a held pointer
/// should trigger another restore.
#[derive(Debug)]
pub struct RestoreSession {
    active: Option<(String, AllTerrainsSnapshot)>,
    pub options: RestoreOptions,
    brush_size: f32,
    min_interval: f64,
    clock: f64,
    last_restore: Option<f64>,
    pointer_down: bool,
    pointer: Option<[f32; 3]>,
    metrics: RestoreMetrics,
    /// Set once the terrain count has been compared with the active backup.
    count_checked: bool,
}

impl Default for RestoreSession {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl RestoreSession {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            active: None,
            options: config.restore,
            brush_size: config.brush.size.clamp(0.0, MAX_BRUSH_SIZE),
            min_interval: config.session.min_interval_secs,
            clock: 0.0,
            last_restore: None,
            pointer_down: false,
            pointer: None,
            metrics: RestoreMetrics::new(),
            count_checked: false,
        }
    }

    /// Makes `snapshot` the active backup and resets the session counters.
    /// Ignored while another backup is active.
    pub fn start(&mut self, id: impl Into<String>, snapshot: AllTerrainsSnapshot) -> bool {
        if self.active.is_some() {
            return false;
        }
        let id = id.into();
        tracing::info!(backup = %id, terrains = snapshot.len(), "Restore session started");
        self.active = Some((id, snapshot));
        self.last_restore = None;
        self.metrics = RestoreMetrics::new();
        self.count_checked = false;
        true
    }

    /// Drops the active backup.
    pub fn end(&mut self) {
        if let Some((id, _)) = self.active.take() {
            tracing::info!(
                backup = %id,
                merges = self.metrics.merges(),
                "Restore session ended"
            );
        }
        self.pointer_down = false;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn can_restore_paint(&self) -> bool {
        self.is_active()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush_size = if size.is_nan() {
            0.0
        } else {
            size.clamp(0.0, MAX_BRUSH_SIZE)
        };
    }

    #[must_use]
    pub fn pointer(&self) -> Option<[f32; 3]> {
        self.pointer
    }

    #[must_use]
    pub fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub fn metrics(&self) -> &RestoreMetrics {
        &self.metrics
    }

    /// Brush marker positions around the last pointer hit.
    pub fn preview_points(&self, terrains: &[TerrainBounds]) -> Vec<[f32; 2]> {
        match self.pointer {
            Some([x, _, z]) if self.is_active() => {
                region::preview_points([x, z], self.brush_size, terrains)
            }
            _ => Vec::new(),
        }
    }

    /// Restores `world` from the active backup. `None` when inactive.
    pub fn restore_region<T: LiveTerrain>(
        &mut self,
        terrains: &mut [T],
        world: &Rect,
    ) -> Option<MergeReport> {
        let (_, snapshot) = self.active.as_ref()?;
        let report = restore_region(terrains, snapshot, world, self.options);
        if !self.count_checked {
            self.count_checked = true;
            if report.terrains_unpaired > 0 {
                tracing::warn!(
                    live = terrains.len(),
                    backup = snapshot.len(),
                    "Terrain count differs from backup; only paired terrains are restored"
                );
            }
        }
        self.metrics.record(&report);
        Some(report)
    }

    /// Per-frame input. `world_pos` is the pointer ray hit on a terrain, if any.
    ///
    /// Restores the brush footprint when the pointer is held and more than the
    /// minimum interval has passed since the previous restore.
    pub fn on_pointer_tick<T: LiveTerrain>(
        &mut self,
        terrains: &mut [T],
        world_pos: Option<[f32; 3]>,
        is_down: bool,
        dt: f64,
    ) -> Option<MergeReport> {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
        self.pointer = world_pos;

        if !self.is_active() {
            return None;
        }
        let [x, _, z] = world_pos?;
        self.pointer_down = is_down;
        if !is_down {
            return None;
        }

        let due = match self.last_restore {
            None => true,
            Some(last) => self.clock - last > self.min_interval,
        };
        if !due {
            return None;
        }

        let rect = rect_from_brush([x, z], self.brush_size);
        let report = self.restore_region(terrains, &rect)?;
        self.last_restore = Some(self.clock);
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::capture_all;
    use crate::host::MemoryTerrain;

    const WHOLE: Rect = Rect::new(0.0, 0.0, 4.0, 4.0);

    fn terrains(height: f32) -> Vec<MemoryTerrain> {
        let bounds = TerrainBounds::new([0.0, 0.0], [4.0, 4.0]);
        let mut terrain = MemoryTerrain::new(bounds, 3, (2, 2), (2, 2));
        terrain.heights.fill(height);
        vec![terrain]
    }

    fn session() -> RestoreSession {
        let mut session = RestoreSession::default();
        session.start("2024-01-01 00-00-00", capture_all(&terrains(1.0)));
        session
    }

    #[test]
    fn test_inactive_session_never_restores() {
        let mut session = RestoreSession::default();
        let mut live = terrains(0.0);
        let hit = Some([2.0, 0.0, 2.0]);
        assert!(!session.can_restore_paint());
        assert!(session.on_pointer_tick(&mut live, hit, true, 1.0).is_none());
        assert!(session.restore_region(&mut live, &WHOLE).is_none());
        assert_eq!(live[0].heights.get(1, 1), Some(&0.0));
    }

    #[test]
    fn test_start_ignored_while_active() {
        let mut session = session();
        assert!(!session.start("other", AllTerrainsSnapshot::default()));
        assert_eq!(session.active_id(), Some("2024-01-01 00-00-00"));
        session.end();
        assert!(!session.is_active());
        assert!(session.start("other", AllTerrainsSnapshot::default()));
    }

    #[test]
    fn test_pointer_tick_gated_by_interval() {
        let mut session = session();
        let mut live = terrains(0.0);
        let hit = Some([2.0, 0.0, 2.0]);

        assert!(session.on_pointer_tick(&mut live, hit, true, 0.01).is_some());
        assert_eq!(live[0].heights.get(1, 1), Some(&1.0));
        // Too soon after the first restore.
        assert!(session.on_pointer_tick(&mut live, hit, true, 0.01).is_none());
        assert!(session.on_pointer_tick(&mut live, hit, true, 0.05).is_some());
        assert_eq!(session.metrics().merges(), 2);
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut session = session();
        let mut live = terrains(0.0);
        session.restore_region(&mut live, &WHOLE).unwrap();
        session.restore_region(&mut live, &WHOLE).unwrap();
        assert_eq!(session.metrics().merges(), 2);

        session.end();
        assert!(session.start("2024-01-02 00-00-00", capture_all(&live)));
        assert_eq!(session.metrics().merges(), 0);
        session.restore_region(&mut live, &WHOLE).unwrap();
        assert_eq!(session.metrics().merges(), 1);
    }

    #[test]
    fn test_terrain_count_checked_once_per_session() {
        let mut session = session();
        let mut live = terrains(0.0);
        live.extend(terrains(0.0));
        assert!(!session.count_checked);

        let report = session.restore_region(&mut live, &WHOLE).unwrap();
        assert_eq!(report.terrains_unpaired, 1);
        assert!(session.count_checked);
        let report = session.restore_region(&mut live, &WHOLE).unwrap();
        assert_eq!(report.terrains_unpaired, 1);

        session.end();
        session.start("other", capture_all(&live));
        assert!(!session.count_checked);
        let report = session.restore_region(&mut live, &WHOLE).unwrap();
        assert_eq!(report.terrains_unpaired, 0);
    }

    #[test]
    fn test_pointer_up_or_miss_does_not_restore() {
        let mut session = session();
        let mut live = terrains(0.0);
        let hit = Some([2.0, 0.0, 2.0]);
        assert!(session.on_pointer_tick(&mut live, hit, false, 1.0).is_none());
        assert!(!session.pointer_down());
        assert!(session.on_pointer_tick(&mut live, None, true, 1.0).is_none());
        assert_eq!(live[0].heights.get(1, 1), Some(&0.0));
    }

    #[test]
    fn test_brush_size_clamped() {
        let mut session = RestoreSession::default();
        session.set_brush_size(500.0);
        assert_eq!(session.brush_size(), MAX_BRUSH_SIZE);
        session.set_brush_size(-3.0);
        assert_eq!(session.brush_size(), 0.0);
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut session = session();
        let bounds = [TerrainBounds::new([0.0, 0.0], [100.0, 100.0])];
        assert!(session.preview_points(&bounds).is_empty());

        let mut live = terrains(0.0);
        session.on_pointer_tick(&mut live, Some([50.0, 0.0, 50.0]), false, 0.0);
        assert_eq!(session.preview_points(&bounds).len(), 100);
    }
}
