//! Restore counters and logging setup.

use crate::merge::MergeReport;
use std::time::{Duration, Instant};

/// Running totals over a restore-paint session.
#[derive(Debug, Clone)]
pub struct RestoreMetrics {
    merges: u64,
    cells_written: u64,
    instances_inserted: u64,
    instances_removed: u64,
    started: Instant,
}

impl Default for RestoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RestoreMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            merges: 0,
            cells_written: 0,
            instances_inserted: 0,
            instances_removed: 0,
            started: Instant::now(),
        }
    }

    /// Adds one merge to the totals.
    pub fn record(&mut self, report: &MergeReport) {
        self.merges += 1;
        self.cells_written +=
            (report.height_cells + report.weight_cells + report.detail_cells) as u64;
        self.instances_inserted += report.instances_inserted as u64;
        self.instances_removed += report.instances_removed as u64;

        // Log at info level every 100 strokes
        if self.merges.is_multiple_of(100) {
            tracing::info!(
                merges = self.merges,
                cells = self.cells_written,
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Restore paint progress"
            );
        }
    }

    #[must_use]
    pub fn merges(&self) -> u64 {
        self.merges
    }

    #[must_use]
    pub fn cells_written(&self) -> u64 {
        self.cells_written
    }

    #[must_use]
    pub fn instances_inserted(&self) -> u64 {
        self.instances_inserted
    }

    #[must_use]
    pub fn instances_removed(&self) -> u64 {
        self.instances_removed
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Installs a global INFO-level fmt subscriber. Later calls are no-ops.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = RestoreMetrics::new();
        assert_eq!(metrics.merges(), 0);
        assert_eq!(metrics.cells_written(), 0);
    }

    #[test]
    fn test_record_accumulates() {
        let mut metrics = RestoreMetrics::new();
        let report = MergeReport {
            height_cells: 4,
            weight_cells: 2,
            detail_cells: 1,
            instances_inserted: 3,
            instances_removed: 1,
            ..MergeReport::default()
        };
        metrics.record(&report);
        metrics.record(&report);
        assert_eq!(metrics.merges(), 2);
        assert_eq!(metrics.cells_written(), 14);
        assert_eq!(metrics.instances_inserted(), 6);
        assert_eq!(metrics.instances_removed(), 2);
    }
}
