// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:        the epoch number (1, 2, 3, ...)
//   - train_loss:   mean cross-entropy over the epoch's batches
//   - epoch_secs:   wall-clock time of the training pass
//   - val_accuracy: fraction of validation examples classified correctly
//
// Output file: <model_dir>/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,epoch_secs,val_accuracy
//   1,0.412300,1843.22,0.889908
//   2,0.251100,1839.70,0.901376
//
// The file is recreated at the start of every run.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean training loss over all batches of the epoch
    pub train_loss: f64,

    /// Wall-clock seconds spent in the training pass
    pub epoch_secs: f64,

    /// Validation accuracy after the epoch, in [0.0, 1.0]
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, epoch_secs: f64, val_accuracy: f64) -> Self {
        Self { epoch, train_loss, epoch_secs, val_accuracy }
    }

    /// Returns true if this epoch beat the best validation accuracy so far
    pub fn is_improvement(&self, best_val_accuracy: f64) -> bool {
        self.val_accuracy > best_val_accuracy
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the directory and a fresh CSV with only the header row.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,epoch_secs,val_accuracy")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.2},{:.6}",
            m.epoch,
            m.train_loss,
            m.epoch_secs,
            m.val_accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_accuracy={:.4}",
            m.epoch,
            m.train_loss,
            m.val_accuracy,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 0.3, 10.0, 0.85);
        assert!(m.is_improvement(0.80));
        assert!(!m.is_improvement(0.85));
    }

    #[test]
    fn test_log_appends_rows_after_header() {
        let dir    = TempDir::new().unwrap();
        let logger = MetricsLogger::create(dir.path().join("model")).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 12.5, 0.75)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.25, 11.0, 0.8)).unwrap();

        let body = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines, vec![
            "epoch,train_loss,epoch_secs,val_accuracy",
            "1,0.500000,12.50,0.750000",
            "2,0.250000,11.00,0.800000",
        ]);
    }

    #[test]
    fn test_create_truncates_previous_run() {
        let dir = TempDir::new().unwrap();
        let logger = MetricsLogger::create(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 1.0, 0.5)).unwrap();

        let logger = MetricsLogger::create(dir.path()).unwrap();
        let body = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(body.lines().count(), 1);
    }
}
