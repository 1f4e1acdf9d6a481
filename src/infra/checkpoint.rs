// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores the fine-tuned classifier using Burn's
// CompactRecorder.
//
// What gets saved:
//   1. model.mpk.gz       — all learned parameters
//   2. config.json        — XlmRobertaConfig (architecture)
//   3. train_config.json  — the run's hyperparameters
//
// The architecture config is needed to rebuild an empty model of
// the right shape before its weights can be loaded back in.
//
// File layout:
//   sentiment_model/
//     model.mpk.gz
//     config.json
//     train_config.json
//     metrics.csv          ← written by MetricsLogger
//
// CompactRecorder:
//   - Serialises parameters to MessagePack (half precision)
//   - Compresses with gzip
//   - Type-safe: loading fails if the architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{XlmRobertaClassifier, XlmRobertaConfig};

const WEIGHTS_STEM:      &str = "model";
const MODEL_CONFIG_FILE: &str = "config.json";
const TRAIN_CONFIG_FILE: &str = "train_config.json";

/// Reads and writes a saved classifier under one directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist the architecture config and the weights.
    /// Creates the directory if it doesn't exist; overwrites any
    /// previous save.
    pub fn save_model<B: Backend>(
        &self,
        model:  &XlmRobertaClassifier<B>,
        config: &XlmRobertaConfig,
    ) -> Result<()> {
        self.ensure_dir()?;

        let config_path = self.dir.join(MODEL_CONFIG_FILE);
        config
            .save(&config_path)
            .with_context(|| format!("Cannot write model config to '{}'", config_path.display()))?;

        // Recorder appends the .mpk.gz extension
        let path = self.dir.join(WEIGHTS_STEM);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;

        tracing::info!("Saved model to '{}'", self.dir.display());
        Ok(())
    }

    /// Rebuild the classifier from config.json and load its weights.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<XlmRobertaClassifier<B>> {
        let config = self.load_model_config()?;
        let model: XlmRobertaClassifier<B> = config.init(device);

        let path = self.dir.join(WEIGHTS_STEM);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load model '{}'. Have you trained the model first?", path.display())
            })?;

        tracing::info!("Loaded model from '{}'", self.dir.display());
        Ok(model.load_record(record))
    }

    pub fn load_model_config(&self) -> Result<XlmRobertaConfig> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        XlmRobertaConfig::load(&path).map_err(|e| {
            anyhow::anyhow!(
                "Cannot read model config '{}': {e}. Make sure you have run training first.",
                path.display()
            )
        })
    }

    /// Save the run's hyperparameters next to the weights.
    pub fn save_train_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(TRAIN_CONFIG_FILE);

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))
    }
}
