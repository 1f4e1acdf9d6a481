// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Re-scores a saved model on any positive / negative file pair
// without retraining:
//   1. Reload the tokenizer and its max_length
//   2. Check max_length against the saved position table
//   3. Rebuild the classifier from the saved config and weights
//   4. Build the partition exactly as the training run does
//      (positive then negative, seeded shuffle)
//   5. Score it through the ordered evaluation loader

use anyhow::Result;
use burn::prelude::*;
use std::{path::PathBuf, sync::Arc};

use crate::data::{
    dataset::{SentimentDataset, SentimentEncoder},
    loader::PolarityFiles,
};
use crate::infra::{checkpoint::ModelStore, tokenizer_store::TokenizerStore};
use crate::ml::{
    evaluator::{evaluate_dataset, ConfusionMatrix},
    model::XlmRobertaClassifier,
    Device, InnerBackend,
};

pub struct EvaluateUseCase<B: Backend = InnerBackend> {
    encoder: Arc<SentimentEncoder>,
    model:   XlmRobertaClassifier<B>,
    device:  B::Device,
}

impl EvaluateUseCase<InnerBackend> {
    /// Load the saved model and tokenizer onto the default device.
    pub fn new(model_dir: impl Into<PathBuf>, tokenizer_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::load(model_dir, tokenizer_dir, Device::default())
    }
}

impl<B: Backend> EvaluateUseCase<B> {
    pub fn load(
        model_dir:     impl Into<PathBuf>,
        tokenizer_dir: impl Into<PathBuf>,
        device:        B::Device,
    ) -> Result<Self> {
        let (tokenizer, settings) = TokenizerStore::new(tokenizer_dir).load()?;
        tracing::info!(
            "Tokenizer from '{}' (max_length={})",
            settings.model_id,
            settings.max_length
        );
        let store = ModelStore::new(model_dir);
        store.load_model_config()?.check_sequence_length(settings.max_length)?;

        let encoder = Arc::new(SentimentEncoder::new(tokenizer, settings.max_length)?);
        let model   = store.load_model::<B>(&device)?;
        Ok(Self { encoder, model, device })
    }

    /// Accuracy and confusion counts on a positive / negative file pair
    pub fn score(
        &self,
        pos_file:   impl Into<PathBuf>,
        neg_file:   impl Into<PathBuf>,
        seed:       u64,
        batch_size: usize,
    ) -> Result<ConfusionMatrix> {
        let records = PolarityFiles::new(pos_file, neg_file).load_shuffled(seed)?;
        tracing::info!("Scoring {} records", records.len());

        let dataset = SentimentDataset::new(records, self.encoder.clone());
        evaluate_dataset(&self.model, dataset, batch_size, &self.device, "Evaluating")
    }
}
