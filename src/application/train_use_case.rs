// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full experiment in order:
//
//   Check settings against the pretrained config.json first,
//   so a bad flag fails before any large download.
//
//   Step 1: Fetch SST-2 splits            (Layer 4 - data)
//   Step 2: Drop the train tail           (Layer 4 - data)
//   Step 3: Load pretrained tokenizer     (Layer 6 - infra)
//   Step 4: Build datasets                (Layer 4 - data)
//   Step 5: Load the Hindi partition      (Layer 4 - data)
//   Step 6: Load pretrained model         (Layer 5 - ml)
//   Step 7: Fine-tune on English          (Layer 5 - ml)
//   Step 8: Zero-shot Hindi evaluation    (Layer 5 - ml)
//   Step 9: Save model + tokenizer        (Layer 6 - infra)
//
// Training only ever sees English data; the Hindi partition is
// used for inference only.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::data::{
    dataset::{SentimentDataset, SentimentEncoder},
    loader::PolarityFiles,
    shuffle::drop_tail,
    sst2::Sst2Source,
};
use crate::domain::record::label_counts;
use crate::infra::{
    checkpoint::ModelStore,
    download::DownloadCache,
    metrics::{EpochMetrics, MetricsLogger},
    tokenizer_store::{load_pretrained, TokenizerSettings, TokenizerStore},
};
use crate::ml::{
    evaluator::{evaluate_dataset, ConfusionMatrix},
    pretrained::{load_classifier, load_config},
    trainer::{train, TrainerSettings},
    Device, TrainBackend,
};

/// Binary sentiment: negative / positive
pub const NUM_LABELS: usize = 2;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Defaults are the experiment's fixed constants.
// Serialisable so the run's settings can be saved next to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub model_id:      String,
    pub max_length:    usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
    pub epochs:        usize,
    pub seed:          u64,
    /// Rows removed from the end of the SST-2 train split
    pub train_holdout: usize,
    /// Worker threads for the training loader (0 = inline)
    pub num_workers:   usize,
    pub cache_dir:     String,
    pub model_dir:     String,
    pub tokenizer_dir: String,
    pub pos_file:      String,
    pub neg_file:      String,
}

impl TrainConfig {
    pub const MODEL_ID:      &'static str = "FacebookAI/xlm-roberta-base";
    pub const MAX_LENGTH:    usize = 48;
    pub const BATCH_SIZE:    usize = 8;
    pub const LEARNING_RATE: f64   = 2e-5;
    pub const EPOCHS:        usize = 5;
    pub const SEED:          u64   = 42;
    pub const TRAIN_HOLDOUT: usize = 10_000;
    pub const NUM_WORKERS:   usize = 0;
    pub const CACHE_DIR:     &'static str = ".cache";
    pub const MODEL_DIR:     &'static str = "./sentiment_model";
    pub const TOKENIZER_DIR: &'static str = "./sentiment_tokenizer";
    pub const POS_FILE:      &'static str = "pos_train.txt";
    pub const NEG_FILE:      &'static str = "neg_train.txt";
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            model_id:      Self::MODEL_ID.to_string(),
            max_length:    Self::MAX_LENGTH,
            batch_size:    Self::BATCH_SIZE,
            learning_rate: Self::LEARNING_RATE,
            epochs:        Self::EPOCHS,
            seed:          Self::SEED,
            train_holdout: Self::TRAIN_HOLDOUT,
            num_workers:   Self::NUM_WORKERS,
            cache_dir:     Self::CACHE_DIR.to_string(),
            model_dir:     Self::MODEL_DIR.to_string(),
            tokenizer_dir: Self::TOKENIZER_DIR.to_string(),
            pos_file:      Self::POS_FILE.to_string(),
            neg_file:      Self::NEG_FILE.to_string(),
        }
    }
}

impl TrainConfig {
    /// Reject settings the loader, optimiser or tokenizer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be positive");
        }
        if self.epochs == 0 {
            bail!("epochs must be positive");
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            bail!("learning_rate must be in (0, 1], got {}", self.learning_rate);
        }
        if self.max_length == 0 {
            bail!("max_length must be positive");
        }
        Ok(())
    }

    fn trainer_settings(&self) -> TrainerSettings {
        TrainerSettings {
            epochs:        self.epochs,
            batch_size:    self.batch_size,
            learning_rate: self.learning_rate,
            seed:          self.seed,
            num_workers:   self.num_workers,
        }
    }
}

/// What a finished run reports back to the CLI
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub history: Vec<EpochMetrics>,
    pub hindi:   ConfusionMatrix,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full experiment end to end
    pub fn execute(&self) -> Result<RunSummary> {
        let cfg   = &self.config;
        cfg.validate()?;
        let cache = DownloadCache::new(&cfg.cache_dir);

        let config_path  = cache.fetch_hub_file(&cfg.model_id, "config.json")?;
        let model_config = load_config(&config_path, NUM_LABELS)?;
        model_config.check_sequence_length(cfg.max_length)?;

        // ── Step 1: Fetch SST-2 ───────────────────────────────────────────────
        let splits = Sst2Source::new(cache.clone()).fetch()?;

        // ── Step 2: Drop the train tail ───────────────────────────────────────
        let train_records = drop_tail(splits.train, cfg.train_holdout);
        tracing::info!(
            "SST-2 partitions: {} train, {} validation, {} test (unlabeled)",
            train_records.len(),
            splits.validation.len(),
            splits.test.len()
        );

        // ── Step 3: Pretrained tokenizer ──────────────────────────────────────
        let encoder = Arc::new(SentimentEncoder::new(load_pretrained(&cfg.model_id)?, cfg.max_length)?);

        // ── Step 4: Burn datasets ─────────────────────────────────────────────
        let train_dataset = SentimentDataset::new(train_records, encoder.clone());
        let val_dataset   = SentimentDataset::new(splits.validation, encoder.clone());

        // ── Step 5: Hindi partition (positive then negative, seeded shuffle) ──
        let hindi_records = PolarityFiles::new(&cfg.pos_file, &cfg.neg_file).load_shuffled(cfg.seed)?;
        let (pos, neg) = label_counts(&hindi_records);
        tracing::info!("Hindi partition: {} records ({} positive, {} negative)", hindi_records.len(), pos, neg);
        let hindi_dataset = SentimentDataset::new(hindi_records, encoder.clone());

        // ── Step 6: Pretrained model ──────────────────────────────────────────
        let device       = Device::default();
        let weights_path = cache.fetch_hub_file(&cfg.model_id, "pytorch_model.bin")?;
        let model        = load_classifier::<TrainBackend>(&model_config, &weights_path, &device)?;

        // ── Step 7: Fine-tune ─────────────────────────────────────────────────
        let store   = ModelStore::new(&cfg.model_dir);
        store.save_train_config(cfg)?;
        let metrics = MetricsLogger::create(store.dir())?;

        let trained = train::<TrainBackend>(
            &cfg.trainer_settings(),
            model,
            train_dataset,
            val_dataset,
            &device,
            Some(&metrics),
        )?;

        // ── Step 8: Zero-shot Hindi evaluation ────────────────────────────────
        let hindi = evaluate_dataset(&trained.model, hindi_dataset, cfg.batch_size, &device, "Hindi")?;
        println!("Accuracy on Hindi Dataset: {:.4}", hindi.accuracy());
        tracing::info!(
            "Hindi confusion matrix: tp={} tn={} fp={} fn={}",
            hindi.tp, hindi.tn, hindi.fp, hindi.fn_
        );

        // ── Step 9: Persist ───────────────────────────────────────────────────
        store.save_model(&trained.model, &model_config)?;
        TokenizerStore::new(&cfg.tokenizer_dir).save(
            encoder.tokenizer(),
            &TokenizerSettings { model_id: cfg.model_id.clone(), max_length: encoder.max_length() },
        )?;

        Ok(RunSummary { history: trained.history, hindi })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_the_fixed_constants() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.model_id, "FacebookAI/xlm-roberta-base");
        assert_eq!(cfg.max_length, 48);
        assert_eq!(cfg.batch_size, 8);
        assert_eq!(cfg.learning_rate, 2e-5);
        assert_eq!(cfg.epochs, 5);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.train_holdout, 10_000);
        assert_eq!(cfg.model_dir, "./sentiment_model");
        assert_eq!(cfg.tokenizer_dir, "./sentiment_tokenizer");
        assert_eq!((cfg.pos_file.as_str(), cfg.neg_file.as_str()), ("pos_train.txt", "neg_train.txt"));
    }

    #[test]
    fn test_trainer_settings_follow_config() {
        let cfg = TrainConfig { epochs: 2, batch_size: 16, ..TrainConfig::default() };
        let s = cfg.trainer_settings();
        assert_eq!((s.epochs, s.batch_size, s.seed), (2, 16, 42));
        assert_eq!(s.learning_rate, 2e-5);
    }

    #[test]
    fn test_config_survives_json() {
        let cfg  = TrainConfig { pos_file: "hi/pos.txt".into(), ..TrainConfig::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pos_file, "hi/pos.txt");
        assert_eq!(back.max_length, cfg.max_length);
    }

    #[test]
    fn test_validate_rejects_unusable_settings() {
        assert!(TrainConfig::default().validate().is_ok());
        for bad in [
            TrainConfig { batch_size: 0, ..TrainConfig::default() },
            TrainConfig { epochs: 0, ..TrainConfig::default() },
            TrainConfig { learning_rate: 0.0, ..TrainConfig::default() },
            TrainConfig { learning_rate: 1.5, ..TrainConfig::default() },
            TrainConfig { learning_rate: f64::NAN, ..TrainConfig::default() },
            TrainConfig { max_length: 0, ..TrainConfig::default() },
        ] {
            assert!(bad.validate().is_err(), "{bad:?}");
        }
    }
}
