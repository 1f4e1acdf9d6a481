// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fine-tunes the classifier with Adam and a linear learning-rate
// decay to zero, validating after every epoch.
//
// Per epoch:
//   training pass   — for each shuffled batch: forward with labels,
//                     backward, one Adam step at the scheduler's
//                     learning rate, advance the scheduler
//   validation pass — model.valid() (inner backend, no autodiff),
//                     arg-max accuracy over the ordered loader
//
// Gradients are rebuilt from the loss on every step, so there is
// nothing to zero between steps.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{anyhow, bail, Result};
use burn::{
    data::{
        dataloader::{batcher::Batcher, DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    lr_scheduler::{
        linear::{LinearLrScheduler, LinearLrSchedulerConfig},
        LrScheduler,
    },
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::{sync::Arc, time::Instant};

use crate::data::{
    batcher::{SentimentBatch, SentimentBatcher},
    dataset::SentimentDataset,
};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::evaluator::{ensure_complete, evaluate, progress_bar};
use crate::ml::model::XlmRobertaClassifier;

/// Loop hyperparameters
#[derive(Debug, Clone)]
pub struct TrainerSettings {
    pub epochs:        usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
    /// Seed for the training loader's per-epoch shuffle
    pub seed:          u64,
    /// Loader worker threads for the training set (0 = load inline)
    pub num_workers:   usize,
}

/// Result of a finished run: the fine-tuned model, detached from
/// autodiff, plus one metrics row per epoch.
pub struct TrainedModel<B: AutodiffBackend> {
    pub model:   XlmRobertaClassifier<B::InnerBackend>,
    pub history: Vec<EpochMetrics>,
}

pub fn train<B: AutodiffBackend>(
    settings:      &TrainerSettings,
    mut model:     XlmRobertaClassifier<B>,
    train_dataset: SentimentDataset,
    valid_dataset: SentimentDataset,
    device:        &B::Device,
    metrics:       Option<&MetricsLogger>,
) -> Result<TrainedModel<B>> {
    if train_dataset.is_empty() {
        bail!("training partition is empty");
    }

    let train_len     = train_dataset.len();
    let valid_len     = valid_dataset.len();
    let valid_batches = valid_len.div_ceil(settings.batch_size.max(1));

    // ── Adam optimiser + linear decay to zero over every step ─────────────────
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();
    let (train_batches, total_steps, mut lr_scheduler) = lr_schedule(settings, train_len)?;

    // ── Training data loader (AutodiffBackend, shuffled) ──────────────────────
    let train_batcher = SentimentBatcher::<B>::new(device.clone());
    preview_batch(&train_batcher, &train_dataset, settings.batch_size);
    let train_loader = train_loader(settings, train_batcher, train_dataset);

    // ── Validation data loader (InnerBackend, ordered, single-threaded) ──────
    let valid_batcher = SentimentBatcher::<B::InnerBackend>::new(device.clone());
    let valid_loader  = DataLoaderBuilder::new(valid_batcher)
        .batch_size(settings.batch_size)
        .build(valid_dataset);

    tracing::info!(
        "Training for {} epochs: {} batches/epoch, {} steps, lr={}",
        settings.epochs, train_batches, total_steps, settings.learning_rate
    );

    let mut history  = Vec::with_capacity(settings.epochs);
    let mut best_acc = f64::NEG_INFINITY;

    for epoch in 1..=settings.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let start = Instant::now();
        let pb = progress_bar(train_batches, &format!("Epoch {}/{}", epoch, settings.epochs));
        let mut train_loss_sum = 0.0f64;
        let mut steps          = 0usize;
        let mut seen           = 0usize;

        for batch in train_loader.iter() {
            seen += batch.labels.dims()[0];
            let output = model.forward_loss(batch.input_ids, batch.attention_mask, batch.labels);

            let loss_val: f64 = output.loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            steps          += 1;

            let lr    = lr_scheduler.step();
            let grads = output.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);

            pb.set_message(format!("Epoch {}/{} loss={:.4}", epoch, settings.epochs, loss_val));
            pb.inc(1);
        }
        pb.finish_and_clear();
        ensure_complete(seen, train_len, "Training")?;

        let epoch_secs     = start.elapsed().as_secs_f64();
        let avg_train_loss = if steps > 0 { train_loss_sum / steps as f64 } else { f64::NAN };
        println!("Epoch {}: Train Loss = {:.4}, Time: {:.2} seconds", epoch, avg_train_loss, epoch_secs);

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → classifier on the inner backend, dropout disabled
        let model_valid = model.valid();
        let confusion   = evaluate(&model_valid, valid_loader.iter(), valid_batches, "Validation");
        ensure_complete(confusion.total(), valid_len, "Validation")?;
        let accuracy    = confusion.accuracy();
        println!("Epoch {}: Validation Accuracy = {:.4}", epoch, accuracy);

        let row = EpochMetrics::new(epoch, avg_train_loss, epoch_secs, accuracy);
        if row.is_improvement(best_acc) {
            tracing::info!("New best validation accuracy: {:.4}", accuracy);
            best_acc = accuracy;
        }
        if let Some(logger) = metrics {
            logger.log(&row)?;
        }
        history.push(row);
    }

    tracing::info!("Training complete!");
    Ok(TrainedModel { model: model.valid(), history })
}

/// Batches per epoch, total optimiser steps, and a scheduler that
/// decays from the full learning rate to zero over those steps.
fn lr_schedule(settings: &TrainerSettings, train_len: usize) -> Result<(usize, usize, LinearLrScheduler)> {
    if settings.batch_size == 0 {
        bail!("batch_size must be positive");
    }
    let train_batches = train_len.div_ceil(settings.batch_size);
    let total_steps   = settings.epochs * train_batches;

    let scheduler = LinearLrSchedulerConfig::new(settings.learning_rate, 0.0, total_steps.max(1))
        .init()
        .map_err(|e| anyhow!("Invalid learning-rate schedule: {e}"))?;
    Ok((train_batches, total_steps, scheduler))
}

/// Shuffled loader; every call to `iter()` draws a new permutation.
fn train_loader<B: Backend>(
    settings: &TrainerSettings,
    batcher:  SentimentBatcher<B>,
    dataset:  SentimentDataset,
) -> Arc<dyn DataLoader<SentimentBatch<B>>> {
    let mut builder = DataLoaderBuilder::new(batcher)
        .batch_size(settings.batch_size)
        .shuffle(settings.seed);
    if settings.num_workers > 0 {
        builder = builder.num_workers(settings.num_workers);
    }
    builder.build(dataset)
}

/// Log the shapes of the first training batch.
fn preview_batch<B: Backend>(batcher: &SentimentBatcher<B>, dataset: &SentimentDataset, batch_size: usize) {
    let items: Vec<_> = (0..batch_size.min(dataset.len()))
        .filter_map(|i| dataset.get(i))
        .collect();
    if items.is_empty() {
        return;
    }
    let batch = batcher.batch(items);
    tracing::debug!(
        "First batch: input_ids {:?}, attention_mask {:?}, labels {:?}",
        batch.input_ids.dims(),
        batch.attention_mask.dims(),
        batch.labels.dims()
    );
}
