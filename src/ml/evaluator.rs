// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a trained classifier over an order-preserving loader.
// Used for the per-epoch validation pass and for the
// cross-lingual (Hindi) evaluation.
//
// Takes the model by shared reference on a plain (non-autodiff)
// backend: no gradients are tracked and the weights cannot be
// mutated from here.

use anyhow::{bail, Result};
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    prelude::*,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::data::batcher::{SentimentBatch, SentimentBatcher};
use crate::data::dataset::SentimentDataset;
use crate::ml::model::XlmRobertaClassifier;

/// Binary confusion matrix; class 1 (positive sentiment) is "positive".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, predicted: i64, actual: i64) {
        match (predicted == 1, actual == 1) {
            (true, true)   => self.tp += 1,
            (false, false) => self.tn += 1,
            (true, false)  => self.fp += 1,
            (false, true)  => self.fn_ += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn correct(&self) -> usize {
        self.tp + self.tn
    }

    /// correct / total; 0.0 on an empty matrix
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }
}

/// Run the model over `batches` and tally arg-max predictions.
///
/// `num_batches` only sizes the progress bar.
pub fn evaluate<B, I>(
    model:       &XlmRobertaClassifier<B>,
    batches:     I,
    num_batches: usize,
    description: &str,
) -> ConfusionMatrix
where
    B: Backend,
    I: Iterator<Item = SentimentBatch<B>>,
{
    let pb = progress_bar(num_batches, description);
    let mut matrix = ConfusionMatrix::default();

    for batch in batches {
        let predictions = model.predict(batch.input_ids, batch.attention_mask);

        let predicted = predictions.into_data();
        let actual    = batch.labels.into_data();
        for (p, a) in predicted.iter::<i64>().zip(actual.iter::<i64>()) {
            matrix.record(p, a);
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    matrix
}

/// Score a whole partition through an ordered, single-threaded loader.
pub fn evaluate_dataset<B: Backend>(
    model:       &XlmRobertaClassifier<B>,
    dataset:     SentimentDataset,
    batch_size:  usize,
    device:      &B::Device,
    description: &str,
) -> Result<ConfusionMatrix> {
    if batch_size == 0 {
        bail!("batch_size must be positive");
    }
    let expected    = dataset.len();
    let num_batches = expected.div_ceil(batch_size);
    let loader = DataLoaderBuilder::new(SentimentBatcher::<B>::new(device.clone()))
        .batch_size(batch_size)
        .build(dataset);

    let matrix = evaluate(model, loader.iter(), num_batches, description);
    ensure_complete(matrix.total(), expected, description)?;
    Ok(matrix)
}

/// A burn loader stops at the first record that fails to encode,
/// so a short count means the pass was cut off.
pub fn ensure_complete(seen: usize, expected: usize, pass: &str) -> Result<()> {
    if seen != expected {
        bail!("{pass} pass stopped after {seen} of {expected} examples");
    }
    Ok(())
}

/// Bar shared by the training and evaluation passes
pub fn progress_bar(len: usize, description: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(description.to_string());
    pb
}
