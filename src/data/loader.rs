// ============================================================
// Layer 4 — Polarity File Loader
// ============================================================
// Builds a labelled partition from two plain-text files:
//
//   pos_train.txt   one positive example per line
//   neg_train.txt   one negative example per line
//
// The label is implied by which file a line comes from.
// Lines are cleaned with the Preprocessor; lines that are
// blank after cleaning are skipped.
//
// Record order is: every positive line (in file order),
// then every negative line (in file order). Shuffling is a
// separate step so the concatenation itself stays testable.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::{preprocessor::Preprocessor, shuffle::seeded_shuffle};
use crate::domain::record::{Label, Record};
use crate::domain::traits::RecordSource;

/// A positive-file / negative-file pair.
/// Implements the RecordSource trait from Layer 3.
#[derive(Debug, Clone)]
pub struct PolarityFiles {
    positive: PathBuf,
    negative: PathBuf,
}

impl PolarityFiles {
    pub fn new(positive: impl Into<PathBuf>, negative: impl Into<PathBuf>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    /// Load both files and permute the combined partition with `seed`.
    pub fn load_shuffled(&self, seed: u64) -> Result<Vec<Record>> {
        let records = self.load_all()?;
        Ok(seeded_shuffle(records, seed))
    }
}

impl RecordSource for PolarityFiles {
    fn load_all(&self) -> Result<Vec<Record>> {
        let mut records = load_labelled_lines(&self.positive, Label::Positive)?;
        let positives   = records.len();
        records.extend(load_labelled_lines(&self.negative, Label::Negative)?);

        tracing::info!(
            "Loaded {} positive and {} negative lines",
            positives,
            records.len() - positives
        );
        Ok(records)
    }
}

/// Read a file and turn each non-blank line into a Record with `label`.
fn load_labelled_lines(path: &Path, label: Label) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let preprocessor = Preprocessor::new();
    let mut records  = Vec::new();
    let mut skipped  = 0usize;

    for line in content.lines() {
        let text = preprocessor.clean(line);
        if text.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(Record::new(text, label)?);
    }

    tracing::debug!(
        "'{}': {} records, {} blank lines skipped",
        path.display(),
        records.len(),
        skipped
    );
    Ok(records)
}
