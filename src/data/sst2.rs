// ============================================================
// Layer 4 — SST-2 Acquisition
// ============================================================
// Loads the Stanford Sentiment Treebank (binary) in its GLUE
// distribution. The archive contains three TSV files:
//
//   SST-2/train.tsv   sentence<TAB>label   (67 349 rows)
//   SST-2/dev.tsv     sentence<TAB>label   (872 rows)
//   SST-2/test.tsv    index<TAB>sentence   (1 821 rows, unlabeled)
//
// train.tsv and dev.tsv become the train / validation
// partitions. The test split carries no labels, so it is
// kept as plain sentences and never scored.

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::preprocessor::Preprocessor;
use crate::domain::record::{Label, Record};
use crate::domain::traits::RecordSource;
use crate::infra::download::{extract_zip, DownloadCache};

/// Where the GLUE distribution of SST-2 is published
pub const SST2_URL: &str = "https://dl.fbaipublicfiles.com/glue/data/SST-2.zip";

/// The three SST-2 partitions, disjoint by construction.
#[derive(Debug, Clone)]
pub struct Sst2Splits {
    pub train:      Vec<Record>,
    pub validation: Vec<Record>,
    pub test:       Vec<String>,
}

/// Downloads (once) and loads the SST-2 archive.
pub struct Sst2Source {
    cache: DownloadCache,
}

impl Sst2Source {
    pub fn new(cache: DownloadCache) -> Self {
        Self { cache }
    }

    /// Make sure the archive is downloaded and extracted, then load it.
    pub fn fetch(&self) -> Result<Sst2Splits> {
        let extracted = self.cache.root().join("sst2");
        let data_dir  = extracted.join("SST-2");

        if !data_dir.join("train.tsv").exists() {
            let archive = self.cache.fetch(SST2_URL, Path::new("sst2").join("SST-2.zip"))?;
            extract_zip(&archive, &extracted)?;
        }

        load_dir(&data_dir)
    }
}

/// Load the three splits from an extracted `SST-2/` directory.
pub fn load_dir(dir: &Path) -> Result<Sst2Splits> {
    let train      = TsvSplit::new(dir.join("train.tsv")).load_all()?;
    let validation = TsvSplit::new(dir.join("dev.tsv")).load_all()?;
    let test       = load_unlabelled(&dir.join("test.tsv"))?;

    tracing::info!(
        "SST-2 loaded: {} train, {} validation, {} test",
        train.len(),
        validation.len(),
        test.len()
    );
    Ok(Sst2Splits { train, validation, test })
}

/// One labelled split stored as `sentence<TAB>label` with a header row.
#[derive(Debug, Clone)]
pub struct TsvSplit {
    path: PathBuf,
}

impl TsvSplit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for TsvSplit {
    fn load_all(&self) -> Result<Vec<Record>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read '{}'", self.path.display()))?;
        parse_labelled(&content)
            .with_context(|| format!("Malformed split '{}'", self.path.display()))
    }
}

/// Parse `sentence<TAB>label` rows. The first line is the header.
fn parse_labelled(content: &str) -> Result<Vec<Record>> {
    let preprocessor = Preprocessor::new();
    let mut records  = Vec::new();

    for (line_no, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        // Split on the last tab: the label is always the final column
        let Some((sentence, label)) = line.rsplit_once('\t') else {
            bail!("line {}: expected `sentence<TAB>label`", line_no + 1);
        };
        let label: i64 = label
            .trim()
            .parse()
            .with_context(|| format!("line {}: label '{}' is not an integer", line_no + 1, label))?;
        let label = Label::from_index(label)
            .with_context(|| format!("line {}", line_no + 1))?;

        let text = preprocessor.clean(sentence);
        if text.is_empty() {
            tracing::warn!("line {}: empty sentence skipped", line_no + 1);
            continue;
        }
        records.push(Record::new(text, label)?);
    }

    Ok(records)
}

/// Read `index<TAB>sentence` rows of the unlabeled test split.
fn load_unlabelled(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    let preprocessor = Preprocessor::new();

    Ok(content
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once('\t'))
        .map(|(_, sentence)| preprocessor.clean(sentence))
        .filter(|s| !s.is_empty())
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_labelled_rows() {
        let tsv = "sentence\tlabel\nit 's a charming journey . \t1\nunflinchingly bleak \t0\n";
        let records = parse_labelled(tsv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "it 's a charming journey .");
        assert_eq!(records[0].label, Label::Positive);
        assert_eq!(records[1].label, Label::Negative);
    }

    #[test]
    fn test_non_binary_label_is_an_error() {
        let tsv = "sentence\tlabel\nsomething\t-1\n";
        assert!(parse_labelled(tsv).is_err());
    }

    #[test]
    fn test_missing_label_column_is_an_error() {
        let tsv = "sentence\tlabel\nno label here\n";
        assert!(parse_labelled(tsv).is_err());
    }

    #[test]
    fn test_load_dir_reads_all_three_splits() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("train.tsv"), "sentence\tlabel\na\t1\nb\t0\nc\t1\n").unwrap();
        fs::write(dir.path().join("dev.tsv"), "sentence\tlabel\nd\t0\n").unwrap();
        fs::write(dir.path().join("test.tsv"), "index\tsentence\n0\te\n1\tf\n").unwrap();

        let splits = load_dir(dir.path()).unwrap();
        assert_eq!(splits.train.len(), 3);
        assert_eq!(splits.validation.len(), 1);
        assert_eq!(splits.test, vec!["e".to_string(), "f".to_string()]);
    }
}
