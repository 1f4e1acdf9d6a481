use anyhow::{anyhow, bail, Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokenizers::{PaddingParams, PaddingStrategy, PostProcessor, Tokenizer, TruncationParams};

use crate::domain::record::Record;

/// One tokenised, fixed-length example.
/// Sequence format: <s> tokens </s> <pad>...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label:          u8,
}

/// Pad token names tried in order (sentencepiece style, then BERT style)
const PAD_TOKENS: [&str; 2] = ["<pad>", "[PAD]"];

/// A tokenizer configured to truncate and right-pad every
/// sequence to exactly `max_length` ids.
pub struct SentimentEncoder {
    tokenizer:  Tokenizer,
    max_length: usize,
}

impl SentimentEncoder {
    pub fn new(mut tokenizer: Tokenizer, max_length: usize) -> Result<Self> {
        // Room for the special tokens plus at least one word
        let special = tokenizer
            .get_post_processor()
            .map_or(0, |p| p.added_tokens(false));
        if max_length <= special {
            bail!("max_length {max_length} leaves no room for text after {special} special tokens");
        }
        let (pad_token, pad_id) = PAD_TOKENS
            .iter()
            .find_map(|t| tokenizer.token_to_id(t).map(|id| (t.to_string(), id)))
            .ok_or_else(|| anyhow!("tokenizer has no padding token"))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Cannot configure truncation: {e}"))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(max_length),
            pad_id,
            pad_token,
            ..Default::default()
        }));

        Ok(Self { tokenizer, max_length })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Tokenise one record into ids + mask of exactly `max_length`.
    pub fn encode(&self, record: &Record) -> Result<EncodedExample> {
        let encoding = self
            .tokenizer
            .encode(record.text.as_str(), true)
            .map_err(|e| anyhow!("Tokenisation error: {e}"))?;

        let input_ids      = encoding.get_ids().to_vec();
        let attention_mask = encoding.get_attention_mask().to_vec();
        if input_ids.len() != self.max_length || attention_mask.len() != self.max_length {
            bail!(
                "encoded length {} differs from max_length {}",
                input_ids.len(),
                self.max_length
            );
        }

        Ok(EncodedExample {
            input_ids,
            attention_mask,
            label: record.label.index(),
        })
    }
}

/// A partition of Records that tokenises on access.
/// Encodings are never cached: `get(i)` re-encodes record `i`.
pub struct SentimentDataset {
    records: Vec<Record>,
    encoder: Arc<SentimentEncoder>,
}

impl SentimentDataset {
    pub fn new(records: Vec<Record>, encoder: Arc<SentimentEncoder>) -> Self {
        Self { records, encoder }
    }

    /// Encode the record at `index`; an out-of-range index is an error.
    pub fn encode(&self, index: usize) -> Result<EncodedExample> {
        let record = self.records.get(index).with_context(|| {
            format!("index {index} out of range for {} records", self.records.len())
        })?;
        self.encoder.encode(record)
    }
}

impl Dataset<EncodedExample> for SentimentDataset {
    fn get(&self, index: usize) -> Option<EncodedExample> {
        if index >= self.records.len() {
            return None;
        }
        match self.encode(index) {
            Ok(example) => Some(example),
            // The loader stops at the first None, so this ends the pass;
            // callers compare the examples seen against len().
            Err(e) => {
                tracing::error!("Record {index} could not be encoded: {e:#}");
                None
            }
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Label;
    use crate::test_support::{strict_tokenizer, word_tokenizer, WORDS};

    fn encoder(max_length: usize) -> Arc<SentimentEncoder> {
        Arc::new(SentimentEncoder::new(word_tokenizer(&WORDS), max_length).unwrap())
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new("great film", Label::Positive).unwrap(),
            Record::new("loved it", Label::Positive).unwrap(),
            Record::new("bad movie", Label::Negative).unwrap(),
            Record::new("hated it boring boring boring boring", Label::Negative).unwrap(),
        ]
    }

    #[test]
    fn test_every_example_has_max_length() {
        let ds = SentimentDataset::new(records(), encoder(6));
        for i in 0..ds.len() {
            let ex = ds.encode(i).unwrap();
            assert_eq!(ex.input_ids.len(), 6);
            assert_eq!(ex.attention_mask.len(), 6);
        }
    }

    #[test]
    fn test_padding_layout() {
        let ds = SentimentDataset::new(records(), encoder(6));
        let ex = ds.encode(0).unwrap();
        // <s> great film </s> <pad> <pad>
        assert_eq!(ex.input_ids, vec![0, 4, 5, 2, 1, 1]);
        assert_eq!(ex.attention_mask, vec![1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_truncation_keeps_special_tokens() {
        let ds = SentimentDataset::new(records(), encoder(5));
        let ex = ds.encode(3).unwrap();
        // <s> hated it boring </s>
        assert_eq!(ex.input_ids, vec![0, 10, 7, 11, 2]);
        assert_eq!(ex.attention_mask, vec![1; 5]);
    }

    #[test]
    fn test_label_is_unchanged() {
        let ds = SentimentDataset::new(records(), encoder(8));
        for (i, record) in records().iter().enumerate() {
            assert_eq!(ds.encode(i).unwrap().label, record.label.index());
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let ds = SentimentDataset::new(records(), encoder(8));
        assert_eq!(ds.encode(2).unwrap(), ds.encode(2).unwrap());
    }

    #[test]
    fn test_out_of_range_index() {
        let ds = SentimentDataset::new(records(), encoder(8));
        assert!(ds.encode(4).is_err());
        assert!(ds.get(4).is_none());
        assert!(ds.get(3).is_some());
    }

    #[test]
    fn test_max_length_must_exceed_special_tokens() {
        // <s> and </s> take two positions
        for max_length in [0, 1, 2] {
            assert!(SentimentEncoder::new(word_tokenizer(&WORDS), max_length).is_err(), "max_length {max_length}");
        }
        let enc = SentimentEncoder::new(word_tokenizer(&WORDS), 3).unwrap();
        let ex  = enc.encode(&Record::new("great film", Label::Positive).unwrap()).unwrap();
        assert_eq!(ex.input_ids, vec![0, 4, 2]);
    }

    #[test]
    fn test_unencodable_record_ends_iteration() {
        let enc = Arc::new(SentimentEncoder::new(strict_tokenizer(&WORDS), 6).unwrap());
        let ds  = SentimentDataset::new(
            vec![
                Record::new("great film", Label::Positive).unwrap(),
                Record::new("unknown words", Label::Positive).unwrap(),
            ],
            enc,
        );
        assert!(ds.get(0).is_some());
        assert!(ds.encode(1).is_err());
        assert!(ds.get(1).is_none());
    }
}
