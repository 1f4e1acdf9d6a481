// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// One labelled example: a sentence and its sentiment.
//
// Both the English training data and the Hindi evaluation
// data are expressed as Records, so everything downstream
// (tokenisation, batching, scoring) is language-agnostic.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Binary sentiment label. The discriminants are the class
/// indices the classifier head predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Negative = 0,
    Positive = 1,
}

impl Label {
    /// Parse a raw class index (e.g. the `label` column of a TSV file).
    pub fn from_index(index: i64) -> Result<Self> {
        match index {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => bail!("label must be 0 or 1, got {other}"),
        }
    }

    /// Class index used as the classification target
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A sentence with a binary sentiment label.
///
/// The text is stored trimmed and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub text:  String,
    pub label: Label,
}

impl Record {
    /// Create a Record, rejecting text that is blank after trimming.
    pub fn new(text: impl Into<String>, label: Label) -> Result<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            bail!("record text is empty");
        }
        let text = if trimmed.len() == text.len() { text } else { trimmed.to_string() };
        Ok(Self { text, label })
    }
}

/// Number of (positive, negative) records in a partition
pub fn label_counts(records: &[Record]) -> (usize, usize) {
    records.iter().fold((0, 0), |(pos, neg), r| match r.label {
        Label::Positive => (pos + 1, neg),
        Label::Negative => (pos, neg + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trips_through_index() {
        assert_eq!(Label::from_index(0).unwrap(), Label::Negative);
        assert_eq!(Label::from_index(1).unwrap(), Label::Positive);
        assert_eq!(Label::Positive.index(), 1);
        assert_eq!(Label::Negative.index(), 0);
    }

    #[test]
    fn test_non_binary_label_is_rejected() {
        assert!(Label::from_index(-1).is_err());
        assert!(Label::from_index(2).is_err());
    }

    #[test]
    fn test_record_text_is_trimmed() {
        let r = Record::new("  loved it \n", Label::Positive).unwrap();
        assert_eq!(r.text, "loved it");
    }

    #[test]
    fn test_blank_record_is_rejected() {
        assert!(Record::new("   \t ", Label::Negative).is_err());
        assert!(Record::new("", Label::Positive).is_err());
    }

    #[test]
    fn test_label_counts() {
        let records = vec![
            Record::new("a", Label::Positive).unwrap(),
            Record::new("b", Label::Negative).unwrap(),
            Record::new("c", Label::Positive).unwrap(),
        ];
        assert_eq!(label_counts(&records), (2, 1));
    }
}
