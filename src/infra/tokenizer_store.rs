// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Fetches the pretrained sentencepiece tokenizer from the hub
// and persists it next to the model so later runs encode text
// with exactly the same vocabulary.
//
// File layout:
//   sentiment_tokenizer/
//     tokenizer.json         ← full tokenizer (HF JSON format)
//     tokenizer_config.json  ← source model id + max_length
//
// Reference: Kudo & Richardson (2018) SentencePiece

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tokenizers::Tokenizer;

const TOKENIZER_FILE: &str = "tokenizer.json";
const SETTINGS_FILE:  &str = "tokenizer_config.json";

/// What the saved tokenizer was built from and how it encodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerSettings {
    pub model_id:   String,
    pub max_length: usize,
}

/// Download the tokenizer published with `model_id`.
pub fn load_pretrained(model_id: &str) -> Result<Tokenizer> {
    tracing::info!("Loading pretrained tokenizer '{}'", model_id);
    Tokenizer::from_pretrained(model_id, None)
        .map_err(|e| anyhow!("Cannot load tokenizer '{}': {}", model_id, e))
}

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write tokenizer.json and tokenizer_config.json, replacing
    /// any previous save.
    pub fn save(&self, tokenizer: &Tokenizer, settings: &TokenizerSettings) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let tok_path = self.dir.join(TOKENIZER_FILE);
        tokenizer
            .save(&tok_path, true)
            .map_err(|e| anyhow!("Cannot write tokenizer to '{}': {}", tok_path.display(), e))?;

        let settings_path = self.dir.join(SETTINGS_FILE);
        fs::write(&settings_path, serde_json::to_string_pretty(settings)?)
            .with_context(|| format!("Cannot write '{}'", settings_path.display()))?;

        tracing::info!("Saved tokenizer to '{}'", self.dir.display());
        Ok(())
    }

    /// Load a previously saved tokenizer and its settings
    pub fn load(&self) -> Result<(Tokenizer, TokenizerSettings)> {
        let tok_path = self.dir.join(TOKENIZER_FILE);
        let tokenizer = Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow!("Cannot load tokenizer from '{}': {}", tok_path.display(), e))?;

        let settings_path = self.dir.join(SETTINGS_FILE);
        let json = fs::read_to_string(&settings_path)
            .with_context(|| format!("Cannot read '{}'", settings_path.display()))?;
        let settings = serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse '{}'", settings_path.display()))?;

        Ok((tokenizer, settings))
    }
}
