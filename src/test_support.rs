//! Fixtures shared by the unit tests: an offline tokenizer and a
//! tiny model config, so no test touches the network.

use serde_json::json;
use std::str::FromStr;
use tokenizers::Tokenizer;

use crate::ml::model::XlmRobertaConfig;

/// Special tokens in XLM-R order: `<s>`=0, `<pad>`=1, `</s>`=2, `<unk>`=3
const SPECIALS: [&str; 4] = ["<s>", "<pad>", "</s>", "<unk>"];

/// Whitespace / word-level tokenizer that wraps sequences in
/// `<s> … </s>` the way the XLM-R tokenizer does.
/// Word `words[i]` gets id `i + 4`.
pub fn word_tokenizer(words: &[&str]) -> Tokenizer {
    build_tokenizer(words, &SPECIALS)
}

/// Same vocabulary but without `<unk>`: any out-of-vocabulary word
/// makes encoding fail.
pub fn strict_tokenizer(words: &[&str]) -> Tokenizer {
    build_tokenizer(words, &SPECIALS[..3])
}

fn build_tokenizer(words: &[&str], specials: &[&str]) -> Tokenizer {
    let mut vocab = serde_json::Map::new();
    for (id, token) in specials.iter().enumerate() {
        vocab.insert(token.to_string(), json!(id));
    }
    for (i, word) in words.iter().enumerate() {
        vocab.insert(word.to_string(), json!(i + SPECIALS.len()));
    }

    let added_tokens: Vec<_> = specials
        .iter()
        .enumerate()
        .map(|(id, token)| {
            json!({
                "id": id, "content": token, "single_word": false, "lstrip": false,
                "rstrip": false, "normalized": false, "special": true
            })
        })
        .collect();

    let tokenizer_json = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": { "type": "Lowercase" },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": {
            "type": "RobertaProcessing",
            "sep": ["</s>", 2],
            "cls": ["<s>", 0],
            "trim_offsets": true,
            "add_prefix_space": false
        },
        "decoder": null,
        "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "<unk>" }
    });

    Tokenizer::from_str(&tokenizer_json.to_string()).expect("fixture tokenizer is valid")
}

/// Vocabulary used by most tests
pub const WORDS: [&str; 8] = ["great", "film", "loved", "it", "bad", "movie", "hated", "boring"];

/// A one-layer encoder small enough for CPU unit tests.
pub fn tiny_config() -> XlmRobertaConfig {
    XlmRobertaConfig::new()
        .with_vocab_size(SPECIALS.len() + WORDS.len())
        .with_hidden_size(8)
        .with_num_hidden_layers(1)
        .with_num_attention_heads(2)
        .with_intermediate_size(16)
        .with_max_position_embeddings(16)
        .with_hidden_dropout_prob(0.0)
        .with_attention_probs_dropout_prob(0.0)
}
