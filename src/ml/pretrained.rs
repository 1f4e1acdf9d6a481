// ============================================================
// Layer 5 — Pretrained Weights
// ============================================================
// Loads the published XLM-R checkpoint (`pytorch_model.bin`)
// into XlmRobertaEncoder with burn-import's PyTorch reader.
//
// The hub checkpoint names its tensors after the reference
// implementation's module tree:
//
//   roberta.embeddings.word_embeddings.weight
//   roberta.embeddings.LayerNorm.weight
//   roberta.encoder.layer.3.attention.self.query.weight
//   roberta.encoder.layer.3.attention.output.dense.weight
//   roberta.encoder.layer.3.attention.output.LayerNorm.bias
//   roberta.encoder.layer.3.intermediate.dense.weight
//   roberta.encoder.layer.3.output.dense.weight
//   roberta.encoder.layer.3.output.LayerNorm.weight
//
// The remap table below rewrites them onto our field names.
// Rules run in order; later rules see earlier rewrites.
// Keys with no counterpart (pooler, lm_head, position_ids)
// are ignored. LayerNorm weight/bias → gamma/beta and the
// Linear weight transpose are handled by burn-import.

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, Recorder},
};
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use std::path::Path;

use crate::ml::model::{XlmRobertaClassifier, XlmRobertaConfig, XlmRobertaEncoderRecord};

const KEY_REMAP: [(&str, &str); 9] = [
    (r"^roberta\.", ""),
    (r"^encoder\.layer\.", "layers."),
    (r"attention\.self\.(query|key|value)", "attention.$1"),
    (r"attention\.output\.dense", "attention.output"),
    (r"attention\.output\.LayerNorm", "attention_norm"),
    (r"intermediate\.dense", "intermediate"),
    (r"output\.dense", "output"),
    (r"output\.LayerNorm", "output_norm"),
    (r"embeddings\.LayerNorm", "embeddings.layer_norm"),
];

/// Read the hub `config.json` into an XlmRobertaConfig.
pub fn load_config(path: &Path, num_labels: usize) -> Result<XlmRobertaConfig> {
    let config = XlmRobertaConfig::load(path)
        .map_err(|e| anyhow::anyhow!("Cannot parse model config '{}': {e}", path.display()))?;
    Ok(config.with_num_labels(num_labels))
}

/// Build a classifier whose encoder carries the pretrained weights
/// and whose head is freshly initialised.
pub fn load_classifier<B: Backend>(
    config:  &XlmRobertaConfig,
    weights: &Path,
    device:  &B::Device,
) -> Result<XlmRobertaClassifier<B>> {
    let mut model: XlmRobertaClassifier<B> = config.init(device);

    let args = KEY_REMAP
        .iter()
        .fold(LoadArgs::new(weights.to_path_buf()), |args, (pattern, replacement)| {
            args.with_key_remap(pattern, replacement)
        });

    tracing::info!("Loading pretrained encoder weights from '{}'", weights.display());
    let record: XlmRobertaEncoderRecord<B> = PyTorchFileRecorder::<FullPrecisionSettings>::default()
        .load(args, device)
        .with_context(|| format!("Cannot load pretrained weights '{}'", weights.display()))?;

    model.encoder = model.encoder.load_record(record);
    tracing::info!(
        "Pretrained encoder ready: {} layers, hidden={}, vocab={}",
        config.num_hidden_layers,
        config.hidden_size,
        config.vocab_size
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use tempfile::TempDir;

    /// Apply the remap table the way burn-import does: each rule in order.
    fn remap(key: &str) -> String {
        KEY_REMAP.iter().fold(key.to_string(), |key, (pattern, replacement)| {
            Regex::new(pattern).unwrap().replace_all(&key, *replacement).into_owned()
        })
    }

    #[test]
    fn test_remap_covers_every_encoder_tensor() {
        let cases = [
            ("roberta.embeddings.word_embeddings.weight", "embeddings.word_embeddings.weight"),
            ("roberta.embeddings.LayerNorm.weight", "embeddings.layer_norm.weight"),
            ("roberta.encoder.layer.0.attention.self.query.weight", "layers.0.attention.query.weight"),
            ("roberta.encoder.layer.11.attention.self.value.bias", "layers.11.attention.value.bias"),
            ("roberta.encoder.layer.2.attention.output.dense.weight", "layers.2.attention.output.weight"),
            ("roberta.encoder.layer.2.attention.output.LayerNorm.bias", "layers.2.attention_norm.bias"),
            ("roberta.encoder.layer.5.intermediate.dense.weight", "layers.5.intermediate.weight"),
            ("roberta.encoder.layer.5.output.dense.bias", "layers.5.output.bias"),
            ("roberta.encoder.layer.5.output.LayerNorm.weight", "layers.5.output_norm.weight"),
        ];
        for (hub, ours) in cases {
            assert_eq!(remap(hub), ours, "remapping {hub}");
        }
    }

    #[test]
    fn test_load_config_reads_hub_json_and_ignores_extra_keys() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "architectures": ["XLMRobertaForMaskedLM"],
                "model_type": "xlm-roberta",
                "hidden_act": "gelu",
                "vocab_size": 250002,
                "hidden_size": 768,
                "num_hidden_layers": 12,
                "num_attention_heads": 12,
                "intermediate_size": 3072,
                "hidden_dropout_prob": 0.1,
                "attention_probs_dropout_prob": 0.1,
                "max_position_embeddings": 514,
                "type_vocab_size": 1,
                "layer_norm_eps": 1e-05,
                "pad_token_id": 1,
                "bos_token_id": 0,
                "eos_token_id": 2
            }"#,
        )
        .unwrap();

        let config = load_config(&path, 2).unwrap();
        assert_eq!(config.vocab_size, 250002);
        assert_eq!(config.num_hidden_layers, 12);
        assert_eq!(config.max_position_embeddings, 514);
        assert_eq!(config.num_labels, 2);
    }
}
