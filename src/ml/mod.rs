// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn-specific modelling code.
//
// What's in this layer:
//
//   model.rs      — XLM-RoBERTa encoder + sequence classifier
//                   • Word / position / token-type embeddings
//                   • Multi-head self-attention with pad masking
//                   • Feed-forward blocks (GELU), post-norm residuals
//                   • Two-layer classification head on <s>
//
//   pretrained.rs — Reads the hub config.json and loads the
//                   published PyTorch checkpoint into the encoder
//
//   trainer.rs    — Adam + linear decay fine-tuning loop with a
//                   validation pass after every epoch
//
//   evaluator.rs  — Arg-max accuracy / confusion matrix over an
//                   ordered loader (validation and Hindi)
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Conneau et al. (2020) Unsupervised Cross-lingual
//            Representation Learning at Scale

use burn::backend::Autodiff;

/// XLM-RoBERTa encoder and classifier
pub mod model;

/// Hub checkpoint loading
pub mod pretrained;

/// Fine-tuning loop with per-epoch validation
pub mod trainer;

/// Accuracy evaluation over a batch iterator
pub mod evaluator;

// ─── Backend selection ───────────────────────────────────────────────────────
// GPU through wgpu by default; `--features cpu` switches to ndarray.

#[cfg(not(feature = "cpu"))]
pub type InnerBackend = burn::backend::Wgpu;

#[cfg(feature = "cpu")]
pub type InnerBackend = burn::backend::NdArray;

pub type TrainBackend = Autodiff<InnerBackend>;

pub type Device = <InnerBackend as burn::tensor::backend::Backend>::Device;
