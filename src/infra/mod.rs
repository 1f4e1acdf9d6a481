// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several other layers:
//
//   download.rs        — Download cache
//                        Fetches the SST-2 archive and the
//                        pretrained hub files once, streams them
//                        to disk with a progress bar, and
//                        extracts zip archives.
//
//   checkpoint.rs      — Saving and loading the fine-tuned model
//                        Uses Burn's CompactRecorder for weights
//                        and JSON for the architecture and run
//                        configuration.
//
//   tokenizer_store.rs — Tokenizer persistence
//                        Loads the pretrained tokenizer from the
//                        hub and saves / reloads it next to the
//                        model.
//
//   metrics.rs         — Training metrics logging
//                        Writes epoch-level metrics (loss, time,
//                        validation accuracy) to a CSV file.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Cached HTTP downloads and zip extraction
pub mod download;

/// Fine-tuned model saving and loading
pub mod checkpoint;

/// Pretrained tokenizer loading and persistence
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
