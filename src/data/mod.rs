// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw text files to tensor batches.
//
// The pipeline flows in this order:
//
//   SST-2.zip (GLUE)          pos_train.txt / neg_train.txt
//       │                             │
//       ▼                             ▼
//   Sst2Source / TsvSplit       PolarityFiles
//       │                             │
//       └──────────┬──────────────────┘
//                  ▼
//   Preprocessor      → cleans each sentence
//                  │
//                  ▼
//   shuffle           → drop_tail (train), seeded_shuffle (Hindi)
//                  │
//                  ▼
//   SentimentEncoder  → tokenise, truncate and pad to max_length
//                  │
//                  ▼
//   SentimentDataset  → implements Burn's Dataset trait
//                  │
//                  ▼
//   SentimentBatcher  → stacks examples into tensor batches
//                  │
//                  ▼
//   DataLoader        → feeds batches to training / evaluation
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Downloads and parses the SST-2 TSV splits
pub mod sst2;

/// Loads a labelled partition from positive / negative line files
pub mod loader;

/// Cleans and normalises raw sentences
pub mod preprocessor;

/// Seeded shuffling and tail removal
pub mod shuffle;

/// Tokenisation and Burn's Dataset trait
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
