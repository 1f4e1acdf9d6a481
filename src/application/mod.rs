// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal (running the experiment or re-scoring a saved model).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination, plus the final report lines
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Fine-tune on English, evaluate on Hindi, persist
pub mod train_use_case;

// Reload a saved model and score a positive / negative file pair
pub mod evaluate_use_case;
