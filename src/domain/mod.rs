// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what the experiment works on:
// labelled sentences and the sources that produce them.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled sentence and its binary sentiment label
pub mod record;

// Core abstractions (traits) that other layers implement
pub mod traits;
