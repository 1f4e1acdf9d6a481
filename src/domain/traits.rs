// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// the application layer can build a partition from a TSV
// split or from a pair of polarity files without caring which.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::record::Record;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce an ordered partition of Records.
///
/// Implementations:
///   - TsvSplit      → one labelled split of the SST-2 archive
///   - PolarityFiles → a positive file followed by a negative file
pub trait RecordSource {
    /// Load every record from this source, in source order.
    fn load_all(&self) -> Result<Vec<Record>>;
}
