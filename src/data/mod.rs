// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything that touches the tabular files:
//
//   data/train.tsv
//       │
//       ▼
//   reader::read_examples      → Vec<LabeledExample>
//       │
//       ▼   (classification happens in Layer 5)
//       │
//   writer::write_predictions  → output/train_results.tsv
//       │
//       ▼
//   reader::read_predictions   → Vec<PredictionRecord> for scoring
//
// Each module is responsible for exactly one step.

/// Reads labelled examples and re-reads prediction tables
pub mod reader;

/// Writes prediction tables
pub mod writer;

/// Header and field helpers shared by reader and writer
pub mod tsv;
