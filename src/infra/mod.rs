// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the application layer:
//
//   metrics.rs — the evaluator
//                Tallies prediction records into a confusion
//                matrix and derives precision, recall,
//                accuracy and F1 under a zero-division policy.
//
//   report.rs  — run report persistence
//                Saves the run configuration and metrics as a
//                pretty-printed JSON file.

/// Confusion matrix and precision/recall
pub mod metrics;

/// JSON run report
pub mod report;
