// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal each (run the pipeline, check one sequence).
//
// Rules for this layer:
//   - No parsing algorithms here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file format handling (that's Layer 4 and 6)
//   - Only workflow coordination

// The full classify-then-score pipeline
pub mod evaluate_use_case;

// Single-sequence grammar check
pub mod check_use_case;
