// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define the core
// concepts of the evaluation harness.
//
// Rules for this layer:
//   - NO file I/O
//   - NO parsing algorithms (that's Layer 5)
//   - Only plain data types, traits and error kinds
//
// Think of this layer as the "dictionary" of the system:
// it defines what things ARE, not how they work.

// Labels, labelled examples and prediction records
pub mod example;

// Core abstractions (traits) that other layers implement
pub mod traits;

// Error kinds shared by every layer
pub mod error;
