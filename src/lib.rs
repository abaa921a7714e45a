// ============================================================
// grammar-eval — Library Root
// ============================================================
// Grammar-based error detection over POS-tag sequences. A
// hand-written context-free grammar decides whether each tag
// sequence of a labelled dataset is well-formed; the verdicts
// are written to a results table and scored with precision and
// recall.
//
//   Layer 1  cli          argument parsing and output
//   Layer 2  application  evaluate and check use cases
//   Layer 3  domain       labels, records, traits, errors
//   Layer 4  data         TSV reading and writing
//   Layer 5  parsing      grammar, Earley, CYK, classifier
//   Layer 6  infra        metrics and run report

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod parsing;
