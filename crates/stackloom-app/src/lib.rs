//! Use case orchestration for stackloom.
//!
//! This crate provides the application layer: use cases that coordinate the
//! settings, domain, and render layers. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod explain;
mod synth;

pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use synth::{SynthInput, SynthOutput, run_synth, serialize_template};
