//! Lead-qualification quiz engine.
//!
//! The [`quiz`] module holds the decision core: a configuration-driven question
//! sequencer, the disqualification gate, the tier classifier, and the result copy
//! selection. [`config`], [`telemetry`], and [`error`] carry the process-level
//! plumbing shared by the HTTP service and the command line.

pub mod config;
pub mod error;
pub mod quiz;
pub mod telemetry;
