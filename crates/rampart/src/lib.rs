//! rampart: dependency risk analysis and SBOM generation
//!
//! The library surface is the orchestrator plus the request/response
//! envelope types an HTTP entry shim would bind to; the binary wraps
//! the same pipeline in a CLI.

pub mod analysis;
pub mod cli;
pub mod envelope;
pub mod sbom;

pub use analysis::{AnalysisReport, Analyzer, AnalyzeRequest};
pub use envelope::{error_envelope, ErrorBody};
pub use sbom::{generate_sbom, SbomRequest};
