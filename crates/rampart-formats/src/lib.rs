//! Interoperable output formats
//!
//! Currently a single format: CycloneDX 1.5 JSON with embedded VEX
//! vulnerability records.

pub mod cyclonedx;

pub use cyclonedx::{build_bom, CycloneDxBom};
