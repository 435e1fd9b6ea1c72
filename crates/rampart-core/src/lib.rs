//! Core types shared across the rampart crates
//!
//! Everything downstream of the registry adapters works in terms of the
//! types defined here: ecosystems, package keys, resolved packages, and
//! the annotated nodes that end up in the analysis response and the SBOM.

pub mod budget;
pub mod ecosystem;
pub mod error;
pub mod node;
pub mod package;

pub use budget::Budget;
pub use ecosystem::Ecosystem;
pub use error::AnalysisError;
pub use node::{
    LicenceInfo, LicenceRisk, MaintenanceInfo, PackageNode, ReleaseFrequency, RiskLevel,
    RiskSummary, Severity, VulnerabilityRecord,
};
pub use package::{clean_version, package_key, PackageMetadata, ResolvedPackage};

/// rampart version string, baked into user agents and SBOM tool metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum transitive resolution depth (root direct = 0).
pub const MAX_DEPTH: usize = 5;

/// Wall-clock budget for a single analysis, in seconds.
pub const TIMEOUT_SECONDS: u64 = 50;

/// Result cache entry lifetime, in seconds.
pub const CACHE_TTL_SECONDS: i64 = 86_400;
