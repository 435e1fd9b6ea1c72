//! Dependency graph construction and analysis
//!
//! The resolver walks the dependency tree depth first against a shared
//! ordered package map; the path analyser ranks the hazardous routes
//! from the project root through the finished node set.

pub mod paths;
pub mod resolver;

pub use paths::{riskiest_paths, RiskPath};
pub use resolver::{resolve, resolve_all, PackageSet};
