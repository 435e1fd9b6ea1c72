//! Registry adapters for the five supported ecosystems
//!
//! Each adapter turns (name, version) into the package's immediate
//! dependencies plus whatever metadata its registry exposes. Network
//! failures are swallowed per call and produce partial results; the
//! only place an ecosystem URL is known is the adapter for it.

mod adapters;
mod agent;

pub use agent::http_agent;

use anyhow::Result;
use rampart_core::{Ecosystem, PackageMetadata};
use rampart_manifests::DepMap;

/// What a registry adapter learned about one package.
#[derive(Debug, Clone, Default)]
pub struct FetchedPackage {
    /// Immediate dependencies, name to cleaned version, in the order
    /// the registry returned them.
    pub dependencies: DepMap,
    pub metadata: PackageMetadata,
}

/// Source of immediate-dependency and metadata lookups.
///
/// The graph resolver only talks to this trait; tests substitute stub
/// graphs and failure injection through it.
pub trait Registry {
    fn fetch(&self, name: &str, version: &str) -> Result<FetchedPackage>;
}

/// Live adapter set backed by the public registries.
pub struct HttpRegistry {
    ecosystem: Ecosystem,
}

impl HttpRegistry {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }
}

impl Registry for HttpRegistry {
    fn fetch(&self, name: &str, version: &str) -> Result<FetchedPackage> {
        let agent = http_agent();
        Ok(match self.ecosystem {
            Ecosystem::Npm => adapters::npm::fetch(agent, name, version),
            Ecosystem::Pypi => adapters::pypi::fetch(agent, name, version),
            Ecosystem::Go => adapters::go::fetch(agent, name, version),
            Ecosystem::Maven => adapters::maven::fetch(agent, name, version),
            Ecosystem::Cargo => adapters::cargo::fetch(agent, name, version),
        })
    }
}
