//! Manifest parsers for the five supported ecosystems
//!
//! Each parser extracts a mapping of direct dependency name to cleaned,
//! pinned version (empty when the manifest pins nothing). Entries that
//! fail to parse are skipped; a manifest that yields nothing at all is
//! the caller's problem to reject.

pub mod parsers;

use indexmap::IndexMap;
use rampart_core::Ecosystem;

/// Direct dependencies in manifest order. Re-declaring a name keeps its
/// original position and overwrites the version, matching how dev
/// dependencies shadow regular ones in npm and cargo manifests.
pub type DepMap = IndexMap<String, String>;

/// Parse a manifest for the given ecosystem.
pub fn parse_manifest(manifest: &str, ecosystem: Ecosystem) -> DepMap {
    match ecosystem {
        Ecosystem::Npm => parsers::npm::parse(manifest),
        Ecosystem::Pypi => parsers::pypi::parse(manifest),
        Ecosystem::Go => parsers::go::parse(manifest),
        Ecosystem::Maven => parsers::maven::parse(manifest),
        Ecosystem::Cargo => parsers::cargo::parse(manifest),
    }
}
