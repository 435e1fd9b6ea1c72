//! SBOM request handling
//!
//! Consumes the node list of a prior analysis and emits the CycloneDX
//! document. Kept separate from the analysis pipeline: the emitter only
//! ever sees finished, immutable nodes.

use serde::Deserialize;

use rampart_core::{AnalysisError, Ecosystem, PackageNode};
use rampart_formats::build_bom;

const DEFAULT_ROOT: &str = "project@0.0.0";

/// An SBOM request: the annotated nodes plus their ecosystem.
#[derive(Debug, Deserialize)]
pub struct SbomRequest {
    #[serde(default)]
    pub nodes: Vec<PackageNode>,
    pub ecosystem: Ecosystem,
    #[serde(default)]
    pub root: Option<String>,
}

/// Serialise the CycloneDX document for a node list.
pub fn generate_sbom(request: &SbomRequest) -> Result<String, AnalysisError> {
    if request.nodes.is_empty() {
        return Err(AnalysisError::Client(
            "No dependency data provided".to_string(),
        ));
    }
    let root = request.root.as_deref().unwrap_or(DEFAULT_ROOT);
    let bom = build_bom(&request.nodes, request.ecosystem, root);
    serde_json::to_string(&bom).map_err(|err| AnalysisError::Internal(err.to_string()))
}
