//! The orchestrator
//!
//! Sequences manifest parsing, transitive resolution, advisory lookup,
//! scoring, and path analysis under one wall-clock budget, wrapped in a
//! cache lookup/store pair keyed on the manifest hash.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rampart_advisories::{ExploitFeed, QuerySubject, VulnerabilitySource};
use rampart_cache::{manifest_hash, ResultCache};
use rampart_core::{
    AnalysisError, Budget, Ecosystem, PackageNode, RiskSummary, CACHE_TTL_SECONDS,
    TIMEOUT_SECONDS,
};
use rampart_graph::{resolve_all, riskiest_paths, RiskPath};
use rampart_manifests::parse_manifest;
use rampart_registry::{HttpRegistry, Registry};
use rampart_risk::score_package;

/// An analysis request as the entry shim delivers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub manifest: String,
    #[serde(default)]
    pub ecosystem: String,
}

/// The analysis response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub ecosystem: Ecosystem,
    pub root: String,
    pub total_dependencies: usize,
    pub direct_dependencies: usize,
    pub transitive_dependencies: usize,
    pub risk_summary: RiskSummary,
    pub nodes: Vec<PackageNode>,
    pub riskiest_paths: Vec<RiskPath>,
}

/// Orchestrates one analysis per call over injected collaborators.
pub struct Analyzer<'a> {
    pub advisories: &'a dyn VulnerabilitySource,
    pub exploit_feed: &'a dyn ExploitFeed,
    pub cache: &'a dyn ResultCache,
    /// Wall-clock budget; defaults to [`TIMEOUT_SECONDS`].
    pub timeout: Duration,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        advisories: &'a dyn VulnerabilitySource,
        exploit_feed: &'a dyn ExploitFeed,
        cache: &'a dyn ResultCache,
    ) -> Self {
        Self {
            advisories,
            exploit_feed,
            cache,
            timeout: Duration::from_secs(TIMEOUT_SECONDS),
        }
    }

    /// Run a full analysis against the live registries.
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<String, AnalysisError> {
        let ecosystem = validate(request)?;
        let registry = HttpRegistry::new(ecosystem);
        self.analyze_with(request, ecosystem, &registry, Utc::now())
    }

    /// The pipeline behind [`Analyzer::analyze`], with the registry
    /// adapter and clock injectable. Returns the serialised response
    /// body; a cache hit returns the stored body byte for byte.
    pub fn analyze_with(
        &self,
        request: &AnalyzeRequest,
        ecosystem: Ecosystem,
        registry: &dyn Registry,
        now: DateTime<Utc>,
    ) -> Result<String, AnalysisError> {
        let cache_key = manifest_hash(&request.manifest);
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!(%cache_key, "serving analysis from cache");
            return Ok(cached);
        }

        let budget = Budget::new(self.timeout);

        let direct = parse_manifest(&request.manifest, ecosystem);
        if direct.is_empty() {
            return Err(AnalysisError::Client(
                "Could not parse any dependencies from manifest".to_string(),
            ));
        }

        let packages = resolve_all(registry, &direct, &budget);

        let subjects: Vec<QuerySubject> = packages
            .iter()
            .map(|(key, pkg)| QuerySubject {
                key: key.clone(),
                name: pkg.name.clone(),
                version: pkg.version.clone(),
            })
            .collect();
        let vulns_by_key = self.advisories.query_batch(&subjects, ecosystem);
        let exploited = self.exploit_feed.exploited_cves();

        let mut nodes = Vec::with_capacity(packages.len());
        let mut risk_summary = RiskSummary::default();
        for (key, pkg) in &packages {
            let vulns = vulns_by_key.get(key).map_or(&[][..], Vec::as_slice);
            let node = score_package(pkg, vulns, &exploited, ecosystem, now);
            risk_summary.record(node.risk_level);
            nodes.push(node);
        }

        let riskiest: Vec<RiskPath> = riskiest_paths(&nodes);

        let direct_count = nodes.iter().filter(|node| node.is_direct).count();
        let report = AnalysisReport {
            ecosystem,
            root: "project@0.0.0".to_string(),
            total_dependencies: nodes.len(),
            direct_dependencies: direct_count,
            transitive_dependencies: nodes.len() - direct_count,
            risk_summary,
            nodes,
            riskiest_paths: riskiest,
        };
        info!(
            ecosystem = %report.ecosystem,
            total = report.total_dependencies,
            elapsed_ms = budget.elapsed().as_millis() as u64,
            "analysis complete"
        );

        let body = serde_json::to_string(&report)
            .map_err(|err| AnalysisError::Internal(err.to_string()))?;
        self.cache.put(&cache_key, &body, CACHE_TTL_SECONDS);
        Ok(body)
    }
}

/// Reject requests with a missing manifest or an unknown ecosystem.
fn validate(request: &AnalyzeRequest) -> Result<Ecosystem, AnalysisError> {
    if request.manifest.is_empty() {
        return Err(AnalysisError::Client(
            "Missing or invalid manifest/ecosystem".to_string(),
        ));
    }
    request
        .ecosystem
        .parse()
        .map_err(|_| AnalysisError::Client("Missing or invalid manifest/ecosystem".to_string()))
}
