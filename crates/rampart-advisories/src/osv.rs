//! OSV batch query client
//!
//! One query per package, posted in windows of up to 1,000. The i-th
//! result corresponds to the i-th query; a failed window is skipped and
//! costs only its own results.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use ureq::Agent;

use rampart_core::Ecosystem;
use rampart_registry::http_agent;

const OSV_BATCH_URL: &str = "https://api.osv.dev/v1/querybatch";
const BATCH_WINDOW: usize = 1_000;

/// One package to query, carrying the package-map key its results
/// attach back to.
#[derive(Debug, Clone)]
pub struct QuerySubject {
    pub key: String,
    pub name: String,
    pub version: String,
}

/// A vulnerability as the advisory database returns it. Every field is
/// defensive; batch responses in particular omit most of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvVulnerability {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub summary: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub severity: Vec<OsvSeverity>,
    pub database_specific: Option<Value>,
    #[serde(default)]
    pub affected: Vec<OsvAffected>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvSeverity {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub score: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvAffected {
    #[serde(default)]
    pub ranges: Vec<OsvRange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvRange {
    #[serde(default)]
    pub events: Vec<OsvEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsvEvent {
    pub introduced: Option<String>,
    pub fixed: Option<String>,
    pub last_affected: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    queries: &'a [OsvQuery],
}

#[derive(Debug, Serialize)]
struct OsvQuery {
    package: OsvPackage,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Debug, Serialize)]
struct OsvPackage {
    name: String,
    ecosystem: String,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    results: Vec<BatchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchResult {
    #[serde(default)]
    vulns: Vec<OsvVulnerability>,
}

/// Batched vulnerability lookup, keyed by package-map key.
pub trait VulnerabilitySource {
    fn query_batch(
        &self,
        subjects: &[QuerySubject],
        ecosystem: Ecosystem,
    ) -> HashMap<String, Vec<OsvVulnerability>>;
}

/// Live client against the OSV batch endpoint.
pub struct OsvClient {
    agent: &'static Agent,
}

impl OsvClient {
    pub fn new() -> Self {
        Self {
            agent: http_agent(),
        }
    }

    fn post_window(&self, queries: &[OsvQuery]) -> Option<BatchResponse> {
        let result = self
            .agent
            .post(OSV_BATCH_URL)
            .config()
            .timeout_global(Some(Duration::from_secs(30)))
            .build()
            .send_json(&BatchRequest { queries });
        match result {
            Ok(mut response) => response.body_mut().read_json().ok(),
            Err(err) => {
                warn!(%err, "advisory batch query failed");
                None
            }
        }
    }
}

impl Default for OsvClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VulnerabilitySource for OsvClient {
    fn query_batch(
        &self,
        subjects: &[QuerySubject],
        ecosystem: Ecosystem,
    ) -> HashMap<String, Vec<OsvVulnerability>> {
        let mut by_key = HashMap::new();

        for window in subjects.chunks(BATCH_WINDOW) {
            let queries: Vec<OsvQuery> = window.iter().map(|s| build_query(s, ecosystem)).collect();
            debug!(count = queries.len(), "posting advisory batch window");
            let Some(response) = self.post_window(&queries) else {
                continue;
            };
            for (subject, result) in window.iter().zip(response.results) {
                if !result.vulns.is_empty() {
                    by_key.insert(subject.key.clone(), result.vulns);
                }
            }
        }

        by_key
    }
}

/// The version is omitted when unknown so the database matches across
/// all versions rather than none.
fn build_query(subject: &QuerySubject, ecosystem: Ecosystem) -> OsvQuery {
    let version = match subject.version.as_str() {
        "" | "latest" => None,
        pinned => Some(pinned.to_string()),
    };
    OsvQuery {
        package: OsvPackage {
            name: subject.name.clone(),
            ecosystem: ecosystem.osv_label().to_string(),
        },
        version,
    }
}
