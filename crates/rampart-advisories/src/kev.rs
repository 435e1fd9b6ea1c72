//! CISA Known Exploited Vulnerabilities feed
//!
//! A single fetch of the public catalog, reduced to the set of CVE ids.
//! A failed fetch yields an empty set; exploited status then simply
//! contributes nothing to scoring.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use ureq::Agent;

use rampart_registry::http_agent;

const KEV_URL: &str =
    "https://www.cisa.gov/sites/default/files/feeds/known-exploited-vulnerabilities.json";

#[derive(Debug, Deserialize)]
struct KevCatalog {
    #[serde(default)]
    vulnerabilities: Vec<KevEntry>,
}

#[derive(Debug, Deserialize)]
struct KevEntry {
    #[serde(rename = "cveID")]
    cve_id: Option<String>,
}

/// Source of the actively-exploited CVE set.
pub trait ExploitFeed {
    fn exploited_cves(&self) -> HashSet<String>;
}

/// Live client for the CISA KEV catalog.
pub struct KevFeed {
    agent: &'static Agent,
}

impl KevFeed {
    pub fn new() -> Self {
        Self {
            agent: http_agent(),
        }
    }
}

impl Default for KevFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ExploitFeed for KevFeed {
    fn exploited_cves(&self) -> HashSet<String> {
        let result = self
            .agent
            .get(KEV_URL)
            .config()
            .timeout_global(Some(Duration::from_secs(15)))
            .build()
            .call();
        let catalog: KevCatalog = match result {
            Ok(mut response) => match response.body_mut().read_json() {
                Ok(catalog) => catalog,
                Err(err) => {
                    warn!(%err, "exploited-vulnerability feed parse failed");
                    return HashSet::new();
                }
            },
            Err(err) => {
                warn!(%err, "exploited-vulnerability feed fetch failed");
                return HashSet::new();
            }
        };
        catalog
            .vulnerabilities
            .into_iter()
            .filter_map(|entry| entry.cve_id)
            .collect()
    }
}
