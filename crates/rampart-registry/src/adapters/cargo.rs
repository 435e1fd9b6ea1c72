//! crates.io API adapter
//!
//! The crate summary supplies publication dates, recent downloads, and
//! the newest version (adopted when no version was pinned); the
//! dependencies endpoint is filtered to normal-kind dependencies.

use serde::Deserialize;
use ureq::Agent;

use rampart_core::clean_version;

use crate::agent::get_json;
use crate::FetchedPackage;

const API: &str = "https://crates.io/api/v1/crates";

#[derive(Debug, Deserialize)]
struct SummaryDoc {
    #[serde(rename = "crate")]
    krate: Option<CrateSummary>,
}

#[derive(Debug, Deserialize)]
struct CrateSummary {
    created_at: Option<String>,
    updated_at: Option<String>,
    recent_downloads: Option<u64>,
    newest_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DependenciesDoc {
    #[serde(default)]
    dependencies: Vec<CrateDependency>,
}

#[derive(Debug, Deserialize)]
struct CrateDependency {
    crate_id: String,
    req: Option<String>,
    kind: Option<String>,
}

pub fn fetch(agent: &Agent, name: &str, version: &str) -> FetchedPackage {
    let mut fetched = FetchedPackage::default();
    let encoded = urlencoding::encode(name);
    let mut version = version.to_string();

    if let Some(doc) = get_json::<SummaryDoc>(agent, &format!("{API}/{encoded}"), 10) {
        if let Some(summary) = doc.krate {
            fetched.metadata.first_published = summary.created_at.map(truncate_date);
            fetched.metadata.last_published = summary.updated_at.map(truncate_date);
            fetched.metadata.weekly_downloads = summary.recent_downloads.or(Some(0));
            if version.is_empty() {
                version = summary.newest_version.unwrap_or_default();
            }
        }
    }

    if !version.is_empty() {
        let url = format!("{API}/{encoded}/{version}/dependencies");
        if let Some(doc) = get_json::<DependenciesDoc>(agent, &url, 10) {
            for dep in doc.dependencies {
                if dep.kind.as_deref() == Some("normal") {
                    fetched
                        .dependencies
                        .insert(dep.crate_id, clean_version(dep.req.as_deref().unwrap_or("")));
                }
            }
        }
    }

    fetched
}

fn truncate_date(value: String) -> String {
    value.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_decodes_and_truncates() {
        let doc: SummaryDoc = serde_json::from_str(
            r#"{"crate": {"created_at": "2015-05-15T20:22:13.127898+00:00",
                "updated_at": "2024-01-10T09:00:00.000000+00:00",
                "recent_downloads": 123456, "newest_version": "1.0.195"}}"#,
        )
        .unwrap();
        let summary = doc.krate.unwrap();
        assert_eq!(truncate_date(summary.created_at.unwrap()), "2015-05-15");
        assert_eq!(summary.newest_version.as_deref(), Some("1.0.195"));
    }

    #[test]
    fn only_normal_dependencies_count() {
        let doc: DependenciesDoc = serde_json::from_str(
            r#"{"dependencies": [
                {"crate_id": "serde", "req": "^1.0", "kind": "normal"},
                {"crate_id": "criterion", "req": "^0.5", "kind": "dev"},
                {"crate_id": "cc", "req": "^1.0", "kind": "build"}
            ]}"#,
        )
        .unwrap();
        let normal: Vec<&str> = doc
            .dependencies
            .iter()
            .filter(|d| d.kind.as_deref() == Some("normal"))
            .map(|d| d.crate_id.as_str())
            .collect();
        assert_eq!(normal, ["serde"]);
    }
}
