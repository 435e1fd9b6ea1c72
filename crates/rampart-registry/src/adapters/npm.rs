//! npm registry adapter
//!
//! Version document for dependencies and licence, full package document
//! for publication dates, downloads endpoint for weekly counts. A 404
//! on a pinned version falls back to the `latest` document.

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use ureq::Agent;

use rampart_core::clean_version;

use crate::agent::get_json;
use crate::FetchedPackage;

const REGISTRY: &str = "https://registry.npmjs.org";
const DOWNLOADS: &str = "https://api.npmjs.org/downloads/point/last-week";

#[derive(Debug, Deserialize)]
struct VersionDoc {
    #[serde(default)]
    dependencies: IndexMap<String, String>,
    license: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PackageDoc {
    #[serde(default)]
    time: HashMap<String, String>,
    license: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DownloadsDoc {
    downloads: Option<u64>,
}

pub fn fetch(agent: &Agent, name: &str, version: &str) -> FetchedPackage {
    let mut fetched = FetchedPackage::default();
    let encoded = encode_name(name);

    if let Some(doc) = fetch_version_doc(agent, &encoded, version) {
        for (dep_name, dep_version) in &doc.dependencies {
            fetched
                .dependencies
                .insert(dep_name.clone(), clean_version(dep_version));
        }
        fetched.metadata.licence = doc.license.as_ref().and_then(licence_string);
    }

    if let Some(doc) = get_json::<PackageDoc>(agent, &format!("{REGISTRY}/{encoded}"), 10) {
        fetched.metadata.first_published = doc.time.get("created").cloned();
        fetched.metadata.last_published = doc.time.get("modified").cloned();
        if fetched.metadata.licence.is_none() {
            fetched.metadata.licence = doc.license.as_ref().and_then(licence_string);
        }
    }

    if let Some(doc) = get_json::<DownloadsDoc>(agent, &format!("{DOWNLOADS}/{encoded}"), 5) {
        fetched.metadata.weekly_downloads = doc.downloads.or(Some(0));
    }

    fetched
}

/// Pinned version document, falling back to `latest` on 404 or when no
/// version was pinned to begin with.
fn fetch_version_doc(agent: &Agent, encoded: &str, version: &str) -> Option<VersionDoc> {
    let url = if version.is_empty() {
        format!("{REGISTRY}/{encoded}/latest")
    } else {
        format!("{REGISTRY}/{encoded}/{version}")
    };
    let result = agent
        .get(&url)
        .config()
        .timeout_global(Some(Duration::from_secs(10)))
        .build()
        .call();
    match result {
        Ok(mut response) => response.body_mut().read_json().ok(),
        Err(ureq::Error::StatusCode(404)) if !version.is_empty() => {
            get_json(agent, &format!("{REGISTRY}/{encoded}/latest"), 10)
        }
        Err(err) => {
            debug!(%url, %err, "npm version document fetch failed");
            None
        }
    }
}

/// npm licence fields are either a bare string or `{"type": "..."}`.
fn licence_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Keep `@` literal and percent-encode the scope separator, the way the
/// registry expects scoped names.
fn encode_name(name: &str) -> String {
    urlencoding::encode(name).replace("%40", "@")
}
