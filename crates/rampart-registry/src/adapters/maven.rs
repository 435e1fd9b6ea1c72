//! Maven Central adapter
//!
//! Central's Solr search is the only metadata source used; it yields a
//! last-publication timestamp (epoch milliseconds, recorded as the
//! first ten digits of its decimal form) and the latest version. No
//! dependency information is available at this endpoint, so maven
//! packages resolve flat.

use serde::Deserialize;
use ureq::Agent;

use crate::agent::get_json;
use crate::FetchedPackage;

const SEARCH: &str = "https://search.maven.org/solrsearch/select";

#[derive(Debug, Deserialize)]
struct SearchDoc {
    response: Option<SearchResponse>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<ArtifactDoc>,
}

#[derive(Debug, Deserialize)]
struct ArtifactDoc {
    timestamp: Option<i64>,
}

pub fn fetch(agent: &Agent, name: &str, _version: &str) -> FetchedPackage {
    let mut fetched = FetchedPackage::default();
    let Some((group_id, artifact_id)) = name.split_once(':') else {
        return fetched;
    };

    let url = format!("{SEARCH}?q=g:{group_id}+AND+a:{artifact_id}&rows=1&wt=json");
    if let Some(doc) = get_json::<SearchDoc>(agent, &url, 10) {
        if let Some(artifact) = doc.response.and_then(|r| r.docs.into_iter().next()) {
            fetched.metadata.last_published = artifact
                .timestamp
                .map(|ts| ts.to_string().chars().take(10).collect());
        }
    }

    fetched
}
