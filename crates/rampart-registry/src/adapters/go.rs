//! Go module proxy adapter
//!
//! Fetches the .mod file for the pinned version and parses it with the
//! same parser the manifest side uses. The proxy exposes no licence, so
//! Go packages are approximated as BSD-3-Clause; callers must not rely
//! on Go licence accuracy.

use ureq::Agent;

use crate::agent::get_text;
use crate::FetchedPackage;

const PROXY: &str = "https://proxy.golang.org";

pub fn fetch(agent: &Agent, name: &str, version: &str) -> FetchedPackage {
    let mut fetched = FetchedPackage::default();
    let url = if version.is_empty() {
        format!("{PROXY}/{name}/@latest")
    } else {
        format!("{PROXY}/{name}/@v/v{version}.mod")
    };

    if let Some(body) = get_text(agent, &url, 10) {
        fetched.dependencies = rampart_manifests::parsers::go::parse(&body);
        fetched.metadata.licence = Some("BSD-3-Clause".to_string());
    }

    fetched
}
