//! pom.xml parser
//!
//! Extracts `<dependency>` blocks with a regex rather than a full XML
//! parse; POMs in the wild are too irregular for anything stricter to
//! pay off at this depth. Name is `groupId:artifactId`.

use regex::Regex;

use crate::DepMap;

lazy_static::lazy_static! {
    static ref DEPENDENCY_BLOCK: Regex =
        Regex::new(r"(?s)<dependency>(.*?)</dependency>").unwrap();
    static ref GROUP_ID: Regex = Regex::new(r"(?s)<groupId>(.*?)</groupId>").unwrap();
    static ref ARTIFACT_ID: Regex = Regex::new(r"(?s)<artifactId>(.*?)</artifactId>").unwrap();
    static ref VERSION: Regex = Regex::new(r"(?s)<version>(.*?)</version>").unwrap();
}

pub fn parse(manifest: &str) -> DepMap {
    let mut deps = DepMap::new();

    for block in DEPENDENCY_BLOCK.captures_iter(manifest) {
        let block = &block[1];
        let (Some(gid), Some(aid)) = (GROUP_ID.captures(block), ARTIFACT_ID.captures(block))
        else {
            continue;
        };
        let name = format!("{}:{}", &gid[1], &aid[1]);
        let version = VERSION
            .captures(block)
            .map(|v| v[1].to_string())
            .unwrap_or_default();
        deps.insert(name, version);
    }

    deps
}
