//! Cargo.toml parser
//!
//! Tracks `[dependencies]` and `[dev-dependencies]` sections line by
//! line. Values are either bare version strings or inline tables with a
//! `version` key; anything else (path/git dependencies) yields an empty
//! version.

use regex::Regex;

use rampart_core::clean_version;

use crate::DepMap;

lazy_static::lazy_static! {
    static ref INLINE_VERSION: Regex =
        Regex::new(r#"version\s*=\s*["']([^"']+)"#).unwrap();
}

pub fn parse(manifest: &str) -> DepMap {
    let mut deps = DepMap::new();
    let mut in_deps = false;

    for line in manifest.trim().lines() {
        let line = line.trim();
        if line == "[dependencies]" || line == "[dev-dependencies]" {
            in_deps = true;
            continue;
        }
        if line.starts_with('[') && in_deps {
            in_deps = false;
            continue;
        }
        if in_deps {
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            let name = name.trim();
            let mut value = value.trim().trim_matches(['"', '\'']).to_string();
            if let Some(caps) = INLINE_VERSION.captures(&value) {
                value = caps[1].to_string();
            }
            deps.insert(name.to_string(), clean_version(&value));
        }
    }

    deps
}
