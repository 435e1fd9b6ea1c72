//! go.mod parser
//!
//! Tracks `require ( ... )` blocks and single-line `require` statements.
//! Each entry carries a module path and a `v`-prefixed version; the
//! prefix is stripped. Also applied verbatim to .mod files fetched from
//! the module proxy during resolution.

use crate::DepMap;

pub fn parse(manifest: &str) -> DepMap {
    let mut deps = DepMap::new();
    let mut in_require = false;

    for line in manifest.trim().lines() {
        let line = line.trim();
        if line.starts_with("require (") {
            in_require = true;
            continue;
        }
        if in_require && line == ")" {
            in_require = false;
            continue;
        }
        if in_require || line.starts_with("require ") {
            let entry = line.strip_prefix("require ").unwrap_or(line).trim();
            let mut parts = entry.split_whitespace();
            let (Some(path), Some(version)) = (parts.next(), parts.next()) else {
                continue;
            };
            if path.starts_with("//") {
                continue;
            }
            deps.insert(path.to_string(), version.trim_start_matches('v').to_string());
        }
    }

    deps
}
