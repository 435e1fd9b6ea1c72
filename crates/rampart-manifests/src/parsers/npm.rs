//! package.json parser
//!
//! Merges `dependencies` and `devDependencies`, cleaning each range
//! specifier down to a bare version.

use rampart_core::clean_version;
use serde_json::Value;

use crate::DepMap;

pub fn parse(manifest: &str) -> DepMap {
    let mut deps = DepMap::new();

    let Ok(root) = serde_json::from_str::<Value>(manifest) else {
        return deps;
    };

    for section in ["dependencies", "devDependencies"] {
        let Some(map) = root.get(section).and_then(Value::as_object) else {
            continue;
        };
        for (name, version) in map {
            let Some(version) = version.as_str() else {
                continue;
            };
            deps.insert(name.clone(), clean_version(version));
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_dev_dependencies() {
        let deps = parse(
            r#"{
                "name": "demo",
                "dependencies": {"express": "^4.18.0", "lodash": "~4.17.21"},
                "devDependencies": {"jest": "29.0.0"}
            }"#,
        );
        assert_eq!(deps.get("express").map(String::as_str), Some("4.18.0"));
        assert_eq!(deps.get("lodash").map(String::as_str), Some("4.17.21"));
        assert_eq!(deps.get("jest").map(String::as_str), Some("29.0.0"));
        assert_eq!(deps.len(), 3);
    }

    #[test]
    fn preserves_manifest_order() {
        let deps = parse(r#"{"dependencies": {"b": "1", "a": "2", "c": "3"}}"#);
        let names: Vec<&str> = deps.keys().map(String::as_str).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn dev_entry_overwrites_version_in_place() {
        let deps = parse(
            r#"{
                "dependencies": {"first": "1.0.0", "shared": "1.0.0"},
                "devDependencies": {"shared": "2.0.0"}
            }"#,
        );
        let names: Vec<&str> = deps.keys().map(String::as_str).collect();
        assert_eq!(names, ["first", "shared"]);
        assert_eq!(deps.get("shared").map(String::as_str), Some("2.0.0"));
    }

    #[test]
    fn invalid_json_yields_nothing() {
        assert!(parse("not json at all").is_empty());
        assert!(parse("{}").is_empty());
    }

    #[test]
    fn scoped_packages_keep_their_names() {
        let deps = parse(r#"{"dependencies": {"@types/node": ">=18.0.0"}}"#);
        assert_eq!(deps.get("@types/node").map(String::as_str), Some("18.0.0"));
    }
}
