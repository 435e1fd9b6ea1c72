//! requirements.txt parser
//!
//! Line oriented. Blank lines, comments, and pip options are ignored.
//! Names are normalised the way the index normalises them (lowercase,
//! underscores to dashes); the version is the first segment of the
//! specifier with its comparator stripped.

use regex::Regex;

use crate::DepMap;

lazy_static::lazy_static! {
    static ref REQUIREMENT: Regex =
        Regex::new(r"^([a-zA-Z0-9._-]+)\s*(?:[><=!~]+\s*(.+?))?$").unwrap();
}

pub fn parse(manifest: &str) -> DepMap {
    let mut deps = DepMap::new();

    for line in manifest.trim().lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        let Some(caps) = REQUIREMENT.captures(line) else {
            continue;
        };
        let name = caps[1].to_lowercase().replace('_', "-");
        let version = caps
            .get(2)
            .map(|m| {
                m.as_str()
                    .split([',', ';'])
                    .next()
                    .unwrap_or("")
                    .trim()
                    .trim_start_matches(['=', '>', '<', '~', '!'])
                    .to_string()
            })
            .unwrap_or_default();
        deps.insert(name, version);
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pinned_and_unpinned() {
        let deps = parse("requests==2.0.0\nflask\n");
        assert_eq!(deps.get("requests").map(String::as_str), Some("2.0.0"));
        assert_eq!(deps.get("flask").map(String::as_str), Some(""));
    }

    #[test]
    fn skips_comments_and_options() {
        let deps = parse("# a comment\n-r base.txt\n--index-url https://x\n\ndjango>=4.2\n");
        assert_eq!(deps.len(), 1);
        assert_eq!(deps.get("django").map(String::as_str), Some("4.2"));
    }

    #[test]
    fn normalises_names() {
        let deps = parse("Typing_Extensions==4.8.0");
        assert_eq!(
            deps.get("typing-extensions").map(String::as_str),
            Some("4.8.0")
        );
    }

    #[test]
    fn takes_first_segment_of_complex_specifiers() {
        let deps = parse("urllib3>=1.26,<2.0\ncertifi==2023.7.22; python_version > \"3.7\"");
        assert_eq!(deps.get("urllib3").map(String::as_str), Some("1.26"));
        assert_eq!(deps.get("certifi").map(String::as_str), Some("2023.7.22"));
    }
}
