//! Package identity and resolver-phase package state.

/// Strip a leading run of semver range operators and trim whitespace.
///
/// Applied to every version string the system touches: manifest entries
/// and version requirements read back from registries.
pub fn clean_version(version: &str) -> String {
    version
        .trim_start_matches(['^', '~', '>', '=', '<'])
        .trim()
        .to_string()
}

/// Canonical identity for a package: `name@version`, or the bare name
/// when the version is unknown. Used as the package-map key and as the
/// cross-reference string in paths and SBOM entries.
pub fn package_key(name: &str, version: &str) -> String {
    if version.is_empty() {
        name.to_string()
    } else {
        format!("{name}@{version}")
    }
}

/// Registry metadata attached to a package during resolution.
///
/// Every field is optional; adapters contribute whatever the upstream
/// registry happened to expose and nothing more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageMetadata {
    pub licence: Option<String>,
    pub first_published: Option<String>,
    pub last_published: Option<String>,
    pub weekly_downloads: Option<u64>,
}

/// A package as recorded by the graph resolver, before scoring.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub name: String,
    /// Resolved version, or `"latest"` when the manifest pinned nothing.
    pub version: String,
    /// Distance from the manifest; direct dependencies sit at 0.
    pub depth: usize,
    pub is_direct: bool,
    /// Keys of immediate dependencies, in registry order.
    pub depends_on: Vec<String>,
    /// Keys of packages that depend on this one.
    pub depended_on_by: Vec<String>,
    pub metadata: PackageMetadata,
    /// Set when the registry adapter failed outright; the node is kept.
    pub resolution_error: bool,
}

impl ResolvedPackage {
    pub fn new(name: &str, version: &str, depth: usize, is_direct: bool) -> Self {
        Self {
            name: name.to_string(),
            version: if version.is_empty() {
                "latest".to_string()
            } else {
                version.to_string()
            },
            depth,
            is_direct,
            depends_on: Vec::new(),
            depended_on_by: Vec::new(),
            metadata: PackageMetadata::default(),
            resolution_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_version_strips_range_operators() {
        assert_eq!(clean_version("^1.3.0"), "1.3.0");
        assert_eq!(clean_version("~2.0"), "2.0");
        assert_eq!(clean_version(">=1.0.0"), "1.0.0");
        assert_eq!(clean_version("  1.2.3 "), "1.2.3");
        assert_eq!(clean_version("1.2.3"), "1.2.3");
        assert_eq!(clean_version(""), "");
    }

    #[test]
    fn package_key_omits_empty_version() {
        assert_eq!(package_key("left-pad", "1.3.0"), "left-pad@1.3.0");
        assert_eq!(package_key("left-pad", ""), "left-pad");
    }

    #[test]
    fn unpinned_package_records_latest() {
        let pkg = ResolvedPackage::new("serde", "", 0, true);
        assert_eq!(pkg.version, "latest");
        assert!(pkg.is_direct);
        assert!(!pkg.resolution_error);
    }
}
