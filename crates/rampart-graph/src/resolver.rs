//! Bounded-depth transitive resolution
//!
//! Depth-first, memoised on the canonical package key. A key already in
//! the map is never revisited, which both cuts cycles and caches shared
//! subtrees at the depth they were first seen. The wall-clock budget is
//! checked on every entry; exhaustion abandons new work but keeps
//! everything already recorded.

use indexmap::IndexMap;
use tracing::{debug, warn};

use rampart_core::{package_key, Budget, ResolvedPackage, MAX_DEPTH};
use rampart_manifests::DepMap;
use rampart_registry::Registry;

/// The shared package map. Insertion order is response order.
pub type PackageSet = IndexMap<String, ResolvedPackage>;

/// Resolve every direct dependency in manifest order. Once the budget
/// runs out no further direct resolutions are started; whatever has
/// been collected stands.
pub fn resolve_all(registry: &dyn Registry, direct: &DepMap, budget: &Budget) -> PackageSet {
    let mut packages = PackageSet::new();
    for (name, version) in direct {
        if budget.exhausted() {
            warn!(
                resolved = packages.len(),
                "wall-clock budget exhausted; skipping remaining direct dependencies"
            );
            break;
        }
        resolve(registry, &mut packages, name, version, 0, true, budget);
    }
    packages
}

/// Resolve one package and, recursively, its dependencies.
pub fn resolve(
    registry: &dyn Registry,
    packages: &mut PackageSet,
    name: &str,
    version: &str,
    depth: usize,
    is_direct: bool,
    budget: &Budget,
) {
    if budget.exhausted() || depth > MAX_DEPTH {
        return;
    }

    let key = package_key(name, version);
    if packages.contains_key(&key) {
        return;
    }
    packages.insert(key.clone(), ResolvedPackage::new(name, version, depth, is_direct));
    debug!(%key, depth, "resolving package");

    match registry.fetch(name, version) {
        Ok(fetched) => {
            if let Some(pkg) = packages.get_mut(&key) {
                pkg.metadata = fetched.metadata;
            }
            for (sub_name, sub_version) in &fetched.dependencies {
                let sub_key = package_key(sub_name, sub_version);
                resolve(
                    registry,
                    packages,
                    sub_name,
                    sub_version,
                    depth + 1,
                    false,
                    budget,
                );
                // Edges are recorded only when the child actually made
                // it into the map; the depth cap and the budget both
                // cut recursion without leaving dangling keys.
                if packages.contains_key(&sub_key) {
                    if let Some(pkg) = packages.get_mut(&key) {
                        pkg.depends_on.push(sub_key.clone());
                    }
                    if let Some(sub) = packages.get_mut(&sub_key) {
                        sub.depended_on_by.push(key.clone());
                    }
                }
            }
        }
        Err(err) => {
            warn!(%key, %err, "registry adapter failed; marking resolution error");
            if let Some(pkg) = packages.get_mut(&key) {
                pkg.resolution_error = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use rampart_registry::FetchedPackage;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Stub registry backed by a static edge list.
    struct StubRegistry {
        graph: HashMap<&'static str, Vec<(&'static str, &'static str)>>,
        fetch_count: Cell<usize>,
        delay: Option<Duration>,
        fail_on: Option<&'static str>,
    }

    impl StubRegistry {
        fn new(edges: &[(&'static str, &[(&'static str, &'static str)])]) -> Self {
            Self {
                graph: edges.iter().map(|(k, v)| (*k, v.to_vec())).collect(),
                fetch_count: Cell::new(0),
                delay: None,
                fail_on: None,
            }
        }
    }

    impl Registry for StubRegistry {
        fn fetch(&self, name: &str, _version: &str) -> anyhow::Result<FetchedPackage> {
            self.fetch_count.set(self.fetch_count.get() + 1);
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            if self.fail_on == Some(name) {
                return Err(anyhow!("stubbed registry failure"));
            }
            let mut fetched = FetchedPackage::default();
            for (dep, version) in self.graph.get(name).cloned().unwrap_or_default() {
                fetched.dependencies.insert(dep.to_string(), version.to_string());
            }
            Ok(fetched)
        }
    }

    fn generous_budget() -> Budget {
        Budget::from_secs(50)
    }

    #[test]
    fn cycle_terminates_with_each_node_once() {
        let registry = StubRegistry::new(&[
            ("a", &[("b", "1")]),
            ("b", &[("c", "1")]),
            ("c", &[("a", "1")]),
        ]);
        let mut packages = PackageSet::new();
        resolve(&registry, &mut packages, "a", "1", 0, true, &generous_budget());

        assert_eq!(packages.len(), 3);
        assert_eq!(registry.fetch_count.get(), 3);
        assert_eq!(packages["a@1"].depends_on, ["b@1"]);
        assert_eq!(packages["c@1"].depends_on, ["a@1"]);
        // The back edge still records the reverse direction.
        assert_eq!(packages["a@1"].depended_on_by, ["c@1"]);
    }

    #[test]
    fn depth_is_monotone_and_capped() {
        // A straight chain longer than the depth cap.
        let registry = StubRegistry::new(&[
            ("d0", &[("d1", "1")]),
            ("d1", &[("d2", "1")]),
            ("d2", &[("d3", "1")]),
            ("d3", &[("d4", "1")]),
            ("d4", &[("d5", "1")]),
            ("d5", &[("d6", "1")]),
            ("d6", &[("d7", "1")]),
        ]);
        let mut packages = PackageSet::new();
        resolve(&registry, &mut packages, "d0", "1", 0, true, &generous_budget());

        // Depths 0..=MAX_DEPTH inclusive; d6 would sit at depth 6.
        assert_eq!(packages.len(), MAX_DEPTH + 1);
        assert!(!packages.contains_key("d6@1"));
        // The node at the cap records no edge to the child it was not
        // allowed to resolve.
        assert!(packages["d5@1"].depends_on.is_empty());
        for (_, pkg) in &packages {
            assert!(pkg.depth <= MAX_DEPTH);
            for dep_key in &pkg.depends_on {
                if let Some(dep) = packages.get(dep_key) {
                    assert!(dep.depth <= pkg.depth + 1);
                }
            }
        }
    }

    #[test]
    fn shared_subtree_is_fetched_once() {
        let registry = StubRegistry::new(&[
            ("root", &[("left", "1"), ("right", "1")]),
            ("left", &[("shared", "1")]),
            ("right", &[("shared", "1")]),
            ("shared", &[]),
        ]);
        let mut packages = PackageSet::new();
        resolve(&registry, &mut packages, "root", "1", 0, true, &generous_budget());

        assert_eq!(registry.fetch_count.get(), 4);
        let shared = &packages["shared@1"];
        assert_eq!(shared.depth, 2);
        assert_eq!(shared.depended_on_by, ["left@1", "right@1"]);
    }

    #[test]
    fn edges_are_symmetric() {
        let registry = StubRegistry::new(&[
            ("a", &[("b", "2"), ("c", "3")]),
            ("b", &[("c", "3")]),
            ("c", &[]),
        ]);
        let mut packages = PackageSet::new();
        resolve(&registry, &mut packages, "a", "1", 0, true, &generous_budget());

        for (key, pkg) in &packages {
            for dep_key in &pkg.depends_on {
                let dep = packages.get(dep_key).expect("forward edge target exists");
                assert!(dep.depended_on_by.contains(key), "{dep_key} lacks back edge to {key}");
            }
            for parent_key in &pkg.depended_on_by {
                let parent = packages.get(parent_key).expect("reverse edge target exists");
                assert!(parent.depends_on.contains(key));
            }
        }
    }

    #[test]
    fn adapter_failure_marks_the_node_and_continues() {
        let mut registry = StubRegistry::new(&[("ok", &[("broken", "1")]), ("broken", &[])]);
        registry.fail_on = Some("broken");
        let mut packages = PackageSet::new();
        resolve(&registry, &mut packages, "ok", "1", 0, true, &generous_budget());

        assert!(!packages["ok@1"].resolution_error);
        assert!(packages["broken@1"].resolution_error);
        assert_eq!(packages["ok@1"].depends_on, ["broken@1"]);
    }

    #[test]
    fn exhausted_budget_stops_new_directs_but_keeps_partial_state() {
        let mut registry = StubRegistry::new(&[("slow", &[]), ("later", &[])]);
        registry.delay = Some(Duration::from_millis(30));
        let mut direct = DepMap::new();
        for name in ["slow", "later", "never"] {
            direct.insert(name.to_string(), "1".to_string());
        }
        let budget = Budget::new(Duration::from_millis(20));
        let packages = resolve_all(&registry, &direct, &budget);

        // The first resolution runs past the budget; everything after
        // the exhaustion check is skipped.
        assert!(packages.len() < direct.len());
        assert!(packages.contains_key("slow@1"));
    }

    #[test]
    fn insertion_order_follows_the_manifest() {
        let registry = StubRegistry::new(&[("x", &[]), ("y", &[]), ("z", &[])]);
        let mut direct = DepMap::new();
        for name in ["z", "x", "y"] {
            direct.insert(name.to_string(), "1".to_string());
        }
        let packages = resolve_all(&registry, &direct, &generous_budget());
        let keys: Vec<&str> = packages.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z@1", "x@1", "y@1"]);
    }
}
