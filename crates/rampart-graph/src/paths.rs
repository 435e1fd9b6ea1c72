//! Riskiest-path analysis
//!
//! Enumerates simple paths downward from every risky direct package.
//! A path is reported when it bottoms out (no further dependencies, or
//! the depth cap) on a node scoring above 20; the top three paths by
//! maximum score along the way are returned.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use rampart_core::{PackageNode, MAX_DEPTH};

const REPORTED_PATHS: usize = 3;
const LEAF_SCORE_FLOOR: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPath {
    /// `project@0.0.0` followed by every package key along the path.
    pub path: Vec<String>,
    pub max_risk_score: u32,
    pub reason: String,
}

/// Top risky paths over a scored node set.
pub fn riskiest_paths(nodes: &[PackageNode]) -> Vec<RiskPath> {
    let by_key: HashMap<String, &PackageNode> =
        nodes.iter().map(|node| (node.key(), node)).collect();

    let mut found = Vec::new();
    for node in nodes {
        if node.is_direct && node.risk_score > 0 {
            walk(node, &by_key, vec![node.key()], &mut found, HashSet::new());
        }
    }

    found.sort_by(|a, b| b.max_risk_score.cmp(&a.max_risk_score));
    found.truncate(REPORTED_PATHS);
    found
}

fn walk(
    node: &PackageNode,
    by_key: &HashMap<String, &PackageNode>,
    current_path: Vec<String>,
    found: &mut Vec<RiskPath>,
    mut visited: HashSet<String>,
) {
    let key = node.key();
    if visited.contains(&key) {
        return;
    }
    visited.insert(key);

    if node.depends_on.is_empty() || current_path.len() > MAX_DEPTH {
        if node.risk_score > LEAF_SCORE_FLOOR {
            found.push(RiskPath {
                path: std::iter::once("project@0.0.0".to_string())
                    .chain(current_path.iter().cloned())
                    .collect(),
                max_risk_score: current_path
                    .iter()
                    .map(|key| by_key.get(key).map_or(0, |n| n.risk_score))
                    .max()
                    .unwrap_or(0),
                reason: leaf_reason(node),
            });
        }
        return;
    }

    for dep_key in &node.depends_on {
        if let Some(dep) = by_key.get(dep_key) {
            let mut next_path = current_path.clone();
            next_path.push(dep_key.clone());
            // Each branch walks with its own copy of the visited set so
            // sibling branches can revisit shared nodes.
            walk(dep, by_key, next_path, found, visited.clone());
        }
    }
}

fn leaf_reason(node: &PackageNode) -> String {
    if node.vulnerabilities.iter().any(|vuln| vuln.cisa_kev) {
        "CVE with CISA KEV listing".to_string()
    } else if !node.vulnerabilities.is_empty() {
        format!("{} known vulnerabilities", node.vulnerabilities.len())
    } else {
        "Elevated risk score".to_string()
    }
}
