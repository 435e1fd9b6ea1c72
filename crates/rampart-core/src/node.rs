//! Annotated package nodes: the shape the analysis response and the
//! SBOM emitter consume. After scoring, nodes are immutable.

use serde::{Deserialize, Serialize};

use crate::ecosystem::Ecosystem;

/// Advisory severity, normalised to the fixed set the scorer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Database-specific labels are uppercased and matched against the
    /// fixed set; anything else collapses to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

/// One advisory attached to a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityRecord {
    pub id: String,
    pub summary: String,
    pub severity: Severity,
    pub cvss: f64,
    pub fixed_in: String,
    pub cisa_kev: bool,
}

/// Discrete risk bucket derived from the score and exploited status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

/// How actively maintained a package looks, from its publication span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseFrequency {
    New,
    Active,
    Moderate,
    Low,
    Unknown,
}

/// Licence risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenceRisk {
    Low,
    Medium,
    High,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceInfo {
    /// ISO date truncated to ten characters, or empty when unknown.
    pub last_published: String,
    pub first_published: String,
    pub weekly_downloads: u64,
    pub release_frequency: ReleaseFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenceInfo {
    pub spdx: String,
    pub risk: LicenceRisk,
}

/// A fully annotated package, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageNode {
    pub name: String,
    pub version: String,
    pub ecosystem: Ecosystem,
    pub depth: usize,
    pub is_direct: bool,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub vulnerabilities: Vec<VulnerabilityRecord>,
    pub maintenance: MaintenanceInfo,
    pub licence: LicenceInfo,
    pub depends_on: Vec<String>,
    pub depended_on_by: Vec<String>,
}

impl PackageNode {
    /// Cross-reference identity: `name@version`.
    pub fn key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Risk level counts over a node set, excluding `unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub none: u32,
}

impl RiskSummary {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Critical => self.critical += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
            RiskLevel::None => self.none += 1,
            RiskLevel::Unknown => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low + self.none
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_labels_normalise() {
        assert_eq!(Severity::from_label("critical"), Severity::Critical);
        assert_eq!(Severity::from_label("High"), Severity::High);
        assert_eq!(Severity::from_label("MODERATE"), Severity::Unknown);
        assert_eq!(Severity::from_label(""), Severity::Unknown);
    }

    #[test]
    fn risk_level_serialises_lowercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::None).unwrap(), "\"none\"");
    }

    #[test]
    fn summary_ignores_unknown() {
        let mut summary = RiskSummary::default();
        summary.record(RiskLevel::High);
        summary.record(RiskLevel::Unknown);
        summary.record(RiskLevel::None);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.none, 1);
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn node_serialises_in_wire_shape() {
        let node = PackageNode {
            name: "left-pad".into(),
            version: "1.3.0".into(),
            ecosystem: Ecosystem::Npm,
            depth: 0,
            is_direct: true,
            risk_level: RiskLevel::None,
            risk_score: 0,
            vulnerabilities: vec![],
            maintenance: MaintenanceInfo {
                last_published: "2018-04-26".into(),
                first_published: "2014-03-17".into(),
                weekly_downloads: 2_000_000,
                release_frequency: ReleaseFrequency::Low,
            },
            licence: LicenceInfo {
                spdx: "MIT".into(),
                risk: LicenceRisk::Low,
            },
            depends_on: vec![],
            depended_on_by: vec![],
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["isDirect"], true);
        assert_eq!(json["riskLevel"], "none");
        assert_eq!(json["maintenance"]["weeklyDownloads"], 2_000_000);
        assert_eq!(json["licence"]["risk"], "low");
        assert_eq!(node.key(), "left-pad@1.3.0");
    }
}
