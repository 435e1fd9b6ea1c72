//! Reduction of a raw advisory to the record attached to a package
//! node: severity, CVSS, fix version, and exploited status.

use std::collections::HashSet;

use serde_json::Value;

use rampart_core::{Severity, VulnerabilityRecord};

use crate::osv::OsvVulnerability;

const SUMMARY_LIMIT: usize = 300;
const DETAILS_FALLBACK_LIMIT: usize = 200;

/// Build the node-level record for one advisory.
pub fn derive_record(vuln: &OsvVulnerability, exploited: &HashSet<String>) -> VulnerabilityRecord {
    let cvss = extract_cvss(vuln);
    let severity = match database_severity(vuln) {
        Some(label) => Severity::from_label(&label),
        None => bucket_cvss(cvss),
    };

    let summary = vuln.summary.clone().unwrap_or_else(|| {
        truncate(
            vuln.details.as_deref().unwrap_or(""),
            DETAILS_FALLBACK_LIMIT,
        )
    });

    VulnerabilityRecord {
        id: vuln.id.clone(),
        summary: truncate(&summary, SUMMARY_LIMIT),
        severity,
        cvss,
        fixed_in: last_fixed_event(vuln),
        cisa_kev: is_exploited(vuln, exploited),
    }
}

/// Scan `severity[]` entries whose type mentions CVSS for a numeric
/// score. The first `/`-separated segment that looks like a decimal
/// number settles the entry; later entries overwrite earlier ones.
fn extract_cvss(vuln: &OsvVulnerability) -> f64 {
    let mut cvss = 0.0;
    for entry in &vuln.severity {
        if !entry.kind.contains("CVSS") {
            continue;
        }
        for part in entry.score.split('/') {
            let digits: String = part.chars().filter(|c| *c != '.' && *c != '-').collect();
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if let Ok(value) = part.parse::<f64>() {
                cvss = value;
            }
            break;
        }
    }
    cvss
}

fn database_severity(vuln: &OsvVulnerability) -> Option<String> {
    vuln.database_specific
        .as_ref()
        .and_then(|db| db.get("severity"))
        .and_then(Value::as_str)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

fn bucket_cvss(cvss: f64) -> Severity {
    if cvss >= 9.0 {
        Severity::Critical
    } else if cvss >= 7.0 {
        Severity::High
    } else if cvss >= 4.0 {
        Severity::Medium
    } else if cvss > 0.0 {
        Severity::Low
    } else {
        Severity::Unknown
    }
}

/// The last `fixed` event in nested iteration order. This is knowingly
/// not the minimum fixed version across ranges.
fn last_fixed_event(vuln: &OsvVulnerability) -> String {
    let mut fixed_in = String::new();
    for affected in &vuln.affected {
        for range in &affected.ranges {
            for event in &range.events {
                if let Some(fixed) = &event.fixed {
                    fixed_in = fixed.clone();
                }
            }
        }
    }
    fixed_in
}

/// Exploited iff any CVE alias appears in the exploited set.
fn is_exploited(vuln: &OsvVulnerability, exploited: &HashSet<String>) -> bool {
    vuln.aliases
        .iter()
        .filter(|alias| alias.starts_with("CVE-"))
        .any(|alias| exploited.contains(alias))
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
