//! Risk scoring
//!
//! Sums six independent signal buckets into a clamped 0-100 score,
//! derives the discrete risk level, and produces the final annotated
//! node. Scoring is deterministic given the same inputs; `now` is a
//! parameter for exactly that reason.

pub mod licence;

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use rampart_advisories::{derive_record, OsvVulnerability};
use rampart_core::{
    Ecosystem, LicenceInfo, MaintenanceInfo, PackageNode, ReleaseFrequency, ResolvedPackage,
    RiskLevel, Severity, VulnerabilityRecord,
};

use licence::{classify_licence, licence_points, normalise_licence};

/// Score one resolved package and produce its response node.
pub fn score_package(
    pkg: &ResolvedPackage,
    vulns: &[OsvVulnerability],
    exploited: &HashSet<String>,
    ecosystem: Ecosystem,
    now: DateTime<Utc>,
) -> PackageNode {
    let records: Vec<VulnerabilityRecord> = vulns
        .iter()
        .map(|vuln| derive_record(vuln, exploited))
        .collect();
    let has_kev = records.iter().any(|record| record.cisa_kev);

    let first_published = pkg.metadata.first_published.as_deref().unwrap_or("");
    let last_published = pkg.metadata.last_published.as_deref().unwrap_or("");
    let downloads = pkg.metadata.weekly_downloads.unwrap_or(0);

    let mut score = vulnerability_bucket(&records);
    if has_kev {
        score += 25;
    }
    score += age_bucket(first_published, now);
    score += staleness_bucket(last_published, now);
    score += popularity_bucket(downloads);

    let spdx = normalise_licence(pkg.metadata.licence.as_deref().unwrap_or(""));
    let licence_risk = classify_licence(&spdx);
    score += licence_points(licence_risk);

    let score = score.min(100);
    let level = if pkg.resolution_error {
        RiskLevel::Unknown
    } else {
        risk_level(score, has_kev, !records.is_empty())
    };

    PackageNode {
        name: pkg.name.clone(),
        version: pkg.version.clone(),
        ecosystem,
        depth: pkg.depth,
        is_direct: pkg.is_direct,
        risk_level: level,
        risk_score: score,
        vulnerabilities: records,
        maintenance: MaintenanceInfo {
            last_published: truncate_date(last_published),
            first_published: truncate_date(first_published),
            weekly_downloads: downloads,
            release_frequency: release_frequency(first_published, last_published, now),
        },
        licence: LicenceInfo {
            spdx,
            risk: licence_risk,
        },
        depends_on: pkg.depends_on.clone(),
        depended_on_by: pkg.depended_on_by.clone(),
    }
}

/// Vulnerability bucket, 0-40: the worst per-advisory severity plus two
/// points per advisory, capped.
fn vulnerability_bucket(records: &[VulnerabilityRecord]) -> u32 {
    if records.is_empty() {
        return 0;
    }
    let max_severity = records
        .iter()
        .map(|record| severity_points(record.severity))
        .max()
        .unwrap_or(0);
    (max_severity + 2 * records.len() as u32).min(40)
}

fn severity_points(severity: Severity) -> u32 {
    match severity {
        Severity::Critical => 40,
        Severity::High => 30,
        Severity::Medium => 15,
        Severity::Low => 5,
        Severity::Unknown => 10,
    }
}

/// Age bucket, 0-10: newer packages are riskier.
fn age_bucket(first_published: &str, now: DateTime<Utc>) -> u32 {
    let Some(published) = parse_iso_utc(first_published) else {
        return 0;
    };
    let age_days = (now - published).num_days();
    if age_days < 90 {
        10
    } else if age_days < 365 {
        5
    } else {
        0
    }
}

/// Staleness bucket, 0-10: abandoned packages are riskier.
fn staleness_bucket(last_published: &str, now: DateTime<Utc>) -> u32 {
    let Some(published) = parse_iso_utc(last_published) else {
        return 0;
    };
    let stale_days = (now - published).num_days();
    if stale_days > 730 {
        10
    } else if stale_days > 365 {
        5
    } else {
        0
    }
}

/// Popularity bucket, 0-5: obscurity is a risk signal.
fn popularity_bucket(weekly_downloads: u64) -> u32 {
    if weekly_downloads == 0 {
        5
    } else if weekly_downloads < 1_000 {
        3
    } else {
        0
    }
}

/// The level ladder. Any exploited advisory forces critical; any
/// advisory at all keeps the package off the floor.
fn risk_level(score: u32, has_kev: bool, has_vulns: bool) -> RiskLevel {
    if score >= 70 || has_kev {
        RiskLevel::Critical
    } else if score >= 50 {
        RiskLevel::High
    } else if score >= 30 {
        RiskLevel::Medium
    } else if score >= 10 || has_vulns {
        RiskLevel::Low
    } else {
        RiskLevel::None
    }
}

/// Publication-span classification.
fn release_frequency(
    first_published: &str,
    last_published: &str,
    now: DateTime<Utc>,
) -> ReleaseFrequency {
    let (Some(first), Some(last)) = (parse_iso_utc(first_published), parse_iso_utc(last_published))
    else {
        return ReleaseFrequency::Unknown;
    };
    let span_days = (last - first).num_days();
    if span_days < 30 {
        ReleaseFrequency::New
    } else if span_days < 365 {
        ReleaseFrequency::Active
    } else if (now - last).num_days() > 365 {
        ReleaseFrequency::Low
    } else {
        ReleaseFrequency::Moderate
    }
}

/// Accepts full RFC 3339 timestamps, bare `T`-separated datetimes, and
/// bare dates, all read as UTC.
fn parse_iso_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&parsed));
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&parsed.and_hms_opt(0, 0, 0)?));
    }
    None
}

fn truncate_date(value: &str) -> String {
    value.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_advisories::osv::OsvSeverity;
    use rampart_core::PackageMetadata;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn bare_package(name: &str, version: &str) -> ResolvedPackage {
        ResolvedPackage::new(name, version, 0, true)
    }

    fn vuln(id: &str, score: &str, aliases: &[&str]) -> OsvVulnerability {
        OsvVulnerability {
            id: id.into(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            severity: vec![OsvSeverity {
                kind: "CVSS_V3".into(),
                score: score.into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn clean_package_scores_zero_or_licence_only() {
        let mut pkg = bare_package("left-pad", "1.3.0");
        pkg.metadata = PackageMetadata {
            licence: Some("MIT".into()),
            first_published: Some("2014-03-17".into()),
            last_published: Some("2025-09-01".into()),
            weekly_downloads: Some(2_000_000),
        };
        let node = score_package(&pkg, &[], &HashSet::new(), Ecosystem::Npm, fixed_now());
        assert_eq!(node.risk_score, 0);
        assert_eq!(node.risk_level, RiskLevel::None);
        assert_eq!(node.maintenance.release_frequency, ReleaseFrequency::Moderate);
    }

    #[test]
    fn missing_metadata_scores_the_unknown_floor() {
        let pkg = bare_package("mystery", "0.1.0");
        let node = score_package(&pkg, &[], &HashSet::new(), Ecosystem::Npm, fixed_now());
        // No downloads (5) + unknown licence (3); dates absent score 0.
        assert_eq!(node.risk_score, 8);
        assert_eq!(node.risk_level, RiskLevel::None);
        assert_eq!(node.maintenance.release_frequency, ReleaseFrequency::Unknown);
    }

    #[test]
    fn exploited_advisory_forces_critical() {
        let exploited: HashSet<String> = ["CVE-2023-32681".to_string()].into();
        let pkg = bare_package("requests", "2.0.0");
        let node = score_package(
            &pkg,
            &[vuln("GHSA-j8r2-6x86-q33q", "6.1", &["CVE-2023-32681"])],
            &exploited,
            Ecosystem::Pypi,
            fixed_now(),
        );
        assert_eq!(node.risk_level, RiskLevel::Critical);
        assert!(node.risk_score >= 25);
        assert!(node.vulnerabilities[0].cisa_kev);
    }

    #[test]
    fn vulnerability_bucket_caps_at_forty() {
        let vulns: Vec<OsvVulnerability> = (0..12)
            .map(|i| vuln(&format!("GHSA-{i:04}"), "9.8", &[]))
            .collect();
        let pkg = bare_package("swiss-cheese", "1.0.0");
        let node = score_package(&pkg, &vulns, &HashSet::new(), Ecosystem::Npm, fixed_now());
        // 40 capped + popularity 5 + licence unknown 3.
        assert_eq!(node.risk_score, 48);
        assert_eq!(node.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn any_vulnerability_lifts_level_off_none() {
        let mut pkg = bare_package("tidy", "1.0.0");
        pkg.metadata = PackageMetadata {
            licence: Some("MIT".into()),
            first_published: Some("2015-01-01".into()),
            last_published: Some("2026-07-01".into()),
            weekly_downloads: Some(50_000),
        };
        let node = score_package(
            &pkg,
            &[vuln("GHSA-weak", "1.0", &[])],
            &HashSet::new(),
            Ecosystem::Npm,
            fixed_now(),
        );
        // Low severity 5 + 2 per vuln = 7, under the low threshold; the
        // advisory presence still lifts the level off none.
        assert_eq!(node.risk_score, 7);
        assert_eq!(node.risk_level, RiskLevel::Low);
    }

    #[test]
    fn resolution_error_is_unknown_regardless_of_score() {
        let mut pkg = bare_package("ghost", "1.0.0");
        pkg.resolution_error = true;
        let node = score_package(&pkg, &[], &HashSet::new(), Ecosystem::Go, fixed_now());
        assert_eq!(node.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn age_and_staleness_buckets() {
        let now = fixed_now();
        assert_eq!(age_bucket("2026-07-15", now), 10);
        assert_eq!(age_bucket("2026-01-01", now), 5);
        assert_eq!(age_bucket("2020-01-01", now), 0);
        assert_eq!(age_bucket("", now), 0);
        assert_eq!(staleness_bucket("2023-01-01", now), 10);
        assert_eq!(staleness_bucket("2025-03-01", now), 5);
        assert_eq!(staleness_bucket("2026-07-01", now), 0);
        assert_eq!(staleness_bucket("not a date", now), 0);
    }

    #[test]
    fn popularity_bucket_thresholds() {
        assert_eq!(popularity_bucket(0), 5);
        assert_eq!(popularity_bucket(999), 3);
        assert_eq!(popularity_bucket(1_000), 0);
    }

    #[test]
    fn release_frequency_ladder() {
        let now = fixed_now();
        assert_eq!(
            release_frequency("2026-07-20", "2026-07-25", now),
            ReleaseFrequency::New
        );
        assert_eq!(
            release_frequency("2026-01-01", "2026-07-01", now),
            ReleaseFrequency::Active
        );
        assert_eq!(
            release_frequency("2020-01-01", "2024-01-01", now),
            ReleaseFrequency::Low
        );
        assert_eq!(
            release_frequency("2020-01-01", "2026-06-01", now),
            ReleaseFrequency::Moderate
        );
        assert_eq!(
            release_frequency("", "2026-06-01", now),
            ReleaseFrequency::Unknown
        );
    }

    #[test]
    fn iso_parsing_accepts_the_upstream_shapes() {
        // npm: full RFC 3339 with Z.
        assert!(parse_iso_utc("2014-03-17T15:32:21.712Z").is_some());
        // pypi: T-separated datetime without offset.
        assert!(parse_iso_utc("2019-01-02T10:00:00").is_some());
        // cargo/pypi truncated: bare date.
        assert!(parse_iso_utc("2015-05-15").is_some());
        // maven: epoch-second digits are not a date.
        assert!(parse_iso_utc("1700000000").is_none());
        assert!(parse_iso_utc("").is_none());
    }

    #[test]
    fn determinism_given_fixed_inputs() {
        let exploited: HashSet<String> = ["CVE-2021-44228".to_string()].into();
        let mut pkg = bare_package("org.apache.logging.log4j:log4j-core", "2.14.1");
        pkg.metadata.licence = Some("Apache 2.0".into());
        let vulns = vec![vuln("GHSA-jfh8-c2jp-5v3q", "10.0", &["CVE-2021-44228"])];
        let first = score_package(&pkg, &vulns, &exploited, Ecosystem::Maven, fixed_now());
        let second = score_package(&pkg, &vulns, &exploited, Ecosystem::Maven, fixed_now());
        assert_eq!(first, second);
    }
}
