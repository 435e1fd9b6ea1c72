//! Licence normalisation and risk classification
//!
//! Raw licence strings are matched case-insensitively against an
//! ordered substring table, first hit wins. Anything that survives
//! unmatched but looks like a short SPDX-ish token passes through.

use regex::Regex;

use rampart_core::LicenceRisk;

/// Ordered, first substring hit wins. The bare `BSD` entry shadows the
/// clause-specific spellings below it.
const NORMALISATION: &[(&str, &str)] = &[
    ("MIT", "MIT"),
    ("ISC", "ISC"),
    ("BSD", "BSD-3-Clause"),
    ("Apache 2.0", "Apache-2.0"),
    ("Apache-2.0", "Apache-2.0"),
    ("BSD-2-Clause", "BSD-2-Clause"),
    ("BSD-3-Clause", "BSD-3-Clause"),
    ("GPL-2.0", "GPL-2.0"),
    ("GPL-3.0", "GPL-3.0"),
    ("LGPL-2.1", "LGPL-2.1"),
    ("LGPL-3.0", "LGPL-3.0"),
    ("MPL-2.0", "MPL-2.0"),
    ("Unlicense", "Unlicense"),
    ("AGPL-3.0", "AGPL-3.0"),
];

const PERMISSIVE: &[&str] = &[
    "MIT",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "ISC",
    "Unlicense",
    "CC0-1.0",
    "0BSD",
];

const WEAK_COPYLEFT: &[&str] = &[
    "LGPL-2.1",
    "LGPL-3.0",
    "MPL-2.0",
    "LGPL-2.1-only",
    "LGPL-3.0-only",
];

const STRONG_COPYLEFT: &[&str] = &[
    "GPL-2.0",
    "GPL-3.0",
    "AGPL-3.0",
    "GPL-2.0-only",
    "GPL-3.0-only",
    "AGPL-3.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0-or-later",
    "AGPL-3.0-or-later",
];

lazy_static::lazy_static! {
    static ref SPDX_ISH: Regex = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();
}

/// Normalise a raw licence string to an SPDX-like identifier.
pub fn normalise_licence(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    let lowered = raw.to_lowercase();
    for (needle, spdx) in NORMALISATION {
        if lowered.contains(&needle.to_lowercase()) {
            return (*spdx).to_string();
        }
    }
    if SPDX_ISH.is_match(raw) && raw.chars().count() < 30 {
        return raw.to_string();
    }
    raw.chars().take(30).collect()
}

/// Classify a normalised licence id. Unmatched non-empty ids classify
/// as medium; an absent licence is unknown.
pub fn classify_licence(spdx: &str) -> LicenceRisk {
    if PERMISSIVE.contains(&spdx) {
        LicenceRisk::Low
    } else if WEAK_COPYLEFT.contains(&spdx) {
        LicenceRisk::Medium
    } else if STRONG_COPYLEFT.contains(&spdx) {
        LicenceRisk::High
    } else if spdx.is_empty() {
        LicenceRisk::Unknown
    } else {
        LicenceRisk::Medium
    }
}

/// Points the licence signal contributes to the risk score.
pub fn licence_points(risk: LicenceRisk) -> u32 {
    match risk {
        LicenceRisk::High => 10,
        LicenceRisk::Medium => 5,
        LicenceRisk::Unknown => 3,
        LicenceRisk::Low => 0,
    }
}
