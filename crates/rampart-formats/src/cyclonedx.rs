//! CycloneDX 1.5 document model and emitter
//!
//! One component per annotated node, one dependency entry per node, and
//! one VEX vulnerability entry per (node, advisory) pair. The component
//! `bom-ref` is the package key, which is also what dependency and
//! affect references point at.

use serde::{Deserialize, Serialize};

use rampart_core::{Ecosystem, PackageNode, VERSION};

pub const BOM_FORMAT: &str = "CycloneDX";
pub const SPEC_VERSION: &str = "1.5";

const ADVISORY_SOURCE_NAME: &str = "OSV";
const ADVISORY_SOURCE_URL: &str = "https://osv.dev";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycloneDxBom {
    pub bom_format: String,
    pub spec_version: String,
    pub serial_number: String,
    pub version: u32,
    pub metadata: Metadata,
    pub components: Vec<Component>,
    pub dependencies: Vec<Dependency>,
    pub vulnerabilities: Vec<VexVulnerability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub timestamp: String,
    pub tools: Tools,
    pub component: RootComponent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tools {
    pub components: Vec<ToolComponent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "bom-ref")]
    pub bom_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub version: String,
    pub purl: String,
    #[serde(rename = "bom-ref")]
    pub bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<License>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub license: LicenseId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseId {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(rename = "ref")]
    pub reference: String,
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VexVulnerability {
    pub id: String,
    pub source: VexSource,
    pub ratings: Vec<VexRating>,
    pub description: String,
    pub affects: Vec<VexAffect>,
    pub analysis: VexAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VexSource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VexRating {
    pub score: f64,
    pub severity: String,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VexAffect {
    #[serde(rename = "ref")]
    pub reference: String,
    pub versions: Vec<VexVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VexVersion {
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VexAnalysis {
    pub state: String,
}

/// Serialise an annotated node list as a CycloneDX 1.5 document.
pub fn build_bom(nodes: &[PackageNode], ecosystem: Ecosystem, root: &str) -> CycloneDxBom {
    let mut components = Vec::with_capacity(nodes.len());
    let mut dependencies = Vec::with_capacity(nodes.len());
    let mut vulnerabilities = Vec::new();

    for node in nodes {
        let bom_ref = node.key();

        let licenses = (!node.licence.spdx.is_empty()).then(|| {
            vec![License {
                license: LicenseId {
                    id: node.licence.spdx.clone(),
                },
            }]
        });

        components.push(Component {
            component_type: "library".to_string(),
            name: node.name.clone(),
            version: node.version.clone(),
            purl: purl(ecosystem, &node.name, &node.version),
            bom_ref: bom_ref.clone(),
            licenses,
        });

        dependencies.push(Dependency {
            reference: bom_ref.clone(),
            depends_on: node.depends_on.clone(),
        });

        for vuln in &node.vulnerabilities {
            let ratings = if vuln.cvss > 0.0 {
                vec![VexRating {
                    score: vuln.cvss,
                    severity: vuln.severity.as_str().to_lowercase(),
                    method: "CVSSv3".to_string(),
                }]
            } else {
                Vec::new()
            };
            let versions = if node.version.is_empty() {
                Vec::new()
            } else {
                vec![VexVersion {
                    version: node.version.clone(),
                }]
            };
            vulnerabilities.push(VexVulnerability {
                id: vuln.id.clone(),
                source: VexSource {
                    name: ADVISORY_SOURCE_NAME.to_string(),
                    url: ADVISORY_SOURCE_URL.to_string(),
                },
                ratings,
                description: vuln.summary.clone(),
                affects: vec![VexAffect {
                    reference: bom_ref.clone(),
                    versions,
                }],
                analysis: VexAnalysis {
                    state: if vuln.cisa_kev {
                        "exploitable".to_string()
                    } else {
                        "in_triage".to_string()
                    },
                },
                recommendation: (!vuln.fixed_in.is_empty())
                    .then(|| format!("Upgrade to {}", vuln.fixed_in)),
            });
        }
    }

    let (root_name, root_version) = split_root(root);

    CycloneDxBom {
        bom_format: BOM_FORMAT.to_string(),
        spec_version: SPEC_VERSION.to_string(),
        serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        version: 1,
        metadata: Metadata {
            timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            tools: Tools {
                components: vec![ToolComponent {
                    component_type: "application".to_string(),
                    name: "rampart".to_string(),
                    version: VERSION.to_string(),
                    description: "Dependency risk analyser".to_string(),
                }],
            },
            component: RootComponent {
                component_type: "application".to_string(),
                name: root_name,
                version: root_version,
                bom_ref: root.to_string(),
            },
        },
        components,
        dependencies,
        vulnerabilities,
    }
}

/// Package URL for a component. Maven coordinates split into the
/// group/artifact form; everything else is `pkg:{type}/{name}@{version}`.
fn purl(ecosystem: Ecosystem, name: &str, version: &str) -> String {
    let purl_type = ecosystem.purl_type();
    if ecosystem == Ecosystem::Maven {
        if let Some((group, artifact)) = name.split_once(':') {
            return format!("pkg:{purl_type}/{group}/{artifact}@{version}");
        }
    }
    format!("pkg:{purl_type}/{name}@{version}")
}

/// `root` arrives as `name@version`; the name is everything before the
/// first `@`, the version everything after the last.
fn split_root(root: &str) -> (String, String) {
    let name = root.split('@').next().unwrap_or(root).to_string();
    let version = root.rsplit('@').next().unwrap_or(root).to_string();
    (name, version)
}
