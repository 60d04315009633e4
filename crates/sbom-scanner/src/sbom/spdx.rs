//! SPDX 2.3 SBOM 생성 (tag-value / JSON / YAML)
//!
//! [SPDX](https://spdx.dev/) 2.3 사양의 문서 구조를 serde 구조체로 한 번 구성한 뒤,
//! JSON과 YAML은 serde로 직렬화하고 tag-value는 같은 구조체를 순회하여 작성합니다.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use super::{SbomInput, util};
use crate::error::SbomScannerError;
use crate::types::{NOASSERTION, RelationshipKind, SbomDocument, SbomFormat, SbomType};

const SPDX_VERSION: &str = "SPDX-2.3";
const DATA_LICENSE: &str = "CC0-1.0";
const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

/// SPDX 2.3 문서 루트 구조
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    spdx_version: String,
    data_license: String,
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    document_namespace: String,
    creation_info: SpdxCreationInfo,
    packages: Vec<SpdxPackage>,
    relationships: Vec<SpdxRelationship>,
}

/// SPDX 생성 정보
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxCreationInfo {
    created: String,
    creators: Vec<String>,
}

/// SPDX 패키지
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    version_info: String,
    primary_package_purpose: String,
    supplier: String,
    download_location: String,
    files_analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    homepage: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<SpdxChecksum>,
    license_concluded: String,
    license_declared: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_comments: Option<String>,
    copyright_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<SpdxExternalRef>,
}

/// SPDX 외부 참조
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    reference_category: String,
    reference_type: String,
    reference_locator: String,
}

/// SPDX 체크섬
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: String,
    checksum_value: String,
}

/// SPDX 관계
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship {
    spdx_element_id: String,
    relationship_type: String,
    related_spdx_element: String,
}

/// SPDX 2.3 SBOM을 생성합니다.
pub fn generate(
    input: &SbomInput<'_>,
    format: SbomFormat,
) -> Result<SbomDocument, SbomScannerError> {
    let doc = build_document(input);
    let component_count = doc.packages.len();

    let content = match format {
        SbomFormat::Json => serde_json::to_string_pretty(&doc).map_err(|e| {
            SbomScannerError::SbomGeneration(format!("SPDX JSON serialization failed: {e}"))
        })?,
        SbomFormat::Yaml => serde_yaml::to_string(&doc).map_err(|e| {
            SbomScannerError::SbomGeneration(format!("SPDX YAML serialization failed: {e}"))
        })?,
        SbomFormat::Tag => to_tag_value(&doc).map_err(|e| {
            SbomScannerError::SbomGeneration(format!("SPDX tag-value serialization failed: {e}"))
        })?,
    };

    Ok(SbomDocument {
        sbom_type: SbomType::Spdx,
        format,
        content,
        component_count,
    })
}

fn build_document(input: &SbomInput<'_>) -> SpdxDocument {
    let ids = util::assign_spdx_ids(input.index);

    let packages = input
        .index
        .iter()
        .filter_map(|record| {
            let key = record.key();
            let spdx_id = ids.get(&key)?.clone();
            let purpose = if input.root == Some(&key) {
                "APPLICATION"
            } else {
                "LIBRARY"
            };

            Some(SpdxPackage {
                spdx_id,
                name: record.name.clone(),
                version_info: record.version.clone(),
                primary_package_purpose: purpose.to_owned(),
                supplier: record.supplier.to_spdx(),
                download_location: record
                    .download_location
                    .clone()
                    .unwrap_or_else(|| NOASSERTION.to_owned()),
                files_analyzed: false,
                homepage: record.homepage.clone(),
                checksums: record
                    .checksum
                    .iter()
                    .map(|c| SpdxChecksum {
                        algorithm: c.algorithm.to_string(),
                        checksum_value: c.value.clone(),
                    })
                    .collect(),
                license_concluded: record.license_concluded.clone(),
                license_declared: record.license_declared.clone(),
                license_comments: record.license_comment.clone(),
                copyright_text: NOASSERTION.to_owned(),
                summary: record.summary.clone(),
                external_refs: vec![SpdxExternalRef {
                    reference_category: "PACKAGE-MANAGER".to_owned(),
                    reference_type: "purl".to_owned(),
                    reference_locator: record.purl.clone(),
                }],
            })
        })
        .collect();

    let relationships = input
        .relationships
        .iter()
        .filter_map(|edge| {
            let target = ids.get(&edge.target);
            let source = match edge.kind {
                RelationshipKind::Describes => Some(DOCUMENT_ID.to_owned()),
                RelationshipKind::DependsOn => ids.get(&edge.source).cloned(),
            };
            match (source, target) {
                (Some(source), Some(target)) => Some(SpdxRelationship {
                    spdx_element_id: source,
                    relationship_type: edge.kind.to_string(),
                    related_spdx_element: target.clone(),
                }),
                _ => {
                    warn!(relationship = %edge, "relationship endpoint not in package index, skipping");
                    None
                }
            }
        })
        .collect();

    SpdxDocument {
        spdx_version: SPDX_VERSION.to_owned(),
        data_license: DATA_LICENSE.to_owned(),
        spdx_id: DOCUMENT_ID.to_owned(),
        name: input.name.to_owned(),
        document_namespace: format!(
            "https://spdx.org/spdxdocs/{}-{}",
            util::sanitize_spdx_id(input.name),
            uuid::Uuid::new_v4()
        ),
        creation_info: SpdxCreationInfo {
            created: util::current_timestamp(),
            creators: vec![format!("Tool: {}-{}", util::TOOL_NAME, util::TOOL_VERSION)],
        },
        packages,
        relationships,
    }
}

/// 여러 줄이 될 수 있는 값은 `<text>` 태그로 감쌉니다.
fn text(value: &str) -> String {
    format!("<text>{value}</text>")
}

fn to_tag_value(doc: &SpdxDocument) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "SPDXVersion: {}", doc.spdx_version)?;
    writeln!(out, "DataLicense: {}", doc.data_license)?;
    writeln!(out, "SPDXID: {}", doc.spdx_id)?;
    writeln!(out, "DocumentName: {}", doc.name)?;
    writeln!(out, "DocumentNamespace: {}", doc.document_namespace)?;
    for creator in &doc.creation_info.creators {
        writeln!(out, "Creator: {creator}")?;
    }
    writeln!(out, "Created: {}", doc.creation_info.created)?;

    for pkg in &doc.packages {
        writeln!(out)?;
        writeln!(out, "##### Package: {}", pkg.name)?;
        writeln!(out)?;
        writeln!(out, "PackageName: {}", pkg.name)?;
        writeln!(out, "SPDXID: {}", pkg.spdx_id)?;
        writeln!(out, "PackageVersion: {}", pkg.version_info)?;
        writeln!(out, "PrimaryPackagePurpose: {}", pkg.primary_package_purpose)?;
        writeln!(out, "PackageSupplier: {}", pkg.supplier)?;
        writeln!(out, "PackageDownloadLocation: {}", pkg.download_location)?;
        writeln!(out, "FilesAnalyzed: {}", pkg.files_analyzed)?;
        for checksum in &pkg.checksums {
            writeln!(
                out,
                "PackageChecksum: {}: {}",
                checksum.algorithm, checksum.checksum_value
            )?;
        }
        if let Some(homepage) = &pkg.homepage {
            writeln!(out, "PackageHomePage: {homepage}")?;
        }
        writeln!(out, "PackageLicenseConcluded: {}", pkg.license_concluded)?;
        writeln!(out, "PackageLicenseDeclared: {}", pkg.license_declared)?;
        if let Some(comment) = &pkg.license_comments {
            writeln!(out, "PackageLicenseComments: {}", text(comment))?;
        }
        writeln!(out, "PackageCopyrightText: {}", pkg.copyright_text)?;
        if let Some(summary) = &pkg.summary {
            writeln!(out, "PackageSummary: {}", text(summary))?;
        }
        for ext in &pkg.external_refs {
            writeln!(
                out,
                "ExternalRef: {} {} {}",
                ext.reference_category, ext.reference_type, ext.reference_locator
            )?;
        }
    }

    if !doc.relationships.is_empty() {
        writeln!(out)?;
        writeln!(out, "##### Relationships")?;
        writeln!(out)?;
        for rel in &doc.relationships {
            writeln!(
                out,
                "Relationship: {} {} {}",
                rel.spdx_element_id, rel.relationship_type, rel.related_spdx_element
            )?;
        }
    }

    Ok(out)
}
