//! CycloneDX 1.5 JSON SBOM 생성
//!
//! [CycloneDX](https://cyclonedx.org/) 1.5 사양에 따른 JSON SBOM 문서를 생성합니다.
//! 루트 패키지는 `metadata.component`에, 나머지는 `components`에 기록되며
//! `DEPENDS_ON` 관계는 `dependencies` 그래프로 변환됩니다.

use std::collections::HashMap;

use serde::Serialize;

use super::{SbomInput, util};
use crate::error::SbomScannerError;
use crate::types::{
    NOASSERTION, PackageKey, PackageRecord, RelationshipKind, SbomDocument, SbomFormat, SbomType,
    SupplierKind,
};

/// CycloneDX 1.5 BOM 루트 구조
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    bom_format: String,
    spec_version: String,
    serial_number: String,
    version: u32,
    metadata: CycloneDxMetadata,
    components: Vec<CycloneDxComponent>,
    dependencies: Vec<CycloneDxDependency>,
}

/// CycloneDX 메타데이터
#[derive(Serialize)]
struct CycloneDxMetadata {
    timestamp: String,
    tools: Vec<CycloneDxTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<CycloneDxComponent>,
}

/// CycloneDX 도구 정보
#[derive(Serialize)]
struct CycloneDxTool {
    name: String,
    version: String,
}

/// CycloneDX 컴포넌트
#[derive(Serialize)]
struct CycloneDxComponent {
    #[serde(rename = "type")]
    component_type: String,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplier: Option<CycloneDxOrganization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    purl: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<CycloneDxLicense>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<CycloneDxHash>,
    #[serde(rename = "externalReferences", skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<CycloneDxExternalReference>,
}

/// CycloneDX 조직
#[derive(Serialize)]
struct CycloneDxOrganization {
    name: String,
}

/// CycloneDX 라이선스 (SPDX 표현식)
#[derive(Serialize)]
struct CycloneDxLicense {
    expression: String,
}

/// CycloneDX 해시 정보
#[derive(Serialize)]
struct CycloneDxHash {
    alg: String,
    content: String,
}

/// CycloneDX 외부 참조
#[derive(Serialize)]
struct CycloneDxExternalReference {
    #[serde(rename = "type")]
    reference_type: String,
    url: String,
}

/// CycloneDX 의존성 그래프 노드
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxDependency {
    #[serde(rename = "ref")]
    dependency_ref: String,
    depends_on: Vec<String>,
}

/// CycloneDX 1.5 JSON SBOM을 생성합니다.
pub fn generate(input: &SbomInput<'_>) -> Result<SbomDocument, SbomScannerError> {
    let mut root_component = None;
    let mut components = Vec::with_capacity(input.index.len());

    for record in input.index.iter() {
        if input.root.is_some_and(|root| *root == record.key()) {
            root_component = Some(component(record, "application"));
        } else {
            components.push(component(record, "library"));
        }
    }

    let component_count = components.len() + usize::from(root_component.is_some());

    let bom = CycloneDxBom {
        bom_format: "CycloneDX".to_owned(),
        spec_version: "1.5".to_owned(),
        serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        version: 1,
        metadata: CycloneDxMetadata {
            timestamp: util::current_timestamp(),
            tools: vec![CycloneDxTool {
                name: util::TOOL_NAME.to_owned(),
                version: util::TOOL_VERSION.to_owned(),
            }],
            component: root_component,
        },
        components,
        dependencies: dependency_graph(input),
    };

    let content = serde_json::to_string_pretty(&bom).map_err(|e| {
        SbomScannerError::SbomGeneration(format!("CycloneDX serialization failed: {e}"))
    })?;

    Ok(SbomDocument {
        sbom_type: SbomType::CycloneDx,
        format: SbomFormat::Json,
        content,
        component_count,
    })
}

fn component(record: &PackageRecord, component_type: &str) -> CycloneDxComponent {
    let (author, supplier) = match record.supplier.kind {
        SupplierKind::Person => (Some(record.supplier.text.clone()), None),
        SupplierKind::Organization => (
            None,
            Some(CycloneDxOrganization {
                name: record.supplier.text.clone(),
            }),
        ),
        SupplierKind::Unknown => (None, None),
    };

    let licenses = if record.license_concluded == NOASSERTION {
        Vec::new()
    } else {
        vec![CycloneDxLicense {
            expression: record.license_concluded.clone(),
        }]
    };

    let hashes = record
        .checksum
        .iter()
        .map(|c| CycloneDxHash {
            alg: "SHA-256".to_owned(),
            content: c.value.clone(),
        })
        .collect();

    let mut external_references = Vec::new();
    if let Some(homepage) = &record.homepage {
        external_references.push(CycloneDxExternalReference {
            reference_type: "website".to_owned(),
            url: homepage.clone(),
        });
    }
    if let Some(download) = &record.download_location {
        external_references.push(CycloneDxExternalReference {
            reference_type: "distribution".to_owned(),
            url: download.clone(),
        });
    }

    CycloneDxComponent {
        component_type: component_type.to_owned(),
        bom_ref: record.purl.clone(),
        name: record.name.clone(),
        version: record.version.clone(),
        author,
        supplier,
        description: record.summary.clone(),
        purl: record.purl.clone(),
        licenses,
        hashes,
        external_references,
    }
}

/// 인덱스 순서대로 모든 패키지의 의존성 노드를 만듭니다.
fn dependency_graph(input: &SbomInput<'_>) -> Vec<CycloneDxDependency> {
    let mut edges: HashMap<&PackageKey, Vec<String>> = HashMap::new();
    for edge in input
        .relationships
        .iter()
        .filter(|e| e.kind == RelationshipKind::DependsOn)
    {
        if let Some(target) = input.index.get_by_key(&edge.target) {
            edges
                .entry(&edge.source)
                .or_default()
                .push(target.purl.clone());
        }
    }

    input
        .index
        .iter()
        .map(|record| CycloneDxDependency {
            dependency_ref: record.purl.clone(),
            depends_on: edges.remove(&record.key()).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{Reconciliation, reconcile};
    use crate::types::{Checksum, DependencySpec, PackageDeclaration, Supplier};

    fn sample() -> Reconciliation {
        let decls = vec![
            PackageDeclaration {
                name: "my-app".to_owned(),
                version: "0.1.0".to_owned(),
                source: None,
                checksum: None,
                dependencies: vec![
                    DependencySpec::Bare("serde".to_owned()),
                    DependencySpec::Bare("tokio".to_owned()),
                ],
            },
            PackageDeclaration {
                name: "serde".to_owned(),
                version: "1.0.204".to_owned(),
                source: None,
                checksum: None,
                dependencies: vec![],
            },
            PackageDeclaration {
                name: "tokio".to_owned(),
                version: "1.38.0".to_owned(),
                source: None,
                checksum: None,
                dependencies: vec![],
            },
        ];
        let mut result = reconcile(&decls, Some("my-app")).unwrap();
        let id = result.index.lookup("serde", None).unwrap();
        let serde = result.index.get_mut(id).unwrap();
        serde.checksum = Some(Checksum::sha256("abc123"));
        serde.license_concluded = "MIT OR Apache-2.0".to_owned();
        serde.supplier = Supplier {
            kind: SupplierKind::Person,
            text: "David Tolnay".to_owned(),
        };
        serde.homepage = Some("https://serde.rs".to_owned());
        result
    }

    fn input(result: &Reconciliation) -> SbomInput<'_> {
        SbomInput {
            name: "my-app",
            index: &result.index,
            relationships: &result.relationships,
            root: result.root.as_ref(),
        }
    }

    #[test]
    fn generate_cyclonedx_is_valid_json() {
        let result = sample();
        let doc = generate(&input(&result)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(parsed["bomFormat"], "CycloneDX");
        assert_eq!(parsed["specVersion"], "1.5");
        assert!(
            parsed["serialNumber"]
                .as_str()
                .unwrap()
                .starts_with("urn:uuid:")
        );
        assert_eq!(parsed["metadata"]["tools"][0]["name"], "rustbom");
        assert_eq!(doc.component_count, 3);
        assert_eq!(doc.format, SbomFormat::Json);
    }

    #[test]
    fn root_goes_into_metadata() {
        let result = sample();
        let doc = generate(&input(&result)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert_eq!(parsed["metadata"]["component"]["name"], "my-app");
        assert_eq!(parsed["metadata"]["component"]["type"], "application");
        let components = parsed["components"].as_array().unwrap();
        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|c| c["name"] != "my-app"));
    }

    #[test]
    fn component_carries_enriched_fields() {
        let result = sample();
        let doc = generate(&input(&result)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        let serde = &parsed["components"][0];
        assert_eq!(serde["bom-ref"], "pkg:cargo/serde@1.0.204");
        assert_eq!(serde["hashes"][0]["alg"], "SHA-256");
        assert_eq!(serde["hashes"][0]["content"], "abc123");
        assert_eq!(serde["licenses"][0]["expression"], "MIT OR Apache-2.0");
        assert_eq!(serde["author"], "David Tolnay");
        assert_eq!(serde["externalReferences"][0]["type"], "website");

        let tokio = &parsed["components"][1];
        assert!(tokio.get("licenses").is_none());
        assert!(tokio.get("hashes").is_none());
    }

    #[test]
    fn dependency_graph_lists_every_package() {
        let result = sample();
        let doc = generate(&input(&result)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        let deps = parsed["dependencies"].as_array().unwrap();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0]["ref"], "pkg:cargo/my-app@0.1.0");
        assert_eq!(
            deps[0]["dependsOn"],
            serde_json::json!(["pkg:cargo/serde@1.0.204", "pkg:cargo/tokio@1.38.0"])
        );
        assert_eq!(deps[1]["dependsOn"], serde_json::json!([]));
    }

    #[test]
    fn without_root_all_packages_are_components() {
        let mut result = sample();
        result.root = None;
        let doc = generate(&input(&result)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc.content).unwrap();
        assert!(parsed["metadata"].get("component").is_none());
        assert_eq!(parsed["components"].as_array().unwrap().len(), 3);
    }
}
