#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rustbom_sbom_scanner::reconcile::reconcile;
use rustbom_sbom_scanner::sbom::{SbomInput, cyclonedx, spdx};
use rustbom_sbom_scanner::types::{DependencySpec, PackageDeclaration, SbomFormat};

/// 퍼저용 구조적 선언 입력
#[derive(Arbitrary, Debug)]
struct FuzzLockfile {
    root: Option<u8>,
    packages: Vec<FuzzPackage>,
}

#[derive(Arbitrary, Debug)]
struct FuzzPackage {
    name: u8,
    version: u8,
    checksum: Option<String>,
    dependencies: Vec<FuzzDependency>,
}

#[derive(Arbitrary, Debug)]
enum FuzzDependency {
    Bare(u8),
    Versioned(u8, u8),
}

// 이름/버전 공간을 좁혀 충돌과 중복 선언이 자주 나오게 한다
fn name(n: u8) -> String {
    format!("pkg-{}", n % 16)
}

fn version(v: u8) -> String {
    format!("0.{}.0", v % 4)
}

fuzz_target!(|input: FuzzLockfile| {
    let decls: Vec<PackageDeclaration> = input
        .packages
        .iter()
        .take(64)
        .map(|p| PackageDeclaration {
            name: name(p.name),
            version: version(p.version),
            source: None,
            checksum: p.checksum.clone(),
            dependencies: p
                .dependencies
                .iter()
                .take(16)
                .map(|d| match d {
                    FuzzDependency::Bare(n) => DependencySpec::Bare(name(*n)),
                    FuzzDependency::Versioned(n, v) => DependencySpec::Versioned {
                        name: name(*n),
                        version: version(*v),
                    },
                })
                .collect(),
        })
        .collect();

    let root = input.root.map(name);
    let Ok(result) = reconcile(&decls, root.as_deref()) else {
        return;
    };

    // 모든 관계의 양 끝은 인덱스에 존재해야 한다
    for edge in &result.relationships {
        assert!(result.index.get_by_key(&edge.source).is_some());
        assert!(result.index.get_by_key(&edge.target).is_some());
    }

    let sbom_input = SbomInput {
        name: root.as_deref().unwrap_or("fuzz"),
        index: &result.index,
        relationships: &result.relationships,
        root: result.root.as_ref(),
    };

    if let Ok(doc) = spdx::generate(&sbom_input, SbomFormat::Json) {
        let _: serde_json::Value =
            serde_json::from_str(&doc.content).expect("SPDX output must be valid JSON");
    }
    if let Ok(doc) = cyclonedx::generate(&sbom_input) {
        let _: serde_json::Value =
            serde_json::from_str(&doc.content).expect("CycloneDX output must be valid JSON");
    }
});
