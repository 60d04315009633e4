//! 의존성 조정기 -- 패키지 선언을 인덱스와 관계 그래프로 변환
//!
//! [`reconcile`]은 두 단계로 동작합니다.
//!
//! 1. **등록**: 모든 선언을 `(name, version)`으로 인덱스에 등록합니다.
//!    lockfile 체크섬과 출처를 레코드에 미리 채웁니다.
//! 2. **엣지 해결**: 각 선언의 의존성 명세를 `(name, version)`으로 해결하고
//!    `DEPENDS_ON` 엣지를 생성합니다. 모든 선언이 1단계에서 등록되었으므로
//!    lockfile 내 순서와 무관하게 엣지의 양 끝은 항상 인덱스에 존재합니다.
//!
//! # 해결 규칙
//!
//! - `Versioned` 명세는 그대로 신뢰하며, 인덱스에 없으면 새로 등록합니다.
//! - `Bare` 명세는 같은 이름 중 가장 먼저 등록된 레코드의 버전을 사용합니다.
//! - 어디에도 선언되지 않은 `Bare` 명세는 경고 후 버전 `NA`로 합성합니다.
//!   실행 전체를 중단하지 않습니다.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::SbomScannerError;
use crate::index::PackageIndex;
use crate::types::{
    Checksum, DependencySpec, PackageDeclaration, PackageKey, PackageSource, RelationshipEdge,
    RelationshipKind, VERSION_UNKNOWN,
};

/// 조정 결과
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// 패키지 인덱스 (등록 순서 유지)
    pub index: PackageIndex,
    /// 관계 목록 (`DESCRIBES`가 있으면 첫 번째)
    pub relationships: Vec<RelationshipEdge>,
    /// 버전 `NA`로 합성된 미해결 의존성
    pub unresolved: Vec<PackageKey>,
    /// `DESCRIBES` 대상 루트 패키지
    pub root: Option<PackageKey>,
}

impl Reconciliation {
    /// `DEPENDS_ON` 엣지 수
    pub fn dependency_count(&self) -> usize {
        self.relationships
            .iter()
            .filter(|edge| edge.kind == RelationshipKind::DependsOn)
            .count()
    }
}

/// 전체 튜플 기준으로 중복 제거되는 엣지 목록
#[derive(Default)]
struct EdgeList {
    edges: Vec<RelationshipEdge>,
    seen: HashSet<RelationshipEdge>,
}

impl EdgeList {
    fn push(&mut self, edge: RelationshipEdge) -> bool {
        if self.seen.contains(&edge) {
            return false;
        }
        self.seen.insert(edge.clone());
        self.edges.push(edge);
        true
    }
}

/// 패키지 선언 목록을 인덱스와 관계 그래프로 조정합니다.
///
/// `root_name`이 주어지면 해당 이름의 (최초 등록) 패키지로 `DESCRIBES` 엣지를 하나 생성합니다.
///
/// # Errors
///
/// 다음 경우 `SbomScannerError::InvalidModule`
/// - 선언이 하나도 없음
/// - `root_name`에 해당하는 패키지가 선언되지 않음
pub fn reconcile(
    declarations: &[PackageDeclaration],
    root_name: Option<&str>,
) -> Result<Reconciliation, SbomScannerError> {
    if declarations.is_empty() {
        return Err(SbomScannerError::InvalidModule {
            path: "lockfile".to_owned(),
            reason: "no packages declared".to_owned(),
        });
    }

    let mut index = PackageIndex::new();
    let mut edges = EdgeList::default();
    let mut unresolved: Vec<PackageKey> = Vec::new();

    // Pass 1: 모든 선언 등록
    for decl in declarations {
        let registration = index.register_entry(&decl.name, &decl.version);
        if registration.inserted {
            debug!(name = %decl.name, version = %decl.version, "package added");
            if let Some(record) = index.get_mut(registration.id) {
                record.source = PackageSource::parse(decl.source.as_deref());
                record.download_location = record.source.download_location();
            }
        }

        if let (Some(checksum), Some(record)) =
            (decl.checksum.as_deref(), index.get_mut(registration.id))
            && record.checksum.is_none()
        {
            record.checksum = Some(Checksum::sha256(checksum));
        }
    }

    let root = match root_name {
        Some(root_name) => match index.lookup(root_name, None).and_then(|id| index.get(id)) {
            Some(record) => {
                let key = record.key();
                let edge = RelationshipEdge {
                    source: key.clone(),
                    kind: RelationshipKind::Describes,
                    target: key.clone(),
                };
                debug!(relationship = %edge, "relationship added");
                edges.push(edge);
                Some(key)
            }
            None => {
                return Err(SbomScannerError::InvalidModule {
                    path: "lockfile".to_owned(),
                    reason: format!("root application '{root_name}' is not declared"),
                });
            }
        },
        None => None,
    };

    // Pass 2: 의존성 엣지 해결
    for decl in declarations {
        let source = PackageKey::new(decl.name.clone(), decl.version.clone());

        for spec in &decl.dependencies {
            let target = match spec {
                DependencySpec::Versioned { name, version } => {
                    if index.register_entry(name, version).inserted {
                        debug!(
                            name = %name,
                            version = %version,
                            dependent = %source,
                            "package added from versioned dependency"
                        );
                    }
                    PackageKey::new(name.clone(), version.clone())
                }
                DependencySpec::Bare(name) => {
                    match index.lookup(name, None).and_then(|id| index.get(id)) {
                        Some(record) => record.key(),
                        None => {
                            warn!(
                                dependency = %name,
                                dependent = %source,
                                "dependency not declared in lockfile, version unknown"
                            );
                            let key = PackageKey::new(name.clone(), VERSION_UNKNOWN);
                            let registration = index.register_entry(name, VERSION_UNKNOWN);
                            if registration.inserted {
                                debug!(name = %name, version = VERSION_UNKNOWN, "package added");
                                if let Some(record) = index.get_mut(registration.id) {
                                    record.source = PackageSource::Unspecified;
                                }
                                unresolved.push(key.clone());
                            }
                            key
                        }
                    }
                }
            };

            let edge = RelationshipEdge {
                source: source.clone(),
                kind: RelationshipKind::DependsOn,
                target,
            };
            let line = edge.to_string();
            if edges.push(edge) {
                debug!(relationship = %line, "relationship added");
            }
        }
    }

    Ok(Reconciliation {
        index,
        relationships: edges.edges,
        unresolved,
        root,
    })
}
