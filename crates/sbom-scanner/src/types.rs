//! 도메인 타입 -- SBOM 스캐너 전용 데이터 구조
//!
//! 패키지 선언, 패키지 레코드, 관계(엣지), SBOM 형식 등 핵심 타입을 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 알 수 없는 값을 나타내는 SPDX 표준 플레이스홀더
pub const NOASSERTION: &str = "NOASSERTION";

/// 해결되지 않은 의존성에 부여하는 대체 버전
pub const VERSION_UNKNOWN: &str = "NA";

/// 패키지 레코드의 언어 태그
pub const LANGUAGE: &str = "Rust";

/// Package URL 생태계 타입
pub const PURL_TYPE: &str = "cargo";

/// 패키지 이름과 버전으로 PURL을 생성합니다.
///
/// 예: `pkg:cargo/serde@1.0.204`
pub fn make_purl(name: &str, version: &str) -> String {
    format!("pkg:{PURL_TYPE}/{name}@{version}")
}

/// lockfile의 의존성 명세
///
/// Cargo.lock의 `dependencies` 항목은 이름만 있거나(`"serde"`),
/// 같은 이름의 버전이 여러 개일 때 버전이 붙습니다(`"serde 1.0.204"`).
/// 출처까지 붙은 형식(`"serde 1.0.204 (registry+...)"`)도 버전 명세로 취급합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencySpec {
    /// 이름만 있는 명세 -- 인덱스에서 버전을 찾아야 함
    Bare(String),
    /// 이름과 버전이 모두 있는 명세 -- 그대로 신뢰함
    Versioned {
        /// 패키지 이름
        name: String,
        /// 패키지 버전
        version: String,
    },
}

impl DependencySpec {
    /// 명세 문자열을 파싱합니다.
    ///
    /// 토큰이 없거나, 4개 이상이거나, 세 번째 토큰이 `(출처)` 형식이 아니면 `None`입니다.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut tokens = spec.split_whitespace();
        let name = tokens.next()?;
        let version = tokens.next();
        let source = tokens.next();
        if tokens.next().is_some() {
            return None;
        }

        match (version, source) {
            (None, _) => Some(Self::Bare(name.to_owned())),
            (Some(version), None) => Some(Self::Versioned {
                name: name.to_owned(),
                version: version.to_owned(),
            }),
            (Some(version), Some(source)) if source.starts_with('(') && source.ends_with(')') => {
                Some(Self::Versioned {
                    name: name.to_owned(),
                    version: version.to_owned(),
                })
            }
            _ => None,
        }
    }

    /// 명세의 패키지 이름
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) | Self::Versioned { name, .. } => name,
        }
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(name) => write!(f, "{name}"),
            Self::Versioned { name, version } => write!(f, "{name} {version}"),
        }
    }
}

/// lockfile의 `[[package]]` 항목 하나
///
/// 파싱 후에는 읽기 전용입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDeclaration {
    /// 패키지 이름
    pub name: String,
    /// 패키지 버전
    pub version: String,
    /// 출처 (`registry+...`, `git+...`, 경로 의존성이면 `None`)
    pub source: Option<String>,
    /// lockfile에 기록된 SHA-256 체크섬
    pub checksum: Option<String>,
    /// 선언된 의존성 (lockfile 순서 유지)
    pub dependencies: Vec<DependencySpec>,
}

/// 패키지 식별 키 `(name, version)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageKey {
    /// 패키지 이름
    pub name: String,
    /// 패키지 버전
    pub version: String,
}

impl PackageKey {
    /// 새 키를 생성합니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// 공급자 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierKind {
    /// 조직 (토큰 4개 이상)
    Organization,
    /// 개인 (토큰 2~3개)
    Person,
    /// 알 수 없음
    Unknown,
}

impl fmt::Display for SupplierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => write!(f, "Organization"),
            Self::Person => write!(f, "Person"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// 패키지 공급자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// 분류
    pub kind: SupplierKind,
    /// 정규화된 표시 텍스트 (예: `Jane Q. Smith (jane@example.com)`)
    pub text: String,
}

impl Supplier {
    /// 알 수 없는 공급자
    pub fn unknown() -> Self {
        Self {
            kind: SupplierKind::Unknown,
            text: NOASSERTION.to_owned(),
        }
    }

    /// SPDX `PackageSupplier` 값 (예: `Person: Jane Q. Smith`)
    pub fn to_spdx(&self) -> String {
        match self.kind {
            SupplierKind::Unknown => NOASSERTION.to_owned(),
            kind => format!("{kind}: {}", self.text),
        }
    }
}

impl Default for Supplier {
    fn default() -> Self {
        Self::unknown()
    }
}

/// 체크섬 알고리즘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    /// SHA-256 (crates.io와 Cargo.lock이 사용하는 유일한 알고리즘)
    #[serde(rename = "SHA256")]
    Sha256,
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "SHA256"),
        }
    }
}

/// 패키지 체크섬
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    /// 알고리즘
    pub algorithm: ChecksumAlgorithm,
    /// 16진수 해시 값
    pub value: String,
}

impl Checksum {
    /// SHA-256 체크섬을 생성합니다.
    pub fn sha256(value: impl Into<String>) -> Self {
        Self {
            algorithm: ChecksumAlgorithm::Sha256,
            value: value.into(),
        }
    }
}

/// 패키지 출처
///
/// lockfile의 `source` 값에서 분류합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageSource {
    /// 레지스트리 (`registry+...`, `sparse+...`)
    #[default]
    Registry,
    /// git 저장소 (`git+...` 원문)
    Git(String),
    /// 출처 미기재 (경로 의존성, 버전 미상 합성 레코드)
    Unspecified,
}

impl PackageSource {
    /// lockfile `source` 값을 분류합니다.
    pub fn parse(source: Option<&str>) -> Self {
        match source.map(str::trim) {
            None | Some("") => Self::Unspecified,
            Some(s) if s.starts_with("git+") => Self::Git(s.to_owned()),
            Some(_) => Self::Registry,
        }
    }

    /// 레지스트리 메타데이터 조회 대상인지 여부
    ///
    /// git 출처는 레지스트리에 게시된 같은 버전과 내용이 다를 수 있으므로 제외합니다.
    pub fn is_registry_lookup(&self) -> bool {
        !matches!(self, Self::Git(_))
    }

    /// SPDX 다운로드 위치
    ///
    /// `git+https://host/repo?branch=main#<rev>` 를 `git+https://host/repo@<rev>` 로 바꿉니다.
    pub fn download_location(&self) -> Option<String> {
        let Self::Git(source) = self else {
            return None;
        };
        let (base, rev) = match source.split_once('#') {
            Some((base, rev)) => (base, Some(rev)),
            None => (source.as_str(), None),
        };
        let base = base.split_once('?').map_or(base, |(url, _)| url);
        Some(match rev {
            Some(rev) if !rev.is_empty() => format!("{base}@{rev}"),
            _ => base.to_owned(),
        })
    }
}

/// 패키지 레코드
///
/// [`PackageIndex`](crate::index::PackageIndex)가 소유하며 `(name, version)`마다 하나만 존재합니다.
/// 한 번 생성되면 enrichment 단계에서 제자리 갱신만 되고 다시 생성되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// 패키지 이름
    pub name: String,
    /// 패키지 버전
    pub version: String,
    /// 공급자
    pub supplier: Supplier,
    /// 선언된 라이선스 (SPDX 식별자 또는 `NOASSERTION`)
    pub license_declared: String,
    /// 결론 라이선스 (SPDX 식별자 또는 `NOASSERTION`)
    pub license_concluded: String,
    /// 라이선스 정규화 설명
    pub license_comment: Option<String>,
    /// 체크섬
    pub checksum: Option<Checksum>,
    /// 홈페이지
    pub homepage: Option<String>,
    /// 다운로드 위치
    pub download_location: Option<String>,
    /// 요약 설명
    pub summary: Option<String>,
    /// Package URL
    pub purl: String,
    /// 언어 태그
    pub language: String,
    /// 패키지 출처
    pub source: PackageSource,
}

impl PackageRecord {
    /// 최소 정보만 가진 레코드를 생성합니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        let version = version.into();
        let purl = make_purl(&name, &version);
        Self {
            name,
            version,
            supplier: Supplier::unknown(),
            license_declared: NOASSERTION.to_owned(),
            license_concluded: NOASSERTION.to_owned(),
            license_comment: None,
            checksum: None,
            homepage: None,
            download_location: None,
            summary: None,
            purl,
            language: LANGUAGE.to_owned(),
            source: PackageSource::default(),
        }
    }

    /// 레코드의 식별 키
    pub fn key(&self) -> PackageKey {
        PackageKey::new(self.name.clone(), self.version.clone())
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// 관계 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    /// 문서가 루트 패키지를 기술함
    Describes,
    /// 패키지가 다른 패키지에 의존함
    DependsOn,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Describes => write!(f, "DESCRIBES"),
            Self::DependsOn => write!(f, "DEPENDS_ON"),
        }
    }
}

/// 관계 엣지
///
/// `DESCRIBES`는 루트 패키지에서 자기 자신으로 향합니다.
/// 엣지는 `(source, kind, target)` 전체로 중복 제거됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// 출발 패키지
    pub source: PackageKey,
    /// 관계 종류
    pub kind: RelationshipKind,
    /// 도착 패키지
    pub target: PackageKey,
}

impl fmt::Display for RelationshipEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.kind, self.target)
    }
}

/// SBOM 표준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SbomType {
    /// SPDX 2.3
    Spdx,
    /// CycloneDX 1.5
    CycloneDx,
}

impl fmt::Display for SbomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spdx => write!(f, "spdx"),
            Self::CycloneDx => write!(f, "cyclonedx"),
        }
    }
}

impl SbomType {
    /// 문자열에서 SBOM 표준을 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spdx" => Some(Self::Spdx),
            "cyclonedx" | "cdx" => Some(Self::CycloneDx),
            _ => None,
        }
    }
}

/// SBOM 직렬화 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SbomFormat {
    /// SPDX tag-value
    Tag,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag => write!(f, "tag"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl SbomFormat {
    /// 문자열에서 직렬화 형식을 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tag" | "tag-value" | "tv" => Some(Self::Tag),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// SBOM 문서
///
/// 생성된 SBOM의 표준, 형식, 내용을 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SbomDocument {
    /// SBOM 표준
    pub sbom_type: SbomType,
    /// 실제 직렬화 형식 (CycloneDX는 항상 JSON)
    pub format: SbomFormat,
    /// 직렬화된 내용
    pub content: String,
    /// 포함된 컴포넌트 수
    pub component_count: usize,
}

impl fmt::Display for SbomDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SbomDocument(type={}, format={}, components={})",
            self.sbom_type, self.format, self.component_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_purl_uses_cargo_type() {
        assert_eq!(make_purl("serde", "1.0.204"), "pkg:cargo/serde@1.0.204");
    }

    #[test]
    fn dependency_spec_bare() {
        assert_eq!(
            DependencySpec::parse("serde"),
            Some(DependencySpec::Bare("serde".to_owned()))
        );
    }

    #[test]
    fn dependency_spec_versioned() {
        let spec = DependencySpec::parse("serde 1.0.204").unwrap();
        assert_eq!(
            spec,
            DependencySpec::Versioned {
                name: "serde".to_owned(),
                version: "1.0.204".to_owned(),
            }
        );
        assert_eq!(spec.name(), "serde");
        assert_eq!(spec.to_string(), "serde 1.0.204");
    }

    #[test]
    fn dependency_spec_with_source_is_versioned() {
        let spec = DependencySpec::parse(
            "windows-sys 0.52.0 (registry+https://github.com/rust-lang/crates.io-index)",
        )
        .unwrap();
        assert_eq!(
            spec,
            DependencySpec::Versioned {
                name: "windows-sys".to_owned(),
                version: "0.52.0".to_owned(),
            }
        );
    }

    #[test]
    fn dependency_spec_rejects_malformed() {
        assert_eq!(DependencySpec::parse(""), None);
        assert_eq!(DependencySpec::parse("   "), None);
        assert_eq!(DependencySpec::parse("a 1.0 b"), None);
        assert_eq!(DependencySpec::parse("a 1.0 (src) extra"), None);
    }

    #[test]
    fn new_record_defaults_to_noassertion() {
        let record = PackageRecord::new("serde", "1.0.204");
        assert_eq!(record.supplier, Supplier::unknown());
        assert_eq!(record.license_declared, NOASSERTION);
        assert_eq!(record.license_concluded, NOASSERTION);
        assert!(record.license_comment.is_none());
        assert!(record.checksum.is_none());
        assert_eq!(record.purl, "pkg:cargo/serde@1.0.204");
        assert_eq!(record.language, "Rust");
        assert_eq!(record.source, PackageSource::Registry);
        assert_eq!(record.key(), PackageKey::new("serde", "1.0.204"));
    }

    #[test]
    fn package_source_classification() {
        assert_eq!(
            PackageSource::parse(Some("registry+https://github.com/rust-lang/crates.io-index")),
            PackageSource::Registry
        );
        assert_eq!(
            PackageSource::parse(Some("sparse+https://index.crates.io/")),
            PackageSource::Registry
        );
        assert_eq!(PackageSource::parse(None), PackageSource::Unspecified);
        assert!(PackageSource::Unspecified.is_registry_lookup());

        let git = PackageSource::parse(Some(
            "git+https://github.com/acme/widget?branch=main#0123abcd",
        ));
        assert!(!git.is_registry_lookup());
        assert_eq!(
            git.download_location().as_deref(),
            Some("git+https://github.com/acme/widget@0123abcd")
        );
        assert_eq!(PackageSource::Registry.download_location(), None);
    }

    #[test]
    fn supplier_to_spdx() {
        let person = Supplier {
            kind: SupplierKind::Person,
            text: "Jane Smith".to_owned(),
        };
        assert_eq!(person.to_spdx(), "Person: Jane Smith");
        assert_eq!(Supplier::unknown().to_spdx(), "NOASSERTION");
    }

    #[test]
    fn relationship_display() {
        let edge = RelationshipEdge {
            source: PackageKey::new("a", "1.0"),
            kind: RelationshipKind::DependsOn,
            target: PackageKey::new("b", "2.0"),
        };
        assert_eq!(edge.to_string(), "a@1.0 DEPENDS_ON b@2.0");
    }

    #[test]
    fn sbom_type_from_str_loose() {
        assert_eq!(SbomType::from_str_loose("SPDX"), Some(SbomType::Spdx));
        assert_eq!(SbomType::from_str_loose("cdx"), Some(SbomType::CycloneDx));
        assert_eq!(SbomType::from_str_loose("swid"), None);
    }

    #[test]
    fn sbom_format_from_str_loose() {
        assert_eq!(SbomFormat::from_str_loose("tag"), Some(SbomFormat::Tag));
        assert_eq!(SbomFormat::from_str_loose("JSON"), Some(SbomFormat::Json));
        assert_eq!(SbomFormat::from_str_loose("yml"), Some(SbomFormat::Yaml));
        assert_eq!(SbomFormat::from_str_loose("xml"), None);
    }
}
