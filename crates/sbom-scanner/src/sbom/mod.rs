//! SBOM 문서 생성 -- SPDX 2.3 / CycloneDX 1.5 / DOT 그래프
//!
//! [`SbomGenerator`]는 조정/보강이 끝난 패키지 인덱스와 관계 목록([`SbomInput`])을
//! 선택한 표준과 직렬화 형식의 문서로 변환합니다.
//!
//! | 표준 | tag | json | yaml |
//! |---|---|---|---|
//! | SPDX 2.3 | O | O | O |
//! | CycloneDX 1.5 | json으로 대체 | O | json으로 대체 |

pub mod cyclonedx;
pub mod dot;
pub mod spdx;
pub mod util;

use tracing::warn;

use crate::error::SbomScannerError;
use crate::index::PackageIndex;
use crate::types::{PackageKey, RelationshipEdge, SbomDocument, SbomFormat, SbomType};

/// 직렬화기가 소비하는 SBOM 입력
#[derive(Debug, Clone, Copy)]
pub struct SbomInput<'a> {
    /// 문서 이름 (루트 애플리케이션 이름 또는 lockfile 이름)
    pub name: &'a str,
    /// 패키지 인덱스
    pub index: &'a PackageIndex,
    /// 관계 목록
    pub relationships: &'a [RelationshipEdge],
    /// `DESCRIBES` 대상 루트 패키지
    pub root: Option<&'a PackageKey>,
}

/// SBOM 생성기
#[derive(Debug, Clone, Copy)]
pub struct SbomGenerator {
    sbom_type: SbomType,
    format: SbomFormat,
}

impl SbomGenerator {
    /// 생성기를 생성합니다.
    ///
    /// CycloneDX는 JSON만 지원하므로 다른 형식 요청은 JSON으로 대체됩니다.
    pub fn new(sbom_type: SbomType, format: SbomFormat) -> Self {
        let format = match (sbom_type, format) {
            (SbomType::CycloneDx, SbomFormat::Tag | SbomFormat::Yaml) => {
                warn!(requested = %format, "CycloneDX only supports json, using json");
                SbomFormat::Json
            }
            (_, format) => format,
        };
        Self { sbom_type, format }
    }

    /// SBOM 표준
    pub fn sbom_type(&self) -> SbomType {
        self.sbom_type
    }

    /// 실제 사용되는 직렬화 형식
    pub fn format(&self) -> SbomFormat {
        self.format
    }

    /// SBOM 문서를 생성합니다.
    pub fn generate(&self, input: &SbomInput<'_>) -> Result<SbomDocument, SbomScannerError> {
        match self.sbom_type {
            SbomType::Spdx => spdx::generate(input, self.format),
            SbomType::CycloneDx => cyclonedx::generate(input),
        }
    }
}
