//! 레지스트리 메타데이터 조회 추상화
//!
//! [`RegistryClient`] trait은 패키지 메타데이터 서비스의 경계입니다.
//! 운영 환경에서는 [`CratesIoClient`](crates_io::CratesIoClient)를,
//! 오프라인 실행과 테스트에서는 [`StaticRegistry`]를 사용합니다.
//!
//! ```text
//!   ┌──────────┐
//!   │ Enricher │
//!   └────┬─────┘
//!        ▼
//!  ┌──────────────┐
//!  │RegistryClient│ (trait)
//!  └──────────────┘
//!      │        │
//!      ▼        ▼
//!  ┌────────┐ ┌──────┐
//!  │CratesIo│ │Static│
//!  └───┬────┘ └──────┘
//!      ▼
//!   crates.io
//! ```

pub mod crates_io;

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::SbomScannerError;
use crate::types::PackageKey;

/// 레지스트리가 반환하는 패키지 메타데이터
///
/// 각 필드는 독립적으로 누락될 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMetadata {
    /// SHA-256 체크섬
    pub checksum: Option<String>,
    /// 게시자 자유 텍스트 (예: `Jane Smith <jane@example.com>`)
    pub originator: Option<String>,
    /// 패키지 설명
    pub description: Option<String>,
    /// 라이선스 원본 문자열
    pub license: Option<String>,
    /// 홈페이지 URL
    pub homepage: Option<String>,
    /// 다운로드 URL
    pub download_location: Option<String>,
}

impl RegistryMetadata {
    /// 비어 있는 필드 이름 목록 (디버그 로그용)
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.checksum.is_none() {
            missing.push("checksum");
        }
        if self.originator.is_none() {
            missing.push("originator");
        }
        if self.description.is_none() {
            missing.push("description");
        }
        if self.license.is_none() {
            missing.push("license");
        }
        if self.homepage.is_none() {
            missing.push("homepage");
        }
        if self.download_location.is_none() {
            missing.push("download_location");
        }
        missing
    }
}

/// 패키지 메타데이터 조회 trait
///
/// `Send + Sync + 'static`이므로 `Arc`로 감싸 여러 태스크에서 공유할 수 있습니다.
///
/// # 반환값
///
/// - `Ok(Some(_))`: 메타데이터 조회 성공 (일부 필드는 비어 있을 수 있음)
/// - `Ok(None)`: 레지스트리에 없는 패키지
/// - `Err(SbomScannerError::Registry)`: 네트워크/응답 오류
pub trait RegistryClient: Send + Sync + 'static {
    /// `(name, version)` 패키지의 메타데이터를 조회합니다.
    fn fetch(
        &self,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<Option<RegistryMetadata>, SbomScannerError>> + Send;
}

/// 메모리 내 레지스트리
///
/// 등록되지 않은 패키지는 항상 `Ok(None)`입니다.
/// 비어 있는 인스턴스는 오프라인 모드에서 사용됩니다.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: HashMap<PackageKey, RegistryMetadata>,
}

impl StaticRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 메타데이터를 추가합니다.
    pub fn with(mut self, name: &str, version: &str, metadata: RegistryMetadata) -> Self {
        self.insert(name, version, metadata);
        self
    }

    /// 메타데이터를 추가합니다.
    pub fn insert(&mut self, name: &str, version: &str, metadata: RegistryMetadata) {
        self.entries.insert(PackageKey::new(name, version), metadata);
    }

    /// 등록된 항목 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RegistryClient for StaticRegistry {
    fn fetch(
        &self,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<Option<RegistryMetadata>, SbomScannerError>> + Send {
        let found = self.entries.get(&PackageKey::new(name, version)).cloned();
        async move { Ok(found) }
    }
}
