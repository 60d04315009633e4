//! 의존성 파일 파서 -- Cargo.lock
//!
//! [`LockfileParser`] trait은 lockfile 형식의 파서가 구현해야 하는 인터페이스입니다.
//! [`LockfileDetector`]는 의존성 디렉토리에서 lockfile 위치를 결정합니다.
//!
//! # 지원 형식
//!
//! - `Cargo.lock` (TOML, v1~v4) -- [`CargoLockParser`](cargo::CargoLockParser)
//!
//! # 확장
//!
//! 새로운 형식을 지원하려면 `LockfileParser` trait을 구현하고
//! `LockfileDetector`에 파일명을 등록합니다.

pub mod cargo;

use std::path::{Path, PathBuf};

use crate::error::SbomScannerError;
use crate::types::PackageDeclaration;

/// Lockfile 파서 trait
///
/// lockfile을 파싱하여 [`PackageDeclaration`] 목록을 파일 순서대로 반환합니다.
pub trait LockfileParser: Send + Sync {
    /// 주어진 경로의 파일을 이 파서가 처리할 수 있는지 확인합니다.
    ///
    /// 파일 이름 패턴으로 판별합니다 (예: "Cargo.lock").
    fn can_parse(&self, path: &Path) -> bool;

    /// lockfile 내용을 파싱하여 패키지 선언 목록을 반환합니다.
    ///
    /// # Arguments
    ///
    /// - `content`: lockfile 파일 내용 (UTF-8 문자열)
    /// - `source_path`: 원본 파일 경로 (에러 메시지용)
    fn parse(
        &self,
        content: &str,
        source_path: &str,
    ) -> Result<Vec<PackageDeclaration>, SbomScannerError>;
}

/// Lockfile 탐지기
///
/// 지정된 디렉토리의 직계 파일만 검사하며 재귀 탐색은 하지 않습니다.
pub struct LockfileDetector {
    /// 알려진 lockfile 파일명 목록 (우선순위 순)
    known_filenames: Vec<String>,
}

impl LockfileDetector {
    /// 기본 lockfile 패턴으로 탐지기를 생성합니다.
    pub fn new() -> Self {
        Self {
            known_filenames: vec!["Cargo.lock".to_owned()],
        }
    }

    /// 알려진 lockfile 파일명 목록을 반환합니다.
    pub fn known_filenames(&self) -> &[String] {
        &self.known_filenames
    }

    /// 주어진 경로가 알려진 lockfile인지 확인합니다.
    pub fn is_lockfile(&self, path: &Path) -> bool {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.known_filenames.iter().any(|known| known == file_name)
    }

    /// 디렉토리에서 lockfile을 찾습니다.
    ///
    /// 경로가 lockfile 자체를 가리키면 그대로 사용합니다.
    ///
    /// # Errors
    ///
    /// lockfile이 없으면 `SbomScannerError::InvalidModule`
    pub async fn locate(&self, dir: &Path) -> Result<PathBuf, SbomScannerError> {
        if self.is_lockfile(dir) && tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_file()) {
            return Ok(dir.to_path_buf());
        }

        for name in &self.known_filenames {
            let candidate = dir.join(name);
            match tokio::fs::metadata(&candidate).await {
                Ok(meta) if meta.is_file() => return Ok(candidate),
                _ => continue,
            }
        }

        Err(SbomScannerError::InvalidModule {
            path: dir.display().to_string(),
            reason: format!("no lockfile found (expected {})", self.known_filenames.join(", ")),
        })
    }
}

impl Default for LockfileDetector {
    fn default() -> Self {
        Self::new()
    }
}
