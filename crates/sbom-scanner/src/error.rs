//! SBOM 스캐너 에러 타입
//!
//! [`SbomScannerError`]는 SBOM 스캐너 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<SbomScannerError> for RustbomError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **Lockfile 파싱**: `LockfileParse`
//! - **모듈 무효**: `InvalidModule`, `TooManyPackages`
//! - **SBOM 생성**: `SbomGeneration`
//! - **레지스트리 조회**: `Registry`
//! - **설정**: `Config`
//! - **파일 I/O**: `Io`, `FileTooBig`
//!
//! 미해결 의존성, 누락된 메타데이터, 레지스트리 조회 실패는 에러가 아니라
//! 로그와 카운터로 처리됩니다. `Registry` 변형은 [`RegistryClient`](crate::registry::RegistryClient)
//! 구현체 내부에서만 반환되고 enrichment 단계에서 흡수됩니다.

use rustbom_core::error::{ConfigError, RustbomError, SbomError};

/// SBOM 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SbomScannerError {
    /// Lockfile 파싱 실패
    #[error("lockfile parse error: {path}: {reason}")]
    LockfileParse {
        /// 파싱 대상 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// lockfile이 없거나 패키지가 하나도 없음
    #[error("module invalid: {path}: {reason}")]
    InvalidModule {
        /// 대상 경로
        path: String,
        /// 무효 사유
        reason: String,
    },

    /// 패키지 수 상한 초과
    #[error("too many packages: {path}: {count} (max: {max})")]
    TooManyPackages {
        /// lockfile 경로
        path: String,
        /// 실제 패키지 수
        count: usize,
        /// 최대 허용 수
        max: usize,
    },

    /// SBOM 문서 생성 실패
    #[error("sbom generation error: {0}")]
    SbomGeneration(String),

    /// 레지스트리 조회 실패
    #[error("registry error: {package}: {reason}")]
    Registry {
        /// 조회 대상 패키지 (`name@version`)
        package: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 파일 크기 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 파일 경로
        path: String,
        /// 실제 파일 크기 (바이트)
        size: usize,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },
}

impl SbomScannerError {
    /// 실행을 중단시키는 "모듈 무효" 조건인지 여부
    ///
    /// lockfile 부재, 빈 lockfile, 파싱 불가, 크기/개수 초과가 해당합니다.
    pub fn is_invalid_module(&self) -> bool {
        matches!(
            self,
            Self::InvalidModule { .. }
                | Self::LockfileParse { .. }
                | Self::TooManyPackages { .. }
                | Self::FileTooBig { .. }
        )
    }
}

impl From<SbomScannerError> for RustbomError {
    fn from(err: SbomScannerError) -> Self {
        match err {
            SbomScannerError::LockfileParse { path, reason } => RustbomError::Sbom(
                SbomError::ParseFailed(format!("lockfile parse error: {path}: {reason}")),
            ),
            SbomScannerError::InvalidModule { path, reason } => {
                RustbomError::Sbom(SbomError::InvalidModule(format!("{path}: {reason}")))
            }
            SbomScannerError::TooManyPackages { path, count, max } => RustbomError::Sbom(
                SbomError::InvalidModule(format!("{path}: {count} packages (max: {max})")),
            ),
            SbomScannerError::SbomGeneration(msg) => {
                RustbomError::Sbom(SbomError::Generation(msg))
            }
            SbomScannerError::Registry { package, reason } => {
                RustbomError::Sbom(SbomError::Registry(format!("{package}: {reason}")))
            }
            SbomScannerError::Config { field, reason } => {
                RustbomError::Config(ConfigError::InvalidValue { field, reason })
            }
            SbomScannerError::Io { source, .. } => RustbomError::Io(source),
            SbomScannerError::FileTooBig { path, size, max } => {
                RustbomError::Sbom(SbomError::InvalidModule(format!(
                    "file too large: {path}: {size} bytes (max: {max})"
                )))
            }
        }
    }
}
