//! SBOM 스캐너 설정
//!
//! [`SbomScannerConfig`]는 core의 [`RustbomConfig`]에서 스캐너가 실제로 사용하는
//! 값만 추려 문자열 필드를 타입(`SbomType`, `SbomFormat`)으로 변환한 설정입니다.
//!
//! # 사용 예시
//!
//! ```
//! use rustbom_sbom_scanner::SbomScannerConfig;
//!
//! // 기본값으로 생성
//! let config = SbomScannerConfig::default();
//! config.validate().unwrap();
//!
//! // 빌더로 생성
//! use rustbom_sbom_scanner::SbomScannerConfigBuilder;
//!
//! let config = SbomScannerConfigBuilder::new()
//!     .application("my-app")
//!     .registry_enabled(false)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Component;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rustbom_core::config::RustbomConfig;

use crate::error::SbomScannerError;
use crate::types::{SbomFormat, SbomType};

/// SBOM 스캐너 설정
///
/// # 필드
///
/// - **dependency_dir**: `Cargo.lock`이 있는 디렉토리 (또는 lockfile 경로)
/// - **application**: 루트 애플리케이션 패키지 이름 (`DESCRIBES` 대상)
/// - **max_file_size** / **max_packages**: 입력 크기 제한
/// - **registry_***: 메타데이터 보강 설정
/// - **sbom_type** / **format**: 출력 문서 표준과 직렬화 형식
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SbomScannerConfig {
    /// lockfile 디렉토리
    pub dependency_dir: String,
    /// 루트 애플리케이션 이름 (비어 있으면 `DESCRIBES` 없음)
    pub application: String,
    /// lockfile 최대 허용 크기 (바이트)
    pub max_file_size: usize,
    /// 최대 허용 패키지 수
    pub max_packages: usize,
    /// 레지스트리 조회 여부
    pub registry_enabled: bool,
    /// 레지스트리 기본 URL
    pub registry_url: String,
    /// HTTP User-Agent
    pub user_agent: String,
    /// 조회당 타임아웃 (초)
    pub timeout_secs: u64,
    /// 동시 조회 수
    pub concurrency: usize,
    /// SBOM 표준
    pub sbom_type: SbomType,
    /// 직렬화 형식
    pub format: SbomFormat,
}

impl Default for SbomScannerConfig {
    fn default() -> Self {
        Self {
            dependency_dir: ".".to_owned(),
            application: String::new(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            max_packages: 50_000,
            registry_enabled: true,
            registry_url: "https://crates.io".to_owned(),
            user_agent: concat!("rustbom/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout_secs: 10,
            concurrency: 8,
            sbom_type: SbomType::Spdx,
            format: SbomFormat::Tag,
        }
    }
}

/// 설정 상한값 상수
const MAX_FILE_SIZE: usize = 100 * 1024 * 1024; // 100 MB
const MAX_PACKAGES_LIMIT: usize = 500_000;
const MAX_CONCURRENCY: usize = 256;
const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_PATH_LEN: usize = 4096;

impl SbomScannerConfig {
    /// core의 `RustbomConfig`에서 스캐너 설정을 생성합니다.
    ///
    /// 알 수 없는 표준/형식 문자열은 기본값(`spdx`, `tag`)으로 대체됩니다.
    /// core 설정은 로드 시 이미 검증되므로 일반적으로 발생하지 않습니다.
    pub fn from_core(core: &RustbomConfig) -> Self {
        let sbom_type = SbomType::from_str_loose(&core.output.sbom_type).unwrap_or(SbomType::Spdx);
        let format = SbomFormat::from_str_loose(&core.output.format).unwrap_or(SbomFormat::Tag);

        Self {
            dependency_dir: core.scan.dependency_dir.clone(),
            application: core.scan.application.clone(),
            max_file_size: core.scan.max_file_size,
            max_packages: core.scan.max_packages,
            registry_enabled: core.registry.enabled,
            registry_url: core.registry.url.clone(),
            user_agent: core.registry.user_agent.clone(),
            timeout_secs: core.registry.timeout_secs,
            concurrency: core.registry.concurrency,
            sbom_type,
            format,
        }
    }

    /// 조회 타임아웃
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 루트 애플리케이션 이름 (비어 있으면 `None`)
    pub fn application_name(&self) -> Option<&str> {
        let name = self.application.trim();
        (!name.is_empty()).then_some(name)
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `dependency_dir`: 비어 있지 않음, `..` 없음, 4096자 이하
    /// - `max_file_size`: 1-104857600 (100MB)
    /// - `max_packages`: 1-500000
    /// - 레지스트리 활성화 시 `timeout_secs` 1-300, `concurrency` 1-256, `user_agent` 필수
    pub fn validate(&self) -> Result<(), SbomScannerError> {
        if self.dependency_dir.is_empty() {
            return Err(SbomScannerError::Config {
                field: "dependency_dir".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if std::path::Path::new(&self.dependency_dir)
            .components()
            .any(|c| c == Component::ParentDir)
        {
            return Err(SbomScannerError::Config {
                field: "dependency_dir".to_owned(),
                reason: format!(
                    "'{}' contains path traversal pattern '..'",
                    self.dependency_dir
                ),
            });
        }

        if self.dependency_dir.len() > MAX_PATH_LEN {
            return Err(SbomScannerError::Config {
                field: "dependency_dir".to_owned(),
                reason: format!("exceeds maximum length {MAX_PATH_LEN}"),
            });
        }

        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE {
            return Err(SbomScannerError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            });
        }

        if self.max_packages == 0 || self.max_packages > MAX_PACKAGES_LIMIT {
            return Err(SbomScannerError::Config {
                field: "max_packages".to_owned(),
                reason: format!("must be 1-{MAX_PACKAGES_LIMIT}"),
            });
        }

        if self.registry_enabled {
            if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
                return Err(SbomScannerError::Config {
                    field: "timeout_secs".to_owned(),
                    reason: format!("must be 1-{MAX_TIMEOUT_SECS}"),
                });
            }

            if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
                return Err(SbomScannerError::Config {
                    field: "concurrency".to_owned(),
                    reason: format!("must be 1-{MAX_CONCURRENCY}"),
                });
            }

            if self.user_agent.trim().is_empty() {
                return Err(SbomScannerError::Config {
                    field: "user_agent".to_owned(),
                    reason: "must not be empty when registry lookups are enabled".to_owned(),
                });
            }
        }

        Ok(())
    }
}

/// [`SbomScannerConfig`] 빌더
///
/// 유연한 설정 구성 및 빌드 시 유효성 검증을 제공합니다.
#[derive(Default)]
pub struct SbomScannerConfigBuilder {
    config: SbomScannerConfig,
}

impl SbomScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기존 설정에서 시작합니다.
    pub fn from_config(config: SbomScannerConfig) -> Self {
        Self { config }
    }

    /// lockfile 디렉토리를 설정합니다.
    pub fn dependency_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.dependency_dir = dir.into();
        self
    }

    /// 루트 애플리케이션 이름을 설정합니다.
    pub fn application(mut self, name: impl Into<String>) -> Self {
        self.config.application = name.into();
        self
    }

    /// 최대 파일 크기(바이트)를 설정합니다.
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 최대 패키지 수를 설정합니다.
    pub fn max_packages(mut self, max: usize) -> Self {
        self.config.max_packages = max;
        self
    }

    /// 레지스트리 조회 여부를 설정합니다.
    pub fn registry_enabled(mut self, enabled: bool) -> Self {
        self.config.registry_enabled = enabled;
        self
    }

    /// 레지스트리 URL을 설정합니다.
    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.config.registry_url = url.into();
        self
    }

    /// 조회 타임아웃(초)을 설정합니다.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// 동시 조회 수를 설정합니다.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// SBOM 표준을 설정합니다.
    pub fn sbom_type(mut self, sbom_type: SbomType) -> Self {
        self.config.sbom_type = sbom_type;
        self
    }

    /// 직렬화 형식을 설정합니다.
    pub fn format(mut self, format: SbomFormat) -> Self {
        self.config.format = format;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `SbomScannerError::Config` 반환
    pub fn build(self) -> Result<SbomScannerConfig, SbomScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SbomScannerConfig::default();
        config.validate().unwrap();
        assert!(config.application_name().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn from_core_preserves_values() {
        let mut core = RustbomConfig::default();
        core.scan.dependency_dir = "/work/app".to_owned();
        core.scan.application = "my-app".to_owned();
        core.registry.enabled = false;
        core.registry.concurrency = 2;
        core.output.sbom_type = "cyclonedx".to_owned();
        core.output.format = "json".to_owned();

        let config = SbomScannerConfig::from_core(&core);
        assert_eq!(config.dependency_dir, "/work/app");
        assert_eq!(config.application_name(), Some("my-app"));
        assert!(!config.registry_enabled);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.sbom_type, SbomType::CycloneDx);
        assert_eq!(config.format, SbomFormat::Json);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn from_core_with_unknown_strings_falls_back() {
        let mut core = RustbomConfig::default();
        core.output.sbom_type = "unknown".to_owned();
        core.output.format = "xml".to_owned();
        let config = SbomScannerConfig::from_core(&core);
        assert_eq!(config.sbom_type, SbomType::Spdx);
        assert_eq!(config.format, SbomFormat::Tag);
    }

    #[test]
    fn whitespace_application_is_none() {
        let config = SbomScannerConfig {
            application: "   ".to_owned(),
            ..Default::default()
        };
        assert!(config.application_name().is_none());
    }

    #[test]
    fn validate_rejects_path_traversal() {
        let config = SbomScannerConfig {
            dependency_dir: "../outside".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_dependency_dir() {
        let config = SbomScannerConfig {
            dependency_dir: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let config = SbomScannerConfig {
            max_file_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_too_large_max_file_size() {
        let config = SbomScannerConfig {
            max_file_size: 200 * 1024 * 1024,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_max_packages() {
        let config = SbomScannerConfig {
            max_packages: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn registry_limits_only_checked_when_enabled() {
        let config = SbomScannerConfig {
            timeout_secs: 0,
            concurrency: 0,
            user_agent: String::new(),
            registry_enabled: false,
            ..Default::default()
        };
        config.validate().unwrap();

        let config = SbomScannerConfig {
            registry_enabled: true,
            ..config
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn builder_all_setters() {
        let config = SbomScannerConfigBuilder::new()
            .dependency_dir("/srv/app")
            .application("svc")
            .max_file_size(20 * 1024 * 1024)
            .max_packages(100_000)
            .registry_enabled(true)
            .registry_url("https://mirror.example.com")
            .timeout_secs(30)
            .concurrency(16)
            .sbom_type(SbomType::CycloneDx)
            .format(SbomFormat::Json)
            .build()
            .unwrap();

        assert_eq!(config.dependency_dir, "/srv/app");
        assert_eq!(config.application, "svc");
        assert_eq!(config.max_file_size, 20 * 1024 * 1024);
        assert_eq!(config.max_packages, 100_000);
        assert_eq!(config.registry_url, "https://mirror.example.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.sbom_type, SbomType::CycloneDx);
        assert_eq!(config.format, SbomFormat::Json);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = SbomScannerConfigBuilder::new().max_packages(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_from_config_keeps_values() {
        let base = SbomScannerConfig {
            application: "base".to_owned(),
            ..Default::default()
        };
        let config = SbomScannerConfigBuilder::from_config(base)
            .format(SbomFormat::Yaml)
            .build()
            .unwrap();
        assert_eq!(config.application, "base");
        assert_eq!(config.format, SbomFormat::Yaml);
    }
}
