//! 설정 관리 — rustbom.toml 파싱 및 런타임 설정
//!
//! [`RustbomConfig`]는 CLI와 스캐너가 공유하는 최상위 설정 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`RUSTBOM_REGISTRY_TIMEOUT_SECS=5` 형식)
//! 3. 설정 파일 (`rustbom.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), rustbom_core::error::RustbomError> {
//! use rustbom_core::config::RustbomConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = RustbomConfig::load("rustbom.toml").await?;
//!
//! // 파일이 없으면 기본값 사용
//! let config = RustbomConfig::load_optional("rustbom.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = RustbomConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, RustbomError};

/// 허용되는 로그 레벨
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// 허용되는 로그 형식
pub const LOG_FORMATS: [&str; 2] = ["json", "pretty"];
/// 허용되는 SBOM 표준
pub const SBOM_TYPES: [&str; 2] = ["spdx", "cyclonedx"];
/// 허용되는 직렬화 형식
pub const SBOM_FORMATS: [&str; 3] = ["tag", "json", "yaml"];

/// rustbom 통합 설정
///
/// `rustbom.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RustbomConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// lockfile 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
    /// 레지스트리 메타데이터 조회 설정
    #[serde(default)]
    pub registry: RegistryConfig,
    /// SBOM 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
}

impl RustbomConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RustbomError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값으로 대체하여 로드합니다.
    ///
    /// 파일이 존재하지만 파싱에 실패하면 에러를 반환합니다.
    pub async fn load_optional(path: impl AsRef<Path>) -> Result<Self, RustbomError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(RustbomError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RustbomError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RustbomError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RustbomError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, RustbomError> {
        toml::from_str(toml_str).map_err(|e| {
            RustbomError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `RUSTBOM_{SECTION}_{FIELD}`
    /// 예: `RUSTBOM_OUTPUT_SBOM_TYPE=cyclonedx`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "RUSTBOM_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "RUSTBOM_GENERAL_LOG_FORMAT");

        // Scan
        override_string(&mut self.scan.dependency_dir, "RUSTBOM_SCAN_DEPENDENCY_DIR");
        override_string(&mut self.scan.application, "RUSTBOM_SCAN_APPLICATION");
        override_usize(&mut self.scan.max_file_size, "RUSTBOM_SCAN_MAX_FILE_SIZE");
        override_usize(&mut self.scan.max_packages, "RUSTBOM_SCAN_MAX_PACKAGES");

        // Registry
        override_bool(&mut self.registry.enabled, "RUSTBOM_REGISTRY_ENABLED");
        override_string(&mut self.registry.url, "RUSTBOM_REGISTRY_URL");
        override_string(&mut self.registry.user_agent, "RUSTBOM_REGISTRY_USER_AGENT");
        override_u64(&mut self.registry.timeout_secs, "RUSTBOM_REGISTRY_TIMEOUT_SECS");
        override_usize(&mut self.registry.concurrency, "RUSTBOM_REGISTRY_CONCURRENCY");

        // Output
        override_string(&mut self.output.sbom_type, "RUSTBOM_OUTPUT_SBOM_TYPE");
        override_string(&mut self.output.format, "RUSTBOM_OUTPUT_FORMAT");
        override_string(&mut self.output.file, "RUSTBOM_OUTPUT_FILE");
        override_string(&mut self.output.graph_file, "RUSTBOM_OUTPUT_GRAPH_FILE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), RustbomError> {
        check_one_of("general.log_level", &self.general.log_level, &LOG_LEVELS)?;
        check_one_of("general.log_format", &self.general.log_format, &LOG_FORMATS)?;
        check_one_of("output.sbom_type", &self.output.sbom_type, &SBOM_TYPES)?;
        check_one_of("output.format", &self.output.format, &SBOM_FORMATS)?;

        if self.scan.dependency_dir.is_empty() {
            return Err(invalid("scan.dependency_dir", "must not be empty"));
        }

        if self.scan.max_file_size == 0 {
            return Err(invalid("scan.max_file_size", "must be greater than 0"));
        }

        if self.scan.max_packages == 0 {
            return Err(invalid("scan.max_packages", "must be greater than 0"));
        }

        // 레지스트리 설정은 조회가 활성화된 경우에만 검증
        if self.registry.enabled {
            if !self.registry.url.starts_with("http://") && !self.registry.url.starts_with("https://")
            {
                return Err(invalid("registry.url", "must start with http:// or https://"));
            }

            if self.registry.user_agent.trim().is_empty() {
                return Err(invalid("registry.user_agent", "must not be empty"));
            }

            if self.registry.timeout_secs == 0 {
                return Err(invalid("registry.timeout_secs", "must be greater than 0"));
            }

            if self.registry.concurrency == 0 {
                return Err(invalid("registry.concurrency", "must be greater than 0"));
            }
        }

        Ok(())
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), RustbomError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be one of: {}", allowed.join(", "))))
    }
}

fn invalid(field: &str, reason: &str) -> RustbomError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "error".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// lockfile 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Cargo.lock이 위치한 디렉토리
    pub dependency_dir: String,
    /// 루트 애플리케이션 이름 (CLI `--application`으로 덮어씀)
    pub application: String,
    /// lockfile 최대 허용 크기 (바이트)
    pub max_file_size: usize,
    /// 최대 허용 패키지 수
    pub max_packages: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dependency_dir: ".".to_owned(),
            application: String::new(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            max_packages: 50_000,
        }
    }
}

/// 레지스트리 메타데이터 조회 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 조회 활성화 여부 (false면 오프라인 모드)
    pub enabled: bool,
    /// 레지스트리 기본 URL
    pub url: String,
    /// HTTP User-Agent (crates.io는 식별 가능한 값을 요구)
    pub user_agent: String,
    /// 패키지당 조회 타임아웃 (초)
    pub timeout_secs: u64,
    /// 동시 조회 수 상한
    pub concurrency: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://crates.io".to_owned(),
            user_agent: concat!("rustbom/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout_secs: 10,
            concurrency: 8,
        }
    }
}

/// SBOM 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// SBOM 표준 (spdx, cyclonedx)
    pub sbom_type: String,
    /// 직렬화 형식 (tag, json, yaml)
    pub format: String,
    /// 출력 파일 경로 (비어 있으면 stdout)
    pub file: String,
    /// 의존성 그래프(DOT) 파일 경로 (비어 있으면 생성하지 않음)
    pub graph_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sbom_type: "spdx".to_owned(),
            format: "tag".to_owned(),
            file: String::new(),
            graph_file: String::new(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = RustbomConfig::default();
        assert_eq!(config.general.log_level, "error");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.scan.dependency_dir, ".");
        assert!(config.scan.application.is_empty());
        assert!(config.registry.enabled);
        assert_eq!(config.registry.url, "https://crates.io");
        assert!(config.registry.user_agent.starts_with("rustbom/"));
        assert_eq!(config.output.sbom_type, "spdx");
        assert_eq!(config.output.format, "tag");
    }

    #[test]
    fn default_config_passes_validation() {
        let config = RustbomConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = RustbomConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "error");
        assert_eq!(config.registry.concurrency, 8);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[scan]
application = "my-app"

[output]
sbom_type = "cyclonedx"
"#;
        let config = RustbomConfig::parse(toml).unwrap();
        assert_eq!(config.scan.application, "my-app");
        // dependency_dir는 기본값 유지
        assert_eq!(config.scan.dependency_dir, ".");
        assert_eq!(config.output.sbom_type, "cyclonedx");
        assert_eq!(config.output.format, "tag");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = RustbomConfig::parse("invalid = [[[toml");
        assert!(matches!(
            result,
            Err(RustbomError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = RustbomConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_unknown_sbom_type() {
        let mut config = RustbomConfig::default();
        config.output.sbom_type = "swid".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.sbom_type"));
    }

    #[test]
    fn validate_rejects_unknown_format() {
        let mut config = RustbomConfig::default();
        config.output.format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.format"));
    }

    #[test]
    fn validate_rejects_zero_timeout_when_enabled() {
        let mut config = RustbomConfig::default();
        config.registry.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn validate_skips_registry_checks_when_disabled() {
        let mut config = RustbomConfig::default();
        config.registry.enabled = false;
        config.registry.concurrency = 0;
        config.registry.url = String::new();
        // 오프라인 모드에서는 레지스트리 값 검증을 건너뜀
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_non_http_registry_url() {
        let mut config = RustbomConfig::default();
        config.registry.url = "ftp://crates.io".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_RUSTBOM_STR", "overridden") };
        override_string(&mut val, "TEST_RUSTBOM_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_RUSTBOM_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_RUSTBOM_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_RUSTBOM_BOOL_BAD");
        assert!(val); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_RUSTBOM_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_u64_valid() {
        let mut val = 10;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_RUSTBOM_U64", "42") };
        override_u64(&mut val, "TEST_RUSTBOM_U64");
        assert_eq!(val, 42);
        unsafe { std::env::remove_var("TEST_RUSTBOM_U64") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_RUSTBOM_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = RustbomConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = RustbomConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.registry.user_agent, parsed.registry.user_agent);
        assert_eq!(config.scan.max_packages, parsed.scan.max_packages);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = RustbomConfig::from_file("/nonexistent/path/rustbom.toml").await;
        assert!(matches!(
            result,
            Err(RustbomError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_optional_falls_back_to_defaults() {
        let config = RustbomConfig::load_optional("/nonexistent/path/rustbom.toml")
            .await
            .unwrap();
        assert_eq!(config.output.sbom_type, "spdx");
    }
}
