//! Cargo.lock 파서
//!
//! [`CargoLockParser`]는 Cargo.lock (v1~v4) 파일을 파싱하여
//! [`PackageDeclaration`] 목록을 생성합니다.
//!
//! # Cargo.lock 형식 예시
//!
//! ```toml
//! version = 4
//!
//! [[package]]
//! name = "my-app"
//! version = "0.1.0"
//! dependencies = [
//!  "serde",
//!  "syn 2.0.72",
//! ]
//!
//! [[package]]
//! name = "serde"
//! version = "1.0.204"
//! source = "registry+https://github.com/rust-lang/crates.io-index"
//! checksum = "bc76f558e0cbb2a839d37354c575f1dc3fdc6546b5be373ba43d95f231bf7c12"
//! ```
//!
//! v1 lockfile은 체크섬을 `[metadata]` 테이블에 별도로 기록하지만,
//! 이 형식은 더 이상 생성되지 않으므로 패키지 항목의 `checksum`만 사용합니다.

use std::path::Path;

use serde::Deserialize;

use crate::error::SbomScannerError;
use crate::parser::LockfileParser;
use crate::types::{DependencySpec, PackageDeclaration};

/// Cargo.lock 파서
pub struct CargoLockParser;

/// Cargo.lock 구조 (파싱용)
#[derive(Deserialize)]
struct CargoLockFile {
    #[serde(default, rename = "version")]
    _version: Option<u32>,
    #[serde(default)]
    package: Vec<CargoPackageEntry>,
}

/// Cargo.lock 내 `[[package]]` 항목 (파싱용)
#[derive(Deserialize)]
struct CargoPackageEntry {
    name: String,
    version: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    checksum: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

impl LockfileParser for CargoLockParser {
    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == "Cargo.lock")
    }

    fn parse(
        &self,
        content: &str,
        source_path: &str,
    ) -> Result<Vec<PackageDeclaration>, SbomScannerError> {
        let lock_file: CargoLockFile =
            toml::from_str(content).map_err(|e| SbomScannerError::LockfileParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        lock_file
            .package
            .into_iter()
            .map(|entry| {
                let dependencies = entry
                    .dependencies
                    .iter()
                    .map(|raw| {
                        DependencySpec::parse(raw).ok_or_else(|| SbomScannerError::LockfileParse {
                            path: source_path.to_owned(),
                            reason: format!(
                                "package '{}': malformed dependency spec '{raw}'",
                                entry.name
                            ),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(PackageDeclaration {
                    name: entry.name,
                    version: entry.version,
                    source: entry.source,
                    checksum: entry.checksum,
                    dependencies,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CARGO_LOCK: &str = r#"
# This file is automatically @generated by Cargo.
version = 4

[[package]]
name = "my-app"
version = "0.1.0"
dependencies = [
 "serde",
 "windows-sys 0.52.0",
]

[[package]]
name = "serde"
version = "1.0.204"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "bc76f558e0cbb2a839d37354c575f1dc3fdc6546b5be373ba43d95f231bf7c12"

[[package]]
name = "windows-sys"
version = "0.52.0"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#;

    #[test]
    fn can_parse_cargo_lock() {
        let parser = CargoLockParser;
        assert!(parser.can_parse(Path::new("Cargo.lock")));
        assert!(parser.can_parse(Path::new("/project/Cargo.lock")));
        assert!(!parser.can_parse(Path::new("Cargo.toml")));
        assert!(!parser.can_parse(Path::new("package-lock.json")));
    }

    #[test]
    fn parse_sample_cargo_lock() {
        let parser = CargoLockParser;
        let decls = parser.parse(SAMPLE_CARGO_LOCK, "Cargo.lock").unwrap();

        assert_eq!(decls.len(), 3);
        // 파일 순서 유지
        assert_eq!(decls[0].name, "my-app");
        assert_eq!(decls[1].name, "serde");
        assert_eq!(decls[2].name, "windows-sys");

        assert_eq!(
            decls[0].dependencies,
            vec![
                DependencySpec::Bare("serde".to_owned()),
                DependencySpec::Versioned {
                    name: "windows-sys".to_owned(),
                    version: "0.52.0".to_owned(),
                },
            ]
        );
        assert!(decls[0].source.is_none());
        assert!(decls[0].checksum.is_none());
        assert!(decls[1].checksum.as_deref().is_some_and(|c| c.starts_with("bc76")));
    }

    #[test]
    fn parse_without_package_array_is_empty() {
        let parser = CargoLockParser;
        let decls = parser.parse("version = 4\n", "Cargo.lock").unwrap();
        assert!(decls.is_empty());
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let parser = CargoLockParser;
        let err = parser.parse("[[package]\nname = ", "Cargo.lock").unwrap_err();
        assert!(matches!(err, SbomScannerError::LockfileParse { .. }));
    }

    #[test]
    fn parse_missing_version_returns_error() {
        let parser = CargoLockParser;
        let toml = "[[package]]\nname = \"orphan\"\n";
        assert!(parser.parse(toml, "Cargo.lock").is_err());
    }

    #[test]
    fn parse_malformed_dependency_spec_returns_error() {
        let parser = CargoLockParser;
        let toml = r#"
[[package]]
name = "a"
version = "1.0.0"
dependencies = ["b 1.0 c d"]
"#;
        let err = parser.parse(toml, "Cargo.lock").unwrap_err();
        assert!(err.to_string().contains("malformed dependency spec"));
    }

    #[test]
    fn parse_source_qualified_dependency() {
        let parser = CargoLockParser;
        let toml = r#"
[[package]]
name = "a"
version = "1.0.0"
dependencies = ["b 2.0.0 (registry+https://github.com/rust-lang/crates.io-index)"]
"#;
        let decls = parser.parse(toml, "Cargo.lock").unwrap();
        assert_eq!(
            decls[0].dependencies[0],
            DependencySpec::Versioned {
                name: "b".to_owned(),
                version: "2.0.0".to_owned(),
            }
        );
    }
}
