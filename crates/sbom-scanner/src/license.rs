//! 라이선스 정규화 -- 레지스트리 라이선스 문자열을 SPDX 식별자로 변환
//!
//! [`LicenseNormalizer`] trait은 정규화 서비스의 경계이며,
//! 기본 구현 [`SpdxLicenseNormalizer`]는 `spdx` 크레이트의 라이선스 목록을 사용합니다.
//! [`resolve_license`]는 정규화 결과를 선언/결론 라이선스와 설명으로 변환합니다.

use spdx::{Expression, LicenseItem, ParseMode};
use tracing::debug;

use crate::types::NOASSERTION;

/// 라이선스 정규화 서비스
pub trait LicenseNormalizer: Send + Sync {
    /// 원본 라이선스 문자열을 SPDX 식별자 또는 표현식으로 정규화합니다.
    ///
    /// 인식할 수 없으면 `NOASSERTION`을 반환합니다.
    fn find_license(&self, raw: &str) -> String;

    /// 식별자(또는 표현식 내 식별자)가 SPDX 목록에서 폐기되었는지 확인합니다.
    fn deprecated(&self, identifier: &str) -> bool;
}

/// `spdx` 크레이트 기반 정규화기
///
/// # 정규화 순서
///
/// 1. 유효한 식별자 또는 SPDX 표현식은 그대로 통과
/// 2. crates.io의 레거시 구분자 `/`를 ` OR `로 바꿔 재시도 (`MIT/Apache-2.0`)
/// 3. 부정확한 라이선스 이름 매핑 (`Apache 2.0` -> `Apache-2.0`)
/// 4. 그 외는 `NOASSERTION`
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdxLicenseNormalizer;

impl LicenseNormalizer for SpdxLicenseNormalizer {
    fn find_license(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NOASSERTION.to_owned();
        }

        if spdx::license_id(trimmed).is_some() || Expression::parse(trimmed).is_ok() {
            return trimmed.to_owned();
        }

        if trimmed.contains('/') {
            let rewritten = trimmed
                .split('/')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" OR ");
            if Expression::parse(&rewritten).is_ok() {
                return rewritten;
            }
        }

        match spdx::imprecise_license_id(trimmed) {
            Some((id, consumed)) if consumed == trimmed.len() => id.name.to_owned(),
            _ => NOASSERTION.to_owned(),
        }
    }

    fn deprecated(&self, identifier: &str) -> bool {
        if let Some(id) = spdx::license_id(identifier) {
            return id.is_deprecated();
        }

        match Expression::parse_mode(identifier, ParseMode::LAX) {
            Ok(expr) => expr.requirements().any(|er| match &er.req.license {
                LicenseItem::Spdx { id, .. } => id.is_deprecated(),
                _ => false,
            }),
            Err(_) => false,
        }
    }
}

/// 라이선스 해결 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseResolution {
    /// 선언 라이선스
    pub declared: String,
    /// 결론 라이선스
    pub concluded: String,
    /// 설명 (정규화되지 않았거나 폐기된 경우)
    pub comment: Option<String>,
}

impl LicenseResolution {
    /// 라이선스 정보가 없을 때의 결과
    pub fn no_assertion() -> Self {
        Self {
            declared: NOASSERTION.to_owned(),
            concluded: NOASSERTION.to_owned(),
            comment: None,
        }
    }
}

/// 패키지의 원본 라이선스 문자열로 선언/결론 라이선스를 결정합니다.
///
/// - 원본이 없으면 둘 다 `NOASSERTION`, 설명 없음
/// - 정규화 결과가 원본과 다르면 선언은 `NOASSERTION`, 결론은 정규화 결과, 설명 추가
/// - 결론 식별자가 폐기되었으면 폐기 설명을 이어 붙임
pub fn resolve_license(
    package_name: &str,
    raw: Option<&str>,
    normalizer: &dyn LicenseNormalizer,
) -> LicenseResolution {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return LicenseResolution::no_assertion();
    };

    let normalized = normalizer.find_license(raw);
    let mut comments: Vec<String> = Vec::new();

    let declared = if normalized == raw {
        raw.to_owned()
    } else {
        comments.push(format!(
            "{package_name} declares {raw} which is not currently a valid SPDX License identifier or expression."
        ));
        NOASSERTION.to_owned()
    };

    if normalized != NOASSERTION && normalizer.deprecated(&normalized) {
        comments.push(format!("{normalized} is now deprecated."));
    }

    let comment = if comments.is_empty() {
        None
    } else {
        let joined = comments.join(" ");
        debug!(package = package_name, comment = %joined, "license comment generated");
        Some(joined)
    };

    LicenseResolution {
        declared,
        concluded: normalized,
        comment,
    }
}
