//! SBOM 생성 유틸리티 -- 공유 헬퍼 함수

use std::collections::{HashMap, HashSet};

use crate::index::PackageIndex;
use crate::types::PackageKey;

/// 생성 도구 이름 (문서 creator/tools 항목)
pub const TOOL_NAME: &str = "rustbom";

/// 생성 도구 버전
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 현재 UTC 시각을 RFC3339 형식 (`YYYY-MM-DDTHH:MM:SSZ`)으로 반환합니다.
pub fn current_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// SPDX ID에 허용되지 않는 문자를 `-`로 치환합니다.
///
/// SPDX ID는 `[A-Za-z0-9.-]`만 허용합니다.
pub fn sanitize_spdx_id(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// 인덱스의 모든 패키지에 결정론적이고 서로 다른 SPDX ID를 부여합니다.
///
/// 기본 형식은 `SPDXRef-Package-{name}-{version}`이며, 치환 결과가 겹치면
/// (`foo_bar`와 `foo-bar`) 등록 순서상 뒤의 패키지에 `-2`, `-3` 접미사를 붙입니다.
pub fn assign_spdx_ids(index: &PackageIndex) -> HashMap<PackageKey, String> {
    let mut ids = HashMap::with_capacity(index.len());
    let mut used: HashSet<String> = HashSet::with_capacity(index.len());

    for record in index.iter() {
        let base = format!(
            "SPDXRef-Package-{}-{}",
            sanitize_spdx_id(&record.name),
            sanitize_spdx_id(&record.version)
        );
        let mut candidate = base.clone();
        let mut suffix = 2;
        while used.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        used.insert(candidate.clone());
        ids.insert(record.key(), candidate);
    }

    ids
}
