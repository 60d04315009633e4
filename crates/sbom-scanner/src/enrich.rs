//! 메타데이터 보강 -- 레지스트리 조회 결과를 패키지 레코드에 병합
//!
//! [`Enricher`]는 조정이 끝난 인덱스의 모든 패키지에 대해 레지스트리를 병렬 조회하고,
//! 결과를 등록 순서대로 단일 작성자가 병합합니다.
//!
//! # 동시성
//!
//! - 조회 동시 실행 수는 `Semaphore`로 제한합니다.
//! - 각 조회는 `tokio::time::timeout`으로 감쌉니다.
//! - 조회 실패, 타임아웃, 미등록 패키지는 모두 "메타데이터 없음"으로 처리됩니다.
//! - git 출처 패키지는 조회하지 않습니다 ([`PackageSource::is_registry_lookup`](crate::types::PackageSource::is_registry_lookup)).
//!
//! # 병합 규칙
//!
//! - `checksum`: 레지스트리 값이 있을 때만 덮어씀 (lockfile 값 유지)
//! - `supplier`: originator 텍스트 분류 ([`classify_supplier`])
//! - 라이선스: [`resolve_license`]
//! - `homepage`, `download_location`, `summary`: 있으면 복사
//! - `purl`: 항상 로컬에서 계산된 값 유지

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::index::{PackageId, PackageIndex};
use crate::license::{LicenseNormalizer, resolve_license};
use crate::registry::{RegistryClient, RegistryMetadata};
use crate::supplier::classify_supplier;
use crate::types::{Checksum, PackageRecord};

/// 기본 동시 조회 수
pub const DEFAULT_CONCURRENCY: usize = 8;
/// 기본 조회 타임아웃
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 패키지 하나의 조회 결과
#[derive(Debug)]
enum LookupOutcome {
    Found(RegistryMetadata),
    NotFound,
    Failed(String),
    TimedOut,
}

/// 보강 단계 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    /// 메타데이터를 찾은 패키지 수
    pub found: usize,
    /// 레지스트리에 없는 패키지 수
    pub not_found: usize,
    /// 조회 오류 수
    pub failed: usize,
    /// 타임아웃 수
    pub timed_out: usize,
    /// 조회 대상이 아니어서 건너뛴 패키지 수
    pub skipped: usize,
}

impl EnrichmentSummary {
    /// 조회한 전체 패키지 수 (`skipped` 제외)
    pub fn total(&self) -> usize {
        self.found + self.not_found + self.failed + self.timed_out
    }
}

impl fmt::Display for EnrichmentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found={} not_found={} failed={} timed_out={} skipped={}",
            self.found, self.not_found, self.failed, self.timed_out, self.skipped
        )
    }
}

/// 메타데이터 보강기
pub struct Enricher<R: RegistryClient> {
    registry: Arc<R>,
    normalizer: Arc<dyn LicenseNormalizer>,
    concurrency: usize,
    timeout: Duration,
}

impl<R: RegistryClient> Enricher<R> {
    /// 기본 동시성/타임아웃으로 보강기를 생성합니다.
    pub fn new(registry: Arc<R>, normalizer: Arc<dyn LicenseNormalizer>) -> Self {
        Self {
            registry,
            normalizer,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// 동시 조회 수를 설정합니다 (최소 1).
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// 조회 타임아웃을 설정합니다.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 인덱스의 모든 패키지를 보강합니다.
    ///
    /// 조정이 끝난 뒤에만 호출해야 합니다. 에러를 반환하지 않으며
    /// 모든 조회 실패는 집계와 로그로만 남습니다.
    pub async fn enrich(&self, index: &mut PackageIndex) -> EnrichmentSummary {
        let targets: Vec<(PackageId, String, String, bool)> = index
            .entries()
            .map(|(id, record)| {
                (
                    id,
                    record.name.clone(),
                    record.version.clone(),
                    record.source.is_registry_lookup(),
                )
            })
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (slot, (_, name, version, lookup)) in targets.iter().enumerate() {
            if !lookup {
                continue;
            }
            let registry = Arc::clone(&self.registry);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.timeout;
            let name = name.clone();
            let version = version.clone();

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        match tokio::time::timeout(timeout, registry.fetch(&name, &version)).await
                        {
                            Ok(Ok(Some(metadata))) => LookupOutcome::Found(metadata),
                            Ok(Ok(None)) => LookupOutcome::NotFound,
                            Ok(Err(e)) => LookupOutcome::Failed(e.to_string()),
                            Err(_) => LookupOutcome::TimedOut,
                        }
                    }
                    Err(e) => LookupOutcome::Failed(format!("semaphore closed: {e}")),
                };
                (slot, outcome)
            });
        }

        let mut outcomes: Vec<Option<LookupOutcome>> = (0..targets.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcome)) => {
                    if let Some(entry) = outcomes.get_mut(slot) {
                        *entry = Some(outcome);
                    }
                }
                Err(e) => warn!(error = %e, "registry lookup task failed"),
            }
        }

        // 단일 작성자: 등록 순서대로 병합
        let mut summary = EnrichmentSummary::default();
        for ((id, name, version, lookup), outcome) in targets.into_iter().zip(outcomes) {
            let metadata = match outcome {
                None if !lookup => {
                    summary.skipped += 1;
                    debug!(name = %name, version = %version, "registry lookup skipped for non-registry source");
                    None
                }
                Some(LookupOutcome::Found(metadata)) => {
                    summary.found += 1;
                    Some(metadata)
                }
                Some(LookupOutcome::NotFound) => {
                    summary.not_found += 1;
                    debug!(name = %name, version = %version, "package not found in registry");
                    None
                }
                Some(LookupOutcome::Failed(reason)) => {
                    summary.failed += 1;
                    warn!(name = %name, version = %version, reason = %reason, "registry lookup failed");
                    None
                }
                Some(LookupOutcome::TimedOut) => {
                    summary.timed_out += 1;
                    warn!(
                        name = %name,
                        version = %version,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "registry lookup timed out"
                    );
                    None
                }
                None => {
                    summary.failed += 1;
                    None
                }
            };

            if let Some(record) = index.get_mut(id) {
                apply_metadata(record, metadata.as_ref(), self.normalizer.as_ref());
            }
        }

        info!(packages = summary.total(), %summary, "metadata enrichment completed");
        summary
    }
}

/// 레지스트리 메타데이터를 레코드에 병합합니다.
///
/// `metadata`가 `None`이면 공급자와 라이선스만 `NOASSERTION` 기본값으로 확정합니다.
pub fn apply_metadata(
    record: &mut PackageRecord,
    metadata: Option<&RegistryMetadata>,
    normalizer: &dyn LicenseNormalizer,
) {
    let Some(metadata) = metadata else {
        record.supplier = classify_supplier(None);
        let license = resolve_license(&record.name, None, normalizer);
        record.license_declared = license.declared;
        record.license_concluded = license.concluded;
        record.license_comment = license.comment;
        return;
    };

    let missing = metadata.missing_fields();
    if !missing.is_empty() {
        debug!(
            name = %record.name,
            version = %record.version,
            missing = ?missing,
            "registry metadata incomplete"
        );
    }

    if let Some(checksum) = &metadata.checksum {
        record.checksum = Some(Checksum::sha256(checksum.clone()));
    }

    record.supplier = classify_supplier(metadata.originator.as_deref());

    let license = resolve_license(&record.name, metadata.license.as_deref(), normalizer);
    record.license_declared = license.declared;
    record.license_concluded = license.concluded;
    record.license_comment = license.comment;

    if let Some(homepage) = &metadata.homepage {
        record.homepage = Some(homepage.clone());
    }
    if let Some(location) = &metadata.download_location {
        record.download_location = Some(location.clone());
    }
    if let Some(description) = &metadata.description {
        record.summary = Some(description.clone());
    }
}
