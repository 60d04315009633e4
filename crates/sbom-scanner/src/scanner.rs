//! SBOM 스캐너 오케스트레이터 -- 전체 스캔 흐름 관리
//!
//! [`SbomScanner`]는 lockfile 탐색부터 메타데이터 보강까지의 단계를 순서대로 실행하고
//! 결과([`ScanResult`])를 SBOM 문서로 변환합니다.
//!
//! # 내부 아키텍처
//!
//! ```text
//! dependency_dir --> LockfileDetector --> LockfileParser --> Vec<PackageDeclaration>
//!                                                                   |
//!                                                              reconcile()
//!                                                                   |
//!                                            PackageIndex + Vec<RelationshipEdge>
//!                                                                   |
//!                                                  Enricher (RegistryClient, 병렬 조회)
//!                                                                   |
//!                                                              ScanResult
//!                                                                   |
//!                                              SbomGenerator (SPDX / CycloneDX), DOT
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::SbomScannerConfig;
use crate::enrich::{Enricher, EnrichmentSummary};
use crate::error::SbomScannerError;
use crate::index::PackageIndex;
use crate::license::{LicenseNormalizer, SpdxLicenseNormalizer};
use crate::parser::cargo::CargoLockParser;
use crate::parser::{LockfileDetector, LockfileParser};
use crate::reconcile::reconcile;
use crate::registry::{RegistryClient, StaticRegistry};
use crate::sbom::{SbomGenerator, SbomInput, dot};
use crate::types::{PackageKey, RelationshipEdge, RelationshipKind, SbomDocument};

/// 한 번의 스캔 결과
///
/// 패키지 인덱스와 관계 목록은 보강까지 끝난 최종 상태입니다.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// 스캔 고유 ID
    pub scan_id: String,
    /// 읽은 lockfile 경로
    pub source_file: String,
    /// 요청된 루트 애플리케이션 이름
    pub root_name: Option<String>,
    /// 실제 `DESCRIBES` 대상 (루트를 찾지 못하면 `None`)
    pub root: Option<PackageKey>,
    /// 패키지 인덱스
    pub index: PackageIndex,
    /// 관계 목록
    pub relationships: Vec<RelationshipEdge>,
    /// 버전 `NA`로 합성된 미해결 의존성
    pub unresolved: Vec<PackageKey>,
    /// 보강 집계 (레지스트리 비활성화 시 `None`)
    pub summary: Option<EnrichmentSummary>,
}

impl ScanResult {
    /// 패키지 수
    pub fn package_count(&self) -> usize {
        self.index.len()
    }

    /// `DEPENDS_ON` 엣지 수
    pub fn dependency_count(&self) -> usize {
        self.relationships
            .iter()
            .filter(|edge| edge.kind == RelationshipKind::DependsOn)
            .count()
    }

    /// SBOM 문서 이름: 루트 애플리케이션 이름, 없으면 lockfile 파일명
    pub fn document_name(&self) -> &str {
        match &self.root_name {
            Some(name) => name,
            None => Path::new(&self.source_file)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("Cargo.lock"),
        }
    }

    /// 직렬화기 입력으로 변환합니다.
    pub fn sbom_input(&self) -> SbomInput<'_> {
        SbomInput {
            name: self.document_name(),
            index: &self.index,
            relationships: &self.relationships,
            root: self.root.as_ref(),
        }
    }
}

/// SBOM 스캐너 오케스트레이터
///
/// 레지스트리 조회가 비활성화되어 있으면 보강 단계를 건너뛰고
/// 모든 공급자/라이선스는 `NOASSERTION`으로 남습니다.
pub struct SbomScanner<R: RegistryClient = StaticRegistry> {
    /// 스캐너 설정
    config: SbomScannerConfig,
    /// lockfile 탐지기
    detector: LockfileDetector,
    /// lockfile 파서 목록
    parsers: Vec<Box<dyn LockfileParser>>,
    /// 메타데이터 보강기 (레지스트리 비활성화 시 `None`)
    enricher: Option<Enricher<R>>,
    /// SBOM 생성기
    generator: SbomGenerator,
}

impl<R: RegistryClient> SbomScanner<R> {
    /// 스캐너 설정
    pub fn config(&self) -> &SbomScannerConfig {
        &self.config
    }

    /// SBOM 생성기
    pub fn generator(&self) -> &SbomGenerator {
        &self.generator
    }

    /// 레지스트리 보강 활성화 여부
    pub fn is_enrichment_enabled(&self) -> bool {
        self.enricher.is_some()
    }

    /// 스캔을 수행합니다.
    ///
    /// # Errors
    ///
    /// - lockfile 없음/파싱 실패/빈 lockfile, 선언되지 않은 루트 애플리케이션: `InvalidModule`, `LockfileParse`
    /// - 크기 제한 초과: `FileTooBig`, `TooManyPackages`
    /// - 읽기 실패: `Io`
    ///
    /// 미해결 의존성과 레지스트리 실패는 에러가 아니며 결과에 집계됩니다.
    pub async fn scan(&self) -> Result<ScanResult, SbomScannerError> {
        let dir = Path::new(&self.config.dependency_dir);
        let lockfile = self.detector.locate(dir).await?;
        let path = lockfile.display().to_string();
        debug!(path = %path, "lockfile located");

        let content = read_lockfile(&lockfile, self.config.max_file_size).await?;

        let parser = self
            .parsers
            .iter()
            .find(|p| p.can_parse(&lockfile))
            .ok_or_else(|| SbomScannerError::InvalidModule {
                path: path.clone(),
                reason: "no parser for lockfile".to_owned(),
            })?;

        let declarations = parser.parse(&content, &path)?;
        if declarations.len() > self.config.max_packages {
            return Err(SbomScannerError::TooManyPackages {
                path,
                count: declarations.len(),
                max: self.config.max_packages,
            });
        }

        let root_name = self.config.application_name();
        let reconciliation = reconcile(&declarations, root_name).map_err(|e| match e {
            SbomScannerError::InvalidModule { reason, .. } => SbomScannerError::InvalidModule {
                path: path.clone(),
                reason,
            },
            other => other,
        })?;

        let mut index = reconciliation.index;
        let summary = match &self.enricher {
            Some(enricher) => Some(enricher.enrich(&mut index).await),
            None => {
                debug!("registry lookups disabled, skipping enrichment");
                None
            }
        };

        if !reconciliation.unresolved.is_empty() {
            debug!(
                count = reconciliation.unresolved.len(),
                "dependencies without a package declaration were recorded with version NA"
            );
        }

        let result = ScanResult {
            scan_id: uuid::Uuid::new_v4().to_string(),
            source_file: path,
            root_name: root_name.map(str::to_owned),
            root: reconciliation.root,
            index,
            relationships: reconciliation.relationships,
            unresolved: reconciliation.unresolved,
            summary,
        };

        info!(
            path = %result.source_file,
            packages = result.package_count(),
            dependencies = result.dependency_count(),
            unresolved = result.unresolved.len(),
            "scan completed"
        );

        Ok(result)
    }

    /// 스캔 결과에서 SBOM 문서를 생성합니다.
    pub fn generate(&self, result: &ScanResult) -> Result<SbomDocument, SbomScannerError> {
        let doc = self.generator.generate(&result.sbom_input())?;
        info!(
            sbom_type = %doc.sbom_type,
            format = %doc.format,
            components = doc.component_count,
            "SBOM generated"
        );
        Ok(doc)
    }

    /// 스캔 결과의 의존성 그래프를 DOT 형식으로 렌더링합니다.
    pub fn render_graph(&self, result: &ScanResult) -> String {
        dot::render(&result.sbom_input())
    }
}

/// lockfile을 크기 제한 내에서 읽습니다.
async fn read_lockfile(path: &Path, max_file_size: usize) -> Result<String, SbomScannerError> {
    let io_err = |source: std::io::Error| SbomScannerError::Io {
        path: path.display().to_string(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > max_file_size {
        return Err(SbomScannerError::FileTooBig {
            path: path.display().to_string(),
            size,
            max: max_file_size,
        });
    }

    tokio::fs::read_to_string(path).await.map_err(io_err)
}

/// SBOM 스캐너 빌더
///
/// 레지스트리를 지정하지 않으면 빈 [`StaticRegistry`]가 사용됩니다.
pub struct SbomScannerBuilder<R: RegistryClient = StaticRegistry> {
    config: SbomScannerConfig,
    registry: R,
    normalizer: Arc<dyn LicenseNormalizer>,
}

impl SbomScannerBuilder<StaticRegistry> {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: SbomScannerConfig::default(),
            registry: StaticRegistry::new(),
            normalizer: Arc::new(SpdxLicenseNormalizer),
        }
    }
}

impl Default for SbomScannerBuilder<StaticRegistry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RegistryClient> SbomScannerBuilder<R> {
    /// 스캐너 설정을 지정합니다.
    pub fn config(mut self, config: SbomScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// 레지스트리 클라이언트를 지정합니다.
    pub fn registry<R2: RegistryClient>(self, registry: R2) -> SbomScannerBuilder<R2> {
        SbomScannerBuilder {
            config: self.config,
            registry,
            normalizer: self.normalizer,
        }
    }

    /// 라이선스 정규화기를 지정합니다.
    pub fn normalizer(mut self, normalizer: Arc<dyn LicenseNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// 스캐너를 빌드합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패 시 `SbomScannerError::Config`
    pub fn build(self) -> Result<SbomScanner<R>, SbomScannerError> {
        self.config.validate()?;

        let enricher = self.config.registry_enabled.then(|| {
            Enricher::new(Arc::new(self.registry), self.normalizer)
                .concurrency(self.config.concurrency)
                .timeout(self.config.timeout())
        });

        let parsers: Vec<Box<dyn LockfileParser>> = vec![Box::new(CargoLockParser)];
        let generator = SbomGenerator::new(self.config.sbom_type, self.config.format);

        Ok(SbomScanner {
            config: self.config,
            detector: LockfileDetector::new(),
            parsers,
            enricher,
            generator,
        })
    }
}
