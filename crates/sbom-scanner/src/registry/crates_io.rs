//! crates.io 레지스트리 클라이언트
//!
//! 두 개의 엔드포인트를 조회합니다.
//!
//! - `GET {url}/api/v1/crates/{name}`: 설명, 홈페이지
//! - `GET {url}/api/v1/crates/{name}/{version}`: 체크섬, 라이선스, 게시자, 다운로드 경로
//!
//! crates.io는 식별 가능한 `User-Agent` 헤더가 없는 요청을 거부하므로
//! 클라이언트 생성 시 반드시 지정합니다.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SbomScannerError;
use crate::registry::{RegistryClient, RegistryMetadata};

/// `/api/v1/crates/{name}` 응답
#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
}

/// `/api/v1/crates/{name}/{version}` 응답
#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: VersionInfo,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(default)]
    checksum: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    dl_path: Option<String>,
    #[serde(default)]
    published_by: Option<Publisher>,
}

#[derive(Debug, Deserialize)]
struct Publisher {
    #[serde(default)]
    login: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// crates.io HTTP 클라이언트
#[derive(Debug, Clone)]
pub struct CratesIoClient {
    client: Client,
    base_url: String,
}

impl CratesIoClient {
    /// 새 클라이언트를 생성합니다.
    ///
    /// # Errors
    ///
    /// HTTP 클라이언트 생성 실패 시 `SbomScannerError::Config`
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SbomScannerError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| SbomScannerError::Config {
                field: "registry".to_owned(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// 기본 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// JSON GET 요청. 404는 `Ok(None)`입니다.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
    ) -> Result<Option<T>, SbomScannerError> {
        let registry_err = |reason: String| SbomScannerError::Registry {
            package: package.to_owned(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| registry_err(format!("GET {url}: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(url, "registry returned 404");
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|e| registry_err(format!("GET {url}: {e}")))?;

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| registry_err(format!("GET {url}: invalid response body: {e}")))
    }
}

impl RegistryClient for CratesIoClient {
    fn fetch(
        &self,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<Option<RegistryMetadata>, SbomScannerError>> + Send {
        let package = format!("{name}@{version}");
        let crate_url = format!("{}/api/v1/crates/{name}", self.base_url);
        let version_url = format!("{}/api/v1/crates/{name}/{version}", self.base_url);

        async move {
            let Some(krate) = self.get_json::<CrateResponse>(&crate_url, &package).await? else {
                return Ok(None);
            };
            let version = self
                .get_json::<VersionResponse>(&version_url, &package)
                .await?;

            Ok(Some(merge_responses(&self.base_url, krate, version)))
        }
    }
}

/// 두 응답을 [`RegistryMetadata`]로 합칩니다.
///
/// 버전 응답이 없으면 crate 수준 필드만 채웁니다.
fn merge_responses(
    base_url: &str,
    krate: CrateResponse,
    version: Option<VersionResponse>,
) -> RegistryMetadata {
    let mut metadata = RegistryMetadata {
        description: non_empty(krate.krate.description),
        homepage: non_empty(krate.krate.homepage),
        ..Default::default()
    };

    if let Some(VersionResponse { version }) = version {
        metadata.checksum = non_empty(version.checksum);
        metadata.license = non_empty(version.license);
        metadata.download_location = non_empty(version.dl_path).map(|path| {
            if path.starts_with("http://") || path.starts_with("https://") {
                path
            } else {
                format!("{base_url}{path}")
            }
        });
        metadata.originator = version
            .published_by
            .and_then(|p| non_empty(p.name).or(non_empty(p.login)));
    }

    metadata
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
