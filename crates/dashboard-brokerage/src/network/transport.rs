//! Endpoint 기술자 실행기.
//!
//! `Endpoint`를 받아 실제 HTTP 호출을 수행하고 JSON 응답을
//! 기대 타입으로 디코딩합니다. 재시도나 백오프는 하지 않습니다.
//! 전송 실패는 즉시 에러로 반환됩니다.

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::endpoint::Endpoint;

/// 전송 계층 에러.
///
/// single-flight 토큰 재발급에서 실패를 모든 대기자에게 복제해야 하므로
/// `Clone` 가능해야 하고, 원인은 문자열로 평탄화합니다.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// URL 구성 실패
    #[error("잘못된 URL: {0}")]
    InvalidUrl(String),

    /// 네트워크 연결 실패
    #[error("네트워크 오류: {0}")]
    Network(String),

    /// 2xx가 아닌 HTTP 상태
    #[error("HTTP 상태 오류: {0}")]
    Status(u16),

    /// 응답 디코딩 실패
    #[error("응답 디코딩 실패: {0}")]
    Decode(String),
}

/// HTTP 실행기.
///
/// `reqwest::Client`는 내부적으로 커넥션 풀을 공유하므로
/// clone 비용이 저렴합니다.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// 기본 클라이언트로 생성.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// 기술자를 실행하고 응답을 `T`로 디코딩.
    ///
    /// # Errors
    ///
    /// - `TransportError::InvalidUrl`: URL 파싱 실패
    /// - `TransportError::Network`: 연결/전송 실패
    /// - `TransportError::Status`: 2xx가 아닌 상태 코드
    /// - `TransportError::Decode`: JSON 디코딩 실패 (응답 본문 포함)
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, TransportError> {
        let url = reqwest::Url::parse(&endpoint.url())
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        debug!(method = ?endpoint.method, %url, "API 요청");

        let mut builder = self.client.request(endpoint.method.as_reqwest(), url);

        if !endpoint.query.is_empty() {
            builder = builder.query(&endpoint.query);
        }
        for (key, value) in &endpoint.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &endpoint.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        serde_json::from_str::<T>(&text)
            .map_err(|e| TransportError::Decode(format!("{}. 본문: {}", e, text)))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}
