//! 선언적 요청 기술자.
//!
//! API 호출 한 건을 네트워크 I/O 없이 값으로 기술합니다.
//! 호출마다 새로 생성되고 `HttpTransport`가 한 번 소비합니다.

use serde_json::Value;

/// HTTP 메서드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// reqwest 메서드로 변환.
    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// 요청 기술자.
///
/// base URL, 경로, 메서드, 쿼리, 헤더, 바디를 담는 불변 값 타입입니다.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// API base URL (예: "https://openapi.koreainvestment.com:9443")
    pub base_url: String,
    /// 경로 (예: "/oauth2/tokenP")
    pub path: String,
    /// HTTP 메서드
    pub method: HttpMethod,
    /// 쿼리 파라미터 (문자열로 직렬화된 상태)
    pub query: Vec<(String, String)>,
    /// 요청 헤더
    pub headers: Vec<(String, String)>,
    /// JSON 바디 (없으면 None)
    pub body: Option<Value>,
}

impl Endpoint {
    /// 새 기술자 생성.
    pub fn new(base_url: impl Into<String>, path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            method,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// 쿼리 파라미터 추가.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// 헤더 추가.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// JSON 바디 설정.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// 전체 URL 문자열.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_builder() {
        let ep = Endpoint::new("https://api.example.com", "/v1/balance", HttpMethod::Get)
            .with_query("CANO", "12345678")
            .with_header("tr_id", "TTTC8434R");

        assert_eq!(ep.url(), "https://api.example.com/v1/balance");
        assert_eq!(ep.query, vec![("CANO".to_string(), "12345678".to_string())]);
        assert_eq!(ep.headers[0].0, "tr_id");
        assert!(ep.body.is_none());
    }

    #[test]
    fn test_endpoint_with_body() {
        let ep = Endpoint::new("https://api.example.com", "/oauth2/tokenP", HttpMethod::Post)
            .with_body(json!({"grant_type": "client_credentials"}));

        assert_eq!(ep.method, HttpMethod::Post);
        assert_eq!(ep.body.unwrap()["grant_type"], "client_credentials");
    }
}
