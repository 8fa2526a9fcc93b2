//! KIS API 클라이언트.
//!
//! 엔드포인트별로 토큰을 주입한 요청 기술자를 만들어 실행하고,
//! 응답의 상태 센티널(`rt_cd`)을 검사합니다. HTTP가 2xx여도
//! `rt_cd != "0"`이면 논리 실패이며, 업스트림 메시지를 그대로 담아
//! 에러로 반환합니다 (UI에서 원문 표시).
//!
//! 재시도는 하지 않습니다. 반복적인 인증 실패 시 호출자가
//! `reset_token()` 후 1회 재시도하는 정책입니다.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::network::{HttpTransport, TransportError};
use crate::secure::SecureStore;

use super::config::KisConfig;
use super::endpoint::KisEndpoint;
use super::token::{AuthError, TokenManager};
use super::types::{
    ApiStatus, DailyPriceResponse, DomesticBalanceResponse, OverseasBalanceResponse,
    OverseasDailyPriceResponse, OverseasPsAmountResponse,
};

/// 논리적 성공 센티널.
const RT_CD_SUCCESS: &str = "0";

/// KIS 클라이언트 에러.
#[derive(Debug, Clone, Error)]
pub enum KisError {
    /// 전송 계층 에러 (그대로 전파)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 토큰 발급 실패 (그대로 전파)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// 업스트림 논리 실패 (`rt_cd != "0"`)
    #[error("KIS API 요청 실패 [{code}]: {message}")]
    RequestFailed {
        /// 업스트림 메시지 코드 (msg_cd)
        code: String,
        /// 업스트림 메시지 원문 (msg1)
        message: String,
    },
}

/// KIS API 클라이언트.
///
/// 협력자는 전부 생성자로 주입합니다. 전역 인스턴스는 없으며
/// 조립은 프로세스 시작 시점 한 곳에서 일어납니다.
pub struct KisClient {
    transport: HttpTransport,
    config: Arc<KisConfig>,
    token_manager: TokenManager,
}

impl KisClient {
    /// 전송/설정/저장소로 클라이언트 생성.
    ///
    /// 토큰 관리자는 내부에서 같은 전송과 저장소를 공유하도록
    /// 구성됩니다.
    pub fn new(transport: HttpTransport, config: Arc<KisConfig>, store: Arc<dyn SecureStore>) -> Self {
        let token_manager = TokenManager::new(transport.clone(), Arc::clone(&config), store);
        Self {
            transport,
            config,
            token_manager,
        }
    }

    /// 설정 참조.
    pub fn config(&self) -> &KisConfig {
        &self.config
    }

    /// 토큰 초기화 (다음 호출에서 재발급 강제).
    pub async fn reset_token(&self) {
        self.token_manager.reset_token().await;
    }

    /// 토큰을 주입해 엔드포인트를 실행하고 `rt_cd`를 검사.
    async fn request<T>(&self, endpoint: KisEndpoint) -> Result<T, KisError>
    where
        T: serde::de::DeserializeOwned + ApiStatus,
    {
        let token = self.token_manager.get_valid_token().await?;
        let descriptor = endpoint.build(&self.config, Some(&token));
        let response: T = self.transport.request(&descriptor).await?;

        if response.rt_cd() != RT_CD_SUCCESS {
            return Err(KisError::RequestFailed {
                code: response.msg_cd().to_string(),
                message: response.msg1().to_string(),
            });
        }
        debug!(path = %descriptor.path, "KIS 응답 정상");
        Ok(response)
    }

    /// 국내 주식 잔고 조회.
    pub async fn get_domestic_balance(&self) -> Result<DomesticBalanceResponse, KisError> {
        self.request(KisEndpoint::DomesticBalance).await
    }

    /// 해외 주식 잔고 조회.
    pub async fn get_overseas_balance(
        &self,
        exchange: &str,
        currency: &str,
    ) -> Result<OverseasBalanceResponse, KisError> {
        self.request(KisEndpoint::OverseasBalance {
            exchange: exchange.to_string(),
            currency: currency.to_string(),
        })
        .await
    }

    /// 해외 주문가능금액(현금/환율) 조회.
    pub async fn get_overseas_ps_amount(
        &self,
        exchange: &str,
    ) -> Result<OverseasPsAmountResponse, KisError> {
        self.request(KisEndpoint::OverseasPsAmount {
            exchange: exchange.to_string(),
        })
        .await
    }

    /// 국내 주식 일봉 조회.
    pub async fn get_daily_price(
        &self,
        code: &str,
        period: &str,
        start: &str,
        end: &str,
    ) -> Result<DailyPriceResponse, KisError> {
        self.request(KisEndpoint::DailyPrice {
            code: code.to_string(),
            period: period.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        })
        .await
    }

    /// 해외 주식 일봉 조회.
    pub async fn get_overseas_daily_price(
        &self,
        exchange: &str,
        symbol: &str,
        period: &str,
        end: &str,
    ) -> Result<OverseasDailyPriceResponse, KisError> {
        self.request(KisEndpoint::OverseasDailyPrice {
            exchange: exchange.to_string(),
            symbol: symbol.to_string(),
            period: period.to_string(),
            end: end.to_string(),
        })
        .await
    }
}

// =============================================================================
// 테스트
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::kis::config::KisEnvironment;
    use crate::secure::MemoryStore;

    const TOKEN_BODY: &str = r#"{
        "access_token": "test-token",
        "token_type": "Bearer",
        "expires_in": 86400,
        "access_token_token_expired": null
    }"#;

    const DOMESTIC_BALANCE_BODY: &str = r#"{
        "output1": [{
            "pdno": "005930",
            "prdt_name": "삼성전자",
            "evlu_pfls_amt": "50000",
            "evlu_pfls_rt": "7.14",
            "prpr": "75000",
            "pchs_avg_pric": "70000",
            "evlu_amt": "750000",
            "pchs_amt": "700000",
            "hldg_qty": "10"
        }],
        "output2": [{
            "bfdy_tot_asst_evlu_amt": "1000000",
            "asst_icdc_amt": "50000",
            "asst_icdc_erng_rt": "5.0",
            "dnca_tot_amt": "250000"
        }],
        "rt_cd": "0", "msg_cd": "MCA00000", "msg1": "정상처리 되었습니다."
    }"#;

    fn client(base_url: &str) -> KisClient {
        let config = Arc::new(
            KisConfig::new("key", "secret", "81234567", "01", KisEnvironment::Real)
                .with_base_url(base_url),
        );
        KisClient::new(HttpTransport::new(), config, Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_domestic_balance_issues_token_then_fetches() {
        let mut server = mockito::Server::new_async().await;
        let token_mock = server
            .mock("POST", "/oauth2/tokenP")
            .expect(1)
            .with_status(200)
            .with_body(TOKEN_BODY)
            .create_async()
            .await;
        let balance_mock = server
            .mock("GET", "/uapi/domestic-stock/v1/trading/inquire-balance")
            .match_header("authorization", "Bearer test-token")
            .match_header("tr_id", "TTTC8434R")
            .match_query(mockito::Matcher::UrlEncoded("CANO".into(), "81234567".into()))
            .with_status(200)
            .with_body(DOMESTIC_BALANCE_BODY)
            .create_async()
            .await;

        let client = client(&server.url());
        let response = client.get_domestic_balance().await.unwrap();

        let stocks = response.output1.unwrap();
        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].pdno, "005930");

        token_mock.assert_async().await;
        balance_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_logical_failure_carries_upstream_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/tokenP")
            .with_status(200)
            .with_body(TOKEN_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/uapi/domestic-stock/v1/trading/inquire-balance")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"rt_cd": "1", "msg_cd": "EGW00121", "msg1": "유효하지 않은 token 입니다."}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let err = client.get_domestic_balance().await.unwrap_err();

        match err {
            KisError::RequestFailed { code, message } => {
                assert_eq!(code, "EGW00121");
                assert_eq!(message, "유효하지 않은 token 입니다.");
            }
            other => panic!("RequestFailed가 아님: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_propagates_unchanged() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/tokenP")
            .with_status(200)
            .with_body(TOKEN_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/uapi/domestic-stock/v1/trading/inquire-balance")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = client(&server.url());
        let err = client.get_domestic_balance().await.unwrap_err();

        assert!(matches!(
            err,
            KisError::Transport(TransportError::Status(503))
        ));
    }

    #[tokio::test]
    async fn test_token_failure_surfaces_as_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/tokenP")
            .with_status(403)
            .create_async()
            .await;

        let client = client(&server.url());
        let err = client.get_domestic_balance().await.unwrap_err();

        assert!(matches!(err, KisError::Auth(_)));
    }

    #[tokio::test]
    async fn test_overseas_ps_amount_round_trip() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/tokenP")
            .with_status(200)
            .with_body(TOKEN_BODY)
            .create_async()
            .await;
        server
            .mock("GET", "/uapi/overseas-stock/v1/trading/inquire-psamount")
            .match_query(mockito::Matcher::Any)
            .match_header("tr_id", "TTTS3007R")
            .with_status(200)
            .with_body(
                r#"{
                    "output": {"tr_crcy_cd": "USD", "ord_psbl_frcr_amt": "1523.42", "exrt": "1390.5"},
                    "rt_cd": "0", "msg_cd": "MCA00000", "msg1": "정상처리 되었습니다."
                }"#,
            )
            .create_async()
            .await;

        let client = client(&server.url());
        let response = client.get_overseas_ps_amount("NASD").await.unwrap();

        assert_eq!(response.output.unwrap().exrt, "1390.5");
    }
}
