//! KIS AssetProvider.
//!
//! `KisClient`를 감싸 대시보드가 의존하는 `AssetProvider` trait를
//! 구현합니다. 잔고 계열 호출은 서로 공유 상태와 순서 의존이 없으므로
//! 동시에 발행하되, 정규화는 전부 완료된 뒤에 수행합니다
//! (join이지 race가 아님 — 먼저 끝난 것만 쓰면 안 됩니다).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Months, Utc};
use tracing::{debug, info};

use dashboard_core::{AccountSummary, AssetProvider, DailyQuote, Holding, ProviderError};

use crate::connector::kis::client::{KisClient, KisError};
use crate::connector::kis::normalize;
use crate::network::TransportError;

/// 기본 해외거래소 코드 (나스닥).
const DEFAULT_OVERSEAS_EXCHANGE: &str = "NASD";
/// 기본 거래통화 코드 (미국 달러).
const DEFAULT_OVERSEAS_CURRENCY: &str = "USD";
/// 일봉 조회 기간 (개월).
const DAILY_QUOTE_MONTHS: u32 = 2;

/// KIS 기반 자산 정보 제공자.
pub struct KisAssetProvider {
    client: Arc<KisClient>,
}

impl KisAssetProvider {
    /// 클라이언트로 Provider 생성.
    pub fn new(client: Arc<KisClient>) -> Self {
        Self { client }
    }

    /// 토큰 초기화.
    ///
    /// 반복적인 인증 실패(`ProviderError::Authentication` 또는 토큰 만료
    /// 메시지)를 감지한 호출자가 호출한 뒤 1회 재시도합니다.
    /// 코어는 자동 재시도하지 않습니다.
    pub async fn reset_token(&self) {
        self.client.reset_token().await;
    }

    /// 일봉 조회 기간 (시작일, 종료일) 계산.
    fn daily_quote_range() -> (String, String) {
        let today = Utc::now().date_naive();
        let start = today
            .checked_sub_months(Months::new(DAILY_QUOTE_MONTHS))
            .unwrap_or(today);
        (
            start.format("%Y%m%d").to_string(),
            today.format("%Y%m%d").to_string(),
        )
    }
}

impl From<KisError> for ProviderError {
    fn from(err: KisError) -> Self {
        match err {
            KisError::Transport(TransportError::Decode(msg)) => ProviderError::Parse(msg),
            KisError::Transport(transport) => ProviderError::Network(transport.to_string()),
            KisError::Auth(auth) => ProviderError::Authentication(auth.to_string()),
            KisError::RequestFailed { code, message } => ProviderError::Api { code, message },
        }
    }
}

#[async_trait]
impl AssetProvider for KisAssetProvider {
    async fn fetch_holdings(&self) -> Result<Vec<Holding>, ProviderError> {
        let (domestic, overseas) = tokio::join!(
            self.client.get_domestic_balance(),
            self.client
                .get_overseas_balance(DEFAULT_OVERSEAS_EXCHANGE, DEFAULT_OVERSEAS_CURRENCY),
        );
        let domestic = domestic?;
        let overseas = overseas?;

        let mut holdings = normalize::domestic_holdings(&domestic);
        holdings.extend(normalize::overseas_holdings(&overseas));

        info!(count = holdings.len(), "보유 종목 조회 완료");
        Ok(holdings)
    }

    async fn fetch_account_summary(&self) -> Result<AccountSummary, ProviderError> {
        let (domestic, overseas_stock, overseas_cash) = tokio::join!(
            self.client.get_domestic_balance(),
            self.client
                .get_overseas_balance(DEFAULT_OVERSEAS_EXCHANGE, DEFAULT_OVERSEAS_CURRENCY),
            self.client.get_overseas_ps_amount(DEFAULT_OVERSEAS_EXCHANGE),
        );
        let domestic = domestic?;
        let overseas_stock = overseas_stock?;
        let overseas_cash = overseas_cash?;

        let summary = normalize::account_summary(
            &domestic,
            &overseas_stock,
            &overseas_cash,
            self.client.config().fallback_exchange_rate,
        );

        debug!(total_krw = %summary.total_value_krw, "계좌 요약 계산 완료");
        Ok(summary)
    }

    async fn fetch_daily_quotes(&self, code: &str) -> Result<Vec<DailyQuote>, ProviderError> {
        let (start, end) = Self::daily_quote_range();
        let response = self.client.get_daily_price(code, "D", &start, &end).await?;
        Ok(normalize::daily_quotes(&response))
    }

    fn provider_name(&self) -> &str {
        "kis"
    }
}

// =============================================================================
// 테스트
// =============================================================================
