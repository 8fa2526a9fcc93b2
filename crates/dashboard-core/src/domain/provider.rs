//! 자산 정보 제공자 trait.
//!
//! 증권사 커넥터가 구현하는 공통 인터페이스입니다.
//! 대시보드/차트 화면은 이 trait만 의존하며 특정 증권사를 알지 못합니다.

use async_trait::async_trait;
use thiserror::Error;

use super::asset::{AccountSummary, Holding};
use super::quote::DailyQuote;

// =============================================================================
// 에러 타입
// =============================================================================

/// AssetProvider 에러.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 인증 실패
    #[error("인증 실패: {0}")]
    Authentication(String),

    /// API 논리 에러 (업스트림 메시지 그대로 전달)
    #[error("API 에러 [{code}]: {message}")]
    Api {
        /// 업스트림 메시지 코드
        code: String,
        /// 업스트림 메시지 본문
        message: String,
    },

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),
}

// =============================================================================
// AssetProvider Trait
// =============================================================================

/// 유저 자산 정보 제공자 trait.
///
/// 보유 종목, 통합 계좌 요약, 일봉 시세를 조회합니다.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct KisAssetProvider {
///     client: Arc<KisClient>,
/// }
///
/// #[async_trait]
/// impl AssetProvider for KisAssetProvider {
///     async fn fetch_holdings(&self) -> Result<Vec<Holding>, ProviderError> {
///         // 국내/해외 잔고 동시 조회 및 변환
///     }
///
///     // ... 나머지 메서드 구현
/// }
/// ```
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// 보유 종목 전체 조회 (국내 + 해외).
    ///
    /// 종목이 없으면 빈 벡터를 반환합니다.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Network`: 네트워크 연결 실패
    /// - `ProviderError::Authentication`: 토큰 발급 실패
    /// - `ProviderError::Api`: 증권사 API 논리 에러
    async fn fetch_holdings(&self) -> Result<Vec<Holding>, ProviderError>;

    /// 통합 계좌 요약 조회.
    ///
    /// 국내/해외 잔고를 합산하고 해외 자산을 환율로 환산합니다.
    async fn fetch_account_summary(&self) -> Result<AccountSummary, ProviderError>;

    /// 국내 종목 일봉 조회.
    async fn fetch_daily_quotes(&self, code: &str) -> Result<Vec<DailyQuote>, ProviderError>;

    /// 제공자 이름 (로깅용).
    fn provider_name(&self) -> &str;
}
