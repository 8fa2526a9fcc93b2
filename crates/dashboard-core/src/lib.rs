//! 대시보드 공용 도메인 타입.
//!
//! 증권사 중립적인 자산/계좌 모델과 Provider trait를 제공합니다.
//! 각 증권사 커넥터는 자체 응답 타입을 이 타입으로 변환합니다.

pub mod domain;

pub use domain::asset::{AccountBalance, AccountSummary, Holding, Market};
pub use domain::provider::{AssetProvider, ProviderError};
pub use domain::quote::DailyQuote;
