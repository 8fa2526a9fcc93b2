//! 도메인 모델 모듈.

pub mod asset;
pub mod provider;
pub mod quote;

pub use asset::{AccountBalance, AccountSummary, Holding, Market};
pub use provider::{AssetProvider, ProviderError};
pub use quote::DailyQuote;
