//! 한국투자증권(KIS) 오픈 API 커넥터.
//!
//! 대시보드 UI와 증권사 API 사이의 코어 레이어입니다.
//!
//! # 아키텍처
//!
//! ```text
//! KisAssetProvider (provider::kis)
//! ├── AssetProvider 구현
//! │   ├── fetch_holdings() - 국내/해외 잔고 동시 조회 + 정규화
//! │   ├── fetch_account_summary() - 3-way 동시 조회 + 환율 합산
//! │   └── fetch_daily_quotes() - 국내 일봉
//! └── 내부
//!     ├── KisClient (connector::kis) - 엔드포인트별 요청 조립 + rt_cd 검사
//!     ├── TokenManager - 토큰 캐시 / 만료 검사 / single-flight 재발급
//!     ├── HttpTransport (network) - Endpoint 기술자 실행
//!     └── SecureStore (secure) - 토큰 영속화 (서비스/계정 키-값 blob)
//! ```
//!
//! 공유 가변 상태는 `TokenManager` 내부의 토큰 캐시뿐이며, Mutex로
//! 직렬화됩니다. 나머지 타입은 호출 단위로 소유되는 값 타입입니다.

pub mod connector;
pub mod network;
pub mod provider;
pub mod secure;

pub use connector::kis::{
    client::KisClient, config::KisConfig, token::TokenManager, KisError,
};
pub use network::{Endpoint, HttpMethod, HttpTransport, TransportError};
pub use provider::kis::KisAssetProvider;
pub use secure::{FileStore, MemoryStore, SecureStore};
