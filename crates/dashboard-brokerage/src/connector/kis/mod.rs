//! 한국투자증권(KIS) 커넥터.
//!
//! - `config`: 환경변수 기반 설정 (앱 키, 계좌번호, 실전/모의 구분)
//! - `endpoint`: 엔드포인트별 `Endpoint` 기술자 조립
//! - `token`: 토큰 캐시 / single-flight 재발급 / 영속화
//! - `types`: 업스트림 JSON 와이어 타입 (snake_case 키 그대로)
//! - `client`: 엔드포인트별 호출 + `rt_cd` 상태 검사
//! - `normalize`: 와이어 타입 → 도메인 타입 순수 변환

pub mod client;
pub mod config;
pub mod endpoint;
pub mod normalize;
pub mod token;
pub mod types;

pub use client::{KisClient, KisError};
pub use config::{ConfigError, KisConfig, KisEnvironment};
pub use token::{AccessToken, AuthError, TokenManager};
