//! HTTP 전송 계층.
//!
//! API 호출을 I/O 없는 `Endpoint` 기술자로 선언하고,
//! `HttpTransport`가 이를 실행하여 타입 있는 응답으로 디코딩합니다.

pub mod endpoint;
pub mod transport;

pub use endpoint::{Endpoint, HttpMethod};
pub use transport::{HttpTransport, TransportError};
