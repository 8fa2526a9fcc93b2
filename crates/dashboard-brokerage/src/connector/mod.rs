//! 증권사 커넥터 모듈.

pub mod kis;
