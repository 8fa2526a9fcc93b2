//! 일봉 시세 타입.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 일봉 캔들 하나.
///
/// 매크로 차트 화면에서 사용하는 최소 OHLC 집합입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyQuote {
    /// 영업일 (YYYYMMDD)
    pub date: String,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
}
