//! 증권사 중립적 자산 및 계좌 타입.
//!
//! 국내/해외 잔고 응답을 통일된 형식으로 표현합니다.
//! 각 커넥터는 자체 응답 타입을 이 타입으로 변환합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// 시장 구분 (Market)
// =============================================================================

/// 자산이 속한 시장.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    /// 국내 주식
    Domestic,
    /// 해외 주식
    Overseas,
}

// =============================================================================
// 보유 종목 (Holding)
// =============================================================================

/// 증권사 중립적 보유 종목.
///
/// 국내 주식은 종목 코드(`identifier`)만 갖고, 해외 주식은 티커와
/// 거래소 코드(`exchange_code`)를 갖습니다. 매 조회마다 새로 생성되며
/// 조회 간 동일성은 유지하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// 시장 구분
    pub market: Market,
    /// 종목 코드 또는 티커 (예: "005930", "AAPL")
    pub identifier: String,
    /// 종목명 (예: "삼성전자", "Apple Inc.")
    pub display_name: String,
    /// 평가 손익 금액
    pub gain_loss_amount: Decimal,
    /// 평가 손익률 (%)
    pub gain_loss_rate: Decimal,
    /// 현재가 (1주 기준)
    pub current_price: Decimal,
    /// 평균 매입가
    pub avg_buying_price: Decimal,
    /// 총 평가 금액
    pub total_current_value: Decimal,
    /// 총 매입 금액
    pub total_buying_value: Decimal,
    /// 보유 수량
    pub quantity: Decimal,
    /// 거래소 코드 (해외 주식만, 예: "NASD")
    pub exchange_code: Option<String>,
}

impl Holding {
    /// 수익 여부.
    pub fn is_profit(&self) -> bool {
        self.gain_loss_amount > Decimal::ZERO
    }
}

// =============================================================================
// 계좌 잔고 (AccountBalance)
// =============================================================================

/// 시장별 계좌 잔고.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// 시장 구분
    pub market: Market,
    /// 총 자산 평가 금액 (보유 종목 + 현금)
    pub total_asset_value: Decimal,
    /// 평가 손익 금액
    pub profit_amount: Decimal,
    /// 평가 손익률 (%)
    pub profit_rate: Decimal,
    /// 통화 기호 (예: "₩", "$")
    pub currency_symbol: String,
    /// 주문 가능 현금
    pub cash_balance: Decimal,
}

// =============================================================================
// 통합 계좌 요약 (AccountSummary)
// =============================================================================

/// 국내 + 해외 통합 계좌 요약.
///
/// `total_value_krw`는 해외 자산을 환율로 환산하여 원화 기준으로 합산한
/// 값입니다: `domestic.total + overseas.total * exchange_rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    /// 원화 환산 총 자산
    pub total_value_krw: Decimal,
    /// 국내 계좌 잔고
    pub domestic: AccountBalance,
    /// 해외 계좌 잔고
    pub overseas: AccountBalance,
}

// =============================================================================
// 테스트
// =============================================================================
