//! 와이어 타입 → 도메인 타입 순수 변환.
//!
//! I/O와 재시도가 없는 순수 함수만 둡니다.
//!
//! # 관대한 숫자 변환
//!
//! 업스트림 수치 필드는 문자열이고 포맷이 일정하지 않습니다.
//! 파싱 불가 필드는 레코드 전체를 실패시키는 대신 0으로 둡니다.
//! 목록 자체가 없는 것도 실패가 아니며 빈 시퀀스로 정규화합니다.
//! 조회 실패 여부는 오직 `rt_cd`로만 판단합니다.

use std::str::FromStr;

use rust_decimal::Decimal;

use dashboard_core::{AccountBalance, AccountSummary, DailyQuote, Holding, Market};

use super::types::{
    DailyPriceResponse, DomesticBalanceResponse, OverseasBalanceResponse,
    OverseasDailyPriceResponse, OverseasPsAmountResponse,
};

/// 관대한 Decimal 파싱. 실패 시 0.
pub fn parse_decimal(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or_default()
}

/// 국내 잔고 응답 → 보유 종목 목록.
///
/// 국내 종목은 코드(`pdno`)를 식별자로 쓰고 거래소 코드가 없습니다.
pub fn domestic_holdings(response: &DomesticBalanceResponse) -> Vec<Holding> {
    response
        .output1
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|stock| Holding {
            market: Market::Domestic,
            identifier: stock.pdno.clone(),
            display_name: stock.prdt_name.clone(),
            gain_loss_amount: parse_decimal(&stock.evlu_pfls_amt),
            gain_loss_rate: parse_decimal(&stock.evlu_pfls_rt),
            current_price: parse_decimal(&stock.prpr),
            avg_buying_price: parse_decimal(&stock.pchs_avg_pric),
            total_current_value: parse_decimal(&stock.evlu_amt),
            total_buying_value: parse_decimal(&stock.pchs_amt),
            quantity: parse_decimal(&stock.hldg_qty),
            exchange_code: None,
        })
        .collect()
}

/// 해외 잔고 응답 → 보유 종목 목록.
///
/// 해외 종목은 티커(`ovrs_pdno`)를 식별자로 쓰고 거래소 코드를
/// 함께 담습니다.
pub fn overseas_holdings(response: &OverseasBalanceResponse) -> Vec<Holding> {
    response
        .output1
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|stock| Holding {
            market: Market::Overseas,
            identifier: stock.ovrs_pdno.clone(),
            display_name: stock.ovrs_item_name.clone(),
            gain_loss_amount: parse_decimal(&stock.frcr_evlu_pfls_amt),
            gain_loss_rate: parse_decimal(&stock.evlu_pfls_rt),
            current_price: parse_decimal(&stock.now_pric2),
            avg_buying_price: parse_decimal(&stock.pchs_avg_pric),
            total_current_value: parse_decimal(&stock.ovrs_stck_evlu_amt),
            total_buying_value: parse_decimal(&stock.frcr_pchs_amt1),
            quantity: parse_decimal(&stock.ovrs_cblc_qty),
            exchange_code: Some(stock.ovrs_excg_cd.clone()),
        })
        .collect()
}

/// 국내 + 해외 응답 → 통합 계좌 요약.
///
/// - 해외 주식 평가 총액 = 매입 금액 합계 + 총 손익
/// - 해외 총 자산 = 주식 평가 총액 + 주문 가능 외화
/// - 원화 환산 총액 = 국내 총 자산 + 해외 총 자산 × 환율
///
/// 환율은 주문가능금액 응답의 `exrt`에서 읽고, 파싱 불가하면
/// 설정의 폴백값을 씁니다 (0이 아니라 폴백 — 환산이 0이 되면 안 됨).
pub fn account_summary(
    domestic: &DomesticBalanceResponse,
    overseas_stock: &OverseasBalanceResponse,
    overseas_cash: &OverseasPsAmountResponse,
    fallback_exchange_rate: Decimal,
) -> AccountSummary {
    let domestic_summary = domestic
        .output2
        .as_deref()
        .unwrap_or_default()
        .first();

    let domestic_balance = AccountBalance {
        market: Market::Domestic,
        total_asset_value: domestic_summary
            .map(|s| parse_decimal(&s.bfdy_tot_asst_evlu_amt))
            .unwrap_or_default(),
        profit_amount: domestic_summary
            .map(|s| parse_decimal(&s.asst_icdc_amt))
            .unwrap_or_default(),
        profit_rate: domestic_summary
            .map(|s| parse_decimal(&s.asst_icdc_erng_rt))
            .unwrap_or_default(),
        currency_symbol: "₩".to_string(),
        cash_balance: domestic_summary
            .map(|s| parse_decimal(&s.dnca_tot_amt))
            .unwrap_or_default(),
    };

    let overseas_orderable_cash = overseas_cash
        .output
        .as_ref()
        .map(|o| parse_decimal(&o.ord_psbl_frcr_amt))
        .unwrap_or_default();

    let (overseas_eval_total, overseas_profit, overseas_rate) = overseas_stock
        .output2
        .as_ref()
        .map(|summary| {
            let buying = parse_decimal(&summary.frcr_pchs_amt1);
            let profit = parse_decimal(&summary.ovrs_tot_pfls);
            (buying + profit, profit, parse_decimal(&summary.tot_pftrt))
        })
        .unwrap_or_default();

    let overseas_balance = AccountBalance {
        market: Market::Overseas,
        total_asset_value: overseas_eval_total + overseas_orderable_cash,
        profit_amount: overseas_profit,
        profit_rate: overseas_rate,
        currency_symbol: "$".to_string(),
        cash_balance: overseas_orderable_cash,
    };

    let exchange_rate = overseas_cash
        .output
        .as_ref()
        .and_then(|o| Decimal::from_str(o.exrt.trim()).ok())
        .unwrap_or(fallback_exchange_rate);

    let total_value_krw =
        domestic_balance.total_asset_value + overseas_balance.total_asset_value * exchange_rate;

    AccountSummary {
        total_value_krw,
        domestic: domestic_balance,
        overseas: overseas_balance,
    }
}

/// 국내 일봉 응답 → 일봉 목록.
pub fn daily_quotes(response: &DailyPriceResponse) -> Vec<DailyQuote> {
    response
        .output2
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|candle| DailyQuote {
            date: candle.stck_bsop_date.clone(),
            open: parse_decimal(&candle.stck_oprc),
            high: parse_decimal(&candle.stck_hgpr),
            low: parse_decimal(&candle.stck_lwpr),
            close: parse_decimal(&candle.stck_clpr),
        })
        .collect()
}

/// 해외 일봉 응답 → 일봉 목록.
pub fn overseas_daily_quotes(response: &OverseasDailyPriceResponse) -> Vec<DailyQuote> {
    response
        .output2
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|candle| DailyQuote {
            date: candle.xymd.clone(),
            open: parse_decimal(&candle.open),
            high: parse_decimal(&candle.high),
            low: parse_decimal(&candle.low),
            close: parse_decimal(&candle.clos),
        })
        .collect()
}

// =============================================================================
// 테스트
// =============================================================================
