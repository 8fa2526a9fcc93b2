//! KIS 업스트림 와이어 타입.
//!
//! 필드명은 업스트림 JSON의 snake_case 키와 1:1로 일치합니다 (rename 없음).
//! 모든 수치 필드는 문자열로 내려오며, 포맷이 일정하지 않으므로
//! 디코딩 단계에서는 문자열 그대로 두고 `normalize` 단계에서 관대하게
//! 숫자로 변환합니다.
//!
//! `output*` 계열은 논리 실패(`rt_cd != "0"`) 시 생략될 수 있으므로
//! 전부 `Option`입니다. 생략 자체는 디코딩 에러가 아닙니다.

use serde::Deserialize;

/// 응답 공통 상태 필드 접근자.
///
/// `rt_cd == "0"`이면 논리적 성공입니다. HTTP 상태와는 별개입니다.
pub trait ApiStatus {
    /// 리턴 코드 ("0": 성공)
    fn rt_cd(&self) -> &str;
    /// 메시지 코드
    fn msg_cd(&self) -> &str;
    /// 메시지 본문
    fn msg1(&self) -> &str;
}

macro_rules! impl_api_status {
    ($($ty:ty),+ $(,)?) => {
        $(impl ApiStatus for $ty {
            fn rt_cd(&self) -> &str {
                &self.rt_cd
            }
            fn msg_cd(&self) -> &str {
                &self.msg_cd
            }
            fn msg1(&self) -> &str {
                &self.msg1
            }
        })+
    };
}

// =============================================================================
// 토큰 발급
// =============================================================================

/// 토큰 발급 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// 접근 토큰
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 유효 시간 (초)
    pub expires_in: i64,
    /// 만료 시각 ("yyyy-MM-dd HH:mm:ss", KST)
    pub access_token_token_expired: Option<String>,
}

// =============================================================================
// 국내 잔고
// =============================================================================

/// 국내 주식 잔고 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct DomesticBalanceResponse {
    /// 보유 종목 목록
    pub output1: Option<Vec<DomesticStock>>,
    /// 계좌 요약 (배열로 내려옴)
    pub output2: Option<Vec<DomesticSummary>>,
    pub rt_cd: String,
    pub msg_cd: String,
    pub msg1: String,
}

/// 국내 보유 종목 한 건.
#[derive(Debug, Clone, Deserialize)]
pub struct DomesticStock {
    /// 종목 코드
    pub pdno: String,
    /// 종목명
    pub prdt_name: String,
    /// 평가 손익 금액
    pub evlu_pfls_amt: String,
    /// 평가 손익률
    pub evlu_pfls_rt: String,
    /// 현재가
    pub prpr: String,
    /// 평균 매입가
    pub pchs_avg_pric: String,
    /// 평가 금액
    pub evlu_amt: String,
    /// 매입 금액
    pub pchs_amt: String,
    /// 보유 수량
    pub hldg_qty: String,
}

/// 국내 계좌 요약.
#[derive(Debug, Clone, Deserialize)]
pub struct DomesticSummary {
    /// 전일 총 자산 평가 금액
    pub bfdy_tot_asst_evlu_amt: String,
    /// 자산 증감 금액
    pub asst_icdc_amt: String,
    /// 자산 증감 수익률
    pub asst_icdc_erng_rt: String,
    /// 예수금 총액
    pub dnca_tot_amt: String,
}

// =============================================================================
// 해외 잔고
// =============================================================================

/// 해외 주식 잔고 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct OverseasBalanceResponse {
    /// 보유 종목 목록
    pub output1: Option<Vec<OverseasStock>>,
    /// 계좌 요약 (단일 객체)
    pub output2: Option<OverseasSummary>,
    pub rt_cd: String,
    pub msg_cd: String,
    pub msg1: String,
}

/// 해외 보유 종목 한 건.
#[derive(Debug, Clone, Deserialize)]
pub struct OverseasStock {
    /// 티커
    pub ovrs_pdno: String,
    /// 종목명
    pub ovrs_item_name: String,
    /// 외화 평가 손익 금액
    pub frcr_evlu_pfls_amt: String,
    /// 평가 손익률
    pub evlu_pfls_rt: String,
    /// 현재가
    pub now_pric2: String,
    /// 평균 매입가
    pub pchs_avg_pric: String,
    /// 외화 매입 금액
    pub frcr_pchs_amt1: String,
    /// 평가 금액
    pub ovrs_stck_evlu_amt: String,
    /// 보유 수량
    pub ovrs_cblc_qty: String,
    /// 거래소 코드
    pub ovrs_excg_cd: String,
}

/// 해외 계좌 요약.
#[derive(Debug, Clone, Deserialize)]
pub struct OverseasSummary {
    /// 외화 매입 금액 합계
    pub frcr_pchs_amt1: String,
    /// 해외 총 손익
    pub ovrs_tot_pfls: String,
    /// 총 수익률
    pub tot_pftrt: String,
}

// =============================================================================
// 해외 주문가능금액 (현금/환율)
// =============================================================================

/// 해외 주문가능금액 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct OverseasPsAmountResponse {
    /// 현금/환율 정보
    pub output: Option<OverseasPsAmount>,
    pub rt_cd: String,
    pub msg_cd: String,
    pub msg1: String,
}

/// 해외 현금/환율 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct OverseasPsAmount {
    /// 거래통화 코드
    pub tr_crcy_cd: String,
    /// 주문 가능 외화 금액
    pub ord_psbl_frcr_amt: String,
    /// 환율
    pub exrt: String,
}

// =============================================================================
// 일봉
// =============================================================================

/// 국내 일봉 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyPriceResponse {
    /// 일봉 목록
    pub output2: Option<Vec<DailyPrice>>,
    pub rt_cd: String,
    pub msg_cd: String,
    pub msg1: String,
}

/// 국내 일봉 한 건.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyPrice {
    /// 영업일 (YYYYMMDD)
    pub stck_bsop_date: String,
    /// 시가
    pub stck_oprc: String,
    /// 고가
    pub stck_hgpr: String,
    /// 저가
    pub stck_lwpr: String,
    /// 종가
    pub stck_clpr: String,
}

/// 해외 일봉 응답.
#[derive(Debug, Clone, Deserialize)]
pub struct OverseasDailyPriceResponse {
    /// 일봉 목록
    pub output2: Option<Vec<OverseasDailyPrice>>,
    pub rt_cd: String,
    pub msg_cd: String,
    pub msg1: String,
}

/// 해외 일봉 한 건.
#[derive(Debug, Clone, Deserialize)]
pub struct OverseasDailyPrice {
    /// 영업일 (YYYYMMDD)
    pub xymd: String,
    /// 시가
    pub open: String,
    /// 고가
    pub high: String,
    /// 저가
    pub low: String,
    /// 종가
    pub clos: String,
}

impl_api_status!(
    DomesticBalanceResponse,
    OverseasBalanceResponse,
    OverseasPsAmountResponse,
    DailyPriceResponse,
    OverseasDailyPriceResponse,
);
