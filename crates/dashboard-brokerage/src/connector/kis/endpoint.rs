//! KIS 엔드포인트별 요청 기술자 조립.
//!
//! 경로, 쿼리, tr_id, 인증 헤더를 엔드포인트마다 선언적으로 구성합니다.
//! tr_id는 실전/모의 환경에 따라 달라집니다.

use serde_json::json;

use crate::network::{Endpoint, HttpMethod};

use super::config::{KisConfig, KisEnvironment};

/// KIS 업스트림 엔드포인트.
#[derive(Debug, Clone)]
pub enum KisEndpoint {
    /// 접근 토큰 발급
    IssueToken,
    /// 국내 주식 일봉 조회
    DailyPrice {
        /// 종목 코드 (예: "005930")
        code: String,
        /// 기간 구분 (D: 일, W: 주, M: 월)
        period: String,
        /// 조회 시작일 (YYYYMMDD)
        start: String,
        /// 조회 종료일 (YYYYMMDD)
        end: String,
    },
    /// 국내 주식 잔고 조회
    DomesticBalance,
    /// 해외 주식 잔고 조회
    OverseasBalance {
        /// 해외거래소 코드 (NASD, NYSE, ...)
        exchange: String,
        /// 거래통화 코드 (USD, HKD, ...)
        currency: String,
    },
    /// 해외 주문가능금액(현금/환율) 조회
    OverseasPsAmount {
        /// 해외거래소 코드
        exchange: String,
    },
    /// 해외 주식 일봉 조회
    OverseasDailyPrice {
        /// 거래소 코드 (NAS, NYS, ...)
        exchange: String,
        /// 티커 (예: "AAPL")
        symbol: String,
        /// 기간 구분 (0: 일, 1: 주, 2: 월)
        period: String,
        /// 조회 기준일 (YYYYMMDD)
        end: String,
    },
}

impl KisEndpoint {
    /// 경로.
    pub fn path(&self) -> &'static str {
        match self {
            KisEndpoint::IssueToken => "/oauth2/tokenP",
            KisEndpoint::DailyPrice { .. } => {
                "/uapi/domestic-stock/v1/quotations/inquire-daily-itemchartprice"
            }
            KisEndpoint::DomesticBalance => "/uapi/domestic-stock/v1/trading/inquire-balance",
            KisEndpoint::OverseasBalance { .. } => "/uapi/overseas-stock/v1/trading/inquire-balance",
            KisEndpoint::OverseasPsAmount { .. } => {
                "/uapi/overseas-stock/v1/trading/inquire-psamount"
            }
            KisEndpoint::OverseasDailyPrice { .. } => {
                "/uapi/overseas-price/v1/quotations/dailyprice"
            }
        }
    }

    /// HTTP 메서드. 토큰 발급만 POST입니다.
    pub fn method(&self) -> HttpMethod {
        match self {
            KisEndpoint::IssueToken => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// 거래 ID. 잔고 조회는 실전/모의 tr_id가 다릅니다.
    pub fn tr_id(&self, environment: KisEnvironment) -> Option<&'static str> {
        let sandbox = environment == KisEnvironment::Sandbox;
        match self {
            KisEndpoint::IssueToken => None,
            KisEndpoint::DailyPrice { .. } => Some("FHKST03010100"),
            KisEndpoint::DomesticBalance => {
                Some(if sandbox { "VTTC8434R" } else { "TTTC8434R" })
            }
            KisEndpoint::OverseasBalance { .. } => {
                Some(if sandbox { "VTTS3012R" } else { "TTTS3012R" })
            }
            KisEndpoint::OverseasPsAmount { .. } => Some("TTTS3007R"),
            KisEndpoint::OverseasDailyPrice { .. } => Some("HHDFS76240000"),
        }
    }

    /// 완성된 요청 기술자 조립.
    ///
    /// 인증이 필요한 엔드포인트는 `token`이 Bearer 헤더로 들어갑니다.
    /// 토큰 발급 엔드포인트는 `token`을 무시합니다.
    pub fn build(&self, config: &KisConfig, token: Option<&str>) -> Endpoint {
        let mut endpoint = Endpoint::new(&config.base_url, self.path(), self.method())
            .with_header("content-type", "application/json");

        if !matches!(self, KisEndpoint::IssueToken) {
            if let Some(token) = token {
                endpoint = endpoint.with_header("authorization", format!("Bearer {}", token));
            }
            endpoint = endpoint
                .with_header("appkey", &config.app_key)
                .with_header("appsecret", config.app_secret());
            if let Some(tr_id) = self.tr_id(config.environment) {
                endpoint = endpoint.with_header("tr_id", tr_id);
            }
        }

        match self {
            KisEndpoint::IssueToken => endpoint.with_body(json!({
                "grant_type": "client_credentials",
                "appkey": config.app_key,
                "appsecret": config.app_secret(),
            })),
            KisEndpoint::DailyPrice {
                code,
                period,
                start,
                end,
            } => endpoint
                .with_query("fid_cond_mrkt_div_code", "J")
                .with_query("fid_input_iscd", code)
                .with_query("fid_input_date_1", start)
                .with_query("fid_input_date_2", end)
                .with_query("fid_period_div_code", period)
                .with_query("fid_org_adj_prc", "1"),
            KisEndpoint::DomesticBalance => endpoint
                .with_query("CANO", &config.cano)
                .with_query("ACNT_PRDT_CD", &config.acnt_prdt_cd)
                .with_query("AFHR_FLPR_YN", "N")
                .with_query("OFL_YN", "")
                .with_query("INQR_DVSN", "02")
                .with_query("UNPR_DVSN", "01")
                .with_query("FUND_STTL_ICLD_YN", "N")
                .with_query("FNCG_AMT_AUTO_RDPT_YN", "N")
                .with_query("PRCS_DVSN", "00")
                .with_query("CTX_AREA_FK100", "")
                .with_query("CTX_AREA_NK100", ""),
            KisEndpoint::OverseasBalance { exchange, currency } => endpoint
                .with_query("CANO", &config.cano)
                .with_query("ACNT_PRDT_CD", &config.acnt_prdt_cd)
                .with_query("OVRS_EXCG_CD", exchange)
                .with_query("TR_CRCY_CD", currency)
                .with_query("CTX_AREA_FK200", "")
                .with_query("CTX_AREA_NK200", ""),
            KisEndpoint::OverseasPsAmount { exchange } => endpoint
                .with_query("CANO", &config.cano)
                .with_query("ACNT_PRDT_CD", &config.acnt_prdt_cd)
                .with_query("OVRS_EXCG_CD", exchange)
                .with_query("OVRS_ORD_UNPR", "1.4")
                .with_query("ITEM_CD", "TRVG"),
            KisEndpoint::OverseasDailyPrice {
                exchange,
                symbol,
                period,
                end,
            } => endpoint
                .with_query("AUTH", "")
                .with_query("EXCD", exchange)
                .with_query("SYMB", symbol)
                .with_query("GUBN", period)
                .with_query("BYMD", end)
                .with_query("MODP", "1"),
        }
    }
}
