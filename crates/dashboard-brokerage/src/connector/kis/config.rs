//! KIS 환경변수 기반 설정.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// 설정 로드 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경변수 누락
    #[error("환경변수 {0}이(가) 설정되지 않았습니다")]
    MissingVar(&'static str),

    /// 환경변수 값 파싱 실패
    #[error("환경변수 {0} 값이 잘못되었습니다: {1}")]
    InvalidVar(&'static str, String),
}

/// 실전/모의 환경 구분.
///
/// tr_id와 기본 base URL이 환경에 따라 달라집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KisEnvironment {
    /// 실전투자
    Real,
    /// 모의투자
    Sandbox,
}

impl KisEnvironment {
    /// 환경별 기본 base URL.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            KisEnvironment::Real => "https://openapi.koreainvestment.com:9443",
            KisEnvironment::Sandbox => "https://openapivts.koreainvestment.com:29443",
        }
    }
}

/// KIS API 설정.
///
/// 계좌번호와 환율 폴백값은 코드 리터럴이 아니라 설정으로 주입합니다.
#[derive(Clone)]
pub struct KisConfig {
    /// 앱 키
    pub app_key: String,
    /// 앱 시크릿
    pub app_secret: SecretString,
    /// API base URL
    pub base_url: String,
    /// 계좌번호 앞 8자리
    pub cano: String,
    /// 계좌상품코드 (계좌번호 뒤 2자리)
    pub acnt_prdt_cd: String,
    /// 실전/모의 구분
    pub environment: KisEnvironment,
    /// 환율 파싱 실패 시 폴백값 (기본 1390)
    pub fallback_exchange_rate: Decimal,
}

impl std::fmt::Debug for KisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KisConfig")
            .field("app_key", &"***")
            .field("app_secret", &"***")
            .field("base_url", &self.base_url)
            .field("cano", &"***")
            .field("acnt_prdt_cd", &self.acnt_prdt_cd)
            .field("environment", &self.environment)
            .field("fallback_exchange_rate", &self.fallback_exchange_rate)
            .finish()
    }
}

impl KisConfig {
    /// 기본값으로 설정 생성. base URL은 환경에 따라 결정됩니다.
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        cano: impl Into<String>,
        acnt_prdt_cd: impl Into<String>,
        environment: KisEnvironment,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: SecretString::from(app_secret.into()),
            base_url: environment.default_base_url().to_string(),
            cano: cano.into(),
            acnt_prdt_cd: acnt_prdt_cd.into(),
            environment,
            fallback_exchange_rate: Decimal::from(1390),
        }
    }

    /// base URL 교체 (테스트/프록시용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 환율 폴백값 교체.
    pub fn with_fallback_exchange_rate(mut self, rate: Decimal) -> Self {
        self.fallback_exchange_rate = rate;
        self
    }

    /// 앱 시크릿 노출 (헤더/바디 조립 전용).
    pub fn app_secret(&self) -> &str {
        self.app_secret.expose_secret()
    }

    /// 환경변수에서 설정 로드.
    ///
    /// | 변수 | 필수 | 기본값 |
    /// |------|------|--------|
    /// | `KIS_APP_KEY` | O | - |
    /// | `KIS_APP_SECRET` | O | - |
    /// | `KIS_CANO` | O | - |
    /// | `KIS_ACNT_PRDT_CD` | X | "01" |
    /// | `KIS_ENVIRONMENT` | X | "real" ("sandbox" 가능) |
    /// | `KIS_BASE_URL` | X | 환경별 기본 URL |
    /// | `KIS_FALLBACK_EXCHANGE_RATE` | X | 1390 |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let app_key =
            std::env::var("KIS_APP_KEY").map_err(|_| ConfigError::MissingVar("KIS_APP_KEY"))?;
        let app_secret = std::env::var("KIS_APP_SECRET")
            .map_err(|_| ConfigError::MissingVar("KIS_APP_SECRET"))?;
        let cano = std::env::var("KIS_CANO").map_err(|_| ConfigError::MissingVar("KIS_CANO"))?;
        let acnt_prdt_cd =
            std::env::var("KIS_ACNT_PRDT_CD").unwrap_or_else(|_| "01".to_string());

        let environment = match std::env::var("KIS_ENVIRONMENT").as_deref() {
            Ok("sandbox") => KisEnvironment::Sandbox,
            Ok("real") | Err(_) => KisEnvironment::Real,
            Ok(other) => {
                return Err(ConfigError::InvalidVar("KIS_ENVIRONMENT", other.to_string()))
            }
        };

        let mut config = Self::new(app_key, app_secret, cano, acnt_prdt_cd, environment);

        if let Ok(base_url) = std::env::var("KIS_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(rate) = std::env::var("KIS_FALLBACK_EXCHANGE_RATE") {
            config.fallback_exchange_rate = rate.parse().map_err(
                |e: rust_decimal::Error| {
                    ConfigError::InvalidVar("KIS_FALLBACK_EXCHANGE_RATE", e.to_string())
                },
            )?;
        }

        Ok(config)
    }
}
