//! 접근 토큰 수명주기 관리.
//!
//! 토큰 캐시, 만료 검사, single-flight 재발급, 보안 저장소 영속화를
//! 담당합니다. 코어에서 유일하게 공유되는 가변 상태이며, 모든 접근은
//! 내부 Mutex로 직렬화됩니다.
//!
//! # Single-flight
//!
//! 유효한 토큰이 없을 때 재발급은 한 번만 일어납니다. 재발급이 진행 중인
//! 동안 도착한 호출자는 같은 in-flight future를 공유해 그 결과(성공이든
//! 실패든)를 그대로 받습니다. N개의 동시 호출 = 업스트림 요청 1건.
//!
//! 대기 중인 호출자가 이탈해도 공유 future는 남은 호출자가 계속
//! 구동하므로 재발급이 취소되지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::network::{HttpTransport, TransportError};
use crate::secure::SecureStore;

use super::config::KisConfig;
use super::endpoint::KisEndpoint;
use super::types::TokenResponse;

/// 보안 저장소 서비스 식별자.
const STORE_SERVICE: &str = "com.macro-dashboard.kis-api";
/// 토큰 문자열 항목 키.
const STORE_ACCOUNT_TOKEN: &str = "access_token";
/// 만료 시각 항목 키.
const STORE_ACCOUNT_EXPIRY: &str = "token_expires_at";

/// 인증 에러.
///
/// 공유 future가 실패를 모든 대기자에게 복제하므로 `Clone`이어야 합니다.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// 토큰 발급 실패 (전송 에러 래핑)
    #[error("토큰 발급 실패: {0}")]
    Issuance(#[from] TransportError),
}

/// 접근 토큰과 만료 시각.
///
/// `now < expires_at`일 때만 유효합니다.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// 토큰 문자열
    pub value: String,
    /// 절대 만료 시각 (UTC)
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// 주어진 시각 기준 유효 여부.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

type RefreshFuture = Shared<BoxFuture<'static, Result<AccessToken, AuthError>>>;

/// Mutex로 보호되는 토큰 상태.
struct TokenState {
    /// 캐시된 토큰
    token: Option<AccessToken>,
    /// 진행 중인 재발급 (없으면 None)
    refresh: Option<RefreshFuture>,
}

/// 토큰 수명주기 관리자.
///
/// 생성 시 보안 저장소에서 토큰을 best-effort로 복원합니다.
/// 복원 실패(항목 없음, 디코딩 실패)는 빈 캐시로 시작할 뿐 에러가
/// 아닙니다.
pub struct TokenManager {
    transport: HttpTransport,
    config: Arc<KisConfig>,
    store: Arc<dyn SecureStore>,
    state: Mutex<TokenState>,
}

impl TokenManager {
    /// 저장소에서 캐시를 복원하며 생성.
    pub fn new(
        transport: HttpTransport,
        config: Arc<KisConfig>,
        store: Arc<dyn SecureStore>,
    ) -> Self {
        let token = Self::hydrate(store.as_ref());
        if token.is_some() {
            debug!("저장소에서 토큰 복원");
        }
        Self {
            transport,
            config,
            store,
            state: Mutex::new(TokenState {
                token,
                refresh: None,
            }),
        }
    }

    /// 저장소에서 토큰/만료 시각 복원. 하나라도 없거나 깨졌으면 None.
    fn hydrate(store: &dyn SecureStore) -> Option<AccessToken> {
        let value = store
            .read(STORE_SERVICE, STORE_ACCOUNT_TOKEN)
            .and_then(|bytes| String::from_utf8(bytes).ok())?;
        let expires_at = store
            .read(STORE_SERVICE, STORE_ACCOUNT_EXPIRY)
            .and_then(|bytes| serde_json::from_slice::<DateTime<Utc>>(&bytes).ok())?;
        Some(AccessToken { value, expires_at })
    }

    /// 유효한 토큰 반환.
    ///
    /// - 캐시가 유효하면 I/O 없이 즉시 반환합니다.
    /// - 재발급이 진행 중이면 그 결과를 공유합니다.
    /// - 둘 다 아니면 재발급을 시작합니다.
    ///
    /// # Errors
    ///
    /// 토큰 엔드포인트 연결 실패, 2xx가 아닌 상태, 디코딩 실패 시
    /// `AuthError::Issuance`를 반환합니다.
    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        let refresh = {
            let mut state = self.state.lock().await;

            if let Some(token) = &state.token {
                if token.is_valid_at(Utc::now()) {
                    return Ok(token.value.clone());
                }
            }

            match &state.refresh {
                Some(in_flight) => in_flight.clone(),
                None => {
                    debug!("토큰 재발급 시작");
                    let future = Self::issue(
                        self.transport.clone(),
                        Arc::clone(&self.config),
                        Arc::clone(&self.store),
                    )
                    .boxed()
                    .shared();
                    state.refresh = Some(future.clone());
                    future
                }
            }
        };

        let result = refresh.clone().await;
        self.settle(&refresh, &result).await;
        result.map(|token| token.value)
    }

    /// 기다린 재발급의 결과를 상태에 반영.
    ///
    /// 기다린 핸들이 여전히 등록되어 있을 때만 정리합니다. 실패 후
    /// 다른 호출자가 이미 새 재발급을 등록했다면, 늦게 깨어난 대기자가
    /// 그 핸들이나 캐시를 덮어쓰면 안 됩니다 (동시 재발급 2건 유발).
    async fn settle(
        &self,
        awaited: &RefreshFuture,
        result: &Result<AccessToken, AuthError>,
    ) {
        let mut state = self.state.lock().await;
        let awaited_is_current = state
            .refresh
            .as_ref()
            .is_some_and(|in_flight| Shared::ptr_eq(in_flight, awaited));
        if awaited_is_current {
            state.refresh = None;
            if let Ok(token) = result {
                state.token = Some(token.clone());
            }
        }
    }

    /// 토큰 초기화.
    ///
    /// 인메모리 캐시를 비우고 영속 항목 두 개를 삭제합니다.
    /// 반복적인 인증 실패를 감지한 호출자가 다음 호출에서 재발급을
    /// 강제할 때 사용합니다. 항목이 없어도 에러가 아닙니다.
    pub async fn reset_token(&self) {
        let mut state = self.state.lock().await;
        state.token = None;
        self.store.delete(STORE_SERVICE, STORE_ACCOUNT_TOKEN);
        self.store.delete(STORE_SERVICE, STORE_ACCOUNT_EXPIRY);
        info!("토큰 초기화");
    }

    /// 토큰 발급 1회 수행 후 캐시/저장소 갱신용 토큰 반환.
    ///
    /// `Shared`로 감싸 여러 호출자가 동시에 기다릴 수 있도록
    /// `'static` future로 구성합니다.
    async fn issue(
        transport: HttpTransport,
        config: Arc<KisConfig>,
        store: Arc<dyn SecureStore>,
    ) -> Result<AccessToken, AuthError> {
        let endpoint = KisEndpoint::IssueToken.build(&config, None);
        let response: TokenResponse = transport.request(&endpoint).await?;

        let expires_at = parse_expiry(&response, Utc::now());
        let token = AccessToken {
            value: response.access_token,
            expires_at,
        };

        store.save(token.value.as_bytes(), STORE_SERVICE, STORE_ACCOUNT_TOKEN);
        match serde_json::to_vec(&token.expires_at) {
            Ok(bytes) => store.save(&bytes, STORE_SERVICE, STORE_ACCOUNT_EXPIRY),
            Err(e) => warn!(error = %e, "만료 시각 직렬화 실패"),
        }

        info!(expires_at = %token.expires_at, "토큰 발급 완료");
        Ok(token)
    }
}

/// 발급 응답에서 절대 만료 시각 계산.
///
/// `access_token_token_expired`("yyyy-MM-dd HH:mm:ss", KST 벽시계)를
/// 우선 사용하고, 없거나 파싱 불가하면 `now + expires_in`으로
/// 폴백합니다.
fn parse_expiry(response: &TokenResponse, now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(expired) = &response.access_token_token_expired {
        if let Ok(naive) = NaiveDateTime::parse_from_str(expired, "%Y-%m-%d %H:%M:%S") {
            if let Some(kst) = FixedOffset::east_opt(9 * 3600) {
                if let Some(datetime) = kst.from_local_datetime(&naive).single() {
                    return datetime.with_timezone(&Utc);
                }
            }
        }
        warn!(raw = %expired, "만료 시각 파싱 실패, expires_in으로 폴백");
    }
    now + Duration::seconds(response.expires_in)
}

// =============================================================================
// 테스트
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::kis::config::KisEnvironment;
    use crate::secure::MemoryStore;
    use futures::future::{join_all, pending, ready};

    const TOKEN_BODY: &str = r#"{
        "access_token": "fresh-token",
        "token_type": "Bearer",
        "expires_in": 86400,
        "access_token_token_expired": null
    }"#;

    fn config(base_url: &str) -> Arc<KisConfig> {
        Arc::new(
            KisConfig::new("key", "secret", "81234567", "01", KisEnvironment::Real)
                .with_base_url(base_url),
        )
    }

    fn seed_token(store: &MemoryStore, value: &str, expires_at: DateTime<Utc>) {
        store.save(value.as_bytes(), STORE_SERVICE, STORE_ACCOUNT_TOKEN);
        store.save(
            &serde_json::to_vec(&expires_at).unwrap(),
            STORE_SERVICE,
            STORE_ACCOUNT_EXPIRY,
        );
    }

    fn manager(base_url: &str, store: Arc<MemoryStore>) -> TokenManager {
        TokenManager::new(HttpTransport::new(), config(base_url), store)
    }

    #[tokio::test]
    async fn test_valid_cached_token_issues_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/tokenP")
            .expect(0)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::new());
        seed_token(&store, "cached-token", Utc::now() + Duration::hours(1));

        let manager = manager(&server.url(), store);
        let token = manager.get_valid_token().await.unwrap();

        assert_eq!(token, "cached-token");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_token_triggers_single_issuance() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/tokenP")
            .expect(1)
            .with_status(200)
            .with_body(TOKEN_BODY)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::new());
        seed_token(&store, "stale-token", Utc::now() - Duration::hours(1));

        let manager = manager(&server.url(), Arc::clone(&store));
        let token = manager.get_valid_token().await.unwrap();
        assert_eq!(token, "fresh-token");

        // 두 번째 호출은 캐시 히트
        let again = manager.get_valid_token().await.unwrap();
        assert_eq!(again, "fresh-token");
        mock.assert_async().await;

        // 저장소도 새 토큰으로 갱신됨
        assert_eq!(
            store.read(STORE_SERVICE, STORE_ACCOUNT_TOKEN),
            Some(b"fresh-token".to_vec())
        );
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/tokenP")
            .expect(1)
            .with_status(200)
            .with_body(TOKEN_BODY)
            .create_async()
            .await;

        let manager = Arc::new(manager(&server.url(), Arc::new(MemoryStore::new())));

        let calls = (0..5).map(|_| {
            let manager = Arc::clone(&manager);
            async move { manager.get_valid_token().await }
        });
        let results = join_all(calls).await;

        for result in results {
            assert_eq!(result.unwrap(), "fresh-token");
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/tokenP")
            .expect(1)
            .with_status(500)
            .create_async()
            .await;

        let manager = Arc::new(manager(&server.url(), Arc::new(MemoryStore::new())));

        let calls = (0..3).map(|_| {
            let manager = Arc::clone(&manager);
            async move { manager.get_valid_token().await }
        });
        let results = join_all(calls).await;

        for result in results {
            assert!(matches!(
                result,
                Err(AuthError::Issuance(TransportError::Status(500)))
            ));
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_late_failed_waiter_keeps_newer_refresh() {
        // 실패한 재발급의 대기자가 늦게 깨어나도, 그 사이 등록된
        // 새 재발급 핸들을 지우지 않는다.
        let manager = manager("http://unused.invalid", Arc::new(MemoryStore::new()));

        let stale: RefreshFuture = ready(Err(AuthError::Issuance(TransportError::Status(500))))
            .boxed()
            .shared();
        let stale_result = stale.clone().await;

        let fresh: RefreshFuture = pending::<Result<AccessToken, AuthError>>()
            .boxed()
            .shared();
        manager.state.lock().await.refresh = Some(fresh.clone());

        manager.settle(&stale, &stale_result).await;

        let state = manager.state.lock().await;
        assert!(state
            .refresh
            .as_ref()
            .is_some_and(|in_flight| Shared::ptr_eq(in_flight, &fresh)));
    }

    #[tokio::test]
    async fn test_late_success_waiter_does_not_overwrite_cache() {
        // 예전 재발급의 성공 결과가 늦게 도착해도, 이미 캐시된 더 새
        // 토큰을 덮어쓰지 않는다.
        let manager = manager("http://unused.invalid", Arc::new(MemoryStore::new()));

        let stale: RefreshFuture = ready(Ok(AccessToken {
            value: "old-token".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        }))
        .boxed()
        .shared();
        let stale_result = stale.clone().await;

        manager.state.lock().await.token = Some(AccessToken {
            value: "new-token".to_string(),
            expires_at: Utc::now() + Duration::hours(2),
        });

        manager.settle(&stale, &stale_result).await;

        let state = manager.state.lock().await;
        assert_eq!(state.token.as_ref().unwrap().value, "new-token");
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/tokenP")
            .expect(1)
            .with_status(200)
            .with_body(TOKEN_BODY)
            .create_async()
            .await;

        let store = Arc::new(MemoryStore::new());

        let first = manager(&server.url(), Arc::clone(&store));
        assert_eq!(first.get_valid_token().await.unwrap(), "fresh-token");
        drop(first);

        // 프로세스 재시작 시뮬레이션: 같은 저장소로 새 인스턴스 생성
        let second = manager(&server.url(), store);
        assert_eq!(second.get_valid_token().await.unwrap(), "fresh-token");

        // 두 인스턴스 합쳐 발급은 1회
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reset_token_clears_cache_and_store() {
        let store = Arc::new(MemoryStore::new());
        seed_token(&store, "cached-token", Utc::now() + Duration::hours(1));

        let manager = manager("http://unused.invalid", Arc::clone(&store));
        manager.reset_token().await;

        assert_eq!(store.read(STORE_SERVICE, STORE_ACCOUNT_TOKEN), None);
        assert_eq!(store.read(STORE_SERVICE, STORE_ACCOUNT_EXPIRY), None);

        // 캐시도 비워졌으므로 다음 호출은 재발급을 시도하고 실패함
        assert!(manager.get_valid_token().await.is_err());
    }

    #[tokio::test]
    async fn test_reset_token_on_empty_store_is_noop() {
        let manager = manager("http://unused.invalid", Arc::new(MemoryStore::new()));
        manager.reset_token().await;
    }

    #[test]
    fn test_parse_expiry_kst_wall_clock() {
        let response = TokenResponse {
            access_token: "t".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
            access_token_token_expired: Some("2026-08-30 09:00:00".to_string()),
        };
        let now = Utc::now();
        let expires_at = parse_expiry(&response, now);

        // KST 09:00 == UTC 00:00
        assert_eq!(
            expires_at,
            Utc.with_ymd_and_hms(2026, 8, 30, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_expiry_falls_back_to_expires_in() {
        let response = TokenResponse {
            access_token: "t".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            access_token_token_expired: Some("not-a-date".to_string()),
        };
        let now = Utc::now();
        assert_eq!(parse_expiry(&response, now), now + Duration::seconds(3600));
    }

    #[test]
    fn test_hydrate_ignores_corrupt_expiry() {
        let store = MemoryStore::new();
        store.save(b"token", STORE_SERVICE, STORE_ACCOUNT_TOKEN);
        store.save(b"not-json", STORE_SERVICE, STORE_ACCOUNT_EXPIRY);

        assert!(TokenManager::hydrate(&store).is_none());
    }
}
