//! 보안 blob 저장소.
//!
//! (service, account) 키로 바이트 blob을 저장/조회/삭제하는
//! 최소 인터페이스입니다. 토큰 영속화에만 사용되며 트랜잭션 보장은
//! 없습니다 (last-write-wins).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// 보안 저장소 trait.
///
/// 실패해도 호출자 흐름을 깨지 않는 best-effort 계약입니다.
/// `read`는 키가 없으면 `None`, `delete`는 키가 없어도 조용히 성공합니다.
pub trait SecureStore: Send + Sync {
    /// blob 저장. 기존 값이 있으면 덮어씁니다.
    fn save(&self, data: &[u8], service: &str, account: &str);

    /// blob 조회. 없으면 `None`.
    fn read(&self, service: &str, account: &str) -> Option<Vec<u8>>;

    /// blob 삭제. 없어도 에러가 아닙니다.
    fn delete(&self, service: &str, account: &str);
}

// =============================================================================
// 메모리 저장소 (MemoryStore)
// =============================================================================

/// 인메모리 저장소.
///
/// 테스트와 데모 바이너리에서 사용합니다.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureStore for MemoryStore {
    fn save(&self, data: &[u8], service: &str, account: &str) {
        let mut entries = self.entries.lock().expect("MemoryStore lock poisoned");
        entries.insert((service.to_string(), account.to_string()), data.to_vec());
    }

    fn read(&self, service: &str, account: &str) -> Option<Vec<u8>> {
        let entries = self.entries.lock().expect("MemoryStore lock poisoned");
        entries
            .get(&(service.to_string(), account.to_string()))
            .cloned()
    }

    fn delete(&self, service: &str, account: &str) {
        let mut entries = self.entries.lock().expect("MemoryStore lock poisoned");
        entries.remove(&(service.to_string(), account.to_string()));
    }
}

// =============================================================================
// 파일 저장소 (FileStore)
// =============================================================================

/// 파일 직렬화 포맷.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FileEntries {
    entries: HashMap<String, Vec<u8>>,
}

/// JSON 파일 기반 저장소.
///
/// 프로세스 재시작 간 토큰을 유지합니다. 파일 접근은 Mutex로
/// 직렬화되며, 읽기/쓰기 실패는 경고 로그 후 무시됩니다.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// 지정 경로의 파일 저장소 생성. 파일이 없으면 첫 저장 시 생성됩니다.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> FileEntries {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => FileEntries::default(),
        }
    }

    fn persist(&self, entries: &FileEntries) {
        match serde_json::to_vec(entries) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&self.path, bytes) {
                    warn!(path = %self.path.display(), error = %e, "토큰 저장소 쓰기 실패");
                }
            }
            Err(e) => warn!(error = %e, "토큰 저장소 직렬화 실패"),
        }
    }

    fn key(service: &str, account: &str) -> String {
        format!("{}/{}", service, account)
    }
}

impl SecureStore for FileStore {
    fn save(&self, data: &[u8], service: &str, account: &str) {
        let _guard = self.lock.lock().expect("FileStore lock poisoned");
        let mut entries = self.load();
        entries
            .entries
            .insert(Self::key(service, account), data.to_vec());
        self.persist(&entries);
    }

    fn read(&self, service: &str, account: &str) -> Option<Vec<u8>> {
        let _guard = self.lock.lock().expect("FileStore lock poisoned");
        self.load().entries.get(&Self::key(service, account)).cloned()
    }

    fn delete(&self, service: &str, account: &str) {
        let _guard = self.lock.lock().expect("FileStore lock poisoned");
        let mut entries = self.load();
        entries.entries.remove(&Self::key(service, account));
        self.persist(&entries);
    }
}

// =============================================================================
// 테스트
// =============================================================================
