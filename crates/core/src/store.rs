//! Persisted token storage
//!
//! Sessions survive restarts through two independently keyed string entries,
//! the access token and the refresh token. Absence of either means there is
//! no session to resume.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CoreError, CoreResult};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Client-local key-value store for the session token pair
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn access_token(&self) -> CoreResult<Option<String>>;
    async fn refresh_token(&self) -> CoreResult<Option<String>>;
    async fn store_access_token(&self, token: &str) -> CoreResult<()>;
    async fn store_token_pair(&self, access: &str, refresh: &str) -> CoreResult<()>;
    async fn clear(&self) -> CoreResult<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: std::sync::Mutex<BTreeMap<&'static str, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("token store lock poisoned")
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn access_token(&self) -> CoreResult<Option<String>> {
        Ok(self.get(ACCESS_TOKEN_KEY))
    }

    async fn refresh_token(&self) -> CoreResult<Option<String>> {
        Ok(self.get(REFRESH_TOKEN_KEY))
    }

    async fn store_access_token(&self, token: &str) -> CoreResult<()> {
        self.entries
            .lock()
            .expect("token store lock poisoned")
            .insert(ACCESS_TOKEN_KEY, token.to_string());
        Ok(())
    }

    async fn store_token_pair(&self, access: &str, refresh: &str) -> CoreResult<()> {
        let mut entries = self.entries.lock().expect("token store lock poisoned");
        entries.insert(ACCESS_TOKEN_KEY, access.to_string());
        entries.insert(REFRESH_TOKEN_KEY, refresh.to_string());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        self.entries
            .lock()
            .expect("token store lock poisoned")
            .clear();
        Ok(())
    }
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct TokenRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// JSON-file-backed store under the platform data directory
///
/// Reads and writes go through a single mutex so a refresh persisting a new
/// access token cannot interleave with a logout clearing the file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    io: tokio::sync::Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: tokio::sync::Mutex::new(()),
        }
    }

    /// Store at the conventional per-user location
    pub fn at_default_path() -> CoreResult<Self> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| CoreError::storage("no local data directory for this platform"))?;
        Ok(Self::new(base.join("warden").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_record(&self) -> CoreResult<TokenRecord> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(TokenRecord::default()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_record(&self, record: &TokenRecord) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn access_token(&self) -> CoreResult<Option<String>> {
        let _guard = self.io.lock().await;
        Ok(self.read_record().await?.access_token)
    }

    async fn refresh_token(&self) -> CoreResult<Option<String>> {
        let _guard = self.io.lock().await;
        Ok(self.read_record().await?.refresh_token)
    }

    async fn store_access_token(&self, token: &str) -> CoreResult<()> {
        let _guard = self.io.lock().await;
        let mut record = self.read_record().await?;
        record.access_token = Some(token.to_string());
        self.write_record(&record).await
    }

    async fn store_token_pair(&self, access: &str, refresh: &str) -> CoreResult<()> {
        let _guard = self.io.lock().await;
        let record = TokenRecord {
            access_token: Some(access.to_string()),
            refresh_token: Some(refresh.to_string()),
        };
        self.write_record(&record).await
    }

    async fn clear(&self) -> CoreResult<()> {
        let _guard = self.io.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared persisted session");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// Mock implementation for downstream tests
#[cfg(any(test, feature = "tests"))]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub TokenStore {}

        #[async_trait]
        impl TokenStore for TokenStore {
            async fn access_token(&self) -> CoreResult<Option<String>>;
            async fn refresh_token(&self) -> CoreResult<Option<String>>;
            async fn store_access_token(&self, token: &str) -> CoreResult<()>;
            async fn store_token_pair(&self, access: &str, refresh: &str) -> CoreResult<()>;
            async fn clear(&self) -> CoreResult<()>;
        }
    }
}
