//! Persisted login session.
//!
//! The file store writes a sibling temp file and renames it over the target
//! so a crash mid-write never leaves a truncated session behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fastman_client::{ApiClient, ChoiceId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Everything needed to resume as an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub domain: String,
    pub username: String,
    pub company_id: ChoiceId,
    pub access_token: String,
    pub personnel_id: ChoiceId,
    pub personnel_name: String,
}

impl Session {
    /// Bind `client` to this session's tenant and credential.
    pub fn apply(&self, client: &mut ApiClient) -> fastman_client::Result<()> {
        client.set_domain(&self.domain)?;
        client.set_auth_token(self.access_token.clone());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is invalid: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait BaseSessionStore: Send + Sync {
    async fn load(&self) -> StoreResult<Option<Session>>;
    async fn save(&self, session: &Session) -> StoreResult<()>;
    /// Remove the stored session; a no-op when nothing is stored.
    async fn clear(&self) -> StoreResult<()>;
}

/// JSON file on disk.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl BaseSessionStore for FileSessionStore {
    async fn load(&self) -> StoreResult<Option<Session>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored session");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, session: &Session) -> StoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let content = serde_json::to_string_pretty(session)?;
        let temp = self.temp_path();
        // Mode only applies on create, so a leftover temp must not be reused
        match tokio::fs::remove_file(&temp).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        // Holds a bearer token: owner read/write only
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&temp).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&temp, &self.path).await?;
        info!(path = %self.path.display(), username = %session.username, "Session saved");
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and ephemeral runs. Holds the serialized
/// form so round trips go through the same encoding as the file store.
#[derive(Default)]
pub struct MemorySessionStore {
    content: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseSessionStore for MemorySessionStore {
    async fn load(&self) -> StoreResult<Option<Session>> {
        match self.content.lock().await.as_deref() {
            Some(content) => Ok(Some(serde_json::from_str(content)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> StoreResult<()> {
        *self.content.lock().await = Some(serde_json::to_string(session)?);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        *self.content.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            domain: "acme".into(),
            username: "jperez".into(),
            company_id: 3,
            access_token: "tok".into(),
            personnel_id: 12,
            personnel_name: "Juan Pérez".into(),
        }
    }

    #[tokio::test]
    async fn test_file_store_round_trip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));

        assert_eq!(store.load().await.unwrap(), None);
        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session()));
        assert!(!store.temp_path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        // A stale world-readable temp from an interrupted save
        std::fs::write(store.temp_path(), "{}").unwrap();
        std::fs::set_permissions(store.temp_path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&session()).await.unwrap();

        let mode = std::fs::metadata(dir.path().join("session.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o077, 0, "session file mode is {:o}", mode);
    }

    #[tokio::test]
    async fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(&session()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileSessionStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialize(_)));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySessionStore::new();
        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session()));
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }
}
