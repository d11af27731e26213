//! File-based credential storage.
//!
//! The credential pair lives in a single JSON file:
//! ```json
//! {
//!   "schema_version": 1,
//!   "credentials": {
//!     "accessToken": "...",
//!     "refreshToken": "..."
//!   }
//! }
//! ```
//! Writes go to a sibling temp file that is then renamed over the target,
//! so readers see either the old pair or the new one, never a mix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fortuna_application::ports::{TokenStore, TokenStoreError};
use fortuna_domain::Credentials;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Current on-disk format version.
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CredentialsFile {
    schema_version: u32,
    credentials: Credentials,
}

/// Token store persisted to a JSON file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Creates a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `~/.fortuna/credentials.json`, if a home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".fortuna").join("credentials.json"))
    }

    /// Path of the credentials file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    #[cfg(unix)]
    async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
    }

    #[cfg(not(unix))]
    async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn credentials(&self) -> Result<Option<Credentials>, TokenStoreError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TokenStoreError::Io(e)),
        };

        let file: CredentialsFile = from_json_bytes(&content)
            .map_err(|e| TokenStoreError::Serialization(e.to_string()))?;
        if file.schema_version != SCHEMA_VERSION {
            warn!(
                path = %self.path.display(),
                found = file.schema_version,
                "unsupported credentials file version, ignoring"
            );
            return Ok(None);
        }
        Ok(Some(file.credentials))
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), TokenStoreError> {
        let content = to_json_stable_bytes(&CredentialsFile {
            schema_version: SCHEMA_VERSION,
            credentials: credentials.clone(),
        })
        .map_err(|e| TokenStoreError::Serialization(e.to_string()))?;

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, &content).await?;
        Self::restrict_permissions(&tmp).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "persisted credentials");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed credentials");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenStoreError::Io(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_means_signed_out() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("credentials.json"));

        assert_eq!(store.credentials().await.unwrap(), None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_creates_parent_and_replaces_pair() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");
        let store = FileTokenStore::new(&path);

        store.save(&Credentials::new("a1", "r1")).await.unwrap();
        store.save(&Credentials::new("a2", "r2")).await.unwrap();

        assert_eq!(
            store.credentials().await.unwrap(),
            Some(Credentials::new("a2", "r2"))
        );
        assert!(!store.temp_path().exists());
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"schema_version\": 1"));
        assert!(text.contains("\"refreshToken\": \"r2\""));
    }

    #[tokio::test]
    async fn test_survives_reopen_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        FileTokenStore::new(&path)
            .save(&Credentials::new("a1", "r1"))
            .await
            .unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(
            reopened.credentials().await.unwrap(),
            Some(Credentials::new("a1", "r1"))
        );

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(reopened.credentials().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let result = FileTokenStore::new(&path).credentials().await;

        assert!(matches!(result, Err(TokenStoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_unknown_version_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(
            &path,
            r#"{"schema_version": 9, "credentials": {"accessToken": "a", "refreshToken": "r"}}"#,
        )
        .unwrap();

        assert_eq!(FileTokenStore::new(&path).credentials().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        FileTokenStore::new(&path)
            .save(&Credentials::new("a", "r"))
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
