//! File-backed token cache
//!
//! The token file holds a single JSON-encoded [`Token`] and is readable by the
//! owner only. Writes go to a sibling temporary file which is then renamed
//! over the target, so a write that fails before the rename leaves the
//! previous token intact.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::tokens::Token;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no token file at {0:?}")]
    NotFound(PathBuf),

    #[error("failed to access token file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed token file {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode token: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Handles persistent storage of the OAuth token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached token from disk
    pub fn read(&self) -> Result<Token, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let token = serde_json::from_str(&content).map_err(|source| StorageError::Decode {
            path: self.path.clone(),
            source,
        })?;

        debug!("Loaded token from {:?}", self.path);
        Ok(token)
    }

    /// Saves the token, replacing any previous one.
    ///
    /// The temporary file is always `<name>.tmp`, not unique per process, so
    /// concurrent writers share it.
    pub fn write(&self, token: &Token) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(token).map_err(StorageError::Encode)?;
        let temp_path = self.temp_path();

        let result = Self::write_private(&temp_path, &content)
            .and_then(|()| fs::rename(&temp_path, &self.path));

        if let Err(source) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::Io {
                path: self.path.clone(),
                source,
            });
        }

        debug!("Saved token to {:?}", self.path);
        Ok(())
    }

    fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;

        // mode() only applies when the file is created
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content)?;
        file.sync_all()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("token"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_store() -> (TokenStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TokenStore::new(temp_dir.path().join("token.json"));
        (store, temp_dir)
    }

    fn sample_token() -> Token {
        Token {
            access_token: "access".into(),
            token_type: "Bearer".into(),
            refresh_token: Some("refresh".into()),
            expiry: Some(Utc.with_ymd_and_hms(2031, 3, 4, 5, 6, 7).unwrap()),
        }
    }

    #[test]
    fn test_write_and_read_token() {
        let (store, _temp) = create_test_store();
        let token = sample_token();

        store.write(&token).unwrap();

        assert_eq!(store.read().unwrap(), token);
    }

    #[test]
    fn test_write_replaces_previous_token() {
        let (store, _temp) = create_test_store();
        store.write(&sample_token()).unwrap();

        let mut newer = sample_token();
        newer.access_token = "newer".into();
        newer.refresh_token = None;
        store.write(&newer).unwrap();

        assert_eq!(store.read().unwrap(), newer);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_temp_file_is_fixed_sibling() {
        let (store, temp) = create_test_store();
        assert_eq!(store.temp_path(), temp.path().join("token.json.tmp"));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = create_test_store();
        store.write(&sample_token()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_read_missing_file() {
        let (store, _temp) = create_test_store();
        assert!(matches!(store.read(), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_read_malformed_file() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.read(), Err(StorageError::Decode { .. })));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = TokenStore::new(temp_dir.path().join("missing").join("token.json"));
        assert!(matches!(
            store.write(&sample_token()),
            Err(StorageError::Io { .. })
        ));
    }
}
