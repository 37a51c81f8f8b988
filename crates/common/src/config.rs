//! Runtime configuration loaded from the environment
//!
//! All process-wide state (environment variables, the home directory) is read
//! once by [`Config::load`]; later components only see the returned value.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::*;
use crate::platform;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("client ID and client secret must be set (GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET)")]
    MissingCredentials,

    #[error("could not determine the user home directory")]
    HomeDirUnavailable,
}

/// Immutable client configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,

    /// Provider authorization endpoint
    pub auth_url: String,

    /// Provider token exchange endpoint
    pub token_url: String,

    /// Provider token introspection endpoint
    pub token_info_url: String,

    /// Where the OAuth token is cached between runs
    pub token_file: PathBuf,

    /// Notes listing endpoint
    pub api_endpoint: String,

    pub scopes: Vec<String>,
}

impl Config {
    /// Loads configuration from the environment, after a best-effort `.env` load
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {:?}", path),
            Err(e) => warn!("Error loading .env file: {}", e),
        }
        Self::from_env()
    }

    /// Like [`Config::load`], reading the environment file from an explicit path
    pub fn load_with_env_file(env_file: &Path) -> Result<Self, ConfigError> {
        match dotenvy::from_path(env_file) {
            Ok(()) => debug!("Loaded environment from {:?}", env_file),
            Err(e) => warn!("Error loading {:?}: {}", env_file, e),
        }
        Self::from_env()
    }

    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), platform::home_dir)
    }

    /// Builds the configuration from a variable lookup and a home directory resolver.
    ///
    /// Credentials are checked first, so a missing credential never touches the
    /// filesystem. The home directory is only resolved when no token file is set.
    pub fn from_lookup<L, H>(lookup: L, home: H) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
        H: FnOnce() -> Option<PathBuf>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let (client_id, client_secret) =
            match (non_empty(ENV_CLIENT_ID), non_empty(ENV_CLIENT_SECRET)) {
                (Some(id), Some(secret)) => (id, secret),
                _ => return Err(ConfigError::MissingCredentials),
            };

        let redirect_url =
            non_empty(ENV_REDIRECT_URL).unwrap_or_else(|| DEFAULT_REDIRECT_URL.to_string());

        let token_file = match non_empty(ENV_TOKEN_FILE) {
            Some(path) => PathBuf::from(path),
            None => {
                let home = home().ok_or(ConfigError::HomeDirUnavailable)?;
                platform::default_token_path(&home)
            }
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_url,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            token_info_url: GOOGLE_TOKEN_INFO_URL.to_string(),
            token_file,
            api_endpoint: KEEP_NOTES_ENDPOINT.to_string(),
            scopes: KEEP_SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_url", &self.redirect_url)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("token_info_url", &self.token_info_url)
            .field("token_file", &self.token_file)
            .field("api_endpoint", &self.api_endpoint)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn no_home() -> Option<PathBuf> {
        panic!("home directory must not be resolved")
    }

    #[test]
    fn test_missing_client_id() {
        let result = Config::from_lookup(lookup(&[(ENV_CLIENT_SECRET, "secret")]), no_home);
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_missing_client_secret() {
        let result = Config::from_lookup(lookup(&[(ENV_CLIENT_ID, "id")]), no_home);
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_empty_credentials_are_missing() {
        let result = Config::from_lookup(
            lookup(&[(ENV_CLIENT_ID, ""), (ENV_CLIENT_SECRET, "secret")]),
            no_home,
        );
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(
            lookup(&[(ENV_CLIENT_ID, "id"), (ENV_CLIENT_SECRET, "secret")]),
            || Some(PathBuf::from("/home/alice")),
        )
        .unwrap();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.redirect_url, DEFAULT_REDIRECT_URL);
        assert_eq!(config.token_file, PathBuf::from("/home/alice/.gkeep_token.json"));
        assert_eq!(config.api_endpoint, KEEP_NOTES_ENDPOINT);
        assert_eq!(config.token_url, GOOGLE_TOKEN_URL);
        assert!(!config.scopes.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(
            lookup(&[
                (ENV_CLIENT_ID, "id"),
                (ENV_CLIENT_SECRET, "secret"),
                (ENV_REDIRECT_URL, "http://127.0.0.1:9999/cb"),
                (ENV_TOKEN_FILE, "/tmp/token.json"),
            ]),
            no_home,
        )
        .unwrap();

        assert_eq!(config.redirect_url, "http://127.0.0.1:9999/cb");
        assert_eq!(config.token_file, PathBuf::from("/tmp/token.json"));
    }

    #[test]
    fn test_home_dir_unavailable() {
        let result = Config::from_lookup(
            lookup(&[(ENV_CLIENT_ID, "id"), (ENV_CLIENT_SECRET, "secret")]),
            || None,
        );
        assert!(matches!(result, Err(ConfigError::HomeDirUnavailable)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_lookup(
            lookup(&[
                (ENV_CLIENT_ID, "id"),
                (ENV_CLIENT_SECRET, "hunter2"),
                (ENV_TOKEN_FILE, "/tmp/token.json"),
            ]),
            no_home,
        )
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
