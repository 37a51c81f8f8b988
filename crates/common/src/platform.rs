use std::path::PathBuf;
use tracing::debug;

use crate::constants::DEFAULT_TOKEN_FILE_NAME;

/// Resolves the current user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    let home = dirs::home_dir();
    debug!("Resolved home directory: {:?}", home);
    home
}

/// Default token cache location under the given home directory.
pub fn default_token_path(home: &std::path::Path) -> PathBuf {
    home.join(DEFAULT_TOKEN_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_path() {
        let path = default_token_path(std::path::Path::new("/home/alice"));
        assert_eq!(path, PathBuf::from("/home/alice/.gkeep_token.json"));
    }
}
