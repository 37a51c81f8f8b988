//! Provider constants for Google Keep access

/// Environment variable holding the OAuth client ID
pub const ENV_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";

/// Environment variable holding the OAuth client secret
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";

/// Environment variable overriding the redirect URL
pub const ENV_REDIRECT_URL: &str = "GOOGLE_REDIRECT_URL";

/// Environment variable overriding the token cache path
pub const ENV_TOKEN_FILE: &str = "GOOGLE_TOKEN_FILE";

/// Redirect URL used when none is configured
pub const DEFAULT_REDIRECT_URL: &str = "http://localhost:8080/callback";

/// Token cache file name, placed in the user's home directory
pub const DEFAULT_TOKEN_FILE_NAME: &str = ".gkeep_token.json";

/// Google OAuth authorization endpoint
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google OAuth token exchange endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google token introspection endpoint, used for tokens without an expiry
pub const GOOGLE_TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Keep notes listing endpoint
pub const KEEP_NOTES_ENDPOINT: &str = "https://keep.googleapis.com/v1/notes";

/// Requested OAuth scopes.
///
/// Keep has no consumer scope of its own, so only identity scopes are requested.
pub const KEEP_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
    "openid",
];
