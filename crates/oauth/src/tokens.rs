//! Token types and provider-side token checks

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Tokens closer than this to their expiry are treated as expired
const EXPIRY_LEEWAY_SECS: i64 = 10;

/// An OAuth token as cached in the token file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// OAuth access token
    pub access_token: String,

    /// Usually `Bearer`
    #[serde(default)]
    pub token_type: String,

    /// Long-lived refresh token, only issued for offline access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token expires, if the provider said so
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry: Option<DateTime<Utc>>,
}

/// Whether a token can be used without asking the user again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    Expired,
    /// No expiry is known; only the provider can tell
    Unverified,
}

impl Token {
    pub fn status(&self) -> TokenStatus {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        if self.access_token.is_empty() {
            return TokenStatus::Expired;
        }
        match self.expiry {
            Some(expiry) if now + chrono::Duration::seconds(EXPIRY_LEEWAY_SECS) < expiry => {
                TokenStatus::Valid
            }
            Some(_) => TokenStatus::Expired,
            None => TokenStatus::Unverified,
        }
    }
}

/// Some OAuth libraries write the zero timestamp instead of omitting the expiry
fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let expiry: Option<DateTime<Utc>> = Option::deserialize(deserializer)?;
    Ok(expiry.filter(|t| t.year() > 1))
}

/// Response from the provider's token endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    pub(crate) fn into_token(self, issued_at: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self.refresh_token,
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| issued_at + chrono::Duration::seconds(secs)),
        }
    }
}

/// Error response from the provider's token endpoint
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Builds a readable reason from a rejected token request
pub(crate) fn describe_token_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(resp) => match resp.error_description {
            Some(description) => format!("{} ({}): {}", status, resp.error, description),
            None => format!("{} ({})", status, resp.error),
        },
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{}: {}", status, body.trim()),
    }
}

/// Asks the provider whether an access token is still accepted
pub async fn verify_access_token(
    http: &reqwest::Client,
    token_info_url: &str,
    access_token: &str,
) -> Result<bool, reqwest::Error> {
    let response = http
        .get(token_info_url)
        .query(&[("access_token", access_token)])
        .send()
        .await?;

    debug!("Token info endpoint answered {}", response.status());
    Ok(response.status().is_success())
}
