//! OAuth 2.0 Authorization Code flow with a cached token
//!
//! 1. Reuse the cached token when it is still valid
//! 2. Otherwise print the authorization URL and read the code the user pastes back
//! 3. Exchange the code for a token and cache it
//! 4. Hand out an [`AuthorizedClient`] carrying the token

use async_trait::async_trait;
use common::Config;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::AuthorizedClient;
use crate::storage::{StorageError, TokenStore};
use crate::tokens::{describe_token_error, verify_access_token, Token, TokenResponse, TokenStatus};

/// Anti-forgery state sent with the authorization request
pub const STATE_TOKEN: &str = "state-token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unable to read authorization code: {0}")]
    AuthCodeRead(#[source] io::Error),

    #[error("unable to retrieve token: {0}")]
    TokenExchange(String),

    #[error("authentication cancelled")]
    Cancelled,
}

/// Supplies the authorization code after the user has visited the authorization URL
#[async_trait]
pub trait CodeProvider: Send {
    async fn authorization_code(&mut self, auth_url: &str) -> io::Result<String>;
}

/// Prints the authorization URL and reads the code from a line-oriented input
pub struct PromptCodeProvider<R, W> {
    reader: R,
    writer: W,
}

/// Prompt on the process's stdout, read from its stdin
pub type StdinCodeProvider = PromptCodeProvider<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdinCodeProvider {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> PromptCodeProvider<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

#[async_trait]
impl<R, W> CodeProvider for PromptCodeProvider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn authorization_code(&mut self, auth_url: &str) -> io::Result<String> {
        let prompt = format!(
            "Go to the following link in your browser: \n{}\nEnter the authorization code: ",
            auth_url
        );
        self.writer.write_all(prompt.as_bytes()).await?;
        self.writer.flush().await?;

        // First whitespace-delimited word, skipping blank lines
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before an authorization code was entered",
                ));
            }
            if let Some(code) = line.split_whitespace().next() {
                return Ok(code.to_string());
            }
        }
    }
}

/// Runs the authorization-code flow against the configured provider
pub struct Authenticator {
    config: Config,
    http: reqwest::Client,
    store: TokenStore,
}

impl Authenticator {
    pub fn new(config: Config) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: Config, http: reqwest::Client) -> Self {
        let store = TokenStore::new(config.token_file.clone());
        Self {
            config,
            http,
            store,
        }
    }

    /// Returns the URL the user must visit to grant access
    pub fn authorization_url(&self) -> String {
        let scopes = self.config.scopes.join(" ");
        format!(
            "{}?access_type=offline&client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_url),
            urlencoding::encode(&scopes),
            STATE_TOKEN,
        )
    }

    /// Returns a client carrying a valid token, prompting for a code if needed
    pub async fn obtain_client<P>(
        &self,
        provider: &mut P,
        cancel: &CancellationToken,
    ) -> Result<AuthorizedClient, AuthError>
    where
        P: CodeProvider + ?Sized,
    {
        let token = self.obtain_token(provider, cancel).await?;
        Ok(AuthorizedClient::new(self.http.clone(), token))
    }

    /// Returns the cached token if usable, otherwise runs the interactive exchange once
    pub async fn obtain_token<P>(
        &self,
        provider: &mut P,
        cancel: &CancellationToken,
    ) -> Result<Token, AuthError>
    where
        P: CodeProvider + ?Sized,
    {
        if let Some(token) = self.cached_token(cancel).await? {
            return Ok(token);
        }

        let auth_url = self.authorization_url();
        let code = cancel
            .run_until_cancelled(provider.authorization_code(&auth_url))
            .await
            .ok_or(AuthError::Cancelled)?
            .map_err(AuthError::AuthCodeRead)?;

        let token = self.exchange_code(&code, cancel).await?;

        if let Err(e) = self.store.write(&token) {
            warn!("Failed to save token: {}", e);
        }

        Ok(token)
    }

    /// Loads the cached token, returning `None` when the user must authorize again
    async fn cached_token(&self, cancel: &CancellationToken) -> Result<Option<Token>, AuthError> {
        let token = match self.store.read() {
            Ok(token) => token,
            Err(StorageError::NotFound(path)) => {
                debug!("No cached token at {:?}", path);
                return Ok(None);
            }
            Err(e) => {
                warn!("Ignoring cached token: {}", e);
                return Ok(None);
            }
        };

        match token.status() {
            TokenStatus::Valid => {
                info!("Using cached token from {:?}", self.store.path());
                Ok(Some(token))
            }
            TokenStatus::Expired => {
                info!("Cached token has expired");
                Ok(None)
            }
            TokenStatus::Unverified => {
                let verified = cancel
                    .run_until_cancelled(verify_access_token(
                        &self.http,
                        &self.config.token_info_url,
                        &token.access_token,
                    ))
                    .await
                    .ok_or(AuthError::Cancelled)?;

                match verified {
                    Ok(true) => {
                        info!("Cached token without expiry accepted by provider");
                        Ok(Some(token))
                    }
                    Ok(false) => {
                        info!("Cached token rejected by provider");
                        Ok(None)
                    }
                    Err(e) => {
                        warn!("Could not verify cached token: {}", e);
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Exchanges the authorization code for a token
    pub async fn exchange_code(
        &self,
        code: &str,
        cancel: &CancellationToken,
    ) -> Result<Token, AuthError> {
        info!("Exchanging authorization code for tokens");

        let request = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send();

        let response = cancel
            .run_until_cancelled(request)
            .await
            .ok_or(AuthError::Cancelled)?
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = cancel
                .run_until_cancelled(response.text())
                .await
                .ok_or(AuthError::Cancelled)?
                .unwrap_or_default();
            return Err(AuthError::TokenExchange(describe_token_error(status, &body)));
        }

        let issued_at = chrono::Utc::now();
        let token_response: TokenResponse = cancel
            .run_until_cancelled(response.json())
            .await
            .ok_or(AuthError::Cancelled)?
            .map_err(|e| AuthError::TokenExchange(format!("malformed token response: {}", e)))?;

        info!("Successfully obtained access token");
        Ok(token_response.into_token(issued_at))
    }
}
