//! HTTP client that attaches the bearer token to every request

use reqwest::{IntoUrl, Method, RequestBuilder};

use crate::tokens::Token;

/// Wraps a plain [`reqwest::Client`] and adds `Authorization: Bearer <token>`
/// to each request built through it.
#[derive(Debug, Clone)]
pub struct AuthorizedClient {
    inner: reqwest::Client,
    token: Token,
}

impl AuthorizedClient {
    pub fn new(inner: reqwest::Client, token: Token) -> Self {
        Self { inner, token }
    }

    /// The token attached to outgoing requests
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.inner
            .request(method, url)
            .bearer_auth(&self.token.access_token)
    }

    pub fn get<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.request(Method::GET, url)
    }
}
