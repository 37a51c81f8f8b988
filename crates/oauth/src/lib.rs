//! Google OAuth 2.0 authorization-code flow for gkeep
//!
//! This crate obtains an access token for the Keep API, either from the local
//! token cache or by walking the user through the authorization-code grant,
//! and wraps it in an HTTP client that sends it as a bearer credential.

pub mod client;
pub mod flow;
pub mod storage;
pub mod tokens;

pub use client::AuthorizedClient;
pub use flow::{AuthError, Authenticator, CodeProvider, PromptCodeProvider, StdinCodeProvider};
pub use storage::{StorageError, TokenStore};
pub use tokens::{Token, TokenStatus};
