//! Notes listing over an authorized HTTP client

use oauth::AuthorizedClient;
use reqwest::StatusCode;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::models::{ListNotesParams, Note, NotesPage};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to notes endpoint failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to fetch notes: {code} {reason}")]
    UnexpectedStatus { code: u16, reason: String },

    #[error("failed to decode notes response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("notes request cancelled")]
    Cancelled,
}

/// Fetches the first page of notes, dropping the next-page token
pub async fn fetch_notes(
    client: &AuthorizedClient,
    endpoint: &str,
    cancel: &CancellationToken,
) -> Result<Vec<Note>, FetchError> {
    let page = fetch_notes_page(client, endpoint, &ListNotesParams::default(), cancel).await?;
    Ok(page.notes)
}

/// Fetches a single page of notes
pub async fn fetch_notes_page(
    client: &AuthorizedClient,
    endpoint: &str,
    params: &ListNotesParams,
    cancel: &CancellationToken,
) -> Result<NotesPage, FetchError> {
    debug!("GET {} with {:?}", endpoint, params);

    let request = client.get(endpoint).query(params).send();
    let response = cancel
        .run_until_cancelled(request)
        .await
        .ok_or(FetchError::Cancelled)?
        .map_err(FetchError::Request)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::UnexpectedStatus {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    let page: NotesPage = cancel
        .run_until_cancelled(response.json())
        .await
        .ok_or(FetchError::Cancelled)?
        .map_err(FetchError::Decode)?;

    info!("Fetched {} notes", page.notes.len());
    Ok(page)
}
