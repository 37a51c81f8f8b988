//! Google Keep notes client
//!
//! Lists notes through an [`oauth::AuthorizedClient`] and decodes the
//! paginated response into typed records.

pub mod client;
pub mod models;

pub use client::{fetch_notes, fetch_notes_page, FetchError};
pub use models::{ListNotesParams, Note, NotesPage};
