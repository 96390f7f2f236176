//! AniList GraphQL client: queries, response extraction and error
//! classification.

mod client;
pub mod extract;
pub mod queries;

pub use client::{AniListClient, FetchedStats, DEFAULT_ENDPOINT};
use thiserror::Error;

use crate::ports::http::ErrorKind;

#[derive(Debug, Error)]
pub enum AniListError {
    #[error("AniList rate limit exceeded")]
    RateLimited,
    #[error("AniList server error (try again)")]
    ServerError,
    #[error("AniList user '{0}' not found")]
    UserNotFound(String),
    #[error("AniList returned status {0}")]
    Status(u16),
    #[error("AniList request failed: {0:?}")]
    Transport(ErrorKind),
    #[error("AniList response missing {0}")]
    MissingData(String),
    #[error("AniList response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
