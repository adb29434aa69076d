use shared::error::{EditError, GenerationError, SessionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("missing API key: set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,
    #[error("invalid model API base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Failure surfaced by the orchestrator to its caller.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Edit(#[from] EditError),
}
