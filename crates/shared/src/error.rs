use thiserror::Error;

/// Failure talking to a model endpoint.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned an unreadable response: {0}")]
    InvalidResponse(String),
    #[error("model returned no candidates")]
    EmptyCandidates,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("medical text must not be empty")]
    EmptyTopic,
    #[error("failed to generate scene details from the text model: {0}")]
    IncompleteScene(String),
    #[error("failed to generate image")]
    NoImage,
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("edit instruction must not be empty")]
    EmptyInstruction,
    #[error("invalid image data URI")]
    InvalidImageData,
    #[error("failed to generate integration details from the text model: {0}")]
    IncompleteIntegration(String),
    #[error("failed to edit image: the model did not return an image")]
    NoImage,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Rejected orchestrator transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("another operation is still running")]
    Busy,
    #[error("no scene has been generated yet")]
    NoScene,
    #[error("no {0} operation is in flight")]
    NotInFlight(&'static str),
}
