use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("missing languages string")]
    MissingLanguages,
    #[error("invalid languages string: {0}")]
    InvalidLanguages(String),
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("engine error: {0}")]
    EngineError(String),
    #[error("bounding box lookup failed: {0}")]
    Geometry(String),
    #[error("no recognition engine installed")]
    NoEngine,
    #[error("a recognition engine is already installed")]
    EngineAlreadyInstalled,
    #[error("invalid recording: {0}")]
    InvalidRecording(#[from] serde_json::Error),
}

impl OcrError {
    /// Errors detected before the engine is ever invoked.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            OcrError::MissingLanguages | OcrError::InvalidLanguages(_) | OcrError::InvalidImage(_)
        )
    }
}
