/// Crate-wide result alias.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Errors surfaced by the marker rendering engine.
///
/// `Data` covers bad upstream input (missing floor image, unknown mounting, non-finite
/// coordinates) and is recovered by skipping the affected marker or floor. `Render` covers
/// failures of the drawing machinery itself and is caught per floor by the orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Invalid configuration or argument.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or malformed upstream data.
    #[error("data error: {0}")]
    Data(String),

    /// Image decode, rasterization or encode failure.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually I/O with attached context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OverlayError::Data`].
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build an [`OverlayError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`OverlayError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
