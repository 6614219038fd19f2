use thiserror::Error;

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Failures of a single render attempt. None of them are fatal to the host process.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The upload contained no non-blank sections.
    #[error("no caption sections found in input")]
    EmptyInput,

    /// The drawing surface or the PNG encoder failed.
    #[error("render backend failure: {0}")]
    RenderBackendFailure(String),

    /// A configured font could not be read or parsed.
    #[error("font error: {0}")]
    Font(String),
}

impl RenderError {
    pub(crate) fn backend(message: impl Into<String>) -> Self {
        RenderError::RenderBackendFailure(message.into())
    }
}
