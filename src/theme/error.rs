//! Theme engine error types

use thiserror::Error;

/// Rendering errors
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Template missing from the embedded set
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template parsing or rendering error
    #[error("Template error: {0}")]
    TemplateError(String),
}

impl From<tera::Error> for ThemeError {
    fn from(e: tera::Error) -> Self {
        // Tera keeps the useful part of the message in the source chain.
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        ThemeError::TemplateError(message)
    }
}
