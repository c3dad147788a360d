/// Convenience result type used across the card engine.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only the variants returned from the public loaders and [`crate::process_job`]
/// are fatal. Missing assets, unreadable fonts and failed subject isolation are
/// degraded in place and only logged.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid, missing or unreadable template/job configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A text block references a placeholder the job does not provide.
    #[error("substitution error: {0}")]
    Substitution(String),

    /// Raster decode/encode problems.
    #[error("image error: {0}")]
    Image(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CardError::Substitution`] value.
    pub fn substitution(msg: impl Into<String>) -> Self {
        Self::Substitution(msg.into())
    }

    /// Build a [`CardError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// `true` for errors that abort the whole run rather than a single job.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
