use thiserror::Error;

/// Failure taxonomy for the personalization core.
///
/// Nothing here is fatal to the surrounding process: every condition degrades
/// to a smaller or neutral output at the facade surface. The variants exist so
/// internal layers can report precisely what was degraded and why.
#[derive(Debug, Error)]
pub enum PersonalizationError {
    #[error("no subscriber profile available for user {0}")]
    MissingProfile(String),

    #[error("invalid content item: {0}")]
    InvalidContent(String),

    #[error("behavior storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, PersonalizationError>;
