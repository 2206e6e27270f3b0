use thiserror::Error;

/// Failure of a read against a data source.
///
/// A missing single entity is not an error: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not be completed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client could not be built from its configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
