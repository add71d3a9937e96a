//! Record source error types.

/// Why a fetch from the records service did not yield data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The requested record does not exist.
    #[error("Record not found")]
    NotFound,

    /// The credential was rejected (expired or invalid token).
    #[error("Unauthorized: the records service rejected the credential")]
    Unauthorized,

    /// The service answered with an error status or an error envelope.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection, DNS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}
