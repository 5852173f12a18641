use thiserror::Error;

/// Uniform failure channel for every gateway call. The UI only ever shows
/// `to_string()`, so each variant renders exactly the message the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never reached a server (connection refused, DNS, offline).
    #[error("{0}")]
    Network(String),

    /// The server answered with a failing status; `message` is extracted
    /// from the body (`error` > `message` > `detail`) or the status line.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A success status carried a body that is not well-formed JSON, or a
    /// body that does not decode into the expected type.
    #[error("{0}")]
    Protocol(String),

    /// A signin/signup success payload matched none of the accepted shapes.
    #[error("Unexpected response from server")]
    UnexpectedShape,
}

pub type ApiResult<T> = Result<T, ApiError>;
