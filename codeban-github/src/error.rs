//! Error types for codeban-github.

use thiserror::Error;

/// All errors that can arise from remote host calls.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The host rejected the write because the file changed since its prior
    /// contents were read (lost-update race). Never retried silently.
    #[error("precondition failed for '{path}': file changed on the remote since it was read")]
    PreconditionFailed { path: String },

    /// Non-success HTTP status outside the precondition case.
    #[error("remote host returned {status} for {url}")]
    Http { status: u16, url: String },

    /// Transport-level failure (DNS, TLS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The host's response body did not match the expected shape.
    #[error("unexpected response from remote host: {0}")]
    Decode(#[from] std::io::Error),
}
