//! Custody desk client errors.

use thiserror::Error;

/// Errors that can occur when talking to the custody desk.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// The desk answered with a non-success HTTP status.
    #[error("Custody desk returned {status}: {body}")]
    Api {
        /// HTTP status code returned by the desk.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The request failed before a response arrived.
    #[error("Custody request failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected shape.
    #[error("Invalid custody response: {0}")]
    InvalidResponse(String),
}
