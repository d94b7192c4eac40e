use reqwest::StatusCode;
use thiserror::Error;

/// Faults from the remote speech and language services.
///
/// The transcription pipeline treats all of these as fatal; the synthesis
/// loop reports `Status` per row and keeps going.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("missing field `{0}` in service response")]
    MissingField(&'static str),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
