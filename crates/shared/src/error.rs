use thiserror::Error;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch users.";

/// The only failure the directory knows about. Variants exist for logs; the
/// view never shows more than [`FETCH_FAILED_MESSAGE`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("upstream returned status {status}")]
    Status { status: u16 },
    #[error("invalid response payload: {0}")]
    Decode(String),
    #[error("upstream reported an error: {0}")]
    Upstream(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}
