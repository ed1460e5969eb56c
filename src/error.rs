//! Failure taxonomy for the sync core.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Discriminated failure value surfaced to consumers of the sync service.
///
/// `Clone` is required so a shared in-flight sync outcome can be observed by
/// every concurrent caller; transport errors are therefore carried as status
/// codes and messages rather than wrapped `reqwest::Error` values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Non-2xx response or network failure from an upstream we do not own.
    /// Rate limiting (403/429) lands here as well.
    #[error("upstream unavailable{}: {message}", match .status { Some(s) => format!(" ({s})"), None => String::new() })]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },
    /// A network call exceeded its caller-supplied deadline.
    #[error("upstream request timed out")]
    Timeout,
    /// The upstream broke its own contract: a response shape we cannot
    /// decode, or a pagination cursor that stopped advancing.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout
        } else if err.is_decode() {
            SyncError::ProtocolViolation(err.to_string())
        } else {
            SyncError::UpstreamUnavailable {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}
