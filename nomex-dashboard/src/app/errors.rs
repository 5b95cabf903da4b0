//! Failure taxonomy surfaced to the dashboard's single error boundary.

use std::fmt;

use nomex_types::AuthStatus;

use crate::api::ApiError;

/// What went wrong, as far as the display boundary cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No valid session; fetches stay suppressed until re-authentication
    AuthRequired,
    /// Any transport or server failure on a post, comment or user call
    FetchFailed,
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::AuthRequired => "You must be signed in to view the dashboard",
            ErrorKind::FetchFailed => "We couldn't fetch your data. Please try again",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Map a failed call onto the taxonomy.
///
/// `status` is `None` when no request was attempted. Statuses outside
/// 404/5xx are not distinguished and land in `FetchFailed` too.
pub fn classify(status: Option<u16>, auth: AuthStatus) -> ErrorKind {
    match (status, auth) {
        (None, AuthStatus::Unauthenticated) => ErrorKind::AuthRequired,
        _ => ErrorKind::FetchFailed,
    }
}

/// The error currently shown in place of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub detail: Option<String>,
}

impl ErrorRecord {
    /// Classify a failed remote call. A failure without an HTTP status
    /// (transport or decode) is still a fetch failure.
    pub fn from_api_error(error: &ApiError, auth: AuthStatus) -> Self {
        let kind = match error.status() {
            Some(status) => classify(Some(status), auth),
            None => ErrorKind::FetchFailed,
        };
        Self {
            kind,
            detail: Some(error.to_string()),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({})", self.kind, detail),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ErrorRecord {}
