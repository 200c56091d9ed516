//! Failure taxonomy for paginated loads

use thiserror::Error;

/// Errors a page fetcher may report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connectivity problem or transport timeout
    #[error("network error: {reason}")]
    Network { reason: String },
    /// The bearer credential was rejected
    #[error("authentication error: {reason}")]
    Auth { reason: String },
    /// Non-2xx response or a payload that could not be decoded
    #[error("server error{}: {reason}", status_suffix(.status))]
    Server { status: Option<u16>, reason: String },
}

impl FetchError {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn auth(reason: impl Into<String>) -> Self {
        Self::Auth {
            reason: reason.into(),
        }
    }

    pub fn server(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Server {
            status,
            reason: reason.into(),
        }
    }

    /// A response body that did not match the expected page shape
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::server(None, format!("malformed response: {}", reason.into()))
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Error recorded in list state.
///
/// Everything a fetcher can report, plus violations of the pagination
/// contract detected by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("network error: {reason}")]
    Network { reason: String },
    #[error("authentication error: {reason}")]
    Auth { reason: String },
    #[error("server error{}: {reason}", status_suffix(.status))]
    Server { status: Option<u16>, reason: String },
    /// The server claimed more data but gave no cursor to fetch it with
    #[error("pagination contract violation: {reason}")]
    ContractViolation { reason: String },
}

impl ListError {
    pub fn contract_violation(reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            reason: reason.into(),
        }
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}

impl From<FetchError> for ListError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network { reason } => Self::Network { reason },
            FetchError::Auth { reason } => Self::Auth { reason },
            FetchError::Server { status, reason } => Self::Server { status, reason },
        }
    }
}
