//! Oracle access errors.

use crate::error::{AgentError, ErrorSeverity};

/// Errors returned by resource and cooldown oracles.
///
/// None of these abort a tick: the cooldown registry fails open (treats the
/// ability as ready) and the resource cache fails safe (keeps the last known or
/// full-health snapshot).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The backend could not be reached this time.
    #[error("{0} provider unavailable")]
    Unavailable(&'static str),

    /// The backend answered but has no data yet (e.g. still logging in).
    #[error("{0} provider has no data")]
    NoData(&'static str),
}

impl AgentError for ProviderError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            ProviderError::Unavailable(_) => "PROVIDER_UNAVAILABLE",
            ProviderError::NoData(_) => "PROVIDER_NO_DATA",
        }
    }
}
