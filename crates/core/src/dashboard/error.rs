//! Dashboard error types.

use thiserror::Error;

use tally_shared::AppError;

/// Message returned when no caller identity is available.
pub const UNAUTHENTICATED_MESSAGE: &str = "User not authenticated";

/// Errors that can occur while building a dashboard summary.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// No user identity was supplied; nothing was queried.
    #[error("User not authenticated")]
    Unauthenticated,

    /// A store read failed; the whole summary is abandoned.
    #[error("{0}")]
    Store(String),

    /// A rolling window is not a positive number of days that can be
    /// subtracted from the reference time.
    #[error("invalid rolling window of {0} days")]
    Window(i64),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Unauthenticated => Self::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string()),
            DashboardError::Store(msg) => Self::Database(msg),
            err @ DashboardError::Window(_) => Self::Internal(err.to_string()),
        }
    }
}
