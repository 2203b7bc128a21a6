use chrono::NaiveDate;
use thiserror::Error;

/// Validation failures that are reported back to the user and abort the
/// operation without touching the task list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid reminder time: {0}")]
    InvalidReminder(String),

    #[error("Enter a valid email!")]
    InvalidEmail,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Cannot view tasks for a future date ({0})")]
    FutureDate(NaiveDate),
}

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend sync is disabled")]
    Disabled,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
