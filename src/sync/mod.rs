//! Backend communication.
//!
//! The client always pushes its whole task list; nothing the backend
//! answers is merged back into the live store.

pub mod client;
pub mod csrf;

use chrono::NaiveDate;

use crate::error::SyncError;
use crate::todo::Task;

pub use client::HttpBackend;

pub trait Backend: Send + Sync {
    /// Fire-and-forget push of the full task list. Failures are logged only.
    fn sync_tasks(&self, user_id: &str, tasks: Vec<Task>);

    /// Blocks until pushes started by `sync_tasks` have finished. Used by
    /// one-shot commands before the process exits.
    fn wait_for_pending(&self) {}

    fn save_email(&self, user_id: &str, email: &str) -> Result<(), SyncError>;

    /// Read-only snapshot of the tasks the backend associates with `date`.
    fn tasks_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Task>, SyncError>;
}

/// Backend used when syncing is disabled: pushes are dropped and requests
/// that need an answer fail with [`SyncError::Disabled`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

impl Backend for OfflineBackend {
    fn sync_tasks(&self, _user_id: &str, _tasks: Vec<Task>) {}

    fn save_email(&self, _user_id: &str, _email: &str) -> Result<(), SyncError> {
        Err(SyncError::Disabled)
    }

    fn tasks_for_date(&self, _user_id: &str, _date: NaiveDate) -> Result<Vec<Task>, SyncError> {
        Err(SyncError::Disabled)
    }
}
