use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use super::local::{LocalStorage, TASKS_KEY};
use crate::todo::Task;

/// Reads the task list from local storage.
///
/// A missing entry, an unreadable file or a document that is not a JSON
/// array yield an empty list. Individual records that fail to decode are
/// skipped; startup never fails because of stored state.
pub fn load_tasks(storage: &dyn LocalStorage) -> Vec<Task> {
    let raw = match storage.get_item(TASKS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Could not read stored tasks, starting empty");
            return Vec::new();
        }
    };

    let records = match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Stored tasks are malformed, starting empty");
            return Vec::new();
        }
    };

    let tasks: Vec<Task> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed stored task");
                None
            }
        })
        .collect();
    debug!(count = tasks.len(), "Loaded tasks from local storage");
    tasks
}

pub fn save_tasks(storage: &dyn LocalStorage, tasks: &[Task]) -> Result<()> {
    let content = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
    storage.set_item(TASKS_KEY, &content)?;
    debug!(count = tasks.len(), "Saved tasks to local storage");
    Ok(())
}
