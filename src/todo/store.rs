use super::task::{parse_reminder, parse_tags, Repeat, Task, TaskInput};
use crate::error::TaskError;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// Ordered, in-memory list of tasks. The single source of truth for a
/// session; persisted copies are derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Appends a task built from form input.
    ///
    /// Returns `Ok(None)` when the title is blank, which leaves the store
    /// untouched. An unparseable reminder aborts before any mutation.
    pub fn add(&mut self, input: &TaskInput) -> Result<Option<Uuid>, TaskError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let remind_at = if input.remind_at.trim().is_empty() {
            None
        } else {
            Some(parse_reminder(&input.remind_at)?)
        };

        let mut task = Task::new(text.to_string());
        task.remind_at = remind_at;
        task.repeat = Repeat::parse(&input.repeat);
        task.tags = parse_tags(&input.tags);

        let id = task.id;
        debug!(task_id = %id, "Adding task");
        self.tasks.push(task);
        Ok(Some(id))
    }

    /// Removes the task at `index`. Later indices shift down by one.
    pub fn delete(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        Some(self.tasks.remove(index))
    }

    pub fn delete_by_id(&mut self, id: Uuid) -> Option<Task> {
        let index = self.position(id)?;
        self.delete(index)
    }

    /// Flips completion of the task at `index`, returning the new `done` flag.
    pub fn toggle(&mut self, index: usize, now: DateTime<Utc>) -> Option<bool> {
        self.tasks.get_mut(index).map(|task| task.toggle_done(now))
    }

    pub fn toggle_by_id(&mut self, id: Uuid, now: DateTime<Utc>) -> Option<bool> {
        let index = self.position(id)?;
        self.toggle(index, now)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn store_with(titles: &[&str]) -> TaskStore {
        let mut store = TaskStore::new();
        for title in titles {
            store.add(&TaskInput::new(*title)).unwrap();
        }
        store
    }

    #[test]
    fn test_add_blank_title_is_noop() {
        let mut store = store_with(&["Existing"]);

        assert_eq!(store.add(&TaskInput::new("")).unwrap(), None);
        assert_eq!(store.add(&TaskInput::new("   \t")).unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_trims_title_and_sets_defaults() {
        let mut store = TaskStore::new();
        let id = store
            .add(&TaskInput::new("  Buy milk ").remind_at("2024-01-01T10:00"))
            .unwrap()
            .unwrap();

        let task = &store.tasks()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.text, "Buy milk");
        assert!(!task.done);
        assert!(!task.emailed);
        assert!(task.remind_at.is_some());
        assert_eq!(task.completed_at, None);
        assert_eq!(task.repeat, None);
    }

    #[test]
    fn test_add_invalid_reminder_does_not_mutate() {
        let mut store = store_with(&["Existing"]);
        let before = store.clone();

        let result = store.add(&TaskInput::new("Call mom").remind_at("soonish"));

        assert_eq!(
            result,
            Err(TaskError::InvalidReminder("soonish".to_string()))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_parses_tags_and_repeat() {
        let mut store = TaskStore::new();
        store
            .add(&TaskInput::new("Standup").tags("work, , urgent").repeat("daily"))
            .unwrap();

        let task = &store.tasks()[0];
        assert_eq!(task.tags, vec!["work", "urgent"]);
        assert_eq!(task.repeat, Some(Repeat::Daily));
    }

    #[test]
    fn test_delete_shifts_indices() {
        let mut store = store_with(&["Task 1", "Task 2", "Task 3"]);

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.text, "Task 2");
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[1].text, "Task 3");
    }

    #[test]
    fn test_delete_out_of_bounds_is_noop() {
        let mut store = store_with(&["Task 1"]);
        assert!(store.delete(5).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = store_with(&["Task"]);
        let now = Utc::now();

        assert_eq!(store.toggle(0, now), Some(true));
        assert_eq!(store.tasks()[0].completed_at, Some(now));

        assert_eq!(store.toggle(0, now + Duration::minutes(1)), Some(false));
        assert!(!store.tasks()[0].done);
        assert_eq!(store.tasks()[0].completed_at, None);
    }

    #[test]
    fn test_toggle_out_of_bounds() {
        let mut store = TaskStore::new();
        assert_eq!(store.toggle(0, Utc::now()), None);
    }

    #[test]
    fn test_id_operations_survive_reordering() {
        let mut store = store_with(&["A", "B", "C"]);
        let c_id = store.tasks()[2].id;

        store.delete(0);
        assert_eq!(store.toggle_by_id(c_id, Utc::now()), Some(true));
        assert!(store.tasks()[1].done);

        let removed = store.delete_by_id(c_id).unwrap();
        assert_eq!(removed.text, "C");
        assert!(store.delete_by_id(c_id).is_none());
    }
}
