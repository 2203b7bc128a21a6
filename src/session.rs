//! The live task session: the task store plus everything that mirrors it.
//!
//! Every mutation is written to local storage first and then handed to the
//! backend as a fire-and-forget sync.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::TaskError;
use crate::identity::get_or_create_user_id;
use crate::stats::{compute_stats, ProgressStats};
use crate::storage::{load_tasks, save_tasks, LocalStorage};
use crate::sync::Backend;
use crate::todo::{Task, TaskInput, TaskStore};
use crate::view::{project_tasks, HistoryView, TaskView};

pub struct Session {
    store: TaskStore,
    storage: Box<dyn LocalStorage>,
    backend: Arc<dyn Backend>,
    user_id: String,
}

impl Session {
    pub fn open(storage: Box<dyn LocalStorage>, backend: Arc<dyn Backend>) -> Result<Self> {
        let user_id = get_or_create_user_id(storage.as_ref())?;
        let store = TaskStore::with_tasks(load_tasks(storage.as_ref()));
        info!(task_count = store.len(), "Session opened");

        Ok(Self {
            store,
            storage,
            backend,
            user_id,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Saves the current list locally, then hands it to the backend. When
    /// the local write fails the store goes back to `previous` and nothing
    /// is synced.
    fn persist(&mut self, previous: TaskStore) -> Result<()> {
        if let Err(e) = save_tasks(self.storage.as_ref(), self.store.tasks()) {
            warn!(error = %e, "Local save failed, reverting change");
            self.store = previous;
            return Err(e);
        }
        self.backend
            .sync_tasks(&self.user_id, self.store.tasks().to_vec());
        Ok(())
    }

    /// Adds a task. Blank titles are ignored (`Ok(None)`); an invalid
    /// reminder is returned as a [`TaskError`] and nothing is saved.
    pub fn add_task(&mut self, input: &TaskInput) -> Result<Option<Uuid>> {
        let previous = self.store.clone();
        let Some(id) = self.store.add(input)? else {
            return Ok(None);
        };
        self.persist(previous)?;
        Ok(Some(id))
    }

    pub fn delete_task(&mut self, index: usize) -> Result<Option<Task>> {
        let previous = self.store.clone();
        let Some(task) = self.store.delete(index) else {
            debug!(index, "Delete ignored, no task at index");
            return Ok(None);
        };
        self.persist(previous)?;
        Ok(Some(task))
    }

    pub fn delete_task_by_id(&mut self, id: Uuid) -> Result<Option<Task>> {
        match self.store.position(id) {
            Some(index) => self.delete_task(index),
            None => Ok(None),
        }
    }

    pub fn toggle_task(&mut self, index: usize) -> Result<Option<bool>> {
        self.toggle_task_at(index, Utc::now())
    }

    pub fn toggle_task_at(&mut self, index: usize, now: DateTime<Utc>) -> Result<Option<bool>> {
        let previous = self.store.clone();
        let Some(done) = self.store.toggle(index, now) else {
            return Ok(None);
        };
        self.persist(previous)?;
        Ok(Some(done))
    }

    pub fn toggle_task_by_id(&mut self, id: Uuid) -> Result<Option<bool>> {
        match self.store.position(id) {
            Some(index) => self.toggle_task(index),
            None => Ok(None),
        }
    }

    /// Registers the reminder email address with the backend. Addresses
    /// without an `@` are rejected before any request is made.
    pub fn save_email(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(TaskError::InvalidEmail.into());
        }
        self.backend.save_email(&self.user_id, email)?;
        info!("Reminder email saved");
        Ok(())
    }

    /// Blocking fetch of the snapshot for a past date.
    pub fn fetch_history(&self, date: NaiveDate) -> Result<HistoryView> {
        crate::history::check_history_date(date, Local::now().date_naive())?;
        let tasks = self.backend.tasks_for_date(&self.user_id, date)?;
        Ok(HistoryView::from_tasks(date, &tasks, &Local))
    }

    pub fn visible_tasks(&self) -> Vec<TaskView> {
        project_tasks(self.store.tasks(), &Local::now())
    }

    pub fn stats(&self) -> ProgressStats {
        compute_stats(self.store.tasks(), &Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::storage::{MemoryStorage, TASKS_KEY};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        synced: Mutex<Vec<Vec<Task>>>,
        emails: Mutex<Vec<String>>,
    }

    impl Backend for RecordingBackend {
        fn sync_tasks(&self, _user_id: &str, tasks: Vec<Task>) {
            self.synced.lock().unwrap().push(tasks);
        }

        fn save_email(&self, _user_id: &str, email: &str) -> Result<(), SyncError> {
            self.emails.lock().unwrap().push(email.to_string());
            Ok(())
        }

        fn tasks_for_date(&self, _user_id: &str, _date: NaiveDate) -> Result<Vec<Task>, SyncError> {
            let mut task = Task::new("From backend".to_string());
            task.done = true;
            Ok(vec![task])
        }
    }

    /// Storage handle shared with the session so tests can inspect writes
    /// and make them fail.
    #[derive(Clone, Default)]
    struct SharedStorage {
        inner: Arc<MemoryStorage>,
        fail_writes: Arc<AtomicBool>,
    }

    impl LocalStorage for SharedStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                anyhow::bail!("disk full");
            }
            self.inner.set_item(key, value)
        }
    }

    fn open() -> (Session, SharedStorage, Arc<RecordingBackend>) {
        let storage = SharedStorage::default();
        let backend = Arc::new(RecordingBackend::default());
        let session = Session::open(Box::new(storage.clone()), backend.clone()).unwrap();
        (session, storage, backend)
    }

    #[test]
    fn test_add_persists_locally_and_syncs() {
        let (mut session, storage, backend) = open();

        session
            .add_task(&TaskInput::new("Buy milk").remind_at("2024-01-01T10:00"))
            .unwrap();

        let stored = load_tasks(&storage);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, "Buy milk");
        assert!(!stored[0].done);
        assert_eq!(stored[0].completed_at, None);

        let synced = backend.synced.lock().unwrap();
        assert_eq!(synced.len(), 1);
        assert_eq!(synced[0], stored);
    }

    #[test]
    fn test_blank_add_does_not_persist() {
        let (mut session, storage, backend) = open();

        assert_eq!(session.add_task(&TaskInput::new("  ")).unwrap(), None);
        assert!(storage.get_item(TASKS_KEY).unwrap().is_none());
        assert!(backend.synced.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_reminder_surfaces_task_error() {
        let (mut session, _storage, backend) = open();

        let err = session
            .add_task(&TaskInput::new("Call").remind_at("whenever"))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<TaskError>(),
            Some(&TaskError::InvalidReminder("whenever".to_string()))
        );
        assert!(session.tasks().is_empty());
        assert!(backend.synced.lock().unwrap().is_empty());
    }

    #[test]
    fn test_buy_milk_scenario() {
        let (mut session, _storage, _backend) = open();
        session
            .add_task(&TaskInput::new("Buy milk").remind_at("2024-01-01T10:00"))
            .unwrap();

        assert_eq!(session.toggle_task(0).unwrap(), Some(true));
        assert!(session.tasks()[0].completed_at.is_some());
        assert_eq!(session.stats().overall.percentage(), 100);

        assert_eq!(session.toggle_task(0).unwrap(), Some(false));
        assert_eq!(session.tasks()[0].completed_at, None);
        assert_eq!(session.stats().overall.percentage(), 0);
    }

    #[test]
    fn test_out_of_bounds_ops_are_silent() {
        let (mut session, _storage, backend) = open();
        assert!(session.delete_task(3).unwrap().is_none());
        assert_eq!(session.toggle_task(0).unwrap(), None);
        assert!(backend.synced.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_restores_tasks_and_user_id() {
        let storage = SharedStorage::default();
        let backend = Arc::new(RecordingBackend::default());

        let mut first = Session::open(Box::new(storage.clone()), backend.clone()).unwrap();
        first.add_task(&TaskInput::new("Persisted").tags("a, b")).unwrap();
        let user_id = first.user_id().to_string();

        let second = Session::open(Box::new(storage), backend).unwrap();
        assert_eq!(second.user_id(), user_id);
        assert_eq!(second.tasks(), first.tasks());
    }

    #[test]
    fn test_failed_local_save_reverts_and_skips_sync() {
        let (mut session, storage, backend) = open();
        session.add_task(&TaskInput::new("Buy milk")).unwrap();
        storage.fail_writes.store(true, Ordering::SeqCst);

        assert!(session.toggle_task(0).is_err());
        assert!(!session.tasks()[0].done);
        assert!(session.delete_task(0).is_err());
        assert!(session.add_task(&TaskInput::new("Eggs")).is_err());
        assert_eq!(session.tasks().len(), 1);

        assert_eq!(backend.synced.lock().unwrap().len(), 1);
        assert_eq!(load_tasks(&storage), session.tasks());
    }

    #[test]
    fn test_save_email_requires_at_sign() {
        let (session, _storage, backend) = open();

        let err = session.save_email("not-an-email").unwrap_err();
        assert_eq!(err.downcast_ref::<TaskError>(), Some(&TaskError::InvalidEmail));
        assert!(backend.emails.lock().unwrap().is_empty());

        session.save_email(" me@example.com ").unwrap();
        assert_eq!(*backend.emails.lock().unwrap(), vec!["me@example.com"]);
    }

    #[test]
    fn test_fetch_history_rejects_future_dates() {
        let (session, _storage, _backend) = open();
        let tomorrow = Local::now().date_naive() + chrono::Days::new(1);
        assert!(session.fetch_history(tomorrow).is_err());

        let view = session
            .fetch_history(Local::now().date_naive())
            .unwrap();
        assert_eq!(view.completed.len(), 1);
        assert_eq!(view.completed[0].title, "From backend");
    }

    #[test]
    fn test_completed_yesterday_hidden_but_counted() {
        let (mut session, _storage, _backend) = open();
        session.add_task(&TaskInput::new("Old chore")).unwrap();
        session.add_task(&TaskInput::new("Open chore")).unwrap();
        session
            .toggle_task_at(0, Utc::now() - chrono::Duration::days(1))
            .unwrap();

        let visible = session.visible_tasks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Open chore");

        let stats = session.stats();
        assert_eq!(stats.overall.completed, 1);
        assert_eq!(stats.overall.total, 2);
    }

    #[test]
    fn test_id_based_operations() {
        let (mut session, _storage, _backend) = open();
        let a = session.add_task(&TaskInput::new("A")).unwrap().unwrap();
        let b = session.add_task(&TaskInput::new("B")).unwrap().unwrap();

        session.delete_task_by_id(a).unwrap();
        assert_eq!(session.toggle_task_by_id(b).unwrap(), Some(true));
        assert_eq!(session.toggle_task_by_id(a).unwrap(), None);
        assert_eq!(session.tasks().len(), 1);
    }
}
