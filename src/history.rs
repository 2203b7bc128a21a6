//! Browsing backend snapshots of past dates.
//!
//! Each date selection moves the viewer to `Loading` and starts a fetch on
//! a worker thread; the result is picked up by [`HistoryViewer::poll`].
//! A newer selection replaces the pending receiver, so only the latest
//! request can reach the display.

use chrono::{Local, NaiveDate};
use std::sync::{mpsc, Arc};
use std::thread;
use tracing::{debug, warn};

use crate::error::{SyncError, TaskError};
use crate::sync::Backend;
use crate::todo::Task;
use crate::view::HistoryView;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load tasks for the selected date.";

type FetchResult = Result<Vec<Task>, SyncError>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HistoryState {
    #[default]
    Idle,
    Loading {
        date: NaiveDate,
    },
    Displayed(HistoryView),
    Error {
        date: NaiveDate,
        message: String,
    },
}

/// Parses a `YYYY-MM-DD` date and rejects days after `today`.
pub fn parse_history_date(input: &str, today: NaiveDate) -> Result<NaiveDate, TaskError> {
    let input = input.trim();
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| TaskError::InvalidDate(input.to_string()))?;
    check_history_date(date, today)?;
    Ok(date)
}

pub fn check_history_date(date: NaiveDate, today: NaiveDate) -> Result<(), TaskError> {
    if date > today {
        return Err(TaskError::FutureDate(date));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct HistoryViewer {
    state: HistoryState,
    pending: Option<(NaiveDate, mpsc::Receiver<FetchResult>)>,
}

impl HistoryViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    /// True while a snapshot is on screen.
    pub fn is_open(&self) -> bool {
        matches!(self.state, HistoryState::Displayed(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, HistoryState::Loading { .. })
    }

    /// Starts loading the snapshot for `date` in the background.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
        backend: Arc<dyn Backend>,
        user_id: String,
    ) -> Result<(), TaskError> {
        check_history_date(date, today)?;

        let (tx, rx) = mpsc::channel();
        self.pending = Some((date, rx));
        self.state = HistoryState::Loading { date };
        debug!(%date, "Fetching history snapshot");

        thread::spawn(move || {
            let _ = tx.send(backend.tasks_for_date(&user_id, date));
        });
        Ok(())
    }

    /// Non-blocking check for a finished fetch. Returns true when the state
    /// changed.
    pub fn poll(&mut self) -> bool {
        let Some((date, rx)) = &self.pending else {
            return false;
        };
        let date = *date;

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.pending = None;
                self.state = HistoryState::Error {
                    date,
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
                return true;
            }
        };

        self.pending = None;
        self.finish(date, result);
        true
    }

    fn finish(&mut self, date: NaiveDate, result: FetchResult) {
        self.state = match result {
            Ok(tasks) => {
                debug!(%date, count = tasks.len(), "History snapshot loaded");
                HistoryState::Displayed(HistoryView::from_tasks(date, &tasks, &Local))
            }
            Err(e) => {
                warn!(%date, error = %e, "Error fetching history snapshot");
                HistoryState::Error {
                    date,
                    message: LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        };
    }

    /// Closes the display surface. An in-flight fetch is left to finish.
    pub fn close(&mut self) {
        if !self.is_loading() {
            self.state = HistoryState::Idle;
        }
    }

    /// Takes the error message out of an `Error` state, returning to `Idle`.
    pub fn take_error(&mut self) -> Option<String> {
        if let HistoryState::Error { message, .. } = &self.state {
            let message = message.clone();
            self.state = HistoryState::Idle;
            return Some(message);
        }
        None
    }
}
