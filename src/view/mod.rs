//! Pure projections from task state to what gets displayed.
//!
//! The terminal UI and the plain-text CLI output both draw from these view
//! models, so filtering and labelling rules live in one place.

pub mod text;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::todo::Task;

pub const NO_REMINDER: &str = "No reminder set";

/// One row of the live task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: Uuid,
    /// Position in the underlying store.
    pub index: usize,
    pub title: String,
    pub done: bool,
    pub reminder: String,
    pub repeat: Option<String>,
    pub tags: Option<String>,
    pub completed: Option<String>,
}

pub fn format_timestamp<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Live-list filter: undone tasks, repeating tasks, and one-time tasks
/// completed on the current local day. Older one-time completions stay in
/// the store but drop out of the list.
pub fn is_visible<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    if !task.done || task.is_repeating() {
        return true;
    }
    match &task.completed_at {
        Some(ts) => ts.with_timezone(&now.timezone()).date_naive() == now.date_naive(),
        None => true,
    }
}

pub fn project_tasks<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<TaskView>
where
    Tz::Offset: std::fmt::Display,
{
    let tz = now.timezone();
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| is_visible(task, now))
        .map(|(index, task)| TaskView {
            id: task.id,
            index,
            title: task.text.clone(),
            done: task.done,
            reminder: task
                .remind_at
                .as_ref()
                .map(|ts| format_timestamp(ts, &tz))
                .unwrap_or_else(|| NO_REMINDER.to_string()),
            repeat: task.repeat.as_ref().map(ToString::to_string),
            tags: (!task.tags.is_empty()).then(|| task.tags.join(", ")),
            completed: task
                .completed_at
                .as_ref()
                .filter(|_| task.done)
                .map(|ts| format_timestamp(ts, &tz)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
    /// Reminder time for pending entries, completion time for completed ones.
    pub timestamp: Option<String>,
}

/// Read-only snapshot of a past date, split into pending and completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub date: NaiveDate,
    pub pending: Vec<HistoryEntry>,
    pub completed: Vec<HistoryEntry>,
}

impl HistoryView {
    pub fn from_tasks<Tz: TimeZone>(date: NaiveDate, tasks: &[Task], tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let (completed, pending): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|t| t.done);

        Self {
            date,
            pending: pending
                .into_iter()
                .map(|t| HistoryEntry {
                    title: t.text.clone(),
                    timestamp: t.remind_at.as_ref().map(|ts| format_timestamp(ts, tz)),
                })
                .collect(),
            completed: completed
                .into_iter()
                .map(|t| HistoryEntry {
                    title: t.text.clone(),
                    timestamp: t.completed_at.as_ref().map(|ts| format_timestamp(ts, tz)),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.completed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::Repeat;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 15, 0, 0).unwrap()
    }

    fn done_task(text: &str, completed: DateTime<Utc>) -> Task {
        let mut t = Task::new(text.to_string());
        t.done = true;
        t.completed_at = Some(completed);
        t
    }

    #[test]
    fn test_undone_tasks_visible() {
        let t = Task::new("open".to_string());
        assert!(is_visible(&t, &now()));
    }

    #[test]
    fn test_one_time_task_completed_yesterday_hidden() {
        let t = done_task("old", now() - Duration::days(1));
        assert!(!is_visible(&t, &now()));
    }

    #[test]
    fn test_one_time_task_completed_today_visible() {
        let t = done_task("fresh", now() - Duration::hours(14));
        assert!(is_visible(&t, &now()));
    }

    #[test]
    fn test_repeating_task_always_visible() {
        let mut t = done_task("weekly review", now() - Duration::days(40));
        t.repeat = Some(Repeat::Weekly);
        assert!(is_visible(&t, &now()));
    }

    #[test]
    fn test_projection_keeps_store_indices() {
        let tasks = vec![
            done_task("hidden", now() - Duration::days(2)),
            Task::new("shown".to_string()),
        ];

        let views = project_tasks(&tasks, &now());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].index, 1);
        assert_eq!(views[0].title, "shown");
    }

    #[test]
    fn test_projection_labels() {
        let mut open = Task::new("Buy milk".to_string());
        open.remind_at = Some(Utc.with_ymd_and_hms(2024, 3, 14, 10, 0, 0).unwrap());
        open.tags = vec!["home".to_string(), "errands".to_string()];
        open.repeat = Some(Repeat::Daily);

        let finished = done_task("Pay rent", now() - Duration::hours(1));

        let views = project_tasks(&[open, finished], &now());

        assert_eq!(views[0].reminder, "2024-03-14 10:00");
        assert_eq!(views[0].tags.as_deref(), Some("home, errands"));
        assert_eq!(views[0].repeat.as_deref(), Some("daily"));
        assert_eq!(views[0].completed, None);

        assert_eq!(views[1].reminder, NO_REMINDER);
        assert_eq!(views[1].tags, None);
        assert_eq!(views[1].completed.as_deref(), Some("2024-03-13 14:00"));
    }

    #[test]
    fn test_history_partitions_pending_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut pending = Task::new("Call bank".to_string());
        pending.remind_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let done = done_task("Ship release", Utc.with_ymd_and_hms(2024, 3, 1, 17, 30, 0).unwrap());
        let plain = Task::new("No reminder".to_string());

        let view = HistoryView::from_tasks(date, &[done, pending, plain], &Utc);

        assert_eq!(
            view.pending,
            vec![
                HistoryEntry {
                    title: "Call bank".to_string(),
                    timestamp: Some("2024-03-01 09:00".to_string()),
                },
                HistoryEntry {
                    title: "No reminder".to_string(),
                    timestamp: None,
                },
            ]
        );
        assert_eq!(
            view.completed,
            vec![HistoryEntry {
                title: "Ship release".to_string(),
                timestamp: Some("2024-03-01 17:30".to_string()),
            }]
        );
    }

    #[test]
    fn test_history_empty() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(HistoryView::from_tasks(date, &[], &Utc).is_empty());
    }
}
