//! Completion aggregates shown in the stats panel.
//!
//! Everything here is computed from the full task list, including tasks the
//! live view has already filtered out.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};

use crate::todo::Task;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Rounded percentage, 0 when there is nothing to count.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// Completions per weekday for the current Monday-based week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyCompletion {
    pub counts: [usize; 7],
}

impl WeeklyCompletion {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Divisor for bar heights, never below 1.
    pub fn scale(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0).max(1)
    }

    /// Height of a bar in `0.0..=1.0` relative to the busiest day.
    pub fn bar_ratio(&self, day: usize) -> f64 {
        self.counts.get(day).copied().unwrap_or(0) as f64 / self.scale() as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub today: Progress,
    pub overall: Progress,
    pub weekly: WeeklyCompletion,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

fn local_date<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Whether the task belongs to "today" for progress purposes: reminded
/// today, completed today, or an undone repeating task.
pub fn is_relevant_today<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    let tz = now.timezone();
    let today = now.date_naive();
    let on_today = |ts: &Option<DateTime<Utc>>| {
        ts.as_ref()
            .is_some_and(|ts| local_date(ts, &tz) == today)
    };

    on_today(&task.remind_at) || on_today(&task.completed_at) || (task.is_repeating() && !task.done)
}

pub fn compute_stats<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> ProgressStats {
    let tz = now.timezone();
    let today = now.date_naive();
    let monday = week_start(today);

    let mut stats = ProgressStats {
        overall: Progress {
            completed: tasks.iter().filter(|t| t.done).count(),
            total: tasks.len(),
        },
        ..ProgressStats::default()
    };

    for task in tasks {
        if is_relevant_today(task, now) {
            stats.today.total += 1;
            let completed_today = task
                .completed_at
                .as_ref()
                .is_some_and(|ts| local_date(ts, &tz) == today);
            if task.done && completed_today {
                stats.today.completed += 1;
            }
        }

        if let Some(completed_at) = &task.completed_at {
            let local = completed_at.with_timezone(&tz);
            if local.date_naive() >= monday && local <= *now {
                let day = local.weekday().num_days_from_monday() as usize;
                stats.weekly.counts[day] += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::Repeat;
    use chrono::{Duration, FixedOffset};
    use pretty_assertions::assert_eq;

    // Wednesday 2024-03-13 15:00 at UTC+2.
    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 13, 15, 0, 0)
            .unwrap()
    }

    fn task(text: &str) -> Task {
        Task::new(text.to_string())
    }

    fn done_at(text: &str, at: DateTime<FixedOffset>) -> Task {
        let mut t = task(text);
        t.done = true;
        t.completed_at = Some(at.with_timezone(&Utc));
        t
    }

    #[test]
    fn test_percentage_rounding_and_zero_guard() {
        assert_eq!(Progress { completed: 0, total: 0 }.percentage(), 0);
        assert_eq!(Progress { completed: 1, total: 3 }.percentage(), 33);
        assert_eq!(Progress { completed: 2, total: 3 }.percentage(), 67);
        assert_eq!(Progress { completed: 1, total: 2 }.percentage(), 50);
        assert_eq!(Progress { completed: 4, total: 4 }.percentage(), 100);
    }

    #[test]
    fn test_week_start_rolls_back_to_monday() {
        let wed = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        let mon = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let sun = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(week_start(wed), mon);
        assert_eq!(week_start(mon), mon);
        assert_eq!(week_start(sun), mon);
    }

    #[test]
    fn test_overall_counts_every_task() {
        let yesterday = now() - Duration::days(1);
        let tasks = vec![task("open"), done_at("old", yesterday), done_at("new", now())];

        let stats = compute_stats(&tasks, &now());
        assert_eq!(stats.overall, Progress { completed: 2, total: 3 });
        assert_eq!(stats.overall.percentage(), 67);
    }

    #[test]
    fn test_undone_repeating_task_counts_toward_today() {
        let mut repeating = task("stretch");
        repeating.repeat = Some(Repeat::Daily);
        repeating.remind_at = Some((now() - Duration::days(30)).with_timezone(&Utc));

        let stats = compute_stats(&[repeating], &now());
        assert_eq!(stats.today, Progress { completed: 0, total: 1 });
    }

    #[test]
    fn test_today_progress() {
        let mut reminded_today = task("reminded");
        reminded_today.remind_at = Some((now() + Duration::hours(2)).with_timezone(&Utc));

        let mut reminded_tomorrow = task("later");
        reminded_tomorrow.remind_at = Some((now() + Duration::days(1)).with_timezone(&Utc));

        let tasks = vec![
            reminded_today,
            reminded_tomorrow,
            done_at("finished", now() - Duration::hours(1)),
            done_at("finished yesterday", now() - Duration::days(1)),
            task("no dates"),
        ];

        let stats = compute_stats(&tasks, &now());
        assert_eq!(stats.today, Progress { completed: 1, total: 2 });
        assert_eq!(stats.today.percentage(), 50);
    }

    #[test]
    fn test_today_uses_local_calendar_day() {
        // 23:30 UTC on the 12th is 01:30 on the 13th at UTC+2.
        let ts = Utc.with_ymd_and_hms(2024, 3, 12, 23, 30, 0).unwrap();
        let mut t = task("late night");
        t.done = true;
        t.completed_at = Some(ts);

        let stats = compute_stats(&[t], &now());
        assert_eq!(stats.today, Progress { completed: 1, total: 1 });
    }

    #[test]
    fn test_weekly_histogram() {
        let monday_morning = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 11, 0, 5, 0)
            .unwrap();
        let last_sunday = monday_morning - Duration::hours(1);

        let tasks = vec![
            done_at("mon", monday_morning),
            done_at("tue a", monday_morning + Duration::days(1)),
            done_at("tue b", monday_morning + Duration::days(1) + Duration::hours(3)),
            done_at("wed", now() - Duration::minutes(5)),
            done_at("last week", last_sunday),
            task("never done"),
        ];

        let stats = compute_stats(&tasks, &now());
        assert_eq!(stats.weekly.counts, [1, 2, 1, 0, 0, 0, 0]);
        assert_eq!(stats.weekly.total(), 4);
        assert_eq!(stats.weekly.scale(), 2);
        assert_eq!(stats.weekly.bar_ratio(0), 0.5);
        assert_eq!(stats.weekly.bar_ratio(1), 1.0);
    }

    #[test]
    fn test_weekly_ignores_completions_after_now() {
        let tasks = vec![done_at("future", now() + Duration::hours(1))];
        let stats = compute_stats(&tasks, &now());
        assert_eq!(stats.weekly.total(), 0);
    }

    #[test]
    fn test_empty_histogram_scale_is_one() {
        let stats = compute_stats(&[], &now());
        assert_eq!(stats.weekly.scale(), 1);
        assert_eq!(stats.weekly.bar_ratio(3), 0.0);
        assert_eq!(stats.today.percentage(), 0);
        assert_eq!(stats.overall.percentage(), 0);
    }
}
