use std::fmt::Write;

use super::{HistoryView, TaskView};
use crate::stats::{ProgressStats, WEEKDAY_LABELS};

const BAR_WIDTH: usize = 20;

pub fn render_task_list(views: &[TaskView]) -> String {
    if views.is_empty() {
        return "No tasks!\n".to_string();
    }

    let mut out = String::new();
    for view in views {
        let mark = if view.done { "x" } else { " " };
        let _ = writeln!(out, "{:>3}. [{}] {}", view.index + 1, mark, view.title);
        let _ = writeln!(out, "       Reminder: {}", view.reminder);
        if let Some(repeat) = &view.repeat {
            let _ = writeln!(out, "       Repeats: {repeat}");
        }
        if let Some(tags) = &view.tags {
            let _ = writeln!(out, "       Tags: {tags}");
        }
        if let Some(completed) = &view.completed {
            let _ = writeln!(out, "       Completed: {completed}");
        }
    }
    out
}

pub fn render_stats(stats: &ProgressStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Today:   {} of {} tasks completed today ({}%)",
        stats.today.completed,
        stats.today.total,
        stats.today.percentage()
    );
    let _ = writeln!(
        out,
        "Overall: {} of {} tasks completed overall ({}%)",
        stats.overall.completed,
        stats.overall.total,
        stats.overall.percentage()
    );
    let _ = writeln!(out, "Weekly completion:");
    for (day, label) in WEEKDAY_LABELS.iter().enumerate() {
        let len = (stats.weekly.bar_ratio(day) * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {label} {:<width$} {}",
            "#".repeat(len),
            stats.weekly.counts[day],
            width = BAR_WIDTH
        );
    }
    out
}

pub fn render_history(view: &HistoryView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tasks for {}", view.date.format("%Y-%m-%d"));

    if view.is_empty() {
        let _ = writeln!(out, "No tasks found for this date.");
        return out;
    }

    if !view.pending.is_empty() {
        let _ = writeln!(out, "\nPending Tasks:");
        for entry in &view.pending {
            match &entry.timestamp {
                Some(ts) => {
                    let _ = writeln!(out, "  - {} (Reminder: {ts})", entry.title);
                }
                None => {
                    let _ = writeln!(out, "  - {}", entry.title);
                }
            }
        }
    }

    if !view.completed.is_empty() {
        let _ = writeln!(out, "\nCompleted Tasks:");
        for entry in &view.completed {
            match &entry.timestamp {
                Some(ts) => {
                    let _ = writeln!(out, "  - [x] {} (Completed: {ts})", entry.title);
                }
                None => {
                    let _ = writeln!(out, "  - [x] {}", entry.title);
                }
            }
        }
    }
    out
}
