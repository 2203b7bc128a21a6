pub mod status_bar;
pub mod task_list;

use crate::app::forms::{ADD_FORM_HINTS, ADD_FORM_LABELS};
use crate::app::mode::Mode;
use crate::app::AppState;
use crate::history::HistoryState;
use crate::stats::WEEKDAY_LABELS;
use crate::utils::text_input::TextInput;
use crate::view::HistoryView;
use chrono::{Datelike, Days, Months};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const STATS_PANEL_HEIGHT: u16 = 9;

pub fn render(f: &mut Frame, state: &mut AppState) {
    // Scroll calculations need the current height
    state.terminal_height = f.area().height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                     // Task list
            Constraint::Length(STATS_PANEL_HEIGHT), // Progress
            Constraint::Length(1),                  // Status bar
        ])
        .split(f.area());

    task_list::render(f, state, chunks[0]);
    render_stats_panel(f, state, chunks[1]);
    status_bar::render(f, state, chunks[2]);

    match state.mode {
        Mode::AddTask => render_add_form(f, state),
        Mode::Email => render_email_prompt(f, state),
        Mode::PickDate => render_date_picker(f, state),
        Mode::History => render_history_modal(f, state),
        Mode::Navigate | Mode::ConfirmDelete => state.history_area = None,
    }

    if state.show_help {
        render_help_overlay(f, state);
    }
}

fn render_stats_panel(f: &mut Frame, state: &AppState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let stats = &state.stats;
    let key_style = Style::default().fg(state.theme.accent).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(state.theme.foreground);
    let lines = vec![
        Line::from(vec![
            Span::styled("Today    ", key_style),
            Span::styled(
                format!(
                    "{} of {} tasks completed today ({}%)",
                    stats.today.completed,
                    stats.today.total,
                    stats.today.percentage()
                ),
                text_style,
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Overall  ", key_style),
            Span::styled(
                format!(
                    "{} of {} tasks completed overall ({}%)",
                    stats.overall.completed,
                    stats.overall.total,
                    stats.overall.percentage()
                ),
                text_style,
            ),
        ]),
    ];
    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Progress "));
    f.render_widget(summary, columns[0]);

    let bars: Vec<Bar> = WEEKDAY_LABELS
        .iter()
        .zip(stats.weekly.counts)
        .map(|(label, count)| {
            Bar::default()
                .value(count as u64)
                .label(Line::from(*label))
                .style(Style::default().fg(state.theme.chart_bar))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" This week "))
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .max(stats.weekly.scale() as u64);
    f.render_widget(chart, columns[1]);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Places the terminal cursor inside a bordered popup, on `line` and after
/// `indent` columns of fixed text.
fn place_cursor(f: &mut Frame, popup: Rect, line: u16, indent: u16, input: &TextInput) {
    let x = popup.x + 1 + indent + input.cursor_column();
    let y = popup.y + 1 + line;
    f.set_cursor_position((x.min(popup.right().saturating_sub(2)), y));
}

fn render_add_form(f: &mut Frame, state: &AppState) {
    let area = centered_rect(60, 40, f.area());
    let label_style = Style::default().fg(state.theme.accent).add_modifier(Modifier::BOLD);
    let hint_style = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::new();
    for (i, input) in state.add_form.fields.iter().enumerate() {
        let focused = i == state.add_form.focus;
        let marker = if focused { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<10}", ADD_FORM_LABELS[i]), label_style),
            Span::raw(input.value()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("            {}", ADD_FORM_HINTS[i]),
            hint_style,
        )));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" New task (Enter to save, Esc to cancel) ")
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(form, area);

    let focus = state.add_form.focus;
    place_cursor(f, area, focus as u16 * 2, 12, &state.add_form.fields[focus]);
}

fn render_email_prompt(f: &mut Frame, state: &AppState) {
    let area = centered_rect(50, 20, f.area());

    let lines = vec![
        Line::from("Where should reminders be sent?"),
        Line::from(""),
        Line::from(state.email_input.value()),
    ];

    let prompt = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Reminder email ")
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(prompt, area);
    place_cursor(f, area, 2, 0, &state.email_input);
}

fn render_date_picker(f: &mut Frame, state: &AppState) {
    let picker = &state.date_picker;
    let area = centered_rect(40, 50, f.area());

    let header_style = Style::default().fg(state.theme.accent).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:^27}", picker.selected.format("%B %Y").to_string()),
            header_style,
        )),
        Line::from(Span::styled(
            " Mo  Tu  We  Th  Fr  Sa  Su",
            Style::default().fg(state.theme.detail),
        )),
    ];

    let first = picker.month_start();
    let next_month = first.checked_add_months(Months::new(1)).unwrap_or(first);
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut week: Vec<Span> = vec![Span::raw("    "); lead];
    let mut day = first;
    while day < next_month {
        let style = if day == picker.selected {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else if day > picker.max {
            Style::default().fg(Color::DarkGray)
        } else if day == picker.max {
            Style::default().fg(state.theme.accent)
        } else {
            Style::default().fg(state.theme.foreground)
        };
        week.push(Span::styled(format!(" {:>2} ", day.day()), style));

        if week.len() == 7 {
            lines.push(Line::from(std::mem::take(&mut week)));
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    if !week.is_empty() {
        lines.push(Line::from(week));
    }

    let calendar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" View tasks for date ")
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(calendar, area);
}

fn history_lines<'a>(view: &'a HistoryView, state: &AppState) -> Vec<Line<'a>> {
    let section_style = Style::default().fg(state.theme.accent).add_modifier(Modifier::BOLD);
    let detail_style = Style::default().fg(state.theme.detail);

    if view.is_empty() {
        return vec![Line::from("No tasks found for this date.")];
    }

    let mut lines = Vec::new();
    let done_style = Style::default()
        .fg(state.theme.done)
        .add_modifier(Modifier::CROSSED_OUT);
    let sections = [
        ("Pending Tasks:", &view.pending, "Reminder", Style::default()),
        ("Completed Tasks:", &view.completed, "Completed", done_style),
    ];
    for (heading, entries, label, title_style) in sections {
        if entries.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(heading, section_style)));
        for entry in entries {
            let mut spans = vec![
                Span::raw("  - "),
                Span::styled(entry.title.as_str(), title_style),
            ];
            if let Some(ts) = &entry.timestamp {
                spans.push(Span::styled(format!(" ({label}: {ts})"), detail_style));
            }
            lines.push(Line::from(spans));
        }
    }
    lines
}

fn render_history_modal(f: &mut Frame, state: &mut AppState) {
    let area = centered_rect(60, 60, f.area());
    state.history_area = Some(area);

    let HistoryState::Displayed(view) = state.history.state() else {
        return;
    };
    let title = format!(" Tasks for {} ", view.date.format("%Y-%m-%d"));
    let lines = history_lines(view, state);

    let modal = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().bg(state.theme.background)),
        );

    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

fn render_help_overlay(f: &mut Frame, state: &AppState) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(state.theme.foreground);
    let section_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let sections: [(&str, &[(&str, &str)]); 3] = [
        (
            "Tasks",
            &[
                ("j / ↓", "Move cursor down"),
                ("k / ↑", "Move cursor up"),
                ("a", "Add a task"),
                ("x / Space", "Toggle done"),
                ("d", "Delete task"),
            ],
        ),
        (
            "Backend",
            &[
                ("e", "Set reminder email"),
                ("c", "View tasks for a past date"),
            ],
        ),
        (
            "General",
            &[("?", "Toggle this help"), ("q / Esc", "Quit")],
        ),
    ];

    let mut lines = vec![
        Line::from(Span::styled(
            "  Task Sync Help",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (title, keys) in sections {
        lines.push(Line::from(Span::styled(format!("  ── {title} ──"), section_style)));
        for (key, desc) in keys {
            lines.push(Line::from(vec![
                Span::styled(format!("    {key:<16}"), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    let area = centered_rect(60, 70, f.area());
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help (? or Esc to close) ")
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
