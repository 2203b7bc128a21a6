use crate::app::AppState;
use crate::view::TaskView;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, state: &mut AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tasks ")
        .style(Style::default().bg(state.theme.background));

    if state.views.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No tasks! Press a to add one.",
            Style::default().fg(state.theme.detail),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state.views.iter().map(|view| task_item(view, state)).collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(state.theme.foreground))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn task_item<'a>(view: &'a TaskView, state: &AppState) -> ListItem<'a> {
    let theme = &state.theme;
    let (checkbox, title_style) = if view.done {
        (
            "[x] ",
            Style::default()
                .fg(theme.done)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("[ ] ", Style::default().fg(theme.foreground))
    };

    let title = Line::from(vec![
        Span::styled(checkbox, Style::default().fg(theme.accent)),
        Span::styled(view.title.as_str(), title_style),
    ]);

    let detail_style = Style::default().fg(theme.detail);
    let mut details = vec![Span::styled(
        format!("    Reminder: {}", view.reminder),
        detail_style,
    )];
    if let Some(repeat) = &view.repeat {
        details.push(Span::styled(format!("  Repeats: {repeat}"), detail_style));
    }
    if let Some(tags) = &view.tags {
        details.push(Span::styled(
            format!("  Tags: {tags}"),
            Style::default().fg(theme.tags),
        ));
    }
    if let Some(completed) = &view.completed {
        details.push(Span::styled(format!("  Completed: {completed}"), detail_style));
    }

    ListItem::new(vec![title, Line::from(details)])
}
