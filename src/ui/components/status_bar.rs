use crate::app::mode::Mode;
use crate::app::AppState;
use crate::history::HistoryState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    if state.mode == Mode::ConfirmDelete {
        render_confirm_delete(f, state, area);
        return;
    }

    if let Some((message, _)) = &state.status_message {
        render_status_message(f, message, area);
        return;
    }

    if let HistoryState::Loading { date } = state.history.state() {
        let message = format!("Loading tasks for {}...", date.format("%Y-%m-%d"));
        render_status_message(f, &message, area);
        return;
    }

    let left_content = format!(
        " {} | {} | {} of {} shown",
        state.mode,
        state.today.format("%Y-%m-%d"),
        state.views.len(),
        state.session.tasks().len(),
    );
    let nav_hint = mode_hint(state.mode);
    let version_text = format!("v{VERSION}");

    // Format: "{left_content} {nav_hint} {padding} {version_text} "
    let padding = area.width.saturating_sub(
        left_content.len() as u16 + nav_hint.len() as u16 + version_text.len() as u16 + 3,
    );

    let status_line = format!(
        "{} {} {:>padding$}{} ",
        left_content,
        nav_hint,
        "",
        version_text,
        padding = padding as usize
    );

    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);
    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}

fn mode_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => "? help  q quit",
        Mode::AddTask => "Tab next field  Enter save  Esc cancel",
        Mode::ConfirmDelete => "",
        Mode::Email => "Enter save  Esc cancel",
        Mode::PickDate => "h/l day  j/k week  </> month  Enter view",
        Mode::History => "Esc close  c pick another date",
    }
}

fn render_confirm_delete(f: &mut Frame, state: &AppState, area: Rect) {
    let title = state
        .selected_view()
        .map(|view| view.title.as_str())
        .unwrap_or_default();
    let prompt = format!(" Delete \"{title}\"? (Y/n) ");

    let style = Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(180, 100, 0))
        .add_modifier(Modifier::BOLD);

    let padding = area.width.saturating_sub(prompt.len() as u16);
    let status_line = format!("{}{:padding$}", prompt, "", padding = padding as usize);

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}

fn render_status_message(f: &mut Frame, message: &str, area: Rect) {
    let display_message = format!(" {message} ");

    let style = Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(0, 100, 0))
        .add_modifier(Modifier::BOLD);

    let padding = area.width.saturating_sub(display_message.len() as u16);
    let status_line = format!(
        "{}{:padding$}",
        display_message,
        "",
        padding = padding as usize
    );

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}
