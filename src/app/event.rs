use super::mode::Mode;
use super::state::AppState;
use crate::utils::text_input::TextInput;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return Ok(());
    }

    if state.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            state.show_help = false;
        }
        return Ok(());
    }

    match state.mode {
        Mode::Navigate => handle_navigate_mode(key, state),
        Mode::AddTask => handle_add_task_mode(key, state),
        Mode::ConfirmDelete => handle_confirm_delete_mode(key, state),
        Mode::Email => handle_email_mode(key, state),
        Mode::PickDate => handle_pick_date_mode(key, state),
        Mode::History => handle_history_mode(key, state),
    }
    Ok(())
}

pub fn handle_mouse_event(mouse: MouseEvent, state: &mut AppState) -> Result<()> {
    match (state.mode, mouse.kind) {
        (Mode::History, MouseEventKind::Down(MouseButton::Left)) => {
            let inside = state
                .history_area
                .is_some_and(|area| area.contains(Position::new(mouse.column, mouse.row)));
            if !inside {
                state.close_history();
            }
        }
        (Mode::Navigate, MouseEventKind::ScrollUp) => state.move_cursor_up(),
        (Mode::Navigate, MouseEventKind::ScrollDown) => state.move_cursor_down(),
        _ => {}
    }
    Ok(())
}

fn handle_navigate_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => state.move_cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => state.move_cursor_up(),
        KeyCode::Char('a') | KeyCode::Char('n') => state.open_add_form(),
        KeyCode::Char('x') | KeyCode::Char(' ') => state.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => state.request_delete(),
        KeyCode::Char('e') => state.open_email_prompt(),
        KeyCode::Char('c') => state.open_date_picker(),
        KeyCode::Char('?') => state.show_help = true,
        _ => {}
    }
}

/// Shared line-editing keys. Returns false when the key was not consumed.
fn edit_text(input: &mut TextInput, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

fn handle_add_task_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => state.cancel_input(),
        KeyCode::Enter => state.submit_add_form(),
        KeyCode::Tab | KeyCode::Down => state.add_form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.add_form.focus_prev(),
        _ => {
            edit_text(state.add_form.focused_mut(), key);
        }
    }
}

fn handle_confirm_delete_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => state.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.mode = Mode::Navigate,
        _ => {}
    }
}

fn handle_email_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => state.cancel_input(),
        KeyCode::Enter => state.submit_email(),
        _ => {
            edit_text(&mut state.email_input, key);
        }
    }
}

fn handle_pick_date_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Navigate,
        KeyCode::Enter => state.select_history_date(),
        KeyCode::Char('h') | KeyCode::Left => state.date_picker.prev_day(),
        KeyCode::Char('l') | KeyCode::Right => state.date_picker.next_day(),
        KeyCode::Char('k') | KeyCode::Up => state.date_picker.prev_week(),
        KeyCode::Char('j') | KeyCode::Down => state.date_picker.next_week(),
        KeyCode::Char('<') | KeyCode::PageUp => state.date_picker.prev_month(),
        KeyCode::Char('>') | KeyCode::PageDown => state.date_picker.next_month(),
        KeyCode::Char('t') => state.date_picker.jump_to_today(),
        _ => {}
    }
}

fn handle_history_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => state.close_history(),
        KeyCode::Char('c') => {
            state.close_history();
            state.open_date_picker();
        }
        _ => {}
    }
}
