use super::forms::{AddTaskForm, DatePicker};
use super::mode::Mode;
use crate::error::TaskError;
use crate::history::HistoryViewer;
use crate::session::Session;
use crate::stats::ProgressStats;
use crate::ui::theme::Theme;
use crate::utils::text_input::TextInput;
use crate::view::TaskView;
use anyhow::Error;
use chrono::{Local, NaiveDate};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::time::Instant;
use tracing::{debug, warn};

const STATUS_MESSAGE_SECS: u64 = 3;
const SAVE_FAILED_MESSAGE: &str = "Error saving tasks";

pub struct AppState {
    pub session: Session,
    /// Rows currently on screen, re-derived after every mutation.
    pub views: Vec<TaskView>,
    pub stats: ProgressStats,
    pub cursor_position: usize,
    pub list_state: ListState,
    pub mode: Mode,
    pub add_form: AddTaskForm,
    pub email_input: TextInput,
    pub date_picker: DatePicker,
    pub history: HistoryViewer,
    pub should_quit: bool,
    pub show_help: bool,
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    /// Terminal height, updated on each render for scroll calculations
    pub terminal_height: u16,
    /// Where the history modal was last drawn, for outside-click detection.
    pub history_area: Option<Rect>,
    pub today: NaiveDate,
}

impl AppState {
    pub fn new(session: Session, theme: Theme) -> Self {
        let today = Local::now().date_naive();
        let mut state = Self {
            session,
            views: Vec::new(),
            stats: ProgressStats::default(),
            cursor_position: 0,
            list_state: ListState::default(),
            mode: Mode::Navigate,
            add_form: AddTaskForm::default(),
            email_input: TextInput::new(),
            date_picker: DatePicker::new(today),
            history: HistoryViewer::new(),
            should_quit: false,
            show_help: false,
            theme,
            status_message: None,
            terminal_height: 24, // Default, updated on first render
            history_area: None,
            today,
        };
        state.refresh();
        state
    }

    /// Re-derives the visible rows and the statistics from the full list.
    pub fn refresh(&mut self) {
        self.views = self.session.visible_tasks();
        self.stats = self.session.stats();
        self.clamp_cursor();
    }

    /// Keeps `list_state` pointed at the cursor and the cursor inside the
    /// viewport. Each row takes two lines (title and details).
    pub fn sync_list_state(&mut self) {
        if self.views.is_empty() {
            self.list_state.select(None);
            return;
        }
        self.list_state.select(Some(self.cursor_position));

        // Viewport height = terminal height - borders (2) - status bar (1) - stats panel
        let viewport_rows = (self.terminal_height.saturating_sub(12) / 2).max(1) as usize;
        let offset = self.list_state.offset();
        if self.cursor_position < offset {
            *self.list_state.offset_mut() = self.cursor_position;
        } else if self.cursor_position >= offset + viewport_rows {
            *self.list_state.offset_mut() = self.cursor_position + 1 - viewport_rows;
        }
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
        self.sync_list_state();
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_position + 1 < self.views.len() {
            self.cursor_position += 1;
        }
        self.sync_list_state();
    }

    pub fn clamp_cursor(&mut self) {
        if !self.views.is_empty() {
            self.cursor_position = self.cursor_position.min(self.views.len() - 1);
        } else {
            self.cursor_position = 0;
        }
        self.sync_list_state();
    }

    pub fn selected_view(&self) -> Option<&TaskView> {
        self.views.get(self.cursor_position)
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_view().map(|view| view.id) else {
            return;
        };
        match self.session.toggle_task_by_id(id) {
            Ok(Some(done)) => debug!(%id, done, "Toggled task"),
            Ok(None) => {}
            Err(e) => self.report_error(e, SAVE_FAILED_MESSAGE),
        }
        self.refresh();
    }

    pub fn request_delete(&mut self) {
        if self.selected_view().is_some() {
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Navigate;
        let Some(id) = self.selected_view().map(|view| view.id) else {
            return;
        };
        match self.session.delete_task_by_id(id) {
            Ok(Some(task)) => self.set_status_message(format!("Deleted \"{}\"", task.text)),
            Ok(None) => {}
            Err(e) => self.report_error(e, SAVE_FAILED_MESSAGE),
        }
        self.refresh();
    }

    pub fn open_add_form(&mut self) {
        self.add_form.reset();
        self.mode = Mode::AddTask;
    }

    /// Submits the add form. A rejected reminder or a failed save keeps the
    /// form open so the user can correct it or retry.
    pub fn submit_add_form(&mut self) {
        let input = self.add_form.to_input();
        match self.session.add_task(&input) {
            Ok(Some(id)) => {
                self.add_form.reset();
                self.mode = Mode::Navigate;
                self.refresh();
                if let Some(pos) = self.views.iter().position(|view| view.id == id) {
                    self.cursor_position = pos;
                    self.sync_list_state();
                }
            }
            Ok(None) => self.mode = Mode::Navigate,
            Err(e) => self.report_error(e, SAVE_FAILED_MESSAGE),
        }
    }

    pub fn cancel_input(&mut self) {
        self.mode = Mode::Navigate;
    }

    pub fn open_email_prompt(&mut self) {
        self.email_input.clear();
        self.mode = Mode::Email;
    }

    /// An invalid address keeps the prompt open; a backend failure closes it.
    pub fn submit_email(&mut self) {
        let email = self.email_input.value().to_string();
        match self.session.save_email(&email) {
            Ok(()) => {
                self.mode = Mode::Navigate;
                self.set_status_message("Email saved!".to_string());
            }
            Err(e) => {
                if e.downcast_ref::<TaskError>().is_none() {
                    self.mode = Mode::Navigate;
                }
                self.report_error(e, "Error saving email");
            }
        }
    }

    pub fn open_date_picker(&mut self) {
        self.date_picker = DatePicker::new(self.today);
        self.mode = Mode::PickDate;
    }

    /// Starts fetching the snapshot for the picked date and returns to the
    /// list. The history surface opens from [`AppState::tick`] once the
    /// snapshot has arrived.
    pub fn select_history_date(&mut self) {
        let date = self.date_picker.selected;
        let backend = self.session.backend();
        let user_id = self.session.user_id().to_string();
        match self.history.select_date(date, self.today, backend, user_id) {
            Ok(()) => self.mode = Mode::Navigate,
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    pub fn close_history(&mut self) {
        self.history.close();
        self.history_area = None;
        self.mode = Mode::Navigate;
    }

    /// Called once per event-loop iteration.
    pub fn tick(&mut self) {
        if self.history.poll() {
            if let Some(message) = self.history.take_error() {
                self.set_status_message(message);
            } else if self.history.is_open() {
                if self.mode == Mode::Navigate {
                    self.mode = Mode::History;
                } else {
                    debug!(mode = %self.mode, "History snapshot arrived mid-edit, dropped");
                    self.history.close();
                }
            }
        }

        let today = Local::now().date_naive();
        if today != self.today {
            debug!(%today, "Date changed, refreshing views");
            self.today = today;
            self.refresh();
        }

        self.clear_expired_status_message();
    }

    /// Validation errors are shown as they are. Anything else is logged and
    /// shown as `summary`.
    fn report_error(&mut self, e: Error, summary: &str) {
        match e.downcast_ref::<TaskError>() {
            Some(task_error) => self.set_status_message(task_error.to_string()),
            None => {
                warn!("{summary}: {e:#}");
                self.set_status_message(summary.to_string());
            }
        }
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn clear_expired_status_message(&mut self) {
        if let Some((_, time)) = &self.status_message
            && time.elapsed().as_secs() > STATUS_MESSAGE_SECS
        {
            self.status_message = None;
        }
    }
}
