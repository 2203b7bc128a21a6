use chrono::{Datelike, Days, Months, NaiveDate};

use crate::todo::TaskInput;
use crate::utils::text_input::TextInput;

pub const ADD_FORM_LABELS: [&str; 4] = ["Task", "Reminder", "Repeat", "Tags"];
pub const ADD_FORM_HINTS: [&str; 4] = [
    "What needs doing?",
    "YYYY-MM-DD HH:MM (optional)",
    "daily / weekly / monthly / yearly (optional)",
    "comma separated (optional)",
];

/// Field-by-field form for a new task. Tab moves between fields.
#[derive(Debug, Clone, Default)]
pub struct AddTaskForm {
    pub fields: [TextInput; 4],
    pub focus: usize,
}

impl AddTaskForm {
    pub fn focused_mut(&mut self) -> &mut TextInput {
        &mut self.fields[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn to_input(&self) -> TaskInput {
        TaskInput::new(self.fields[0].value())
            .remind_at(self.fields[1].value())
            .repeat(self.fields[2].value())
            .tags(self.fields[3].value())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Calendar cursor that never moves past `max` (today).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePicker {
    pub selected: NaiveDate,
    pub max: NaiveDate,
}

impl DatePicker {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected: today,
            max: today,
        }
    }

    fn set(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.selected = date.min(self.max);
        }
    }

    pub fn prev_day(&mut self) {
        self.set(self.selected.checked_sub_days(Days::new(1)));
    }

    pub fn next_day(&mut self) {
        self.set(self.selected.checked_add_days(Days::new(1)));
    }

    pub fn prev_week(&mut self) {
        self.set(self.selected.checked_sub_days(Days::new(7)));
    }

    pub fn next_week(&mut self) {
        self.set(self.selected.checked_add_days(Days::new(7)));
    }

    pub fn prev_month(&mut self) {
        self.set(self.selected.checked_sub_months(Months::new(1)));
    }

    pub fn next_month(&mut self) {
        self.set(self.selected.checked_add_months(Months::new(1)));
    }

    pub fn jump_to_today(&mut self) {
        self.selected = self.max;
    }

    /// First day of the displayed month.
    pub fn month_start(&self) -> NaiveDate {
        self.selected.with_day(1).unwrap_or(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_form_focus_wraps() {
        let mut form = AddTaskForm::default();
        form.focus_prev();
        assert_eq!(form.focus, 3);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_add_form_to_input() {
        let mut form = AddTaskForm::default();
        for c in "Buy milk".chars() {
            form.focused_mut().insert(c);
        }
        form.focus = 3;
        for c in "work, , urgent".chars() {
            form.focused_mut().insert(c);
        }

        let input = form.to_input();
        assert_eq!(input.text, "Buy milk");
        assert_eq!(input.tags, "work, , urgent");
        assert_eq!(input.remind_at, "");

        form.reset();
        assert_eq!(form.to_input(), TaskInput::default());
    }

    #[test]
    fn test_date_picker_never_passes_today() {
        let today = date(2024, 3, 13);
        let mut picker = DatePicker::new(today);

        picker.next_day();
        picker.next_week();
        picker.next_month();
        assert_eq!(picker.selected, today);

        picker.prev_week();
        assert_eq!(picker.selected, date(2024, 3, 6));
        picker.next_week();
        picker.next_day();
        assert_eq!(picker.selected, today);
    }

    #[test]
    fn test_date_picker_month_navigation() {
        let mut picker = DatePicker::new(date(2024, 3, 31));
        picker.prev_month();
        assert_eq!(picker.selected, date(2024, 2, 29));
        assert_eq!(picker.month_start(), date(2024, 2, 1));

        picker.jump_to_today();
        assert_eq!(picker.selected, date(2024, 3, 31));
    }
}
