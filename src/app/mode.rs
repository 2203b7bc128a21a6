use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigate,
    AddTask,
    ConfirmDelete,
    Email,
    PickDate,
    History,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Navigate => write!(f, "NAVIGATE"),
            Mode::AddTask => write!(f, "ADD"),
            Mode::ConfirmDelete => write!(f, "CONFIRM"),
            Mode::Email => write!(f, "EMAIL"),
            Mode::PickDate => write!(f, "CALENDAR"),
            Mode::History => write!(f, "HISTORY"),
        }
    }
}
