pub mod event;
pub mod forms;
pub mod mode;
pub mod state;

pub use state::AppState;
