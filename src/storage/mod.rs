pub mod local;
pub mod tasks;

pub use local::{FileStorage, LocalStorage, MemoryStorage, TASKS_KEY, USER_ID_KEY};
pub use tasks::{load_tasks, save_tasks};
