pub mod store;
pub mod task;

pub use store::TaskStore;
pub use task::{parse_reminder, parse_tags, Repeat, Task, TaskInput};
