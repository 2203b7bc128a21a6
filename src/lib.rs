pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod identity;
pub mod session;
pub mod stats;
pub mod storage;
pub mod sync;
pub mod todo;
pub mod ui;
pub mod utils;
pub mod view;
