use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tasksync")]
#[command(about = "A to-do list with reminders, progress stats and backend sync", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config and TASKSYNC_SERVER_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Keep everything local; nothing is sent to the backend
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        text: String,

        /// Reminder time, e.g. "2024-01-01 10:00"
        #[arg(short, long)]
        remind: Option<String>,

        /// daily, weekly, monthly or yearly
        #[arg(long)]
        repeat: Option<String>,

        /// Comma separated tags
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Toggle a task done/undone by its position (1-based)
    Done { position: usize },
    /// Delete a task by its position (1-based)
    Delete { position: usize },
    /// Show the live task list and progress
    List,
    /// Show progress statistics
    Stats,
    /// Show the backend snapshot for a past date (YYYY-MM-DD)
    History { date: String },
    /// Register the email address reminders are sent to
    Email { address: String },
    /// Print this client's identifier
    Whoami,
}
