mod cli;

use task_sync::app;
use task_sync::config::Config;
use task_sync::history::parse_history_date;
use task_sync::session::Session;
use task_sync::storage::FileStorage;
use task_sync::sync::{Backend, HttpBackend, OfflineBackend};
use task_sync::todo::TaskInput;
use task_sync::ui::{self, theme::Theme};
use task_sync::utils::paths::{ensure_directories_exist, get_crash_log_path, get_logs_dir};
use task_sync::view::text::{render_history, render_stats, render_task_list};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands};
use std::fs;
use std::io::Write;
use std::panic;
use std::sync::Arc;
use tracing::{info, warn};

/// Install a panic hook that writes crash information to a log file
fn install_crash_handler() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if let Ok(crash_log_path) = get_crash_log_path() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let mut crash_report = format!("=== CRASH at {timestamp} ===\n");

            if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
                crash_report.push_str(&format!("Message: {message}\n"));
            } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
                crash_report.push_str(&format!("Message: {message}\n"));
            }

            if let Some(location) = panic_info.location() {
                crash_report.push_str(&format!(
                    "Location: {}:{}:{}\n",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }

            crash_report.push_str(&format!(
                "\nBacktrace:\n{}\n\n",
                std::backtrace::Backtrace::force_capture()
            ));

            if let Ok(mut file) = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log_path)
            {
                let _ = file.write_all(crash_report.as_bytes());
                eprintln!("\nCrash logged to: {}", crash_log_path.display());
            }
        }

        default_hook(panic_info);
    }));
}

fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

/// Initialize file-based logging for the TUI mode.
///
/// Logs are written to ~/.task-sync/logs/tasksync.log (rolled daily).
/// Log level can be controlled with RUST_LOG env var (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = get_logs_dir().ok()?;

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {e}");
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "tasksync.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

/// One-shot commands log warnings and errors to stderr.
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_backend(cli: &Cli, config: &Config) -> Result<Arc<dyn Backend>> {
    if cli.offline || !config.sync_enabled {
        info!("Backend sync disabled");
        return Ok(Arc::new(OfflineBackend));
    }
    let backend = HttpBackend::from_config(config).context("Failed to create HTTP client")?;
    info!(server_url = %config.server_url, "Using backend");
    Ok(Arc::new(backend))
}

fn main() -> Result<()> {
    install_crash_handler();

    let cli = Cli::parse();

    // Guard must be kept alive for the duration of the app
    let _log_guard = match cli.command {
        None => init_file_logging(),
        Some(_) => {
            init_stderr_logging();
            None
        }
    };

    ensure_directories_exist()?;

    let mut config = Config::load()?;
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }

    let backend = build_backend(&cli, &config)?;
    let storage = FileStorage::open_default()?;
    let mut session = Session::open(Box::new(storage), backend)?;

    match cli.command {
        Some(Commands::Add {
            text,
            remind,
            repeat,
            tags,
        }) => handle_add(&mut session, text, remind, repeat, tags)?,
        Some(Commands::Done { position }) => handle_done(&mut session, position)?,
        Some(Commands::Delete { position }) => handle_delete(&mut session, position)?,
        Some(Commands::List) => handle_list(&session),
        Some(Commands::Stats) => print!("{}", render_stats(&session.stats())),
        Some(Commands::History { date }) => handle_history(&session, &date)?,
        Some(Commands::Email { address }) => {
            session.save_email(&address)?;
            println!("Email saved!");
        }
        Some(Commands::Whoami) => println!("{}", session.user_id()),
        None => {
            info!("tasksync starting");
            let theme = Theme::from_config(&config);
            let state = app::AppState::new(session, theme);
            let state = ui::run_tui(state)?;
            state.session.backend().wait_for_pending();
            info!("tasksync exiting gracefully");
            return Ok(());
        }
    }

    session.backend().wait_for_pending();
    Ok(())
}

fn handle_add(
    session: &mut Session,
    text: String,
    remind: Option<String>,
    repeat: Option<String>,
    tags: Option<String>,
) -> Result<()> {
    let input = TaskInput::new(text)
        .remind_at(remind.unwrap_or_default())
        .repeat(repeat.unwrap_or_default())
        .tags(tags.unwrap_or_default());

    match session.add_task(&input)? {
        Some(_) => println!("✓ Task added ({} total)", session.tasks().len()),
        None => println!("Nothing to add: the task title is empty."),
    }
    Ok(())
}

/// Converts a 1-based position from the command line to a list index.
fn position_to_index(position: usize) -> Option<usize> {
    position.checked_sub(1)
}

fn handle_done(session: &mut Session, position: usize) -> Result<()> {
    let done = match position_to_index(position) {
        Some(index) => session.toggle_task(index)?,
        None => None,
    };
    match done {
        Some(true) => println!("✓ Task {position} marked done"),
        Some(false) => println!("Task {position} marked not done"),
        None => warn!(position, "No task at that position"),
    }
    Ok(())
}

fn handle_delete(session: &mut Session, position: usize) -> Result<()> {
    let deleted = match position_to_index(position) {
        Some(index) => session.delete_task(index)?,
        None => None,
    };
    match deleted {
        Some(task) => println!("Deleted \"{}\"", task.text),
        None => warn!(position, "No task at that position"),
    }
    Ok(())
}

fn handle_list(session: &Session) {
    print!("{}", render_task_list(&session.visible_tasks()));
    println!();
    print!("{}", render_stats(&session.stats()));
}

fn handle_history(session: &Session, date: &str) -> Result<()> {
    let date = parse_history_date(date, Local::now().date_naive())?;
    let view = session
        .fetch_history(date)
        .map_err(|e| e.context(task_sync::history::LOAD_FAILED_MESSAGE))?;
    print!("{}", render_history(&view));
    Ok(())
}
