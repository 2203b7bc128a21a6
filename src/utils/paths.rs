use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

pub fn get_task_sync_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".task-sync"))
}

/// Directory holding the durable key/value entries (`tasks`, `user_id`).
pub fn get_storage_dir() -> Result<PathBuf> {
    let dir = get_task_sync_dir()?;
    Ok(dir.join("storage"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let dir = get_task_sync_dir()?;
    Ok(dir.join("config.toml"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let dir = get_task_sync_dir()?;
    Ok(dir.join("logs"))
}

pub fn get_crash_log_path() -> Result<PathBuf> {
    let dir = get_task_sync_dir()?;
    Ok(dir.join("crash.log"))
}

pub fn ensure_directories_exist() -> Result<()> {
    let storage_dir = get_storage_dir()?;

    if !storage_dir.exists() {
        fs::create_dir_all(&storage_dir)?;
    }

    Ok(())
}
