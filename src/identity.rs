use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use crate::storage::{LocalStorage, USER_ID_KEY};

/// Returns the client identifier, generating and persisting a random v4
/// UUID on first use.
pub fn get_or_create_user_id(storage: &dyn LocalStorage) -> Result<String> {
    if let Some(id) = storage.get_item(USER_ID_KEY)? {
        let id = id.trim();
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    let id = Uuid::new_v4().to_string();
    storage.set_item(USER_ID_KEY, &id)?;
    info!(user_id = %id, "Generated new client identifier");
    Ok(id)
}
