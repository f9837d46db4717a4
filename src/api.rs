use crate::models::Trigger;
use crate::store::TriggerStore;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

// List triggers, optionally filtered
pub fn api_list_triggers(store: &TriggerStore, query: Option<&str>) -> ApiResponse<Vec<Trigger>> {
    match query {
        Some(q) if !q.is_empty() => ApiResponse::success(store.search(q)),
        _ => ApiResponse::success(store.list()),
    }
}

// Add a new trigger
pub fn api_add_trigger(store: &TriggerStore, trigger: Trigger) -> ApiResponse<Trigger> {
    match store.add(&trigger.shortcut, trigger.expansion) {
        Ok(added) => ApiResponse::success(added),
        Err(e) => ApiResponse::error(format!("Failed to add trigger: {}", e)),
    }
}

// Update an existing trigger
pub fn api_update_trigger(store: &TriggerStore, trigger: Trigger) -> ApiResponse<Trigger> {
    match store.update(&trigger.shortcut, trigger.expansion) {
        Ok(updated) => ApiResponse::success(updated),
        Err(e) => ApiResponse::error(format!("Failed to update trigger: {}", e)),
    }
}

// Delete a trigger
pub fn api_delete_trigger(store: &TriggerStore, shortcut: &str) -> ApiResponse<()> {
    match store.delete(shortcut) {
        Ok(_) => ApiResponse::success(()),
        Err(e) => ApiResponse::error(format!("Failed to delete trigger: {}", e)),
    }
}

// Import a JSON array of triggers, returning how many were added
pub fn api_import_triggers(store: &TriggerStore, body: serde_json::Value) -> ApiResponse<usize> {
    match store.import_value(body) {
        Ok(added) => ApiResponse::success(added),
        Err(e) => ApiResponse::error(format!("Failed to import triggers: {}", e)),
    }
}
