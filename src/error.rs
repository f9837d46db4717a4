use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AutofillError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Shortcut '{0}' already exists")]
    DuplicateShortcut(String),
    #[error("Shortcut '{0}' not found")]
    ShortcutNotFound(String),
    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),
    #[error("Invalid import data: {0}")]
    InvalidImport(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AutofillError>;
