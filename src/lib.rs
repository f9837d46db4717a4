//! AutoFill - a text expansion engine.
//!
//! Watches the text before the caret of an editable field for a configured
//! shortcut and replaces it with its expansion, filling in `{{date}}`,
//! `{{time}}` and `{{clipboard}}` on the way.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod expander;
pub mod field;
pub mod macros;
pub mod matcher;
pub mod models;
pub mod refresh;
pub mod server;
pub mod store;
pub mod table;

// Re-export
pub use api::ApiResponse;
pub use cli::{Autofill, Commands};
pub use commands::handle_command;
pub use config::{get_config_dir, Config, MacroFormats};
pub use editor::{apply, commit, Edit};
pub use error::{AutofillError, Result};
pub use expander::{Expander, Expansion};
pub use field::{Field, FieldEvent, FieldKind, TextField};
pub use macros::{ClipboardSource, MacroResolver, NoClipboard, SystemClipboard};
pub use matcher::{find_match, EditContext, MatchResult};
pub use models::Trigger;
pub use refresh::spawn_refresh;
pub use server::start_api_server;
pub use store::{TriggerSource, TriggerStore};
pub use table::TriggerTable;
