use crate::cli::Commands;
use crate::config::{get_config_dir, Config, EXPORT_FILENAME};
use crate::error::{AutofillError, Result};
use crate::expander::Expander;
use crate::field::TextField;
use crate::macros::{ClipboardSource, MacroResolver, NoClipboard, SystemClipboard};
use crate::server::start_api_server;
use crate::store::TriggerStore;
use crate::table::TriggerTable;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn handle_command(command: Commands) -> Result<()> {
    let config = Config::load(&get_config_dir())?;
    let store = TriggerStore::open_or_seed(config.store_path(), config.seed_defaults)?;

    match command {
        Commands::Add {
            shortcut,
            expansion,
        } => store
            .add(&shortcut, expansion)
            .map(|t| println!("Trigger '{}' added", t.shortcut)),
        Commands::Update {
            shortcut,
            expansion,
        } => store
            .update(&shortcut, expansion)
            .map(|t| println!("Trigger '{}' updated", t.shortcut)),
        Commands::Delete { shortcut } => store
            .delete(&shortcut)
            .map(|_| println!("Trigger '{}' deleted", shortcut)),
        Commands::List { query } => {
            handle_list(&store, query.as_deref());
            Ok(())
        }
        Commands::Import { file } => {
            let content = fs::read_to_string(&file)?;
            let added = store.import_json(&content)?;
            println!("Imported {} triggers.", added);
            Ok(())
        }
        Commands::Export { output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(EXPORT_FILENAME));
            store.export_to(&output)?;
            println!("Exported {} triggers to {}", store.list().len(), output.display());
            Ok(())
        }
        Commands::Expand {
            text,
            cursor,
            no_clipboard,
        } => {
            let clipboard: Box<dyn ClipboardSource> = if no_clipboard {
                Box::new(NoClipboard)
            } else {
                Box::new(SystemClipboard)
            };
            handle_expand(&store, &config, clipboard, text, cursor).await
        }
        Commands::Serve { port } => start_api_server(Arc::new(store), port).await,
    }
}

fn handle_list(store: &TriggerStore, query: Option<&str>) {
    let triggers = match query {
        Some(q) => store.search(q),
        None => store.list(),
    };

    if triggers.is_empty() {
        println!("No triggers found. Use `autofill add` to create one.");
        return;
    }

    let width = triggers
        .iter()
        .map(|t| t.shortcut.chars().count())
        .max()
        .unwrap_or(0);
    for trigger in triggers {
        println!("{:<width$}  {}", trigger.shortcut, trigger.expansion, width = width);
    }
}

async fn handle_expand(
    store: &TriggerStore,
    config: &Config,
    clipboard: Box<dyn ClipboardSource>,
    text: String,
    cursor: Option<usize>,
) -> Result<()> {
    let cursor = cursor.unwrap_or_else(|| text.chars().count());
    if cursor > text.chars().count() {
        return Err(AutofillError::Other(format!(
            "cursor {} is past the end of the text",
            cursor
        )));
    }

    let table = Arc::new(TriggerTable::new());
    table.load_from(store).await?;
    let expander = Expander::new(table, MacroResolver::new(clipboard, config.formats.clone()));

    let mut field = TextField::new(text, cursor);
    match expander.handle_input(&mut field).await {
        Some(expansion) => {
            println!("{}", expansion.edit.new_text);
            println!("cursor: {}", expansion.edit.new_cursor);
        }
        None => println!("No trigger matched."),
    }
    Ok(())
}
