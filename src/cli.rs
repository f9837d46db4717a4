use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "autofill - expand short triggers into longer text",
    long_about = "autofill manages text expansion triggers and expands them in editable fields."
)]
pub struct Autofill {
    #[clap(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new trigger
    Add {
        #[clap(long, short = 's', help = "Shortcut that activates the trigger")]
        shortcut: String,

        #[clap(long, short = 'c', help = "Expansion text, may contain {{date}}, {{time}}, {{clipboard}}")]
        expansion: String,
    },
    /// Update the expansion of an existing trigger
    Update {
        #[clap(long, short = 's', help = "Shortcut of the trigger to update")]
        shortcut: String,

        #[clap(long, short = 'c', help = "New expansion text")]
        expansion: String,
    },
    /// Delete a trigger by shortcut
    Delete {
        #[clap(long, short, help = "Shortcut of the trigger to delete")]
        shortcut: String,
    },
    /// List triggers
    List {
        #[clap(long = "search", short = 'q', help = "Only show triggers containing this text")]
        query: Option<String>,
    },
    /// Import triggers from a JSON file, skipping shortcuts that already exist
    Import {
        #[clap(help = "JSON file containing an array of {shortcut, expansion}")]
        file: PathBuf,
    },
    /// Export all triggers to a JSON file
    Export {
        #[clap(long, short, help = "Output file [default: autofill_triggers.json]")]
        output: Option<PathBuf>,
    },
    /// Run the expansion engine once against some text
    Expand {
        #[clap(long, short, help = "Field text")]
        text: String,

        #[clap(long, short, help = "Caret offset in chars [default: end of text]")]
        cursor: Option<usize>,

        #[clap(long, help = "Treat clipboard access as denied")]
        no_clipboard: bool,
    },
    /// Serve the trigger management API
    Serve {
        #[clap(long, short, default_value = "3000", help = "Port to listen on")]
        port: u16,
    },
}
