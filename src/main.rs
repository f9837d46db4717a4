use autofill::config::LOG_ENV;
use autofill::{handle_command, Autofill};
use clap::Parser;
use std::process;
use tracing_subscriber::filter::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let autofill = Autofill::parse();

    if let Err(e) = handle_command(autofill.commands).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
