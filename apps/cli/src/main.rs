//! notedown CLI — course-note JSON to Markdown converter.
//!
//! Turns exported course-note JSON into readable Markdown documents,
//! grouped by module and lesson.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
