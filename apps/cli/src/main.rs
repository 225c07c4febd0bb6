//! paperfeed CLI: a curated AI research paper feed.
//!
//! Pulls recent papers from arXiv, keeps the ones from major labs on hot
//! topics, translates them, and merges them into the site's paper store.

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
