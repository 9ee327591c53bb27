//! streamdoc command-line client
//!
//! Sends one prompt to a chat endpoint, renders the streamed answer as it
//! arrives and prints the final document. Ctrl-C stops the stream and keeps
//! whatever was received.

mod args;
mod chart;
mod markdown;
mod presenter;
mod run;

use clap::Parser;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = run::resolve_config(&cli)?;
    run::init_logging(&config.logging);
    run::run(cli, config).await
}
