use anyhow::Result;
use clap::Parser;
use tally::cli::Cli;
use tally::config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(&cli.config);
    cli.run().await
}
