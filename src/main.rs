use anyhow::Result;
use clap::Parser;
use docbrief::{cli::Cli, config::Config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();
    let config = Config::load()?;
    cli.run(&config).await
}
