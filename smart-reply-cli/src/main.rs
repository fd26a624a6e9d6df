//! smart-reply: context aggregation, sentiment and streamed reply suggestions.

use anyhow::Result;
use clap::Parser;
use reply_core::LogTarget;
use smart_reply::{run, AppConfig, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    reply_core::init_tracing(&LogTarget::file(&config.log_file).with_stderr(cli.verbose))?;

    run(cli, config).await
}
