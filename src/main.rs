use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use todo_api::cli::{self, Cli};
use todo_api::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET, etc. are picked up
    let _ = dotenvy::dotenv();

    let config = config::config().clone();
    init_tracing(config.is_production());

    tracing::info!("Starting todo-api in {:?} mode", config.environment);
    config.validate().context("invalid configuration")?;

    let cli = Cli::parse();
    cli::run(cli, config).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("todo_api=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}
