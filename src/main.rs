//! Entry point for the demand forecasting batch job.

use clap::Parser;
use demand_forecast::app::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demand_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await?;

    Ok(())
}
