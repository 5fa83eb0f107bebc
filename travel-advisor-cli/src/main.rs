use anyhow::Result;
use clap::Parser;
use travel_advisor_cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    if let Err(e) = adk_telemetry::init_telemetry("travel-advisor") {
        eprintln!("Failed to initialize telemetry: {e}");
    }

    run(Cli::parse()).await
}
