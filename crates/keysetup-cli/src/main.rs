//! Key Setup Validation CLI entry point
//!
//! # Exit Codes
//!
//! - 0: Run completed
//! - 1: Apps or fields missing (only with `--fail-on-discrepancy`)
//! - 3: Missing or invalid settings
//! - 4: Input unreadable or report unwritable
//! - 10: Internal error

use clap::Parser;
use keysetup_cli::{run_cli, KeySetupCli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials usually live in a .env next to the field list
    let _ = dotenvy::dotenv();

    let cli = KeySetupCli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}
