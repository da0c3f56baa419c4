//! Command-line arguments and run loop

use clap::Parser;
use std::path::PathBuf;

use keysetup_core::config::{
    DEFAULT_TIMEOUT_MS, ENV_API_KEY, ENV_API_URL, ENV_PAGE_SIZE, ENV_TIMEOUT_MS,
};
use keysetup_core::report::DEFAULT_ARTIFACT_PATH;
use keysetup_core::{
    validate, ClientConfig, ExpectedSchema, KeySetupError, OnspringClient, ReportEmitter,
    DEFAULT_PAGE_SIZE,
};

use crate::output::{OutputFormat, SummaryOutput};

/// Check a local field list against a remote Onspring instance
#[derive(Parser, Debug)]
#[command(name = "validate-key-setup")]
#[command(about = "Validate that expected apps and fields exist in Onspring and flag formula fields")]
#[command(version)]
pub struct KeySetupCli {
    /// Base URL of the Onspring API
    #[arg(long, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// Onspring API key
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Expected schema file (`App,Field` records separated by CRLF)
    #[arg(short, long, default_value = "fields.csv")]
    pub fields: PathBuf,

    /// Where to write the formula fields report; a report left by an earlier
    /// run is removed when nothing is flagged
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub output: PathBuf,

    /// Items requested per page
    #[arg(long, env = ENV_PAGE_SIZE, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Per-request timeout in milliseconds
    #[arg(long, env = ENV_TIMEOUT_MS, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Exit with a non-zero code when apps or fields are missing
    #[arg(long)]
    pub fail_on_discrepancy: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl KeySetupCli {
    /// Assemble the client config from arguments
    pub fn client_config(&self) -> Result<ClientConfig, KeySetupError> {
        let api_url = self
            .api_url
            .clone()
            .ok_or_else(|| KeySetupError::config(format!("{} is not set", ENV_API_URL)))?;
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| KeySetupError::config(format!("{} is not set", ENV_API_KEY)))?;

        let config = ClientConfig::new(api_url, api_key)
            .with_page_size(self.page_size)
            .with_timeout_ms(self.timeout_ms);
        config.validate()?;
        Ok(config)
    }
}

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed
    Success = 0,
    /// Apps or fields are missing and `--fail-on-discrepancy` was given
    DiscrepanciesFound = 1,
    /// Missing or invalid settings
    InvalidConfig = 3,
    /// Input unreadable or artifact unwritable
    FileError = 4,
    /// Summary could not be serialized
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Map an error to its exit code
    pub fn from_error(err: &KeySetupError) -> Self {
        match err {
            KeySetupError::Config(_) => ExitCode::InvalidConfig,
            KeySetupError::File(_) | KeySetupError::Parse { .. } => ExitCode::FileError,
            KeySetupError::Serialization(_) => ExitCode::InternalError,
        }
    }
}

/// Run a validation and render the summary
pub async fn run(cli: &KeySetupCli) -> Result<ExitCode, KeySetupError> {
    let config = cli.client_config()?;
    tracing::debug!(?config, "Client configured");

    tracing::info!(path = %cli.fields.display(), "Reading expected schema");
    let expected = ExpectedSchema::from_file(&cli.fields)?;

    let client = OnspringClient::new(config)?;
    let emitter = ReportEmitter::new(&cli.output);
    let summary = validate(&client, &expected, &emitter).await?;

    SummaryOutput::from_summary(&summary).render(cli.format)?;

    if cli.fail_on_discrepancy && summary.reconciliation.has_missing() {
        Ok(ExitCode::DiscrepanciesFound)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Run and turn any error into an exit code
pub async fn run_cli(cli: KeySetupCli) -> ExitCode {
    match run(&cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "Validation aborted");
            ExitCode::from_error(&err)
        }
    }
}
