//! Key Setup Validation CLI
//!
//! Command-line front end for `keysetup-core`: reads the expected field list,
//! validates it against the remote API configured through flags, environment
//! variables or a `.env` file, and prints a summary after the diagnostics.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Credentials from .env (API_URL, API_KEY), defaults for everything else
//! validate-key-setup
//!
//! # Explicit input and output, machine-readable summary
//! validate-key-setup --fields my_fields.csv --output formulas.csv --format json
//!
//! # Fail CI when anything expected is missing
//! validate-key-setup --fail-on-discrepancy
//! ```

pub mod cli;
pub mod output;

pub use cli::{run, run_cli, ExitCode, KeySetupCli};
pub use output::{OutputFormat, SummaryOutput};
