//! End-to-end validation run
//!
//! Builds the remote inventory, reconciles it against the expected schema and
//! hands the findings to the report emitter. Remote failures never abort the
//! run; only artifact I/O can fail it.

use std::path::PathBuf;

use serde::Serialize;

use crate::client::SchemaSource;
use crate::error::Result;
use crate::expected::ExpectedSchema;
use crate::inventory::{FetchFailure, InventoryBuilder};
use crate::reconcile::{reconcile, Reconciliation};
use crate::report::{Diagnostic, ReportEmitter};

/// Result of one validation run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub expected_apps: usize,
    pub expected_fields: usize,
    pub remote_apps: usize,
    pub reconciliation: Reconciliation,
    pub fetch_failures: Vec<FetchFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl RunSummary {
    /// Whether some remote listing stopped early
    pub fn is_partial(&self) -> bool {
        !self.fetch_failures.is_empty()
    }
}

/// Validate an expected schema against a remote source
pub async fn validate<S: SchemaSource + ?Sized>(
    source: &S,
    expected: &ExpectedSchema,
    emitter: &ReportEmitter,
) -> Result<RunSummary> {
    tracing::info!(
        apps = expected.app_count(),
        fields = expected.field_count(),
        "Validating key setup"
    );

    let inventory = InventoryBuilder::new(source).build_inventory().await;
    let reconciliation = reconcile(expected, &inventory);
    let outcome = emitter.emit(&reconciliation, &inventory)?;

    Ok(RunSummary {
        expected_apps: expected.app_count(),
        expected_fields: expected.field_count(),
        remote_apps: inventory.app_count(),
        reconciliation,
        fetch_failures: inventory.failures().to_vec(),
        artifact: outcome.artifact,
        diagnostics: outcome.diagnostics,
    })
}
