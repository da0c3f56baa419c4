//! Findings output
//!
//! [`diagnostics`] turns a reconciliation into categorized lines;
//! [`ReportEmitter`] logs them and writes the formula fields artifact.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{KeySetupError, Result};
use crate::inventory::{RemoteInventory, Resource};
use crate::reconcile::{Discrepancy, FormulaField, Reconciliation};

/// Default artifact file name
pub const DEFAULT_ARTIFACT_PATH: &str = "formula_fields.csv";

/// Header record of the artifact
pub const ARTIFACT_HEADER: &str = "App,Field";

/// Record separator of the artifact
pub const ARTIFACT_SEPARATOR: &str = "\r\n";

/// Kind of a diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Progress,
    AppFetchError,
    FieldFetchError,
    MissingApp,
    MissingField,
    FormulaField,
    RunComplete,
}

/// Severity a diagnostic is logged at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// One line of diagnostic output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: Category,
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    fn new(category: Category, level: Level, message: impl Into<String>) -> Self {
        Self {
            category,
            level,
            message: message.into(),
        }
    }

    fn info(category: Category, message: impl Into<String>) -> Self {
        Self::new(category, Level::Info, message)
    }

    fn warn(category: Category, message: impl Into<String>) -> Self {
        Self::new(category, Level::Warn, message)
    }
}

impl From<Discrepancy> for Diagnostic {
    fn from(finding: Discrepancy) -> Self {
        match finding {
            Discrepancy::MissingApp { app } => {
                Diagnostic::warn(Category::MissingApp, format!("App \"{}\" not found.", app))
            }
            Discrepancy::MissingField { app, field } => Diagnostic::warn(
                Category::MissingField,
                format!("Field \"{}\" not found in app \"{}\".", field, app),
            ),
            Discrepancy::FormulaField { app, field } => Diagnostic::warn(
                Category::FormulaField,
                format!("Field \"{}\" in app \"{}\" is a formula field.", field, app),
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Build the diagnostic lines for a run, in output order
///
/// Fetch failures come first since they qualify every finding after them.
pub fn diagnostics(reconciliation: &Reconciliation, inventory: &RemoteInventory) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    for failure in inventory.failures() {
        let category = match failure.resource {
            Resource::Apps => Category::AppFetchError,
            Resource::Fields { .. } => Category::FieldFetchError,
        };
        out.push(Diagnostic::new(
            category,
            Level::Error,
            format!(
                "Listing {} stopped at page {} ({}); results are partial.",
                failure.resource, failure.page_number, failure.reason
            ),
        ));
    }

    let findings: Vec<Diagnostic> = reconciliation
        .discrepancies()
        .into_iter()
        .map(Diagnostic::from)
        .collect();
    let findings = &findings;
    let section = move |category: Category| {
        findings
            .iter()
            .filter(move |d| d.category == category)
            .cloned()
    };

    out.push(Diagnostic::info(Category::Progress, "Validating apps..."));
    if reconciliation.missing_apps.is_empty() {
        out.push(Diagnostic::info(Category::Progress, "All apps found."));
    }
    out.extend(section(Category::MissingApp));

    out.push(Diagnostic::info(Category::Progress, "Validating fields..."));
    if reconciliation.missing_fields.is_empty() {
        out.push(Diagnostic::info(Category::Progress, "All fields found."));
    }
    out.extend(section(Category::MissingField));

    out.push(Diagnostic::info(Category::Progress, "Checking for formula fields..."));
    out.extend(section(Category::FormulaField));

    out
}

/// Render the formula fields artifact, `None` when there is nothing to report
///
/// Records are joined with `\r\n` and carry no quoting.
pub fn render_formula_fields(flags: &[FormulaField]) -> Option<String> {
    if flags.is_empty() {
        return None;
    }

    let records: Vec<String> = std::iter::once(ARTIFACT_HEADER.to_string())
        .chain(flags.iter().map(|f| format!("{},{}", f.app, f.field)))
        .collect();

    Some(records.join(ARTIFACT_SEPARATOR))
}

/// What a report run produced
#[derive(Debug, Clone, Default)]
pub struct ReportOutcome {
    /// Artifact path, set only when it was written
    pub artifact: Option<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Logs findings and writes the artifact
#[derive(Debug, Clone)]
pub struct ReportEmitter {
    artifact_path: PathBuf,
}

impl Default for ReportEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT_PATH)
    }
}

impl ReportEmitter {
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Log every diagnostic, write the artifact if any formula field was
    /// flagged, then log completion
    pub fn emit(&self, reconciliation: &Reconciliation, inventory: &RemoteInventory) -> Result<ReportOutcome> {
        let mut diagnostics = diagnostics(reconciliation, inventory);
        for diagnostic in &diagnostics {
            log_diagnostic(diagnostic);
        }

        let artifact = self.write_artifact(&reconciliation.formula_fields)?;
        if let Some(path) = &artifact {
            let line = Diagnostic::info(
                Category::Progress,
                format!(
                    "Wrote {} formula field(s) to {}.",
                    reconciliation.formula_fields.len(),
                    path.display()
                ),
            );
            log_diagnostic(&line);
            diagnostics.push(line);
        }

        let done = Diagnostic::info(Category::RunComplete, "Validation complete.");
        log_diagnostic(&done);
        diagnostics.push(done);

        Ok(ReportOutcome {
            artifact,
            diagnostics,
        })
    }

    /// Write the artifact; when `flags` is empty nothing is written and a
    /// report left by an earlier run is removed
    pub fn write_artifact(&self, flags: &[FormulaField]) -> Result<Option<PathBuf>> {
        let Some(contents) = render_formula_fields(flags) else {
            self.remove_stale_artifact()?;
            return Ok(None);
        };

        std::fs::write(&self.artifact_path, contents).map_err(|e| {
            KeySetupError::file(format!("{}: {}", self.artifact_path.display(), e))
        })?;

        Ok(Some(self.artifact_path.clone()))
    }

    fn remove_stale_artifact(&self) -> Result<()> {
        match std::fs::remove_file(&self.artifact_path) {
            Ok(()) => {
                tracing::info!(path = %self.artifact_path.display(), "Removed stale formula field report");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KeySetupError::file(format!(
                "{}: {}",
                self.artifact_path.display(),
                e
            ))),
        }
    }
}

fn log_diagnostic(diagnostic: &Diagnostic) {
    let category = diagnostic.category;
    match diagnostic.level {
        Level::Info => tracing::info!(?category, "{}", diagnostic.message),
        Level::Warn => tracing::warn!(?category, "{}", diagnostic.message),
        Level::Error => tracing::error!(?category, "{}", diagnostic.message),
    }
}
