//! Summary output for the CLI
//!
//! Rendered after the diagnostic stream, either as a colored table for people
//! or as JSON for scripts.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use keysetup_core::{FetchFailure, KeySetupError, RunSummary};

/// Output format options for the run summary
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table with colors
    #[default]
    Table,
    /// JSON for machine processing
    Json,
}

/// Counts and details of a run, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    pub valid: bool,
    pub partial: bool,
    pub expected_apps: usize,
    pub expected_fields: usize,
    pub remote_apps: usize,
    pub missing_app_count: usize,
    pub missing_field_count: usize,
    pub formula_field_count: usize,
    pub missing_apps: Vec<String>,
    pub missing_fields: Vec<AppFieldOutput>,
    pub formula_fields: Vec<AppFieldOutput>,
    pub fetch_failures: Vec<FetchFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    pub summary: String,
}

/// An (app, field) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppFieldOutput {
    pub app: String,
    pub field: String,
}

impl SummaryOutput {
    /// Create output from a run summary
    pub fn from_summary(run: &RunSummary) -> Self {
        let result = &run.reconciliation;

        let missing_fields: Vec<AppFieldOutput> = result
            .missing_fields
            .iter()
            .flat_map(|m| {
                m.fields.iter().map(move |field| AppFieldOutput {
                    app: m.app.clone(),
                    field: field.clone(),
                })
            })
            .collect();
        let formula_fields: Vec<AppFieldOutput> = result
            .formula_fields
            .iter()
            .map(|f| AppFieldOutput {
                app: f.app.clone(),
                field: f.field.clone(),
            })
            .collect();

        let valid = !result.has_missing();
        let summary = if valid && formula_fields.is_empty() {
            "All expected apps and fields were found".to_string()
        } else if valid {
            format!(
                "All expected apps and fields were found; {} are formula fields",
                formula_fields.len()
            )
        } else {
            format!(
                "{} app(s) and {} field(s) are missing",
                result.missing_apps.len(),
                missing_fields.len()
            )
        };

        Self {
            valid,
            partial: run.is_partial(),
            expected_apps: run.expected_apps,
            expected_fields: run.expected_fields,
            remote_apps: run.remote_apps,
            missing_app_count: result.missing_apps.len(),
            missing_field_count: missing_fields.len(),
            formula_field_count: formula_fields.len(),
            missing_apps: result.missing_apps.clone(),
            missing_fields,
            formula_fields,
            fetch_failures: run.fetch_failures.clone(),
            artifact: run.artifact.clone(),
            summary,
        }
    }

    /// Render to stdout in the given format
    pub fn render(&self, format: OutputFormat) -> Result<(), KeySetupError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.render_to(format, &mut handle)
    }

    /// Render into any writer
    pub fn render_to<W: Write>(&self, format: OutputFormat, out: &mut W) -> Result<(), KeySetupError> {
        match format {
            OutputFormat::Json => self.render_json(out),
            OutputFormat::Table => self.render_table(out),
        }
    }

    fn render_json<W: Write>(&self, out: &mut W) -> Result<(), KeySetupError> {
        let json = serde_json::to_string_pretty(self)?;
        writeln!(out, "{}", json)?;
        Ok(())
    }

    fn render_table<W: Write>(&self, out: &mut W) -> Result<(), KeySetupError> {
        writeln!(out)?;
        writeln!(out, "{}", "Key Setup Validation".cyan().bold())?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out)?;

        let status_icon = if self.valid { "+".green() } else { "x".red() };
        writeln!(out, "{} {}", status_icon, self.summary)?;
        if self.partial {
            writeln!(
                out,
                "{} {} listing(s) stopped early; results are partial",
                "!".yellow(),
                self.fetch_failures.len()
            )?;
        }
        writeln!(out)?;

        writeln!(out, "  Expected apps:    {}", self.expected_apps)?;
        writeln!(out, "  Expected fields:  {}", self.expected_fields)?;
        writeln!(out, "  Remote apps:      {}", self.remote_apps)?;
        writeln!(out)?;

        if !self.missing_apps.is_empty() {
            writeln!(out, "{}", "Missing apps".red().bold())?;
            for app in &self.missing_apps {
                writeln!(out, "  - {}", app)?;
            }
            writeln!(out)?;
        }

        if !self.missing_fields.is_empty() {
            writeln!(out, "{}", "Missing fields".red().bold())?;
            for entry in &self.missing_fields {
                writeln!(out, "  - {} / {}", entry.app, entry.field)?;
            }
            writeln!(out)?;
        }

        if !self.formula_fields.is_empty() {
            writeln!(out, "{}", "Formula fields".yellow().bold())?;
            for entry in &self.formula_fields {
                writeln!(out, "  - {} / {}", entry.app, entry.field)?;
            }
            writeln!(out)?;
        }

        if let Some(path) = &self.artifact {
            writeln!(out, "Formula field report written to {}", path.display())?;
        }

        Ok(())
    }
}
