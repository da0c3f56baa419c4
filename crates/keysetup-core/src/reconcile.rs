//! Expected schema vs. remote inventory diffing
//!
//! Deterministic: every pass iterates the expected schema in declaration
//! order, so the same inputs always produce the same findings in the same
//! order, whatever order the remote API listed things in.

use std::collections::HashSet;

use serde::Serialize;

use crate::expected::ExpectedSchema;
use crate::inventory::RemoteInventory;

/// Expected fields of one app that the remote app lacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFields {
    pub app: String,
    /// In declared order; a field declared twice is listed twice
    pub fields: Vec<String>,
}

/// An expected field that exists remotely as a formula field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaField {
    pub app: String,
    pub field: String,
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    MissingApp { app: String },
    MissingField { app: String, field: String },
    FormulaField { app: String, field: String },
}

/// All findings of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub missing_apps: Vec<String>,
    /// Only apps with at least one missing field appear
    pub missing_fields: Vec<MissingFields>,
    pub formula_fields: Vec<FormulaField>,
}

impl Reconciliation {
    /// Missing fields recorded for an app
    pub fn missing_fields_for(&self, app: &str) -> Option<&[String]> {
        self.missing_fields
            .iter()
            .find(|m| m.app == app)
            .map(|m| m.fields.as_slice())
    }

    pub fn missing_field_count(&self) -> usize {
        self.missing_fields.iter().map(|m| m.fields.len()).sum()
    }

    /// Whether anything expected is absent remotely
    pub fn has_missing(&self) -> bool {
        !self.missing_apps.is_empty() || !self.missing_fields.is_empty()
    }

    /// Flatten into individual findings: missing apps, then missing fields,
    /// then formula fields
    pub fn discrepancies(&self) -> Vec<Discrepancy> {
        let apps = self
            .missing_apps
            .iter()
            .map(|app| Discrepancy::MissingApp { app: app.clone() });
        let fields = self.missing_fields.iter().flat_map(|m| {
            m.fields.iter().map(move |field| Discrepancy::MissingField {
                app: m.app.clone(),
                field: field.clone(),
            })
        });
        let formulas = self.formula_fields.iter().map(|f| Discrepancy::FormulaField {
            app: f.app.clone(),
            field: f.field.clone(),
        });

        apps.chain(fields).chain(formulas).collect()
    }
}

/// Apps declared locally but absent from the inventory, in declared order
pub fn missing_apps(expected: &ExpectedSchema, inventory: &RemoteInventory) -> Vec<String> {
    expected
        .app_names()
        .filter(|app| !inventory.contains_app(app))
        .map(str::to_string)
        .collect()
}

/// Declared fields absent from each present app
///
/// Apps missing from the inventory are skipped entirely.
pub fn missing_fields(expected: &ExpectedSchema, inventory: &RemoteInventory) -> Vec<MissingFields> {
    expected
        .apps()
        .filter_map(|app| {
            let actual: HashSet<&str> = inventory
                .fields(&app.name)?
                .iter()
                .map(|f| f.name.as_str())
                .collect();

            let fields: Vec<String> = app
                .fields
                .iter()
                .filter(|field| !actual.contains(field.as_str()))
                .cloned()
                .collect();

            (!fields.is_empty()).then(|| MissingFields {
                app: app.name.clone(),
                fields,
            })
        })
        .collect()
}

/// Declared fields that exist remotely with the formula type
///
/// Fields missing remotely have no record and are never classified.
pub fn formula_fields(expected: &ExpectedSchema, inventory: &RemoteInventory) -> Vec<FormulaField> {
    expected
        .apps()
        .filter(|app| inventory.contains_app(&app.name))
        .flat_map(|app| {
            app.fields.iter().filter_map(move |field| {
                inventory
                    .field(&app.name, field)
                    .filter(|remote| remote.is_formula())
                    .map(|_| FormulaField {
                        app: app.name.clone(),
                        field: field.clone(),
                    })
            })
        })
        .collect()
}

/// Run all three passes
pub fn reconcile(expected: &ExpectedSchema, inventory: &RemoteInventory) -> Reconciliation {
    Reconciliation {
        missing_apps: missing_apps(expected, inventory),
        missing_fields: missing_fields(expected, inventory),
        formula_fields: formula_fields(expected, inventory),
    }
}
