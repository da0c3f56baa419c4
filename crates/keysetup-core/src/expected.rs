//! Expected schema declared locally
//!
//! The schema is an ordered mapping from app name to the field names the app
//! should contain. Iteration always follows declaration order (the order in
//! which an app name first appears in the input), which is what keeps every
//! downstream report reproducible regardless of remote response order.
//!
//! # Input format
//!
//! ```text
//! App,Field
//! Contacts,First Name\r\n
//! Contacts,Last Name\r\n
//! Companies,Name
//! ```
//!
//! The first line is a header and is ignored. Lines are separated by `\r\n`.
//! Columns after the second are ignored. There is no quoting: a comma or line
//! break inside a name cannot be represented.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{KeySetupError, Result};

/// Line separator of the expected-schema input
pub const RECORD_SEPARATOR: &str = "\r\n";

/// Column separator of the expected-schema input
pub const COLUMN_SEPARATOR: char = ',';

/// One app and its declared fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedApp {
    pub name: String,
    /// Declared field names in input order; duplicates are kept
    pub fields: Vec<String>,
}

/// Declaration-ordered mapping of app name to expected fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedSchema {
    apps: Vec<ExpectedApp>,
    index: HashMap<String, usize>,
}

impl ExpectedSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to an app, registering the app on first sight
    pub fn push_field(&mut self, app: impl Into<String>, field: impl Into<String>) {
        let app = app.into();
        let slot = match self.index.get(&app) {
            Some(&slot) => slot,
            None => {
                let slot = self.apps.len();
                self.index.insert(app.clone(), slot);
                self.apps.push(ExpectedApp {
                    name: app,
                    fields: Vec::new(),
                });
                slot
            }
        };
        self.apps[slot].fields.push(field.into());
    }

    /// Fields declared for an app
    pub fn fields(&self, app: &str) -> Option<&[String]> {
        self.index
            .get(app)
            .map(|&slot| self.apps[slot].fields.as_slice())
    }

    /// Apps in declaration order
    pub fn apps(&self) -> impl Iterator<Item = &ExpectedApp> {
        self.apps.iter()
    }

    /// App names in declaration order
    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(|a| a.name.as_str())
    }

    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    /// Total number of declared field entries, duplicates included
    pub fn field_count(&self) -> usize {
        self.apps.iter().map(|a| a.fields.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Parse the expected-schema text format
    ///
    /// Blank lines (such as the one produced by a trailing `\r\n`) are
    /// skipped. A data line with no field column is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let mut schema = Self::new();

        for (idx, line) in input.split(RECORD_SEPARATOR).enumerate().skip(1) {
            if line.is_empty() {
                continue;
            }

            let mut columns = line.split(COLUMN_SEPARATOR);
            let app = columns.next().unwrap_or_default();
            let field = columns.next().ok_or_else(|| {
                KeySetupError::parse(idx + 1, format!("expected `App,Field`, got {:?}", line))
            })?;

            schema.push_field(app, field);
        }

        Ok(schema)
    }

    /// Read and parse an expected-schema file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| KeySetupError::file(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }
}
