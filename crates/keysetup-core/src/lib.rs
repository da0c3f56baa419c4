//! Key Setup Validation
//!
//! Checks that every app and field declared in a local field list exists in a
//! remote Onspring instance, and flags declared fields that the remote system
//! computes itself (formula fields).
//!
//! ## Architecture
//!
//! 1. **Paging** (`paging`): one generic loop that drains any paged listing,
//!    trusting the latest reported page count and stopping at the first
//!    failed request with whatever it has.
//!
//! 2. **Client** (`client`): the [`SchemaSource`] seam plus the HTTP
//!    implementation of the apps and fields-by-app endpoints.
//!
//! 3. **Inventory** (`inventory`): sequential apps-then-fields fetch into a
//!    name-keyed [`RemoteInventory`], with per-app failure isolation.
//!
//! 4. **Reconcile** (`reconcile`): missing apps, missing fields and formula
//!    fields, always in declaration order of the [`ExpectedSchema`].
//!
//! 5. **Report** (`report`): categorized diagnostics and the
//!    `formula_fields.csv` artifact.
//!
//! Nothing here writes to the remote system.
//!
//! ## Example
//!
//! ```rust,no_run
//! use keysetup_core::{validate, ClientConfig, ExpectedSchema, OnspringClient, ReportEmitter};
//!
//! # async fn run() -> keysetup_core::Result<()> {
//! let config = ClientConfig::new("https://api.onspring.com", "api-key").with_page_size(50);
//! let client = OnspringClient::new(config)?;
//! let expected = ExpectedSchema::from_file("fields.csv")?;
//! let summary = validate(&client, &expected, &ReportEmitter::default()).await?;
//! println!("{} missing app(s)", summary.reconciliation.missing_apps.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod expected;
pub mod inventory;
pub mod model;
pub mod paging;
pub mod reconcile;
pub mod report;
pub mod validator;

pub use client::{OnspringClient, SchemaSource};
pub use config::ClientConfig;
pub use error::{FetchError, KeySetupError, Result};
pub use expected::{ExpectedApp, ExpectedSchema};
pub use inventory::{FetchFailure, InventoryBuilder, RemoteInventory, Resource};
pub use model::{RemoteApp, RemoteField, FORMULA_TYPE};
pub use paging::{drain_pages, Drained, Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use reconcile::{reconcile, Discrepancy, FormulaField, MissingFields, Reconciliation};
pub use report::{Category, Diagnostic, ReportEmitter, ReportOutcome};
pub use validator::{validate, RunSummary};
