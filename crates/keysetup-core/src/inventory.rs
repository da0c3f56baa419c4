//! Remote inventory assembly
//!
//! Walks the apps listing, then each app's fields listing, one request at a
//! time. Failures are isolated: a failed apps page truncates the app list, a
//! failed fields page truncates that one app's field list, and the build
//! carries on either way.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::client::SchemaSource;
use crate::model::{RemoteApp, RemoteField};
use crate::paging::{drain_pages, Drained};

/// Which listing a fetch failure belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    Apps,
    Fields { app_id: i64, app_name: String },
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Apps => write!(f, "apps"),
            Resource::Fields { app_name, .. } => write!(f, "fields of app \"{}\"", app_name),
        }
    }
}

/// A listing that stopped early
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub resource: Resource,
    pub page_number: u32,
    pub reason: String,
}

/// Everything fetched from the remote system in one run
#[derive(Debug, Clone, Default)]
pub struct RemoteInventory {
    fields: HashMap<String, Vec<RemoteField>>,
    failures: Vec<FetchFailure>,
}

impl RemoteInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an app's fields; a later app with the same name replaces it
    pub fn insert(&mut self, app_name: impl Into<String>, fields: Vec<RemoteField>) {
        self.fields.insert(app_name.into(), fields);
    }

    pub fn contains_app(&self, app_name: &str) -> bool {
        self.fields.contains_key(app_name)
    }

    /// Fields fetched for an app, `None` when the app was never seen
    pub fn fields(&self, app_name: &str) -> Option<&[RemoteField]> {
        self.fields.get(app_name).map(Vec::as_slice)
    }

    /// Look up a fetched field by app and field name
    pub fn field(&self, app_name: &str, field_name: &str) -> Option<&RemoteField> {
        self.fields(app_name)?.iter().find(|f| f.name == field_name)
    }

    pub fn app_count(&self) -> usize {
        self.fields.len()
    }

    pub fn record_failure(&mut self, failure: FetchFailure) {
        self.failures.push(failure);
    }

    /// Listings that stopped early, in the order they failed
    pub fn failures(&self) -> &[FetchFailure] {
        &self.failures
    }
}

/// Builds a [`RemoteInventory`] from a [`SchemaSource`]
pub struct InventoryBuilder<'a, S: SchemaSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: SchemaSource + ?Sized> InventoryBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch every app, stopping at the first failed page
    pub async fn fetch_all_apps(&self) -> Drained<RemoteApp> {
        let source = self.source;
        drain_pages(
            source.page_size(),
            |page| source.apps_page(page),
            |page, error| {
                tracing::debug!(page = page, error = %error, "Apps listing stopped");
            },
        )
        .await
    }

    /// Fetch every field of one app, stopping at the first failed page
    pub async fn fetch_fields_for_app(&self, app: &RemoteApp) -> Drained<RemoteField> {
        let source = self.source;
        let app_id = app.id;
        drain_pages(
            source.page_size(),
            |page| source.fields_page(app_id, page),
            |page, error| {
                tracing::debug!(
                    app = %app.name,
                    app_id = app.id,
                    page = page,
                    error = %error,
                    "Fields listing stopped"
                );
            },
        )
        .await
    }

    /// Fetch all apps, then each app's fields in turn
    pub async fn build_inventory(&self) -> RemoteInventory {
        let mut inventory = RemoteInventory::new();

        tracing::info!("Fetching apps");
        let apps = self.fetch_all_apps().await;
        if let Some(failure) = apps.failure {
            inventory.record_failure(FetchFailure {
                resource: Resource::Apps,
                page_number: failure.page_number,
                reason: failure.error.to_string(),
            });
        }
        tracing::info!(apps = apps.items.len(), "Fetched apps");

        tracing::info!("Fetching fields");
        for app in &apps.items {
            let fields = self.fetch_fields_for_app(app).await;
            if let Some(failure) = fields.failure {
                inventory.record_failure(FetchFailure {
                    resource: Resource::Fields {
                        app_id: app.id,
                        app_name: app.name.clone(),
                    },
                    page_number: failure.page_number,
                    reason: failure.error.to_string(),
                });
            }
            tracing::debug!(app = %app.name, fields = fields.items.len(), "Fetched fields");
            inventory.insert(app.name.clone(), fields.items);
        }

        inventory
    }
}
