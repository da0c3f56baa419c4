//! Remote query API access
//!
//! [`SchemaSource`] is the seam between the inventory builder and the
//! network: one method per paged endpoint, each returning a single page.
//! [`OnspringClient`] is the HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{FetchError, KeySetupError, Result};
use crate::model::{RemoteApp, RemoteField};
use crate::paging::{Page, PageRequest};

/// A remote system exposing apps and their fields as paged listings
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch one page of the apps listing
    async fn apps_page(&self, page: PageRequest) -> std::result::Result<Page<RemoteApp>, FetchError>;

    /// Fetch one page of an app's fields listing
    async fn fields_page(
        &self,
        app_id: i64,
        page: PageRequest,
    ) -> std::result::Result<Page<RemoteField>, FetchError>;

    /// Items requested per page
    fn page_size(&self) -> u32;
}

/// HTTP client for the Onspring query API
pub struct OnspringClient {
    client: Client,
    config: ClientConfig,
}

impl OnspringClient {
    /// Create a client, validating the config first
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| KeySetupError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: PageRequest,
    ) -> std::result::Result<Page<T>, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[
                ("PageNumber", page.page_number),
                ("PageSize", page.page_size),
            ])
            .header("x-apikey", &self.config.api_key)
            .header("x-api-version", &self.config.api_version)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(FetchError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl SchemaSource for OnspringClient {
    async fn apps_page(&self, page: PageRequest) -> std::result::Result<Page<RemoteApp>, FetchError> {
        self.get_page("Apps", page).await
    }

    async fn fields_page(
        &self,
        app_id: i64,
        page: PageRequest,
    ) -> std::result::Result<Page<RemoteField>, FetchError> {
        self.get_page(&format!("Fields/appId/{}", app_id), page).await
    }

    fn page_size(&self) -> u32 {
        self.config.page_size
    }
}
