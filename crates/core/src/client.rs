//! Nexus REST client for listing and deleting components

use crate::component::Page;
use crate::error::{describe_transport, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// Path of the components API below the server base URL
const COMPONENTS_PATH: &str = "/service/rest/v1/components";

/// Anything that can serve listing pages and delete components.
///
/// `NexusClient` is the real implementation; the walker and the sweep
/// actions only depend on this trait.
#[async_trait]
pub trait ComponentSource: Send + Sync {
    /// Listing URL for `repository`, without a continuation token
    fn listing_url(&self, repository: &str) -> String;

    /// Delete URL for component `id`
    fn component_url(&self, id: &str) -> String;

    /// Fetch and parse one listing page from a fully formed URL
    async fn fetch_page(&self, url: &str) -> Result<Page>;

    /// Delete one component by id
    async fn delete_component(&self, id: &str) -> Result<()>;
}

/// Nexus client using HTTP basic auth
pub struct NexusClient {
    http_client: Client,
    base_url: String,
    user: String,
    password: String,
}

impl NexusClient {
    /// Create a new Nexus client
    pub fn new(base_url: String, user: String, password: String, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nxsweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
            password,
        })
    }

    /// Get the server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-success status into a readable reason
    async fn failure_reason(response: Response) -> String {
        let status = response.status();
        let hint = match status.as_u16() {
            401 => " (invalid credentials)",
            403 => " (insufficient permissions)",
            404 => " (not found)",
            _ => "",
        };
        let body = response.text().await.unwrap_or_default();

        if body.trim().is_empty() {
            format!("HTTP {}{}", status.as_u16(), hint)
        } else {
            format!("HTTP {}{}: {}", status.as_u16(), hint, body.trim())
        }
    }
}

#[async_trait]
impl ComponentSource for NexusClient {
    fn listing_url(&self, repository: &str) -> String {
        format!("{}{}?repository={}", self.base_url, COMPONENTS_PATH, repository)
    }

    fn component_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, COMPONENTS_PATH, id)
    }

    async fn fetch_page(&self, url: &str) -> Result<Page> {
        let response = self
            .http_client
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::fetch(url, describe_transport(&e)))?;

        if !response.status().is_success() {
            return Err(Error::fetch(url, Self::failure_reason(response).await));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::fetch(url, describe_transport(&e)))?;

        Page::from_json(url, &body)
    }

    async fn delete_component(&self, id: &str) -> Result<()> {
        let url = self.component_url(id);

        let response = self
            .http_client
            .delete(&url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await
            .map_err(|e| Error::delete(id, &url, describe_transport(&e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::delete(id, &url, Self::failure_reason(response).await))
        }
    }
}
