//! NSX-T Client
//!
//! Main client for interacting with the NSX-T manager, combining credentials
//! and HTTP functionality.

use super::auth::NsxCredentials;
use super::http::{ApiResponse, HttpOptions, NsxHttpClient};
use crate::config::ProviderSettings;
use anyhow::Result;
use serde_json::Value;

/// Main NSX-T client
#[derive(Clone)]
pub struct NsxClient {
    pub credentials: NsxCredentials,
    pub http: NsxHttpClient,
    pub base_url: String,
}

impl NsxClient {
    /// Create a new client from resolved provider settings
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let http = NsxHttpClient::new(&HttpOptions {
            timeout: settings.timeout,
            allow_unverified_ssl: settings.allow_unverified_ssl,
        })?;

        Ok(Self::with_base_url(
            &settings.base_url,
            settings.credentials.clone(),
            http,
        ))
    }

    /// Create a client for an explicit base URL
    pub fn with_base_url(base_url: &str, credentials: NsxCredentials, http: NsxHttpClient) -> Self {
        Self {
            credentials,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<ApiResponse> {
        self.http.get(url, &self.credentials).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: &Value) -> Result<ApiResponse> {
        self.http.post(url, &self.credentials, body).await
    }

    /// Make a PUT request
    pub async fn put(&self, url: &str, body: &Value) -> Result<ApiResponse> {
        self.http.put(url, &self.credentials, body).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str) -> Result<ApiResponse> {
        self.http.delete(url, &self.credentials).await
    }

    // =========================================================================
    // Manager API helpers
    // =========================================================================

    /// Build manager API URL
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    fn object_url(&self, collection: &str, id: &str) -> String {
        self.api_url(&format!("{}/{}", collection, urlencoding::encode(id)))
    }

    // =========================================================================
    // Grouping objects
    // =========================================================================

    /// NSService collection URL
    pub fn ns_services_url(&self) -> String {
        self.api_url("ns-services")
    }

    /// Single NSService URL
    pub fn ns_service_url(&self, id: &str) -> String {
        self.object_url("ns-services", id)
    }

    // =========================================================================
    // Load balancer
    // =========================================================================

    /// Load balancer service collection URL
    pub fn lb_services_url(&self) -> String {
        self.api_url("loadbalancer/services")
    }

    /// Single load balancer service URL
    pub fn lb_service_url(&self, id: &str) -> String {
        self.object_url("loadbalancer/services", id)
    }
}
