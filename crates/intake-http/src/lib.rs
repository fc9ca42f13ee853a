// # HTTP Backends
//
// This crate provides the HTTP record store and the HTTP CRM integration
// for the customer intake workflow.
//
// ## Behavior
//
// - One HTTP request per call (no retry, no backoff, no caching)
// - Per-request timeout (30 seconds unless configured)
// - Non-2xx statuses mapped to `Error::Transport` (store) or
//   `Error::Integration` (CRM), with the status and response body
// - List and create responses are accepted bare or wrapped as `{"data": ...}`
//
// ## API Reference
//
// - Create customer: POST `/api/v1/customers/new` (body: draft JSON)
// - List customers: GET `/api/v1/customers/all`
// - Push to CRM: POST `/api/customers/push-to-crm` (body: record JSON)

use async_trait::async_trait;
use intake_core::config::{IntegrationConfig, StoreConfig};
use intake_core::model::{CustomerDraft, CustomerRecord, Envelope};
use intake_core::traits::{
    CrmIntegration, CrmIntegrationFactory, PushReceipt, RecordStore, RecordStoreFactory,
};
use intake_core::{BackendRegistry, Error, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Path of the create endpoint, relative to the API base URL
pub const CREATE_PATH: &str = "/api/v1/customers/new";

/// Path of the list endpoint, relative to the API base URL
pub const LIST_PATH: &str = "/api/v1/customers/all";

/// Path of the CRM push endpoint, relative to the bridge base URL
pub const PUSH_PATH: &str = "/api/customers/push-to-crm";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Describe a non-success response
fn describe_status(operation: &str, status: StatusCode, body: &str) -> String {
    match status.as_u16() {
        400 | 422 => format!("{} rejected by server: {} - {}", operation, status, body),
        401 | 403 => format!("{} not authorized. Status: {}", operation, status),
        404 => format!("{} endpoint not found. Status: {}", operation, status),
        429 => format!("{} rate limited. Please retry later. Status: {}", operation, status),
        500..=599 => format!("{} server error: {} - {}", operation, status, body),
        _ => format!("{} failed: {} - {}", operation, status, body),
    }
}

async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string())
}

/// Record store backed by the customer HTTP API
///
/// Stateless apart from the HTTP client; the record list lives in
/// `ListSynchronizer`.
pub struct HttpRecordStore {
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpRecordStore {
    /// Create a store talking to `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(Error::config("Record store base URL cannot be empty"));
        }

        Ok(Self {
            base_url,
            client: build_client(timeout)?,
        })
    }

    pub fn create_url(&self) -> String {
        join_url(&self.base_url, CREATE_PATH)
    }

    pub fn list_url(&self) -> String {
        join_url(&self.base_url, LIST_PATH)
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn create_record(&self, draft: &CustomerDraft) -> Result<CustomerRecord> {
        let url = self.create_url();
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(Error::transport(describe_status("Create", status, &body)));
        }

        let record: Envelope<CustomerRecord> = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("Failed to parse create response: {}", e)))?;
        let record = record.into_inner();

        tracing::info!("Customer API confirmed record {}", record.id);
        Ok(record)
    }

    async fn list_records(&self) -> Result<Vec<CustomerRecord>> {
        let url = self.list_url();
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(Error::transport(describe_status("List", status, &body)));
        }

        let records: Envelope<Vec<CustomerRecord>> = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("Failed to parse list response: {}", e)))?;

        Ok(records.into_inner())
    }

    fn store_name(&self) -> &'static str {
        "http"
    }
}

/// CRM integration backed by the HTTP push bridge
pub struct HttpCrmIntegration {
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpCrmIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCrmIntegration")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCrmIntegration {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(Error::config("CRM integration base URL cannot be empty"));
        }

        Ok(Self {
            base_url,
            client: build_client(timeout)?,
        })
    }

    pub fn push_url(&self) -> String {
        join_url(&self.base_url, PUSH_PATH)
    }
}

#[async_trait]
impl CrmIntegration for HttpCrmIntegration {
    async fn push_record(&self, record: &CustomerRecord) -> Result<PushReceipt> {
        let url = self.push_url();
        tracing::debug!("POST {} (record {})", url, record.id);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| Error::integration(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(Error::integration(describe_status("Push", status, &body)));
        }

        // The bridge's acknowledgement is opaque; an empty body is fine
        let body = response
            .text()
            .await
            .map_err(|e| Error::integration(format!("Failed to read push response: {}", e)))?;
        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::String(body))
        };

        Ok(PushReceipt::new(record.id.clone(), payload))
    }

    fn integration_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for HTTP record stores
pub struct HttpStoreFactory;

impl RecordStoreFactory for HttpStoreFactory {
    fn create(&self, config: &StoreConfig) -> Result<Box<dyn RecordStore>> {
        match config {
            StoreConfig::Http {
                base_url,
                timeout_secs,
            } => Ok(Box::new(HttpRecordStore::with_timeout(
                base_url.clone(),
                Duration::from_secs(*timeout_secs),
            )?)),
            _ => Err(Error::config("Invalid config for HTTP record store")),
        }
    }
}

/// Factory for HTTP CRM integrations
pub struct HttpIntegrationFactory;

impl CrmIntegrationFactory for HttpIntegrationFactory {
    fn create(&self, config: &IntegrationConfig) -> Result<Box<dyn CrmIntegration>> {
        match config {
            IntegrationConfig::Http {
                base_url,
                timeout_secs,
            } => Ok(Box::new(HttpCrmIntegration::with_timeout(
                base_url.clone(),
                Duration::from_secs(*timeout_secs),
            )?)),
            _ => Err(Error::config("Invalid config for HTTP CRM integration")),
        }
    }
}

/// Register the HTTP backends with a registry
///
/// # Example
///
/// ```rust
/// use intake_core::BackendRegistry;
///
/// let registry = BackendRegistry::with_builtins();
/// intake_http::register(&registry);
/// assert!(registry.has_store("http"));
/// ```
pub fn register(registry: &BackendRegistry) {
    registry.register_store("http", Box::new(HttpStoreFactory));
    registry.register_integration("http", Box::new(HttpIntegrationFactory));
}
