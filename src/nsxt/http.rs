//! HTTP utilities for NSX-T REST API calls

use super::auth::NsxCredentials;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Transport options for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub allow_unverified_ssl: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            allow_unverified_ssl: false,
        }
    }
}

/// Status and decoded body of one API call
///
/// Every HTTP status comes back as a response; only transport failures are
/// errors. Callers decide which statuses they accept.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// Decode the body into an API object
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).context("Failed to parse response JSON")
    }

    /// The manager's `error_message`, when the body carries one
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error_message").and_then(|v| v.as_str())
    }

    /// Status plus the manager's error message, for error reports
    pub fn describe(&self) -> String {
        match self.error_message() {
            Some(message) => format!("{} ({})", self.status, message),
            None => self.status.to_string(),
        }
    }
}

/// HTTP client wrapper for NSX-T API calls
#[derive(Clone)]
pub struct NsxHttpClient {
    client: Client,
}

impl NsxHttpClient {
    /// Create a new HTTP client
    pub fn new(options: &HttpOptions) -> Result<Self> {
        if options.allow_unverified_ssl {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .user_agent(format!("nsxt-provider/{}", crate::VERSION))
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.allow_unverified_ssl)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to the NSX-T API
    pub async fn get(&self, url: &str, credentials: &NsxCredentials) -> Result<ApiResponse> {
        self.send("GET", credentials.apply(self.client.get(url)), url)
            .await
    }

    /// Make a POST request with a JSON body
    pub async fn post(
        &self,
        url: &str,
        credentials: &NsxCredentials,
        body: &Value,
    ) -> Result<ApiResponse> {
        self.send("POST", credentials.apply(self.client.post(url)).json(body), url)
            .await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(
        &self,
        url: &str,
        credentials: &NsxCredentials,
        body: &Value,
    ) -> Result<ApiResponse> {
        self.send("PUT", credentials.apply(self.client.put(url)).json(body), url)
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, credentials: &NsxCredentials) -> Result<ApiResponse> {
        self.send("DELETE", credentials.apply(self.client.delete(url)), url)
            .await
    }

    async fn send(&self, verb: &str, request: RequestBuilder, url: &str) -> Result<ApiResponse> {
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(%request_id, "{} {}", verb, url);

        let response = request
            .header("Accept", "application/json")
            .header("X-Request-Id", request_id.to_string())
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::debug!(%request_id, "API status {} - {}", status, sanitize_for_log(&text));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else if status.is_success() {
            serde_json::from_str(&text).context("Failed to parse response JSON")?
        } else {
            // Error pages are not always JSON
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}

/// Format an NSX-T API error for display
/// Security: Sanitizes error messages to avoid leaking sensitive API details
pub fn format_nsx_error(error: &anyhow::Error) -> String {
    let error_str = format!("{:#}", error);

    if error_str.contains("401 Unauthorized") {
        return "Authentication failed. Check NSXT_USERNAME and NSXT_PASSWORD.".to_string();
    }
    if error_str.contains("403 Forbidden") {
        return "Permission denied. Check the role assigned to the NSX user.".to_string();
    }
    if error_str.contains("409 Conflict") {
        return "Resource conflict. The object may already exist or be in use.".to_string();
    }
    if error_str.contains("412 Precondition Failed") {
        return "Revision mismatch. Read the resource again before updating it.".to_string();
    }
    if error_str.contains("429 Too Many Requests") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("503 Service Unavailable") || error_str.contains("500 Internal") {
        return "NSX manager temporarily unavailable. Please try again.".to_string();
    }
    if error_str.contains("Failed to send request") {
        return "Request failed. Check the manager address and your network connection."
            .to_string();
    }

    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(160)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
