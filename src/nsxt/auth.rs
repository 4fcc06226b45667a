//! NSX-T Authentication
//!
//! Handles HTTP basic authentication against the NSX-T manager and the
//! environment variables the provider reads its connection details from.

use anyhow::{Context, Result};
use reqwest::RequestBuilder;
use std::fmt;
use url::Url;

/// Manager host or URL
pub const ENV_MANAGER_HOST: &str = "NSXT_MANAGER_HOST";
/// Basic-auth user name
pub const ENV_USERNAME: &str = "NSXT_USERNAME";
/// Basic-auth password
pub const ENV_PASSWORD: &str = "NSXT_PASSWORD";
/// Skip TLS certificate verification when set to a truthy value
pub const ENV_ALLOW_UNVERIFIED_SSL: &str = "NSXT_ALLOW_UNVERIFIED_SSL";

/// NSX-T manager credentials
#[derive(Clone, Default)]
pub struct NsxCredentials {
    pub username: String,
    password: String,
}

impl fmt::Debug for NsxCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Security: never print the password
        f.debug_struct("NsxCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl NsxCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            username: lookup(ENV_USERNAME).unwrap_or_default(),
            password: lookup(ENV_PASSWORD).unwrap_or_default(),
        }
    }

    /// Both user name and password are present
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Attach basic authentication to a request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }
}

/// Turn a manager host value into the base URL requests are built from
///
/// Accepts a bare host, host:port, or an http(s) URL without path or query.
/// A bare host gets an `https://` scheme and the trailing slash is dropped.
pub fn normalize_base_url(host: &str) -> Result<String> {
    let host = host.trim();
    if host.is_empty() {
        anyhow::bail!("NSX manager host is empty");
    }
    if host.chars().any(char::is_whitespace) {
        anyhow::bail!("NSX manager host must not contain whitespace");
    }

    let candidate = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };

    let url = Url::parse(&candidate)
        .with_context(|| format!("Invalid NSX manager host: {}", host))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        anyhow::bail!("Unsupported scheme for NSX manager: {}", url.scheme());
    }
    if url.host_str().is_none() {
        anyhow::bail!("NSX manager host is missing a host name");
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        anyhow::bail!("NSX manager host must not include a path or query");
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Interpret an environment flag value
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
