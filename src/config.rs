//! Configuration Management
//!
//! Handles persistent configuration storage for nsxt-provider and resolves
//! the settings a client is built from.

use crate::nsxt::auth::{self, NsxCredentials};
use crate::nsxt::http::DEFAULT_TIMEOUT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
///
/// Passwords are never written to disk; they come from the command line or
/// `NSXT_PASSWORD`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// NSX manager host or URL
    #[serde(default)]
    pub host: Option<String>,
    /// User name for basic authentication
    #[serde(default)]
    pub username: Option<String>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub allow_unverified_ssl: Option<bool>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub allow_unverified_ssl: Option<bool>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved connection settings
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub credentials: NsxCredentials,
    pub allow_unverified_ssl: bool,
    pub timeout: Duration,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("nsxt-provider").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to disk, returning the file written
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().context("Could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Merge command-line values into the stored configuration
    ///
    /// The password is never taken over. The host is checked before it is
    /// stored.
    pub fn merge(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(host) = &overrides.host {
            auth::normalize_base_url(host)?;
            self.host = Some(host.trim().to_string());
        }
        if let Some(username) = &overrides.username {
            self.username = Some(username.clone());
        }
        if overrides.allow_unverified_ssl.is_some() {
            self.allow_unverified_ssl = overrides.allow_unverified_ssl;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        Ok(())
    }

    /// Resolve settings (CLI > environment > config file > defaults)
    pub fn resolve(&self, overrides: &Overrides) -> Result<ProviderSettings> {
        self.resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup
    pub fn resolve_with(
        &self,
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ProviderSettings> {
        let host = overrides
            .host
            .clone()
            .or_else(|| lookup(auth::ENV_MANAGER_HOST))
            .or_else(|| self.host.clone())
            .context("No NSX manager configured. Set NSXT_MANAGER_HOST or use --host")?;
        let base_url = auth::normalize_base_url(&host)?;

        let env_credentials = NsxCredentials::from_lookup(&lookup);
        let username = overrides
            .username
            .clone()
            .or_else(|| Some(env_credentials.username.clone()).filter(|u| !u.is_empty()))
            .or_else(|| self.username.clone())
            .unwrap_or_default();
        let password = match overrides.password.as_deref() {
            Some(password) => password.to_string(),
            None => lookup(auth::ENV_PASSWORD).unwrap_or_default(),
        };
        let credentials = NsxCredentials::new(&username, &password);
        if !credentials.is_complete() {
            anyhow::bail!("NSX credentials missing. Set NSXT_USERNAME and NSXT_PASSWORD");
        }

        let env_unverified = lookup(auth::ENV_ALLOW_UNVERIFIED_SSL).and_then(|v| {
            let parsed = auth::parse_flag(&v);
            if parsed.is_none() {
                tracing::warn!("Ignoring invalid {} value", auth::ENV_ALLOW_UNVERIFIED_SSL);
            }
            parsed
        });
        let allow_unverified_ssl = overrides
            .allow_unverified_ssl
            .or(env_unverified)
            .or(self.allow_unverified_ssl)
            .unwrap_or(false);

        let timeout = overrides
            .timeout_secs
            .or(self.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(ProviderSettings {
            base_url,
            credentials,
            allow_unverified_ssl,
            timeout,
        })
    }
}
