use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use graylog_core::{GraylogError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_X_REQUESTED_BY: &str = "terraform-provider-graylog";
pub const DEFAULT_API_VERSION: &str = "v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prefix of every environment variable read by [`ClientSettings::load`].
pub const ENV_PREFIX: &str = "GRAYLOG";

/// Resolved, validated client configuration.
///
/// Built once and shared by every resource client; nothing in it changes
/// after construction.
#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: Url,
    pub auth_name: String,
    pub auth_password: String,
    pub x_requested_by: String,
    /// Informational only; Graylog routes every version under `/api`.
    pub api_version: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration with default header, API version and timeout.
    pub fn new(endpoint: &str, auth_name: &str, auth_password: &str) -> Result<Self> {
        ClientSettings {
            web_endpoint_uri: Some(endpoint.to_string()),
            auth_name: Some(auth_name.to_string()),
            auth_password: Some(auth_password.to_string()),
            ..Default::default()
        }
        .resolve()
    }

    pub fn with_x_requested_by(mut self, value: impl Into<String>) -> Self {
        self.x_requested_by = value.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("auth_name", &self.auth_name)
            .field("auth_password", &"<redacted>")
            .field("x_requested_by", &self.x_requested_by)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Unresolved settings as read from files, the environment or flags.
///
/// Every field is optional so layers can be merged before validation.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub web_endpoint_uri: Option<String>,
    #[serde(default)]
    pub auth_name: Option<String>,
    #[serde(default)]
    pub auth_password: Option<String>,
    #[serde(default)]
    pub x_requested_by: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("web_endpoint_uri", &self.web_endpoint_uri)
            .field("auth_name", &self.auth_name)
            .field(
                "auth_password",
                &self.auth_password.as_ref().map(|_| "<redacted>"),
            )
            .field("x_requested_by", &self.x_requested_by)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientSettings {
    /// Load `GRAYLOG_*` environment variables, then an optional settings file.
    ///
    /// Values from the file take precedence over the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`ClientSettings::load`], reading variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        // Values stay strings: a password like "007" must reach the server as written.
        let mut builder =
            Config::builder().add_source(Environment::with_prefix(ENV_PREFIX).source(env));
        if let Some(path) = path {
            if !path.exists() {
                return Err(GraylogError::configuration(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }
        let cfg = builder
            .build()
            .map_err(|e| GraylogError::configuration(format!("config build error: {e}")))?;
        cfg.try_deserialize()
            .map_err(|e| GraylogError::configuration(format!("config deserialize error: {e}")))
    }

    /// Overlay `overrides`: every field it sets wins over `self`.
    pub fn merge(self, overrides: ClientSettings) -> Self {
        Self {
            web_endpoint_uri: overrides.web_endpoint_uri.or(self.web_endpoint_uri),
            auth_name: overrides.auth_name.or(self.auth_name),
            auth_password: overrides.auth_password.or(self.auth_password),
            x_requested_by: overrides.x_requested_by.or(self.x_requested_by),
            api_version: overrides.api_version.or(self.api_version),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Validate required settings and fill in defaults.
    pub fn resolve(self) -> Result<ClientConfig> {
        let endpoint = required(self.web_endpoint_uri, "web_endpoint_uri")?;
        let auth_name = required(self.auth_name, "auth_name")?;
        let auth_password = required(self.auth_password, "auth_password")?;

        let endpoint = Url::parse(&endpoint).map_err(|e| {
            GraylogError::configuration(format!("invalid web_endpoint_uri '{endpoint}': {e}"))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(GraylogError::configuration(format!(
                "web_endpoint_uri must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(GraylogError::configuration("timeout_secs must be positive"));
        }

        Ok(ClientConfig {
            endpoint,
            auth_name,
            auth_password,
            x_requested_by: non_empty(self.x_requested_by)
                .unwrap_or_else(|| DEFAULT_X_REQUESTED_BY.to_string()),
            api_version: non_empty(self.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| {
        GraylogError::configuration(format!(
            "{key} is required (set it explicitly or via {ENV_PREFIX}_{})",
            key.to_uppercase()
        ))
    })
}
