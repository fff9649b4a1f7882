//! Client configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use slurm_pool::PoolConfig;
use url::Url;

use crate::context::RequestContext;
use crate::error::{SlurmError, SlurmResult};
use crate::version::ApiVersion;

/// Environment variable holding the REST endpoint.
pub const ENV_URL: &str = "SLURM_REST_URL";
/// Environment variable holding the API version.
pub const ENV_API_VERSION: &str = "SLURM_API_VERSION";
/// Environment variable holding the per-call timeout in seconds.
pub const ENV_REQUEST_TIMEOUT: &str = "SLURM_REQUEST_TIMEOUT_SECS";

/// Everything needed to connect to one `slurmrestd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL, e.g. `http://slurm-ctl:6820`.
    pub endpoint: String,
    /// Version string or alias (`latest`, `stable`).
    pub api_version: String,
    /// Deadline applied by [`ClientConfig::context`].
    pub request_timeout: Duration,
    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Pooled HTTP client settings.
    pub pool: PoolConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:6820".to_string(),
            api_version: "latest".to_string(),
            request_timeout: Duration::from_secs(60),
            headers: BTreeMap::new(),
            pool: PoolConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults for `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Defaults overlaid with `SLURM_REST_URL`, `SLURM_API_VERSION` and
    /// `SLURM_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> SlurmResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SlurmResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            config.endpoint = url.trim().to_string();
        }
        if let Some(version) = lookup(ENV_API_VERSION).filter(|v| !v.trim().is_empty()) {
            config.api_version = version.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                SlurmError::validation(format!("{ENV_REQUEST_TIMEOUT} must be whole seconds"))
                    .with_details(raw.clone())
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// The resolved API version.
    pub fn version(&self) -> SlurmResult<ApiVersion> {
        self.api_version.parse()
    }

    /// Check that the endpoint parses, the version resolves and the pool
    /// settings are usable.
    pub fn validate(&self) -> SlurmResult<()> {
        Url::parse(&self.endpoint).map_err(|err| {
            SlurmError::validation(format!("invalid endpoint {:?}", self.endpoint)).with_source(err)
        })?;
        self.version()?;
        if self.request_timeout.is_zero() {
            return Err(SlurmError::validation("request_timeout must be non-zero"));
        }
        self.pool
            .validate()
            .map_err(|err| SlurmError::validation(err.to_string()).with_source(err))
    }

    /// A fresh context expiring after `request_timeout`.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}
