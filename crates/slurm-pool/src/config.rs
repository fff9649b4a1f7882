//! Pool configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Minimum TLS protocol version for pooled clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TlsVersion {
    /// TLS 1.2.
    #[default]
    #[serde(rename = "1.2")]
    Tls12,
    /// TLS 1.3.
    #[serde(rename = "1.3")]
    Tls13,
}

impl From<TlsVersion> for reqwest::tls::Version {
    fn from(value: TlsVersion) -> Self {
        match value {
            TlsVersion::Tls12 => Self::TLS_1_2,
            TlsVersion::Tls13 => Self::TLS_1_3,
        }
    }
}

/// Settings applied once when a pooled client is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Idle keep-alive connections kept per host.
    pub max_idle_per_host: usize,
    /// Concurrent in-flight requests allowed per endpoint.
    pub max_conns_per_host: usize,
    /// How long an idle keep-alive connection is kept.
    pub idle_conn_timeout: Duration,
    /// TCP connect timeout, including the TLS handshake.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP keepalive interval.
    pub tcp_keepalive: Duration,
    /// Minimum TLS version.
    pub min_tls_version: TlsVersion,
    /// Accept invalid certificates. Test clusters only.
    pub accept_invalid_certs: bool,
    /// User-Agent header.
    pub user_agent: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            max_conns_per_host: 50,
            idle_conn_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            tcp_keepalive: Duration::from_secs(30),
            min_tls_version: TlsVersion::Tls12,
            accept_invalid_certs: false,
            user_agent: concat!("slurm-adapter/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PoolConfig {
    /// Check the configuration for values that cannot work.
    pub fn validate(&self) -> PoolResult<()> {
        if self.max_conns_per_host == 0 {
            return Err(PoolError::config("max_conns_per_host must be positive"));
        }
        if self.max_idle_per_host > self.max_conns_per_host {
            return Err(PoolError::config(
                "max_idle_per_host cannot exceed max_conns_per_host",
            ));
        }
        if self.connect_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(PoolError::config("timeouts must be non-zero"));
        }
        if self.connect_timeout > self.request_timeout {
            return Err(PoolError::config(
                "connect_timeout cannot exceed request_timeout",
            ));
        }
        Ok(())
    }

    /// Build a `reqwest` client with these settings.
    pub(crate) fn build_client(&self, endpoint: &str) -> PoolResult<reqwest::Client> {
        reqwest::Client::builder()
            .pool_max_idle_per_host(self.max_idle_per_host)
            .pool_idle_timeout(self.idle_conn_timeout)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .tcp_keepalive(self.tcp_keepalive)
            .min_tls_version(self.min_tls_version.into())
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|source| PoolError::ClientBuild {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

/// Settings for the background idle reclaimer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Time between cleanup passes.
    pub cleanup_interval: Duration,
    /// Idle time after which an entry without active connections is dropped.
    pub max_idle: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(5 * 60),
            max_idle: Duration::from_secs(15 * 60),
        }
    }
}
