//! # slurm-pool
//!
//! Per-endpoint HTTP client cache for SLURM REST clients.
//!
//! ## Overview
//!
//! - [`HttpClientPool`] builds one `reqwest::Client` per endpoint string and
//!   hands the same instance to every caller
//! - [`PoolLease`] caps in-flight requests per endpoint and keeps the entry
//!   alive while held
//! - [`ConnectionManager`] drops entries that sat idle too long
//!
//! ## Example
//!
//! ```rust
//! use slurm_pool::{HttpClientPool, PoolConfig};
//!
//! let pool = HttpClientPool::new(PoolConfig::default()).unwrap();
//! let a = pool.get_client("https://slurm.example:6820").unwrap();
//! let b = pool.get_client("https://slurm.example:6820").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//! assert_eq!(pool.client_stats("https://slurm.example:6820").unwrap().use_count, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manager;
pub mod pool;

pub use config::{ManagerConfig, PoolConfig, TlsVersion};
pub use error::{PoolError, PoolResult};
pub use manager::ConnectionManager;
pub use pool::{ClientStats, HttpClientPool, PoolLease, PoolStats};
