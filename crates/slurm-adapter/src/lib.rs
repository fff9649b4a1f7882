//! # slurm-adapter
//!
//! One client API over every supported `slurmrestd` version.
//!
//! A [`VersionAdapter`] exposes the same resource managers whichever API
//! version (v0.0.40 through v0.0.44) sits behind it. Each manager turns
//! calls into version-shaped wire requests and maps the responses back into
//! the common model from [`slurm_types`]. Operations a version does not
//! expose fail with [`ErrorKind::NotImplemented`] before anything is sent.
//!
//! ## Layout
//!
//! - [`factory`]: build an adapter from a version string or alias
//! - [`client`]: connect an adapter to a live endpoint over HTTP
//! - [`capability`]: the per-version operation matrix
//! - [`manager`]: one manager per resource family
//! - [`mapper`] and [`versions`]: wire-to-common conversion per version
//! - [`watch`]: polling job and node watches
//! - [`key`]: the composite association key
//!
//! ## Example
//!
//! ```rust,no_run
//! use slurm_adapter::{ClientConfig, RequestContext, VersionAdapter, connect_with_own_pool};
//!
//! # async fn run() -> slurm_adapter::SlurmResult<()> {
//! let config = ClientConfig::new("http://slurm-ctl:6820").with_api_version("v0.0.42");
//! let adapter = connect_with_own_pool(&config)?;
//! let ctx = RequestContext::new();
//! let jobs = adapter.jobs().list(&ctx, None).await?;
//! println!("{} jobs", jobs.total);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod capability;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod key;
pub mod manager;
pub mod mapper;
pub mod operations;
pub mod request;
pub mod stub;
pub mod version;
pub mod versions;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::{Adapter, VersionAdapter};
pub use capability::{Capabilities, Operation, Resource};
pub use client::{connect, connect_with_own_pool};
pub use config::ClientConfig;
pub use context::RequestContext;
pub use error::{ErrorKind, SlurmError, SlurmResult};
pub use factory::{build, build_version};
pub use key::AssociationKey;
pub use operations::{
    AccountOperations, AssociationOperations, ClusterOperations, JobOperations, NodeOperations,
    OpFuture, PartitionOperations, QosOperations, ReservationOperations, StandaloneOperations,
    UserOperations, WcKeyOperations,
};
pub use stub::Unsupported;
pub use version::ApiVersion;
