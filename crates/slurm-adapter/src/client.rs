//! Connecting an adapter to a live `slurmrestd`.

use std::sync::Arc;

use slurm_pool::HttpClientPool;
use slurm_wire::HttpWireClient;
use tracing::info;

use crate::adapter::Adapter;
use crate::config::ClientConfig;
use crate::error::{SlurmError, SlurmResult};
use crate::factory;

/// Validate `config` and build an adapter talking HTTP through `pool`.
///
/// No request is sent; the first call on the adapter opens the connection.
pub fn connect(config: &ClientConfig, pool: Arc<HttpClientPool>) -> SlurmResult<Adapter> {
    config.validate()?;
    let version = config.version()?;
    let wrap = |err| SlurmError::from_wire(err, version);

    let mut wire = HttpWireClient::new(pool, config.endpoint.as_str()).map_err(wrap)?;
    for (name, value) in &config.headers {
        wire = wire.with_header(name, value).map_err(wrap)?;
    }

    info!(endpoint = %config.endpoint, version = %version, "Slurm adapter configured");
    Ok(factory::build_version(version, Arc::new(wire)))
}

/// Like [`connect`] with a pool built from `config.pool`.
pub fn connect_with_own_pool(config: &ClientConfig) -> SlurmResult<Adapter> {
    config.validate()?;
    let pool = HttpClientPool::new(config.pool.clone())
        .map_err(|err| SlurmError::validation(err.to_string()).with_source(err))?;
    connect(config, Arc::new(pool))
}
