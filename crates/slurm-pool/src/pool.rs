//! Per-endpoint HTTP client cache.
//!
//! One `reqwest::Client` is built per endpoint string and shared by every
//! caller. The endpoint is an opaque key; it is never parsed here.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};

/// A cached client and its usage counters.
#[derive(Debug)]
struct PooledClient {
    client: Arc<reqwest::Client>,
    created: Instant,
    last_used: Instant,
    use_count: u64,
    active: Arc<AtomicUsize>,
    slots: Arc<Semaphore>,
}

impl PooledClient {
    fn touch(&mut self) {
        self.last_used = Instant::now();
        self.use_count = self.use_count.saturating_add(1);
    }
}

/// Usage snapshot for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStats {
    /// Endpoint key.
    pub endpoint: String,
    /// Time since the client was built.
    pub age: Duration,
    /// Time since the client was last handed out.
    pub idle: Duration,
    /// Number of times the client was handed out.
    pub use_count: u64,
    /// Requests currently in flight.
    pub active_connections: usize,
}

/// Usage snapshot for the whole pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Cached endpoints.
    pub entries: usize,
    /// Sum of use counts.
    pub total_uses: u64,
    /// Sum of in-flight requests.
    pub active_connections: usize,
}

/// A claim on one of an endpoint's connection slots.
///
/// The endpoint's active-connection count stays raised until this is dropped.
#[derive(Debug)]
pub struct PoolLease {
    client: Arc<reqwest::Client>,
    active: Arc<AtomicUsize>,
    _permit: OwnedSemaphorePermit,
}

impl PoolLease {
    /// The pooled client.
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for PoolLease {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Caches one HTTP client per endpoint.
#[derive(Debug)]
pub struct HttpClientPool {
    config: PoolConfig,
    clients: Mutex<HashMap<String, PooledClient>>,
}

impl HttpClientPool {
    /// Create an empty pool.
    pub fn new(config: PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clients: Mutex::new(HashMap::new()),
        })
    }

    /// Configuration applied to new clients.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Return the cached client for `endpoint`, building it on first use.
    ///
    /// Each call bumps the endpoint's use count and last-used time.
    pub fn get_client(&self, endpoint: &str) -> PoolResult<Arc<reqwest::Client>> {
        let mut clients = self.clients.lock();
        let entry = self.entry(&mut clients, endpoint)?;
        entry.touch();
        Ok(Arc::clone(&entry.client))
    }

    /// Claim a connection slot for `endpoint`.
    ///
    /// Waits while the endpoint already has `max_conns_per_host` requests in
    /// flight.
    pub async fn acquire(&self, endpoint: &str) -> PoolResult<PoolLease> {
        let (client, active, slots) = {
            let mut clients = self.clients.lock();
            let entry = self.entry(&mut clients, endpoint)?;
            entry.touch();
            (
                Arc::clone(&entry.client),
                Arc::clone(&entry.active),
                Arc::clone(&entry.slots),
            )
        };

        let permit = slots.acquire_owned().await.map_err(|_| PoolError::Closed {
            endpoint: endpoint.to_string(),
        })?;
        active.fetch_add(1, Ordering::AcqRel);

        Ok(PoolLease {
            client,
            active,
            _permit: permit,
        })
    }

    fn entry<'a>(
        &self,
        clients: &'a mut HashMap<String, PooledClient>,
        endpoint: &str,
    ) -> PoolResult<&'a mut PooledClient> {
        if !clients.contains_key(endpoint) {
            let client = self.config.build_client(endpoint)?;
            let now = Instant::now();
            clients.insert(
                endpoint.to_string(),
                PooledClient {
                    client: Arc::new(client),
                    created: now,
                    last_used: now,
                    use_count: 0,
                    active: Arc::new(AtomicUsize::new(0)),
                    slots: Arc::new(Semaphore::new(self.config.max_conns_per_host)),
                },
            );
            debug!(endpoint = %endpoint, "Created pooled HTTP client");
        }

        clients
            .get_mut(endpoint)
            .ok_or_else(|| PoolError::config(format!("pool entry for {endpoint} vanished")))
    }

    /// Drop entries idle for longer than `max_idle` that have no requests in
    /// flight. Returns the number removed.
    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let mut clients = self.clients.lock();
        let now = Instant::now();
        let before = clients.len();

        clients.retain(|endpoint, entry| {
            let idle = now.saturating_duration_since(entry.last_used);
            let active = entry.active.load(Ordering::Acquire);
            let keep = idle <= max_idle || active > 0;
            if !keep {
                debug!(endpoint = %endpoint, idle_ms = idle.as_millis(), "Reclaimed idle client");
            }
            keep
        });

        let removed = before - clients.len();
        if removed > 0 {
            info!(removed, remaining = clients.len(), "Idle client cleanup");
        }
        removed
    }

    /// Remove every entry. Callers waiting for a slot get [`PoolError::Closed`].
    pub fn close(&self) {
        let mut clients = self.clients.lock();
        for entry in clients.values() {
            entry.slots.close();
        }
        let count = clients.len();
        clients.clear();
        debug!(count, "Closed client pool");
    }

    /// Usage snapshot for one endpoint.
    #[must_use]
    pub fn client_stats(&self, endpoint: &str) -> Option<ClientStats> {
        let clients = self.clients.lock();
        let now = Instant::now();
        clients.get(endpoint).map(|entry| ClientStats {
            endpoint: endpoint.to_string(),
            age: now.saturating_duration_since(entry.created),
            idle: now.saturating_duration_since(entry.last_used),
            use_count: entry.use_count,
            active_connections: entry.active.load(Ordering::Acquire),
        })
    }

    /// Usage snapshot for the whole pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let clients = self.clients.lock();
        PoolStats {
            entries: clients.len(),
            total_uses: clients.values().map(|e| e.use_count).sum(),
            active_connections: clients
                .values()
                .map(|e| e.active.load(Ordering::Acquire))
                .sum(),
        }
    }

    /// Number of cached endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.lock().is_empty()
    }

    /// Pretend `endpoint` was last used `by` earlier than recorded.
    #[cfg(test)]
    pub(crate) fn backdate(&self, endpoint: &str, by: Duration) {
        if let Some(entry) = self.clients.lock().get_mut(endpoint) {
            if let Some(earlier) = entry.last_used.checked_sub(by) {
                entry.last_used = earlier;
            }
        }
    }
}
