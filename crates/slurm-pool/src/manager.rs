//! Background reclamation of idle pool entries.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{ManagerConfig, PoolConfig};
use crate::error::PoolResult;
use crate::pool::HttpClientPool;

/// Owns a pool and periodically drops its idle entries.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<HttpClientPool>,
    config: ManagerConfig,
    token: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    /// Create a manager around a new pool. Nothing runs until [`start`](Self::start).
    pub fn new(pool_config: PoolConfig, config: ManagerConfig) -> PoolResult<Self> {
        Ok(Self::with_pool(Arc::new(HttpClientPool::new(pool_config)?), config))
    }

    /// Create a manager around an existing pool.
    #[must_use]
    pub fn with_pool(pool: Arc<HttpClientPool>, config: ManagerConfig) -> Self {
        Self {
            pool,
            config,
            token: CancellationToken::new(),
            task: Mutex::new(None),
        }
    }

    /// The managed pool.
    #[must_use]
    pub fn pool(&self) -> Arc<HttpClientPool> {
        Arc::clone(&self.pool)
    }

    /// Shortcut for [`HttpClientPool::get_client`].
    pub fn client(&self, endpoint: &str) -> PoolResult<Arc<reqwest::Client>> {
        self.pool.get_client(endpoint)
    }

    /// Spawn the cleanup loop. Calling this twice keeps the first loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.is_some() {
            return;
        }

        let pool = Arc::clone(&self.pool);
        let token = self.token.clone();
        let config = self.config.clone();

        *task = Some(tokio::spawn(async move {
            let mut ticker = interval(config.cleanup_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("Connection manager stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        pool.cleanup_idle(config.max_idle);
                    }
                }
            }
        }));

        info!(
            interval_secs = self.config.cleanup_interval.as_secs(),
            max_idle_secs = self.config.max_idle.as_secs(),
            "Connection manager started"
        );
    }

    /// Returns true while the cleanup loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the cleanup loop, wait for it, and close the pool.
    pub async fn stop(&self) {
        self.token.cancel();
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        self.pool.close();
        info!("Connection manager stopped");
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn fast_config() -> ManagerConfig {
        ManagerConfig {
            cleanup_interval: Duration::from_millis(10),
            max_idle: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_background_cleanup_reclaims_idle() {
        let manager = ConnectionManager::new(PoolConfig::default(), fast_config()).unwrap();
        manager.client("https://slurm:6820").unwrap();
        manager.start();
        assert!(manager.is_running());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(manager.pool().is_empty());
        manager.stop().await;
        assert!(!manager.is_running());
    }

    #[tokio::test]
    async fn test_background_cleanup_spares_active() {
        let manager = ConnectionManager::new(PoolConfig::default(), fast_config()).unwrap();
        let pool = manager.pool();
        let lease = pool.acquire("https://slurm:6820").await.unwrap();
        manager.start();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(pool.len(), 1);

        drop(lease);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(pool.is_empty());
        manager.stop().await;
    }

    #[tokio::test]
    async fn test_stop_closes_pool() {
        let manager =
            ConnectionManager::new(PoolConfig::default(), ManagerConfig::default()).unwrap();
        manager.client("a").unwrap();
        manager.start();
        manager.stop().await;
        assert!(manager.pool().is_empty());
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let manager =
            ConnectionManager::new(PoolConfig::default(), ManagerConfig::default()).unwrap();
        manager.stop().await;
        assert!(!manager.is_running());
    }
}
