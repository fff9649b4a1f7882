//! Cluster-wide records that belong to no single resource manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};

/// A license pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License name.
    pub name: String,
    /// Total licenses.
    pub total: u32,
    /// Licenses in use.
    pub used: u32,
    /// Licenses free.
    pub free: u32,
    /// Licenses held by reservations.
    pub reserved: u32,
    /// Whether the license is tracked remotely.
    pub remote: bool,
}

impl License {
    /// Fraction of the pool in use.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.used) / f64::from(self.total)
    }
}

/// A fairshare tree entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Share {
    /// Account or user name.
    pub name: String,
    /// Cluster.
    pub cluster: Option<String>,
    /// Parent account.
    pub parent: Option<String>,
    /// Partition.
    pub partition: Option<String>,
    /// Raw shares.
    pub shares: Option<u32>,
    /// Normalised shares.
    pub shares_normalized: Option<f64>,
    /// Effective usage.
    pub effective_usage: Option<f64>,
    /// Fairshare factor.
    pub fairshare_factor: Option<f64>,
}

/// Controller scheduling statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// When the statistics were sampled.
    pub sampled_at: Option<DateTime<Utc>>,
    /// Active server threads.
    pub server_thread_count: Option<u32>,
    /// Agent queue depth.
    pub agent_queue_size: Option<u32>,
    /// Jobs submitted.
    pub jobs_submitted: Option<u32>,
    /// Jobs started.
    pub jobs_started: Option<u32>,
    /// Jobs completed.
    pub jobs_completed: Option<u32>,
    /// Jobs cancelled.
    pub jobs_canceled: Option<u32>,
    /// Jobs failed.
    pub jobs_failed: Option<u32>,
    /// Jobs pending.
    pub jobs_pending: Option<u32>,
    /// Jobs running.
    pub jobs_running: Option<u32>,
    /// Last main scheduling cycle in microseconds.
    pub schedule_cycle_last: Option<u32>,
    /// Mean main scheduling cycle in microseconds.
    pub schedule_cycle_mean: Option<u64>,
}

/// Per-RPC counters from the accounting daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStat {
    /// RPC name.
    pub rpc: String,
    /// Call count.
    pub count: u64,
    /// Total time in microseconds.
    pub total_time: u64,
}

/// Accounting daemon statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDiagnostics {
    /// When statistics collection started.
    pub time_start: Option<DateTime<Utc>>,
    /// RPC counters.
    pub rpcs: Vec<RpcStat>,
}

/// A TRES known to the accounting database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TresDefinition {
    /// Database id.
    pub id: Option<u32>,
    /// TRES type (`cpu`, `gres`).
    pub kind: String,
    /// TRES name (`gpu`), empty for untyped TRES.
    pub name: Option<String>,
    /// Count.
    pub count: Option<u64>,
}

impl TresDefinition {
    /// Map key (`type` or `type/name`).
    #[must_use]
    pub fn key(&self) -> String {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => format!("{}/{name}", self.kind),
            None => self.kind.clone(),
        }
    }

    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("type", &self.kind)
    }
}

/// Names of the objects in the accounting database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Cluster names.
    pub clusters: Vec<String>,
    /// Account names.
    pub accounts: Vec<String>,
    /// User names.
    pub users: Vec<String>,
    /// QoS names.
    pub qos: Vec<String>,
    /// Known TRES.
    pub tres: Vec<TresDefinition>,
}

/// A cloud or dynamic node instance known to the accounting database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Cluster name.
    pub cluster: String,
    /// Provider-specific data.
    pub extra: Option<String>,
    /// Provider instance id.
    pub instance_id: Option<String>,
    /// Provider instance type.
    pub instance_type: Option<String>,
    /// Node backed by the instance.
    pub node_name: Option<String>,
    /// When the instance joined the cluster.
    pub time_start: Option<DateTime<Utc>>,
    /// When the instance left the cluster.
    pub time_end: Option<DateTime<Utc>>,
}

/// Server-side instance filter. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceFilter {
    /// Clusters.
    pub clusters: Vec<String>,
    /// Provider data.
    pub extra: Vec<String>,
    /// Provider instance ids.
    pub instance_ids: Vec<String>,
    /// Provider instance types.
    pub instance_types: Vec<String>,
    /// Node names.
    pub node_names: Vec<String>,
    /// Only instances active at or after this time.
    pub time_start: Option<DateTime<Utc>>,
    /// Only instances active at or before this time.
    pub time_end: Option<DateTime<Utc>>,
}

impl InstanceFilter {
    /// Query parameters in wire order, lists comma-joined.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let lists = [
            ("cluster", &self.clusters),
            ("extra", &self.extra),
            ("instance_id", &self.instance_ids),
            ("instance_type", &self.instance_types),
            ("node_list", &self.node_names),
        ];
        let times = [("time_start", self.time_start), ("time_end", self.time_end)];
        lists
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| (key, values.join(",")))
            .chain(
                times
                    .into_iter()
                    .filter_map(|(key, time)| Some((key, time?.timestamp().to_string()))),
            )
            .collect()
    }
}

/// One controller's ping result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerPing {
    /// Controller hostname.
    pub hostname: String,
    /// Whether it responded.
    pub responding: bool,
    /// Round-trip latency in microseconds.
    pub latency_us: Option<u64>,
    /// Controller mode (`primary`, `backup1`).
    pub mode: Option<String>,
}

/// Ping results plus the server identity reported alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingReport {
    /// Per-controller results.
    pub controllers: Vec<ControllerPing>,
    /// Slurm release, `major.minor.micro`.
    pub slurm_version: Option<String>,
    /// Cluster name.
    pub cluster: Option<String>,
}

impl PingReport {
    /// Returns true if at least one controller responded.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.controllers.iter().any(|c| c.responding)
    }
}
