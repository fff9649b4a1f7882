//! Wire shapes that did not change between v0.0.40 and v0.0.44.
//!
//! Mostly accounting (`slurmdb`) records plus a few controller
//! reports. Unknown keys are ignored everywhere.

use serde::{Deserialize, Serialize};

use crate::noval::{CsvList, Flexible, NoVal};

/// One `{type, name, id, count}` TRES entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTres {
    /// Resource type, e.g. `cpu`, `mem`, `gres`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Sub-name, e.g. `gpu` for `gres/gpu`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Database id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Quantity. Null means "no value".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

/// `{ "name": ... }` reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Referenced name.
    #[serde(default)]
    pub name: Option<String>,
}

// --- accounts -------------------------------------------------------------

/// `slurmdb` account record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning organisation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Coordinator users.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinators: Vec<NamedRef>,
    /// Flags such as `DELETED`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

// --- associations ---------------------------------------------------------

/// `default` block of an association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDefaults {
    /// Default QoS name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos: Option<String>,
}

/// `max.jobs.per` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobsPer {
    /// Wall clock limit per job in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_clock: Option<NoVal<u32>>,
}

/// `max.jobs` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationJobLimits {
    /// Running jobs limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<NoVal<u32>>,
    /// Submitted jobs limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<NoVal<u32>>,
    /// Per-job limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per: Option<JobsPer>,
}

/// `tres.per` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TresPer {
    /// Per-job TRES limits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job: Vec<WireTres>,
    /// Per-user TRES limits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user: Vec<WireTres>,
}

/// `max.tres` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TresLimits {
    /// Group totals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub total: Vec<WireTres>,
    /// Per-entity limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per: Option<TresPer>,
}

/// `max` block of an association.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationMax {
    /// Job limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<AssociationJobLimits>,
    /// TRES limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tres: Option<TresLimits>,
}

/// `slurmdb` association record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationInfo {
    /// Database id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Account. Required.
    #[serde(default)]
    pub account: Option<String>,
    /// Cluster. Required.
    #[serde(default)]
    pub cluster: Option<String>,
    /// Partition, if the association is partition-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    /// User. Empty for account-level associations.
    #[serde(default)]
    pub user: Option<String>,
    /// Parent account name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_account: Option<String>,
    /// Whether this is the user's default association.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    /// Raw fair-share value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_raw: Option<u32>,
    /// Defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AssociationDefaults>,
    /// Allowed QoS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos: Option<CsvList>,
    /// Limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<AssociationMax>,
    /// Priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NoVal<u32>>,
}

// --- QoS ------------------------------------------------------------------

/// `{ "user": n }` per-user limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerUser {
    /// Limit per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NoVal<u32>>,
}

/// `{ "job": n }` per-job limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerJob {
    /// Limit per job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<NoVal<u32>>,
}

/// `limits.max.wall_clock` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallClock {
    /// Per-entity wall clock limits in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per: Option<PerJob>,
}

/// `limits.max.jobs.active_jobs` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveJobs {
    /// Submitted-job limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per: Option<PerUser>,
}

/// `limits.max.jobs` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QosJobLimits {
    /// Running-job limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per: Option<PerUser>,
    /// Submitted-job limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_jobs: Option<ActiveJobs>,
}

/// `limits.max` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QosMax {
    /// Wall clock limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_clock: Option<WallClock>,
    /// Job count limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<QosJobLimits>,
    /// TRES limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tres: Option<TresLimits>,
}

/// `limits` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QosLimits {
    /// Maximums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<QosMax>,
}

/// `preempt` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosPreempt {
    /// QoS names this one may preempt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<String>,
    /// Preemption modes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mode: Vec<String>,
}

/// `slurmdb` QoS record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QosInfo {
    /// Name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Database id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NoVal<u32>>,
    /// Usage factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_factor: Option<NoVal<f64>>,
    /// Limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<QosLimits>,
    /// Preemption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preempt: Option<QosPreempt>,
}

// --- users ----------------------------------------------------------------

/// `default` block of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefaults {
    /// Default account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Default WCKey.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wckey: Option<String>,
}

/// Short association reference embedded in a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationShort {
    /// Account.
    #[serde(default)]
    pub account: Option<String>,
    /// Cluster.
    #[serde(default)]
    pub cluster: Option<String>,
    /// Partition.
    #[serde(default)]
    pub partition: Option<String>,
    /// User.
    #[serde(default)]
    pub user: Option<String>,
}

/// `slurmdb` user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<UserDefaults>,
    /// Admin level; an array in some versions, a string in others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrator_level: Option<CsvList>,
    /// Associations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associations: Vec<AssociationShort>,
    /// Accounts this user coordinates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinators: Vec<NamedRef>,
    /// Flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

// --- WCKeys and clusters --------------------------------------------------

/// `slurmdb` WCKey record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WckeyInfo {
    /// Database id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Key name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Cluster. Required.
    #[serde(default)]
    pub cluster: Option<String>,
    /// User. Required.
    #[serde(default)]
    pub user: Option<String>,
    /// Flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

/// Controller address of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerAddress {
    /// Host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// `slurmdb` cluster record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Node list expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<String>,
    /// Controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<ControllerAddress>,
    /// Flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// RPC protocol version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_version: Option<u32>,
    /// Select plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_plugin: Option<String>,
    /// Configured TRES.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tres: Vec<WireTres>,
}

// --- reservations ---------------------------------------------------------

/// Controller reservation record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationInfo {
    /// Name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Comma-separated accounts.
    #[serde(default)]
    pub accounts: Option<String>,
    /// Comma-separated users.
    #[serde(default)]
    pub users: Option<String>,
    /// Start, Unix seconds.
    #[serde(default)]
    pub start_time: Option<NoVal<i64>>,
    /// End, Unix seconds.
    #[serde(default)]
    pub end_time: Option<NoVal<i64>>,
    /// Node list expression.
    #[serde(default)]
    pub node_list: Option<String>,
    /// Node count.
    #[serde(default)]
    pub node_count: Option<u32>,
    /// Core count.
    #[serde(default)]
    pub core_count: Option<u32>,
    /// Partition.
    #[serde(default)]
    pub partition: Option<String>,
    /// Flags.
    #[serde(default)]
    pub flags: Option<CsvList>,
    /// Required features.
    #[serde(default)]
    pub features: Option<String>,
    /// TRES string.
    #[serde(default)]
    pub tres: Option<String>,
}

// --- standalone reports ---------------------------------------------------

/// Controller license record. Keys are `PascalCase` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LicenseInfo {
    /// License name. Required.
    #[serde(default)]
    pub license_name: Option<String>,
    /// Total count.
    #[serde(default)]
    pub total: Option<u32>,
    /// In use.
    #[serde(default)]
    pub used: Option<u32>,
    /// Available.
    #[serde(default)]
    pub free: Option<u32>,
    /// Reserved.
    #[serde(default)]
    pub reserved: Option<u32>,
    /// Served by the database.
    #[serde(default)]
    pub remote: Option<bool>,
}

/// Fair-share block of a share record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fairshare {
    /// Fair-share factor.
    #[serde(default)]
    pub factor: Option<Flexible<f64>>,
}

/// One fair-share tree entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareInfo {
    /// Account or user name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Cluster.
    #[serde(default)]
    pub cluster: Option<String>,
    /// Parent account.
    #[serde(default)]
    pub parent: Option<String>,
    /// Partition.
    #[serde(default)]
    pub partition: Option<String>,
    /// Raw shares.
    #[serde(default)]
    pub shares: Option<Flexible<u32>>,
    /// Normalised shares.
    #[serde(default)]
    pub shares_normalized: Option<Flexible<f64>>,
    /// Effective usage.
    #[serde(default)]
    pub effective_usage: Option<Flexible<f64>>,
    /// Fair-share.
    #[serde(default)]
    pub fairshare: Option<Fairshare>,
}

/// `shares` object of the shares response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharesReport {
    /// Tree entries.
    #[serde(default)]
    pub shares: Vec<ShareInfo>,
}

/// Controller `statistics` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerStatistics {
    /// When the sample was taken, Unix seconds.
    #[serde(default)]
    pub req_time: Option<Flexible<i64>>,
    /// Server threads.
    #[serde(default)]
    pub server_thread_count: Option<u32>,
    /// Agent queue depth.
    #[serde(default)]
    pub agent_queue_size: Option<u32>,
    /// Jobs submitted since reset.
    #[serde(default)]
    pub jobs_submitted: Option<u32>,
    /// Jobs started since reset.
    #[serde(default)]
    pub jobs_started: Option<u32>,
    /// Jobs completed since reset.
    #[serde(default)]
    pub jobs_completed: Option<u32>,
    /// Jobs canceled since reset.
    #[serde(default)]
    pub jobs_canceled: Option<u32>,
    /// Jobs failed since reset.
    #[serde(default)]
    pub jobs_failed: Option<u32>,
    /// Jobs currently pending.
    #[serde(default)]
    pub jobs_pending: Option<u32>,
    /// Jobs currently running.
    #[serde(default)]
    pub jobs_running: Option<u32>,
    /// Last scheduling cycle, microseconds.
    #[serde(default)]
    pub schedule_cycle_last: Option<u32>,
    /// Mean scheduling cycle, microseconds.
    #[serde(default)]
    pub schedule_cycle_mean: Option<u64>,
}

/// `time` block of an RPC statistic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcTime {
    /// Average, microseconds.
    #[serde(default)]
    pub average: Option<u64>,
    /// Total, microseconds.
    #[serde(default)]
    pub total: Option<u64>,
}

/// One database RPC statistic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcInfo {
    /// RPC name.
    #[serde(default)]
    pub rpc: Option<String>,
    /// Call count.
    #[serde(default)]
    pub count: Option<u64>,
    /// Timing.
    #[serde(default)]
    pub time: Option<RpcTime>,
}

/// Accounting `statistics` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStatistics {
    /// When counting started, Unix seconds.
    #[serde(default)]
    pub time_start: Option<i64>,
    /// Per-RPC counters.
    #[serde(rename = "RPCs", default)]
    pub rpcs: Vec<RpcInfo>,
}

/// Accounting configuration dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfigReport {
    /// Clusters.
    #[serde(default)]
    pub clusters: Vec<NamedRef>,
    /// Accounts.
    #[serde(default)]
    pub accounts: Vec<NamedRef>,
    /// Users.
    #[serde(default)]
    pub users: Vec<NamedRef>,
    /// QoS.
    #[serde(default)]
    pub qos: Vec<NamedRef>,
    /// TRES.
    #[serde(rename = "tres", alias = "TRES", default)]
    pub tres: Vec<WireTres>,
}

/// Start and end of an instance's membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTime {
    /// Joined, Unix seconds.
    #[serde(default)]
    pub time_start: Option<i64>,
    /// Left, Unix seconds.
    #[serde(default)]
    pub time_end: Option<i64>,
}

/// Accounting instance record (v0.0.41 and v0.0.43).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// Cluster. Required.
    #[serde(default)]
    pub cluster: Option<String>,
    /// Provider data.
    #[serde(default)]
    pub extra: Option<String>,
    /// Provider instance id.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Provider instance type.
    #[serde(default)]
    pub instance_type: Option<String>,
    /// Backing node.
    #[serde(default)]
    pub node_name: Option<String>,
    /// Membership window.
    #[serde(default)]
    pub time: Option<InstanceTime>,
}

/// One controller or database ping result.
///
/// v0.0.40 reports `pinged: "UP"`; later versions report `responding`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingInfo {
    /// Host name.
    #[serde(default)]
    pub hostname: Option<String>,
    /// `UP` or `DOWN`.
    #[serde(default)]
    pub pinged: Option<String>,
    /// Responding flag.
    #[serde(default)]
    pub responding: Option<bool>,
    /// Round trip, microseconds.
    #[serde(default)]
    pub latency: Option<u64>,
    /// `primary`, `backup1`, ...
    #[serde(default)]
    pub mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tres_type_rename() {
        let tres: WireTres = serde_json::from_value(json!({"type": "gres", "name": "gpu", "count": 2})).unwrap();
        assert_eq!(tres.kind.as_deref(), Some("gres"));
        let out = serde_json::to_value(&tres).unwrap();
        assert_eq!(out, json!({"type": "gres", "name": "gpu", "count": 2}));
    }

    #[test]
    fn test_license_pascal_case() {
        let license: LicenseInfo = serde_json::from_value(json!({
            "LicenseName": "matlab", "Total": 10, "Used": 3, "Free": 7, "Reserved": 0, "Remote": false
        }))
        .unwrap();
        assert_eq!(license.license_name.as_deref(), Some("matlab"));
        assert_eq!(license.free, Some(7));
    }

    #[test]
    fn test_user_admin_level_shapes() {
        let array: UserInfo = serde_json::from_value(json!({"name": "a", "administrator_level": ["Operator"]})).unwrap();
        let string: UserInfo = serde_json::from_value(json!({"name": "a", "administrator_level": "Operator"})).unwrap();
        assert_eq!(
            array.administrator_level.unwrap().first(),
            string.administrator_level.unwrap().first()
        );
    }

    #[test]
    fn test_association_nested_limits() {
        let assoc: AssociationInfo = serde_json::from_value(json!({
            "account": "physics", "cluster": "c1", "user": "alice",
            "max": {"jobs": {"active": {"set": true, "number": 10}}, "tres": {"per": {"job": [{"type": "cpu", "count": 8}]}}}
        }))
        .unwrap();
        let max = assoc.max.unwrap();
        assert_eq!(max.jobs.unwrap().active, Some(NoVal::set(10)));
        assert_eq!(max.tres.unwrap().per.unwrap().job.len(), 1);
    }

    #[test]
    fn test_account_serialization_skips_empty() {
        let account = AccountInfo {
            name: Some("physics".into()),
            ..AccountInfo::default()
        };
        assert_eq!(serde_json::to_value(&account).unwrap(), json!({"name": "physics"}));
    }

    #[test]
    fn test_database_statistics_rpcs_key() {
        let stats: DatabaseStatistics = serde_json::from_value(json!({
            "time_start": 1_700_000_000,
            "RPCs": [{"rpc": "DBD_GET_JOBS_COND", "count": 4, "time": {"average": 10, "total": 40}}]
        }))
        .unwrap();
        assert_eq!(stats.rpcs[0].count, Some(4));
    }
}
