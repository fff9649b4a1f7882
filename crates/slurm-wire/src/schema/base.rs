//! Controller record bodies that most versions share.
//!
//! Version modules flatten these into their own records and add the fields
//! that changed.

use serde::{Deserialize, Serialize};

use crate::noval::{CsvList, NoVal};

/// Job exit status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitCode {
    /// Status names, e.g. `SUCCESS`.
    #[serde(default)]
    pub status: Option<CsvList>,
    /// Process return code.
    #[serde(default)]
    pub return_code: Option<NoVal<i32>>,
}

/// Job record fields common to v0.0.40 and v0.0.42+.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobBase {
    /// Job id. Required.
    #[serde(default)]
    pub job_id: Option<u32>,
    /// Job name.
    #[serde(default)]
    pub name: Option<String>,
    /// Owner uid.
    #[serde(default)]
    pub user_id: Option<u32>,
    /// Owner name.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Owner gid.
    #[serde(default)]
    pub group_id: Option<u32>,
    /// Account.
    #[serde(default)]
    pub account: Option<String>,
    /// Partition.
    #[serde(default)]
    pub partition: Option<String>,
    /// QoS.
    #[serde(default)]
    pub qos: Option<String>,
    /// State flags; the first is the base state.
    #[serde(default)]
    pub job_state: Option<CsvList>,
    /// Reason the job is in its state.
    #[serde(default)]
    pub state_reason: Option<String>,
    /// Time limit in minutes.
    #[serde(default)]
    pub time_limit: Option<NoVal<u32>>,
    /// Submission, Unix seconds.
    #[serde(default)]
    pub submit_time: Option<NoVal<i64>>,
    /// Start, Unix seconds.
    #[serde(default)]
    pub start_time: Option<NoVal<i64>>,
    /// End, Unix seconds.
    #[serde(default)]
    pub end_time: Option<NoVal<i64>>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<NoVal<u32>>,
    /// Allocated or requested CPUs.
    #[serde(default)]
    pub cpus: Option<NoVal<u32>>,
    /// Node count.
    #[serde(default)]
    pub node_count: Option<NoVal<u32>>,
    /// Node list expression.
    #[serde(default)]
    pub nodes: Option<String>,
    /// Working directory.
    #[serde(default)]
    pub current_working_directory: Option<String>,
    /// Command or script path.
    #[serde(default)]
    pub command: Option<String>,
    /// Stdout path.
    #[serde(default)]
    pub standard_output: Option<String>,
    /// Stderr path.
    #[serde(default)]
    pub standard_error: Option<String>,
    /// Array master id.
    #[serde(default)]
    pub array_job_id: Option<NoVal<u32>>,
    /// Array index.
    #[serde(default)]
    pub array_task_id: Option<NoVal<u32>>,
    /// Feature constraint expression.
    #[serde(default)]
    pub features: Option<String>,
    /// Requested TRES string.
    #[serde(default)]
    pub tres_req_str: Option<String>,
    /// Allocated TRES string.
    #[serde(default)]
    pub tres_alloc_str: Option<String>,
    /// Exit status.
    #[serde(default)]
    pub exit_code: Option<ExitCode>,
    /// Comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Job description fields accepted by every version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptionBase {
    /// Job name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Partition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    /// QoS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos: Option<String>,
    /// Working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_working_directory: Option<String>,
    /// `KEY=value` entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    /// Time limit in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<NoVal<u32>>,
    /// Minimum CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_cpus: Option<u32>,
    /// Minimum nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_nodes: Option<u32>,
    /// Memory per node in MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_per_node: Option<NoVal<u64>>,
    /// Priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NoVal<u32>>,
    /// Stdout path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_output: Option<String>,
    /// Stderr path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_error: Option<String>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Node record fields shared by every version except `cpu_load`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeBase {
    /// Node name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Host name.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Address.
    #[serde(default)]
    pub address: Option<String>,
    /// CPU architecture.
    #[serde(default)]
    pub architecture: Option<String>,
    /// OS string.
    #[serde(default)]
    pub operating_system: Option<String>,
    /// State flags.
    #[serde(default)]
    pub state: Option<CsvList>,
    /// Configured CPUs.
    #[serde(default)]
    pub cpus: Option<u32>,
    /// Allocated CPUs.
    #[serde(default)]
    pub alloc_cpus: Option<u32>,
    /// Configured memory, MB.
    #[serde(default)]
    pub real_memory: Option<u64>,
    /// Free memory, MB.
    #[serde(default)]
    pub free_mem: Option<NoVal<u64>>,
    /// Allocated memory, MB.
    #[serde(default)]
    pub alloc_memory: Option<u64>,
    /// Configured features.
    #[serde(default)]
    pub features: Option<CsvList>,
    /// Active features.
    #[serde(default)]
    pub active_features: Option<CsvList>,
    /// Partitions the node belongs to.
    #[serde(default)]
    pub partitions: Option<CsvList>,
    /// Generic resources.
    #[serde(default)]
    pub gres: Option<String>,
    /// Reason for a down or drained state.
    #[serde(default)]
    pub reason: Option<String>,
    /// Boot, Unix seconds.
    #[serde(default)]
    pub boot_time: Option<NoVal<i64>>,
    /// Last busy, Unix seconds.
    #[serde(default)]
    pub last_busy: Option<NoVal<i64>>,
    /// Scheduling weight.
    #[serde(default)]
    pub weight: Option<u32>,
    /// TRES string.
    #[serde(default)]
    pub tres: Option<String>,
}

/// Body of `POST /slurm/{v}/node/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdateRequest {
    /// New state flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<String>,
    /// Reason for a down or drain state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Replacement feature list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    /// Scheduling weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<NoVal<u32>>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// `nodes` block of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionNodes {
    /// Node list expression.
    #[serde(default)]
    pub configured: Option<String>,
    /// Node count.
    #[serde(default)]
    pub total: Option<u32>,
}

/// `cpus` block of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionCpus {
    /// CPU count.
    #[serde(default)]
    pub total: Option<u32>,
}

/// `defaults` block of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDefaults {
    /// Default time limit, minutes.
    #[serde(default)]
    pub time: Option<NoVal<u32>>,
}

/// `minimums` block of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionMinimums {
    /// Minimum nodes per job.
    #[serde(default)]
    pub nodes: Option<u32>,
}

/// `partition` block holding the state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStatus {
    /// State flags.
    #[serde(default)]
    pub state: Option<CsvList>,
}

/// `priority` block of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionPriority {
    /// Priority tier.
    #[serde(default)]
    pub tier: Option<u32>,
}

/// `{ "allowed": "a,b" }` access list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList {
    /// Comma-separated names.
    #[serde(default)]
    pub allowed: Option<String>,
}

/// `qos` block of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionQos {
    /// Partition QoS name.
    #[serde(default)]
    pub assigned: Option<String>,
}

/// `tres` block of a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTres {
    /// Configured TRES string.
    #[serde(default)]
    pub configured: Option<String>,
}

/// Partition fields shared by every version except `maximums`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionBase {
    /// Name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Nodes.
    #[serde(default)]
    pub nodes: Option<PartitionNodes>,
    /// CPUs.
    #[serde(default)]
    pub cpus: Option<PartitionCpus>,
    /// Defaults.
    #[serde(default)]
    pub defaults: Option<PartitionDefaults>,
    /// Minimums.
    #[serde(default)]
    pub minimums: Option<PartitionMinimums>,
    /// State.
    #[serde(default)]
    pub partition: Option<PartitionStatus>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<PartitionPriority>,
    /// Allowed accounts.
    #[serde(default)]
    pub accounts: Option<AllowList>,
    /// Allowed groups.
    #[serde(default)]
    pub groups: Option<AllowList>,
    /// QoS.
    #[serde(default)]
    pub qos: Option<PartitionQos>,
    /// TRES.
    #[serde(default)]
    pub tres: Option<PartitionTres>,
}
