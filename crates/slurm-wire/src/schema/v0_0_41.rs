//! v0.0.41 wire shapes (Slurm 24.11).
//!
//! Job records of this release mix wrapped and bare numbers depending on the
//! server build, so every numeric job field is [`Flexible`]. Unknown keys
//! are ignored rather than modelled.

use serde::{Deserialize, Serialize};

use super::base::{ExitCode, JobDescriptionBase, NodeBase};
use crate::noval::{CsvList, Flexible};

pub use super::base::NodeUpdateRequest;
pub use super::shared::ReservationInfo;
pub use super::v0_0_40::{JobSubmitResponse, PartitionInfo};

/// Path segment of this version.
pub const VERSION: &str = "v0.0.41";

/// Job record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    /// Job id. Required.
    #[serde(default)]
    pub job_id: Option<Flexible<u32>>,
    /// Job name.
    #[serde(default)]
    pub name: Option<String>,
    /// Owner uid.
    #[serde(default)]
    pub user_id: Option<Flexible<u32>>,
    /// Owner name.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Owner gid.
    #[serde(default)]
    pub group_id: Option<Flexible<u32>>,
    /// Account.
    #[serde(default)]
    pub account: Option<String>,
    /// Partition.
    #[serde(default)]
    pub partition: Option<String>,
    /// QoS.
    #[serde(default)]
    pub qos: Option<String>,
    /// State flags.
    #[serde(default)]
    pub job_state: Option<CsvList>,
    /// State reason.
    #[serde(default)]
    pub state_reason: Option<String>,
    /// Time limit, minutes.
    #[serde(default)]
    pub time_limit: Option<Flexible<u32>>,
    /// Submission, Unix seconds.
    #[serde(default)]
    pub submit_time: Option<Flexible<i64>>,
    /// Start, Unix seconds.
    #[serde(default)]
    pub start_time: Option<Flexible<i64>>,
    /// End, Unix seconds.
    #[serde(default)]
    pub end_time: Option<Flexible<i64>>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<Flexible<u32>>,
    /// CPUs.
    #[serde(default)]
    pub cpus: Option<Flexible<u32>>,
    /// Node count.
    #[serde(default)]
    pub node_count: Option<Flexible<u32>>,
    /// Node list.
    #[serde(default)]
    pub nodes: Option<String>,
    /// Working directory.
    #[serde(default)]
    pub current_working_directory: Option<String>,
    /// Command.
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
    pub array_job_id: Option<Flexible<u32>>,
    /// Array index.
    #[serde(default)]
    pub array_task_id: Option<Flexible<u32>>,
    /// Feature constraint.
    #[serde(default)]
    pub features: Option<CsvList>,
    /// Requested TRES.
    #[serde(default)]
    pub tres_req_str: Option<String>,
    /// Allocated TRES.
    #[serde(default)]
    pub tres_alloc_str: Option<String>,
    /// Exit status.
    #[serde(default)]
    pub exit_code: Option<ExitCode>,
    /// Comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Switch count constraint.
    #[serde(default)]
    pub required_switches: Option<Flexible<u32>>,
    /// Exclusivity flags.
    #[serde(default)]
    pub exclusive: Option<CsvList>,
}

/// Job description for submit and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    /// Shared fields.
    #[serde(flatten)]
    pub base: JobDescriptionBase,
    /// Switch count constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_switches: Option<u32>,
    /// Exclusivity flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<Vec<String>>,
}

/// Body of `POST /slurm/v0.0.41/job/submit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSubmitRequest {
    /// Batch script.
    pub script: String,
    /// Description.
    pub job: JobDescription,
}

/// Node record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Shared fields.
    #[serde(flatten)]
    pub base: NodeBase,
    /// Load average times 100, bare or wrapped.
    #[serde(default)]
    pub cpu_load: Option<Flexible<u64>>,
}
