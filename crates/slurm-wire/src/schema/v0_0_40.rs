//! v0.0.40 wire shapes (Slurm 24.05).
//!
//! Jobs still report `minimum_switches` and the `exclusive` flag; the
//! submit body carries the script next to the job description.

use serde::{Deserialize, Serialize};

use super::base::{JobBase, JobDescriptionBase, NodeBase, PartitionBase};
use crate::noval::{CsvList, NoVal};

pub use super::base::NodeUpdateRequest;
pub use super::shared::ReservationInfo;

/// Path segment of this version.
pub const VERSION: &str = "v0.0.40";

/// Job record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    /// Shared fields.
    #[serde(flatten)]
    pub base: JobBase,
    /// Switch count constraint.
    #[serde(default)]
    pub minimum_switches: Option<u32>,
    /// Exclusivity flags, e.g. `["USER"]`.
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
    pub minimum_switches: Option<u32>,
    /// Exclusivity flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<Vec<String>>,
}

/// Body of `POST /slurm/v0.0.40/job/submit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSubmitRequest {
    /// Batch script.
    pub script: String,
    /// Description.
    pub job: JobDescription,
}

/// Payload of the submit response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmitResponse {
    /// New job id.
    #[serde(default)]
    pub job_id: Option<u32>,
    /// Step id.
    #[serde(default)]
    pub step_id: Option<String>,
    /// Message from a job-submit plugin.
    #[serde(default)]
    pub job_submit_user_msg: Option<String>,
}

/// Node record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Shared fields.
    #[serde(flatten)]
    pub base: NodeBase,
    /// Load average times 100.
    #[serde(default)]
    pub cpu_load: Option<NoVal<u64>>,
}

/// `oversubscribe` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oversubscribe {
    /// Jobs per resource.
    #[serde(default)]
    pub jobs: Option<u32>,
    /// Flags such as `force`.
    #[serde(default)]
    pub flags: Vec<String>,
}

/// `maximums` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionMaximums {
    /// Max time, minutes.
    #[serde(default)]
    pub time: Option<NoVal<u32>>,
    /// Max nodes per job.
    #[serde(default)]
    pub nodes: Option<NoVal<u32>>,
    /// Oversubscription.
    #[serde(default)]
    pub oversubscribe: Option<Oversubscribe>,
}

/// Partition record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInfo {
    /// Shared fields.
    #[serde(flatten)]
    pub base: PartitionBase,
    /// Maximums.
    #[serde(default)]
    pub maximums: Option<PartitionMaximums>,
}
