//! v0.0.42 wire shapes (Slurm 25.05).
//!
//! `exclusive` and `oversubscribe` are gone, the script moved inside the job
//! description, jobs can be submitted held, the submit response nests its
//! ids under `result`, and `cpu_load` is a bare integer.

use serde::{Deserialize, Serialize};

use super::base::{JobBase, JobDescriptionBase, NodeBase, PartitionBase};
use crate::noval::NoVal;

pub use super::base::NodeUpdateRequest;
pub use super::shared::ReservationInfo;

/// Path segment of this version.
pub const VERSION: &str = "v0.0.42";

/// Job record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    /// Shared fields.
    #[serde(flatten)]
    pub base: JobBase,
    /// Switch count constraint.
    #[serde(default)]
    pub required_switches: Option<u32>,
}

/// Job description for submit and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    /// Shared fields.
    #[serde(flatten)]
    pub base: JobDescriptionBase,
    /// Batch script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Switch count constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_switches: Option<u32>,
    /// Hold or release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<bool>,
}

/// Body of `POST /slurm/v0.0.42/job/submit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSubmitRequest {
    /// Description, including the script.
    pub job: JobDescription,
}

/// `result` block of the submit response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
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

/// Payload of the submit response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmitResponse {
    /// Nested ids.
    #[serde(default)]
    pub result: Option<SubmitResult>,
    /// Top-level id kept for older clients.
    #[serde(default)]
    pub job_id: Option<u32>,
    /// Top-level step id.
    #[serde(default)]
    pub step_id: Option<String>,
    /// Top-level plugin message.
    #[serde(default)]
    pub job_submit_user_msg: Option<String>,
}

impl JobSubmitResponse {
    /// Prefer the nested result, fall back to the top-level fields.
    #[must_use]
    pub fn into_result(self) -> SubmitResult {
        let nested = self.result.unwrap_or_default();
        SubmitResult {
            job_id: nested.job_id.or(self.job_id),
            step_id: nested.step_id.or(self.step_id),
            job_submit_user_msg: nested.job_submit_user_msg.or(self.job_submit_user_msg),
        }
    }
}

/// Body of `POST /slurm/v0.0.42/job/allocate`. No script is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobAllocRequest {
    /// Description of the allocation.
    pub job: JobDescription,
}

/// Payload of the allocate response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAllocResponse {
    /// Allocated job id.
    #[serde(default)]
    pub job_id: Option<u32>,
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
    pub cpu_load: Option<u64>,
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
