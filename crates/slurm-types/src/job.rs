//! Jobs.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_of, any_str, any_of_opt};
use crate::tres::TresMap;

/// Primary job state.
///
/// Values the adapter does not know are kept verbatim in [`JobState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    /// Waiting for resources.
    #[default]
    Pending,
    /// Executing.
    Running,
    /// Suspended by an administrator or preemption.
    Suspended,
    /// Finished with exit code zero.
    Completed,
    /// Cancelled by a user or administrator.
    Cancelled,
    /// Finished with a non-zero exit code.
    Failed,
    /// Hit its time limit.
    Timeout,
    /// Terminated by a node failure.
    NodeFail,
    /// Preempted.
    Preempted,
    /// Failed to launch on boot.
    BootFail,
    /// Missed its deadline.
    Deadline,
    /// Exceeded its memory limit.
    OutOfMemory,
    /// Releasing allocated resources.
    Completing,
    /// Waiting for nodes to boot.
    Configuring,
    /// Requeued.
    Requeued,
    /// A state this adapter does not model.
    Other(String),
}

impl JobState {
    /// Map a wire state name, keeping unknown names verbatim.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "SUSPENDED" => Self::Suspended,
            "COMPLETED" => Self::Completed,
            "CANCELLED" => Self::Cancelled,
            "FAILED" => Self::Failed,
            "TIMEOUT" => Self::Timeout,
            "NODE_FAIL" => Self::NodeFail,
            "PREEMPTED" => Self::Preempted,
            "BOOT_FAIL" => Self::BootFail,
            "DEADLINE" => Self::Deadline,
            "OUT_OF_MEMORY" => Self::OutOfMemory,
            "COMPLETING" => Self::Completing,
            "CONFIGURING" => Self::Configuring,
            "REQUEUED" => Self::Requeued,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Wire name of this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Suspended => "SUSPENDED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
            Self::Timeout => "TIMEOUT",
            Self::NodeFail => "NODE_FAIL",
            Self::Preempted => "PREEMPTED",
            Self::BootFail => "BOOT_FAIL",
            Self::Deadline => "DEADLINE",
            Self::OutOfMemory => "OUT_OF_MEMORY",
            Self::Completing => "COMPLETING",
            Self::Configuring => "CONFIGURING",
            Self::Requeued => "REQUEUED",
            Self::Other(value) => value,
        }
    }

    /// Returns true if the job will not run again without a requeue.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::Cancelled
                | Self::Failed
                | Self::Timeout
                | Self::NodeFail
                | Self::Preempted
                | Self::BootFail
                | Self::Deadline
                | Self::OutOfMemory
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for JobState {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<JobState> for String {
    fn from(value: JobState) -> Self {
        value.as_str().to_string()
    }
}

/// A job as reported by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job id.
    pub job_id: u32,
    /// Job name.
    pub name: String,
    /// Submitting user's uid.
    pub user_id: Option<u32>,
    /// Submitting user's name.
    pub user_name: Option<String>,
    /// Submitting user's gid.
    pub group_id: Option<u32>,
    /// Charged account.
    pub account: Option<String>,
    /// Partition the job runs in.
    pub partition: Option<String>,
    /// Quality of service.
    pub qos: Option<String>,
    /// Primary state.
    pub state: JobState,
    /// Scheduler's reason for the current state.
    pub state_reason: Option<String>,
    /// Time limit in minutes.
    pub time_limit: Option<u32>,
    /// Submission time.
    pub submit_time: Option<DateTime<Utc>>,
    /// Start time.
    pub start_time: Option<DateTime<Utc>>,
    /// End time.
    pub end_time: Option<DateTime<Utc>>,
    /// Scheduling priority.
    pub priority: Option<u32>,
    /// Allocated or requested CPUs.
    pub cpus: Option<u32>,
    /// Allocated or requested node count.
    pub node_count: Option<u32>,
    /// Allocated node list expression.
    pub node_list: Option<String>,
    /// Working directory.
    pub working_directory: Option<String>,
    /// Command or batch script path.
    pub command: Option<String>,
    /// Standard output path.
    pub standard_output: Option<String>,
    /// Standard error path.
    pub standard_error: Option<String>,
    /// Array master job id.
    pub array_job_id: Option<u32>,
    /// Array task id.
    pub array_task_id: Option<u32>,
    /// Required node features.
    pub features: Vec<String>,
    /// Requested TRES.
    pub tres_requested: TresMap,
    /// Allocated TRES.
    pub tres_allocated: TresMap,
    /// Exclusive node allocation, where the API version reports it.
    pub exclusive: Option<bool>,
    /// Maximum leaf switches for the allocation.
    pub required_switches: Option<u32>,
    /// Exit code once finished.
    pub exit_code: Option<i32>,
    /// Free-form comment.
    pub comment: Option<String>,
}

/// A job submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSubmission {
    /// Batch script contents.
    pub script: String,
    /// Job name.
    pub name: Option<String>,
    /// Account to charge.
    pub account: Option<String>,
    /// Target partition.
    pub partition: Option<String>,
    /// Quality of service.
    pub qos: Option<String>,
    /// Working directory.
    pub working_directory: Option<String>,
    /// Environment passed to the job.
    pub environment: BTreeMap<String, String>,
    /// Time limit in minutes.
    pub time_limit: Option<u32>,
    /// Minimum CPUs.
    pub cpus: Option<u32>,
    /// Minimum nodes.
    pub nodes: Option<u32>,
    /// Memory per node in megabytes.
    pub memory_per_node: Option<u64>,
    /// Request exclusive nodes. Only versions before v0.0.42 accept this.
    pub exclusive: Option<bool>,
    /// Maximum leaf switches.
    pub required_switches: Option<u32>,
    /// Standard output path.
    pub standard_output: Option<String>,
    /// Standard error path.
    pub standard_error: Option<String>,
    /// Free-form comment.
    pub comment: Option<String>,
}

impl JobSubmission {
    /// Create a submission for a script.
    #[must_use]
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("script", &self.script)?;
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        Ok(())
    }

    /// Environment rendered as `KEY=VALUE` entries.
    #[must_use]
    pub fn environment_entries(&self) -> Vec<String> {
        self.environment
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmitResponse {
    /// Assigned job id.
    pub job_id: u32,
    /// Step id, when the controller reports one.
    pub step_id: Option<String>,
    /// Message from the job submit plugin.
    pub user_message: Option<String>,
    /// Warnings attached to the response.
    pub warnings: Vec<String>,
}

/// A request for an interactive resource allocation without a batch script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAllocation {
    /// Account to charge. Required.
    pub account: String,
    /// Job name.
    pub name: Option<String>,
    /// Target partition.
    pub partition: Option<String>,
    /// Quality of service.
    pub qos: Option<String>,
    /// Minimum nodes.
    pub nodes: Option<u32>,
    /// Minimum CPUs.
    pub cpus: Option<u32>,
    /// Memory per node in megabytes.
    pub memory_per_node: Option<u64>,
    /// Time limit in minutes.
    pub time_limit: Option<u32>,
    /// Working directory.
    pub working_directory: Option<String>,
    /// Environment passed to the allocation.
    pub environment: BTreeMap<String, String>,
}

impl JobAllocation {
    /// Create an allocation request charged to `account`.
    #[must_use]
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            ..Self::default()
        }
    }

    /// Check required fields before dispatch.
    ///
    /// The account is required, and at least one of nodes, CPUs or memory
    /// must be requested.
    pub fn validate(&self) -> TypesResult<()> {
        require("account", &self.account)?;
        if self.nodes.is_none() && self.cpus.is_none() && self.memory_per_node.is_none() {
            return Err(TypesError::invalid(
                "resources",
                "request at least one of nodes, cpus or memory",
            ));
        }
        Ok(())
    }

    /// Environment rendered as `KEY=VALUE` entries.
    #[must_use]
    pub fn environment_entries(&self) -> Vec<String> {
        self.environment
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }
}

/// Outcome of a successful allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAllocateResponse {
    /// Assigned job id.
    pub job_id: u32,
    /// Message from the job submit plugin.
    pub user_message: Option<String>,
    /// Warnings attached to the response.
    pub warnings: Vec<String>,
}

/// Fields that may change on an existing job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobUpdate {
    /// New name.
    pub name: Option<String>,
    /// New time limit in minutes.
    pub time_limit: Option<u32>,
    /// New priority.
    pub priority: Option<u32>,
    /// New partition.
    pub partition: Option<String>,
    /// New QoS.
    pub qos: Option<String>,
    /// New comment.
    pub comment: Option<String>,
}

impl JobUpdate {
    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.time_limit.is_none()
            && self.priority.is_none()
            && self.partition.is_none()
            && self.qos.is_none()
            && self.comment.is_none()
    }
}

/// Post-decode criteria for job lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    /// Job ids to keep.
    pub job_ids: Vec<u32>,
    /// Job names to keep.
    pub names: Vec<String>,
    /// User names or numeric uids to keep.
    pub users: Vec<String>,
    /// Accounts to keep.
    pub accounts: Vec<String>,
    /// Partitions to keep.
    pub partitions: Vec<String>,
    /// States to keep.
    pub states: Vec<JobState>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Job> for JobFilter {
    fn matches(&self, job: &Job) -> bool {
        let user_matches = self.users.is_empty()
            || self.users.iter().any(|user| {
                job.user_name.as_deref() == Some(user.as_str())
                    || job.user_id.is_some_and(|uid| uid.to_string() == *user)
            });

        any_of(&self.job_ids, &job.job_id)
            && any_str(&self.names, &job.name)
            && user_matches
            && any_of_opt(&self.accounts, job.account.as_deref())
            && any_of_opt(&self.partitions, job.partition.as_deref())
            && any_of(&self.states, &job.state)
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
