//! Quality of service.

use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_str};
use crate::tres::TresMap;

/// A QoS definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Qos {
    /// QoS name.
    pub name: String,
    /// Database id.
    pub id: Option<u32>,
    /// Description.
    pub description: Option<String>,
    /// Flags.
    pub flags: Vec<String>,
    /// Priority.
    pub priority: Option<u32>,
    /// Usage factor applied to fairshare.
    pub usage_factor: Option<f64>,
    /// Maximum wall time per job in minutes.
    pub max_wall_per_job: Option<u32>,
    /// Maximum running jobs per user.
    pub max_jobs_per_user: Option<u32>,
    /// Maximum submitted jobs per user.
    pub max_submit_jobs_per_user: Option<u32>,
    /// Per-job TRES limits.
    pub max_tres_per_job: TresMap,
    /// Per-user TRES limits.
    pub max_tres_per_user: TresMap,
    /// QoS names this one may preempt.
    pub preempt: Vec<String>,
    /// Preemption modes.
    pub preempt_mode: Vec<String>,
}

impl Qos {
    /// Create a QoS with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("name", &self.name)
    }
}

/// Fields that may change on an existing QoS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QosUpdate {
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<u32>,
    /// New usage factor.
    pub usage_factor: Option<f64>,
    /// Replacement flags.
    pub flags: Option<Vec<String>>,
    /// New wall time limit in minutes.
    pub max_wall_per_job: Option<u32>,
    /// New running jobs per user limit.
    pub max_jobs_per_user: Option<u32>,
    /// Replacement per-job TRES limits.
    pub max_tres_per_job: Option<TresMap>,
    /// Replacement preemption list.
    pub preempt: Option<Vec<String>>,
}

impl QosUpdate {
    /// Apply this delta to an existing QoS.
    pub fn apply(&self, qos: &mut Qos) {
        if let Some(description) = &self.description {
            qos.description = Some(description.clone());
        }
        if let Some(flags) = &self.flags {
            qos.flags.clone_from(flags);
        }
        if let Some(tres) = &self.max_tres_per_job {
            qos.max_tres_per_job.clone_from(tres);
        }
        if let Some(preempt) = &self.preempt {
            qos.preempt.clone_from(preempt);
        }
        qos.priority = self.priority.or(qos.priority);
        qos.usage_factor = self.usage_factor.or(qos.usage_factor);
        qos.max_wall_per_job = self.max_wall_per_job.or(qos.max_wall_per_job);
        qos.max_jobs_per_user = self.max_jobs_per_user.or(qos.max_jobs_per_user);
    }
}

/// Post-decode criteria for QoS lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosFilter {
    /// QoS names to keep.
    pub names: Vec<String>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Qos> for QosFilter {
    fn matches(&self, qos: &Qos) -> bool {
        any_str(&self.names, &qos.name)
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
