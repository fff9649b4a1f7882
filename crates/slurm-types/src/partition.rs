//! Partitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_of, any_str};
use crate::tres::TresMap;

/// Partition availability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartitionState {
    /// Accepting and scheduling jobs.
    #[default]
    Up,
    /// Accepting jobs but not scheduling them.
    Down,
    /// Not accepting jobs, running jobs continue.
    Drain,
    /// Neither accepting nor scheduling jobs.
    Inactive,
    /// A state this adapter does not model.
    Other(String),
}

impl PartitionState {
    /// Map a wire state name, keeping unknown names verbatim.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "UP" => Self::Up,
            "DOWN" => Self::Down,
            "DRAIN" => Self::Drain,
            "INACTIVE" => Self::Inactive,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Wire name of this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Drain => "DRAIN",
            Self::Inactive => "INACTIVE",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for PartitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PartitionState {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<PartitionState> for String {
    fn from(value: PartitionState) -> Self {
        value.as_str().to_string()
    }
}

/// A partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Partition name.
    pub name: String,
    /// Availability.
    pub state: PartitionState,
    /// Node list expression.
    pub nodes: Option<String>,
    /// Total CPUs.
    pub total_cpus: Option<u32>,
    /// Total nodes.
    pub total_nodes: Option<u32>,
    /// Maximum job time limit in minutes.
    pub max_time: Option<u32>,
    /// Default job time limit in minutes.
    pub default_time: Option<u32>,
    /// Maximum nodes per job.
    pub max_nodes: Option<u32>,
    /// Minimum nodes per job.
    pub min_nodes: Option<u32>,
    /// Priority tier.
    pub priority_tier: Option<u32>,
    /// Maximum jobs sharing a resource, where the API version reports it.
    pub max_oversubscribe: Option<u32>,
    /// Accounts allowed to use the partition.
    pub allowed_accounts: Vec<String>,
    /// Groups allowed to use the partition.
    pub allowed_groups: Vec<String>,
    /// Partition QoS.
    pub qos: Option<String>,
    /// Configured TRES.
    pub tres: TresMap,
}

impl Partition {
    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("name", &self.name)
    }
}

/// Fields that may change on an existing partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionUpdate {
    /// New state.
    pub state: Option<PartitionState>,
    /// New maximum time in minutes.
    pub max_time: Option<u32>,
    /// New default time in minutes.
    pub default_time: Option<u32>,
    /// Replacement allowed accounts.
    pub allowed_accounts: Option<Vec<String>>,
}

/// Post-decode criteria for partition lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionFilter {
    /// Partition names to keep.
    pub names: Vec<String>,
    /// States to keep.
    pub states: Vec<PartitionState>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Partition> for PartitionFilter {
    fn matches(&self, partition: &Partition) -> bool {
        any_str(&self.names, &partition.name) && any_of(&self.states, &partition.state)
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
