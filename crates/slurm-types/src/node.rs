//! Compute nodes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_str};
use crate::tres::TresMap;

/// A node state or state flag.
///
/// Slurm reports a base state plus flags (`IDLE`, `DRAIN`), so a node carries
/// a list of these. Unknown names are kept in [`NodeState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeState {
    /// No jobs allocated.
    Idle,
    /// Fully allocated.
    Allocated,
    /// Partially allocated.
    Mixed,
    /// Unavailable.
    Down,
    /// Drained or draining.
    Drain,
    /// Jobs finishing on the node.
    Completing,
    /// In a maintenance reservation.
    Maintenance,
    /// In an advanced reservation.
    Reserved,
    /// Not responding to the controller.
    NotResponding,
    /// Powered down by power saving.
    PoweredDown,
    /// Defined for future use.
    Future,
    /// Failed.
    Fail,
    /// State unknown to the controller.
    Unknown,
    /// Return a drained or down node to service (update only).
    Resume,
    /// Clear the drain flag (update only).
    Undrain,
    /// A state this adapter does not model.
    Other(String),
}

impl NodeState {
    /// Map a wire state name, keeping unknown names verbatim.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Self::Idle,
            "ALLOCATED" | "ALLOC" => Self::Allocated,
            "MIXED" => Self::Mixed,
            "DOWN" => Self::Down,
            "DRAIN" | "DRAINED" | "DRAINING" => Self::Drain,
            "COMPLETING" => Self::Completing,
            "MAINTENANCE" => Self::Maintenance,
            "RESERVED" => Self::Reserved,
            "NOT_RESPONDING" => Self::NotResponding,
            "POWERED_DOWN" => Self::PoweredDown,
            "FUTURE" => Self::Future,
            "FAIL" => Self::Fail,
            "UNKNOWN" => Self::Unknown,
            "RESUME" => Self::Resume,
            "UNDRAIN" => Self::Undrain,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Wire name of this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "IDLE",
            Self::Allocated => "ALLOCATED",
            Self::Mixed => "MIXED",
            Self::Down => "DOWN",
            Self::Drain => "DRAIN",
            Self::Completing => "COMPLETING",
            Self::Maintenance => "MAINTENANCE",
            Self::Reserved => "RESERVED",
            Self::NotResponding => "NOT_RESPONDING",
            Self::PoweredDown => "POWERED_DOWN",
            Self::Future => "FUTURE",
            Self::Fail => "FAIL",
            Self::Unknown => "UNKNOWN",
            Self::Resume => "RESUME",
            Self::Undrain => "UNDRAIN",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for NodeState {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<NodeState> for String {
    fn from(value: NodeState) -> Self {
        value.as_str().to_string()
    }
}

/// A compute node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node name.
    pub name: String,
    /// Hostname.
    pub hostname: Option<String>,
    /// Network address.
    pub address: Option<String>,
    /// CPU architecture.
    pub architecture: Option<String>,
    /// Operating system.
    pub operating_system: Option<String>,
    /// Base state followed by flags.
    pub state: Vec<NodeState>,
    /// Configured CPUs.
    pub cpus: Option<u32>,
    /// Allocated CPUs.
    pub alloc_cpus: Option<u32>,
    /// CPU load as a fraction (wire centi-load divided by 100).
    pub cpu_load: Option<f64>,
    /// Configured memory in megabytes.
    pub real_memory: Option<u64>,
    /// Free memory in megabytes.
    pub free_memory: Option<u64>,
    /// Allocated memory in megabytes.
    pub alloc_memory: Option<u64>,
    /// Available features.
    pub features: Vec<String>,
    /// Currently active features.
    pub active_features: Vec<String>,
    /// Partitions containing this node.
    pub partitions: Vec<String>,
    /// Generic resources.
    pub gres: Option<String>,
    /// Reason for a down or drained state.
    pub reason: Option<String>,
    /// Boot time.
    pub boot_time: Option<DateTime<Utc>>,
    /// Last time the node was busy.
    pub last_busy: Option<DateTime<Utc>>,
    /// Scheduling weight.
    pub weight: Option<u32>,
    /// Configured TRES.
    pub tres: TresMap,
}

impl Node {
    /// Returns true if the node carries the given state or flag.
    #[must_use]
    pub fn has_state(&self, state: &NodeState) -> bool {
        self.state.contains(state)
    }

    /// Base state, the first reported entry.
    #[must_use]
    pub fn primary_state(&self) -> Option<&NodeState> {
        self.state.first()
    }

    /// Returns true if new work can be scheduled on the node.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(
            self.primary_state(),
            Some(NodeState::Idle | NodeState::Mixed | NodeState::Allocated)
        ) && !self.has_state(&NodeState::Drain)
            && !self.has_state(&NodeState::NotResponding)
    }
}

/// Fields that may change on an existing node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUpdate {
    /// New state.
    pub state: Option<NodeState>,
    /// Reason for the state change.
    pub reason: Option<String>,
    /// Replacement feature list.
    pub features: Option<Vec<String>>,
    /// New scheduling weight.
    pub weight: Option<u32>,
    /// New comment.
    pub comment: Option<String>,
}

impl NodeUpdate {
    /// Drain with a reason.
    #[must_use]
    pub fn drain(reason: impl Into<String>) -> Self {
        Self {
            state: Some(NodeState::Drain),
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Return to service.
    #[must_use]
    pub fn resume() -> Self {
        Self {
            state: Some(NodeState::Resume),
            ..Self::default()
        }
    }

    /// Slurm refuses drain and down without a reason.
    pub fn validate(&self) -> TypesResult<()> {
        if matches!(self.state, Some(NodeState::Drain | NodeState::Down)) {
            require("reason", self.reason.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Post-decode criteria for node lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    /// Node names to keep.
    pub names: Vec<String>,
    /// Keep nodes carrying any of these states.
    pub states: Vec<NodeState>,
    /// Keep nodes in any of these partitions.
    pub partitions: Vec<String>,
    /// Keep nodes offering every one of these features.
    pub features: Vec<String>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Node> for NodeFilter {
    fn matches(&self, node: &Node) -> bool {
        any_str(&self.names, &node.name)
            && (self.states.is_empty() || self.states.iter().any(|s| node.has_state(s)))
            && (self.partitions.is_empty()
                || self.partitions.iter().any(|p| node.partitions.contains(p)))
            && self.features.iter().all(|f| node.features.contains(f))
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
