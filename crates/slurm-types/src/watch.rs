//! Change events produced by the job and node pollers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::{Job, JobState};
use crate::node::{Node, NodeState};

/// Default time between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default event channel capacity.
pub const DEFAULT_EVENT_BUFFER: usize = 100;

/// Options for watching jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobWatchOptions {
    /// Time between polls.
    pub poll_interval: Duration,
    /// Only report these jobs; empty reports all.
    pub job_ids: Vec<u32>,
    /// Suppress [`JobEventKind::New`].
    pub exclude_new: bool,
    /// Suppress [`JobEventKind::Completed`].
    pub exclude_completed: bool,
    /// Event channel capacity.
    pub buffer: usize,
}

impl Default for JobWatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            job_ids: Vec::new(),
            exclude_new: false,
            exclude_completed: false,
            buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Kind of job change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobEventKind {
    /// A job appeared after the baseline poll.
    New,
    /// A job's primary state changed.
    StateChanged,
    /// A job reached a terminal state or left the queue.
    Completed,
}

/// A job change observed between two polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEvent {
    /// Kind of change.
    pub kind: JobEventKind,
    /// Job id.
    pub job_id: u32,
    /// State before the change.
    pub previous_state: Option<JobState>,
    /// State after the change; `None` when the job vanished.
    pub state: Option<JobState>,
    /// Latest job record, when still listed.
    pub job: Option<Job>,
    /// When the change was observed.
    pub observed_at: DateTime<Utc>,
}

/// Options for watching nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWatchOptions {
    /// Time between polls.
    pub poll_interval: Duration,
    /// Only report these nodes; empty reports all.
    pub node_names: Vec<String>,
    /// Suppress [`NodeEventKind::New`].
    pub exclude_new: bool,
    /// Event channel capacity.
    pub buffer: usize,
}

impl Default for NodeWatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            node_names: Vec::new(),
            exclude_new: false,
            buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Kind of node change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeEventKind {
    /// A node appeared after the baseline poll.
    New,
    /// A node's state set changed.
    StateChanged,
    /// A node is no longer listed.
    Removed,
}

/// A node change observed between two polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEvent {
    /// Kind of change.
    pub kind: NodeEventKind,
    /// Node name.
    pub name: String,
    /// States before the change.
    pub previous_state: Vec<NodeState>,
    /// States after the change; empty when removed.
    pub state: Vec<NodeState>,
    /// Latest node record, when still listed.
    pub node: Option<Node>,
    /// When the change was observed.
    pub observed_at: DateTime<Utc>,
}
