//! Polling watchers for jobs and nodes.
//!
//! A watch lists the resource on a fixed interval and diffs consecutive
//! snapshots. Change detection lives in the [`Tracker`] implementations,
//! which are pure and tested without a runtime; [`spawn_watch`] owns the
//! loop, its cancellation and its channel.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use slurm_types::{
    Job, JobEvent, JobEventKind, JobState, JobWatchOptions, Node, NodeEvent, NodeEventKind,
    NodeState, NodeWatchOptions,
};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::{SlurmError, SlurmResult};

/// Turns successive snapshots into change events.
pub trait Tracker: Send + 'static {
    /// Listed item.
    type Item: Send + 'static;
    /// Emitted change.
    type Event: Send + 'static;

    /// Record a snapshot taken at `at` and return what changed since the
    /// previous one. The first snapshot is a baseline and yields nothing.
    fn observe(&mut self, items: Vec<Self::Item>, at: DateTime<Utc>) -> Vec<Self::Event>;
}

/// Job change detection.
#[derive(Debug, Clone, Default)]
pub struct JobTracker {
    job_ids: BTreeSet<u32>,
    exclude_new: bool,
    exclude_completed: bool,
    known: Option<BTreeMap<u32, JobState>>,
}

impl JobTracker {
    /// A tracker honouring the filters of `options`.
    #[must_use]
    pub fn new(options: &JobWatchOptions) -> Self {
        Self {
            job_ids: options.job_ids.iter().copied().collect(),
            exclude_new: options.exclude_new,
            exclude_completed: options.exclude_completed,
            known: None,
        }
    }

    fn wanted(&self, job_id: u32) -> bool {
        self.job_ids.is_empty() || self.job_ids.contains(&job_id)
    }
}

impl Tracker for JobTracker {
    type Item = Job;
    type Event = JobEvent;

    fn observe(&mut self, jobs: Vec<Job>, at: DateTime<Utc>) -> Vec<JobEvent> {
        let current: BTreeMap<u32, Job> = jobs
            .into_iter()
            .filter(|job| self.wanted(job.job_id))
            .map(|job| (job.job_id, job))
            .collect();
        let states = current
            .iter()
            .map(|(id, job)| (*id, job.state.clone()))
            .collect();

        let Some(previous) = self.known.replace(states) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for (job_id, job) in current.iter() {
            let (kind, previous_state) = match previous.get(job_id) {
                None => (JobEventKind::New, None),
                Some(old) if *old == job.state => continue,
                Some(old) if job.state.is_terminal() => (JobEventKind::Completed, Some(old.clone())),
                Some(old) => (JobEventKind::StateChanged, Some(old.clone())),
            };
            events.push(JobEvent {
                kind,
                job_id: *job_id,
                previous_state,
                state: Some(job.state.clone()),
                job: Some(job.clone()),
                observed_at: at,
            });
        }

        // A job that left the queue finished, unless it was already reported
        // as terminal.
        for (job_id, old) in previous {
            if current.contains_key(&job_id) || old.is_terminal() {
                continue;
            }
            events.push(JobEvent {
                kind: JobEventKind::Completed,
                job_id,
                previous_state: Some(old),
                state: None,
                job: None,
                observed_at: at,
            });
        }

        events.retain(|event| match event.kind {
            JobEventKind::New => !self.exclude_new,
            JobEventKind::Completed => !self.exclude_completed,
            JobEventKind::StateChanged => true,
        });
        events
    }
}

/// Node change detection.
#[derive(Debug, Clone, Default)]
pub struct NodeTracker {
    names: BTreeSet<String>,
    exclude_new: bool,
    known: Option<BTreeMap<String, Vec<NodeState>>>,
}

impl NodeTracker {
    /// A tracker honouring the filters of `options`.
    #[must_use]
    pub fn new(options: &NodeWatchOptions) -> Self {
        Self {
            names: options.node_names.iter().cloned().collect(),
            exclude_new: options.exclude_new,
            known: None,
        }
    }
}

impl Tracker for NodeTracker {
    type Item = Node;
    type Event = NodeEvent;

    fn observe(&mut self, nodes: Vec<Node>, at: DateTime<Utc>) -> Vec<NodeEvent> {
        let current: BTreeMap<String, Node> = nodes
            .into_iter()
            .filter(|node| self.names.is_empty() || self.names.contains(&node.name))
            .map(|node| (node.name.clone(), node))
            .collect();
        let states = current
            .iter()
            .map(|(name, node)| (name.clone(), node.state.clone()))
            .collect();

        let Some(previous) = self.known.replace(states) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for (name, node) in &current {
            let (kind, previous_state) = match previous.get(name) {
                None if self.exclude_new => continue,
                None => (NodeEventKind::New, Vec::new()),
                Some(old) if *old == node.state => continue,
                Some(old) => (NodeEventKind::StateChanged, old.clone()),
            };
            events.push(NodeEvent {
                kind,
                name: name.clone(),
                previous_state,
                state: node.state.clone(),
                node: Some(node.clone()),
                observed_at: at,
            });
        }
        for (name, old) in previous {
            if current.contains_key(&name) {
                continue;
            }
            events.push(NodeEvent {
                kind: NodeEventKind::Removed,
                name,
                previous_state: old,
                state: Vec::new(),
                node: None,
                observed_at: at,
            });
        }
        events
    }
}

/// Reject options the poll loop cannot run with.
pub fn validate_interval(poll_interval: Duration) -> SlurmResult<()> {
    if poll_interval.is_zero() {
        return Err(SlurmError::validation("poll interval must be positive"));
    }
    Ok(())
}

/// Run `poll` every `poll_interval` on a child of `ctx`, feeding results
/// through `tracker`.
///
/// The loop ends when `ctx` is cancelled or expires, or when the receiver
/// is dropped; the sender is dropped with it so the channel closes. Poll
/// failures other than cancellation are logged and the next tick retries.
/// Must be called from within a tokio runtime.
pub fn spawn_watch<T, F, Fut>(
    ctx: &RequestContext,
    resource: &'static str,
    poll_interval: Duration,
    buffer: usize,
    mut tracker: T,
    mut poll: F,
) -> mpsc::Receiver<T::Event>
where
    T: Tracker,
    F: FnMut(RequestContext) -> Fut + Send + 'static,
    Fut: Future<Output = SlurmResult<Vec<T::Item>>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let ctx = ctx.child();

    tokio::spawn(async move {
        debug!(
            resource,
            request_id = %ctx.request_id(),
            interval_ms = poll_interval.as_millis() as u64,
            "Watch started"
        );
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        'watch: loop {
            tokio::select! {
                biased;
                reason = ctx.done() => {
                    debug!(resource, reason = %reason, "Watch stopped");
                    break;
                }
                () = tx.closed() => {
                    debug!(resource, "Watch receiver dropped");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let items = match poll(ctx.clone()).await {
                Ok(items) => items,
                Err(err) if err.is_cancellation() => continue,
                Err(err) => {
                    warn!(resource, error = %err, "Watch poll failed");
                    continue;
                }
            };

            for event in tracker.observe(items, Utc::now()) {
                tokio::select! {
                    biased;
                    _ = ctx.done() => break 'watch,
                    sent = tx.send(event) => {
                        if sent.is_err() {
                            break 'watch;
                        }
                    }
                }
            }
        }
    });

    rx
}
