//! Polling watches against a fake `slurmrestd` whose answers change
//! between polls.

mod common;

use std::time::Duration;

use common::{FakeSlurmrestd, TEST_TIMEOUT};
use serde_json::json;
use slurm_adapter::{ErrorKind, RequestContext, VersionAdapter};
use slurm_types::{
    JobEventKind, JobState, JobWatchOptions, NodeEventKind, NodeState, NodeWatchOptions,
};
use tokio::time::{sleep, timeout};

const POLL: Duration = Duration::from_millis(20);

fn job(id: u32, state: &str) -> serde_json::Value {
    json!({"job_id": id, "name": "train", "job_state": [state]})
}

#[tokio::test]
async fn job_watch_reports_transitions_then_closes() {
    let server = FakeSlurmrestd::start().await;
    let path = "/slurm/v0.0.43/jobs";
    server.get(path, json!({"jobs": [job(1, "PENDING")]}));
    let adapter = server.adapter("v0.0.43");
    let ctx = RequestContext::new();

    let options = JobWatchOptions {
        poll_interval: POLL,
        ..JobWatchOptions::default()
    };
    let mut events = adapter.jobs().watch(&ctx, options).await.unwrap();

    // Let the baseline settle before changing anything.
    sleep(POLL * 5).await;
    server.get(path, json!({"jobs": [job(1, "RUNNING")]}));

    let event = timeout(TEST_TIMEOUT, events.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, JobEventKind::StateChanged);
    assert_eq!(event.job_id, 1);
    assert_eq!(event.previous_state, Some(JobState::Pending));
    assert_eq!(event.state, Some(JobState::Running));

    server.get(path, json!({"jobs": [job(1, "RUNNING"), job(2, "PENDING")]}));
    let event = timeout(TEST_TIMEOUT, events.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, JobEventKind::New);
    assert_eq!(event.job_id, 2);

    server.get(path, json!({"jobs": [job(2, "PENDING")]}));
    let event = timeout(TEST_TIMEOUT, events.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, JobEventKind::Completed);
    assert_eq!(event.job_id, 1);
    assert_eq!(event.state, None);

    ctx.cancel();
    let closed = timeout(TEST_TIMEOUT, async {
        while events.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok());
}

#[tokio::test]
async fn job_watch_survives_server_errors() {
    let server = FakeSlurmrestd::start().await;
    let path = "/slurm/v0.0.44/jobs";
    server.get(path, json!({"jobs": [job(5, "RUNNING")]}));
    let adapter = server.adapter("v0.0.44");
    let ctx = RequestContext::new();

    let options = JobWatchOptions {
        poll_interval: POLL,
        job_ids: vec![5],
        ..JobWatchOptions::default()
    };
    let mut events = adapter.jobs().watch(&ctx, options).await.unwrap();
    sleep(POLL * 5).await;

    server.route(axum::http::Method::GET, path, 500, json!({}));
    sleep(POLL * 5).await;
    server.get(path, json!({"jobs": [job(5, "COMPLETED")]}));

    let event = timeout(TEST_TIMEOUT, events.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, JobEventKind::Completed);
    assert_eq!(event.state, Some(JobState::Completed));
    ctx.cancel();
}

#[tokio::test]
async fn node_watch_reports_drain_and_removal() {
    let server = FakeSlurmrestd::start().await;
    let path = "/slurm/v0.0.44/nodes";
    server.get(
        path,
        json!({"nodes": [{"name": "n1", "state": ["IDLE"]}, {"name": "n2", "state": ["IDLE"]}]}),
    );
    let adapter = server.adapter("v0.0.44");
    let ctx = RequestContext::new();

    let options = NodeWatchOptions {
        poll_interval: POLL,
        ..NodeWatchOptions::default()
    };
    let mut events = adapter.nodes().watch(&ctx, options).await.unwrap();
    sleep(POLL * 5).await;

    server.get(
        path,
        json!({"nodes": [{"name": "n1", "state": ["IDLE", "DRAIN"]}, {"name": "n2", "state": ["IDLE"]}]}),
    );
    let event = timeout(TEST_TIMEOUT, events.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, NodeEventKind::StateChanged);
    assert_eq!(event.name, "n1");
    assert_eq!(event.previous_state, vec![NodeState::Idle]);
    assert_eq!(event.state, vec![NodeState::Idle, NodeState::Drain]);

    server.get(path, json!({"nodes": [{"name": "n1", "state": ["IDLE", "DRAIN"]}]}));
    let event = timeout(TEST_TIMEOUT, events.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, NodeEventKind::Removed);
    assert_eq!(event.name, "n2");
    assert!(event.node.is_none());
    ctx.cancel();
}

#[tokio::test]
async fn watch_unavailable_before_v0043() {
    let server = FakeSlurmrestd::start().await;
    let ctx = RequestContext::new();

    for version in ["v0.0.40", "v0.0.41", "v0.0.42"] {
        let adapter = server.adapter(version);
        let err = adapter
            .jobs()
            .watch(&ctx, JobWatchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented, "{version}");
        let err = adapter
            .nodes()
            .watch(&ctx, NodeWatchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented, "{version}");
    }
    assert!(server.requests().is_empty());
}
