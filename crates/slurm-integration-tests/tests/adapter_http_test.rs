//! End-to-end tests through the HTTP client against a fake `slurmrestd`.
//!
//! Each test starts its own server on a loopback port, connects an adapter
//! with `connect_with_own_pool` and checks both the normalized results and
//! the requests that reached the server.

mod common;

use std::sync::Arc;

use axum::http::Method;
use common::FakeSlurmrestd;
use serde_json::json;
use slurm_adapter::{ClientConfig, ErrorKind, RequestContext, VersionAdapter, connect};
use slurm_pool::{HttpClientPool, PoolConfig};
use slurm_types::{JobState, JobSubmission, NodeState};

// ============================================================================
// Normalization across versions
// ============================================================================

#[tokio::test]
async fn jobs_read_the_same_from_every_shape() {
    let server = FakeSlurmrestd::start().await;
    let listed = json!({"jobs": [{
        "job_id": 7,
        "name": "train",
        "user_name": "alice",
        "job_state": ["RUNNING"],
        "time_limit": {"set": true, "infinite": false, "number": 60},
        "tres_req_str": "cpu=4,mem=8G"
    }]});
    server.get("/slurm/v0.0.40/jobs", listed.clone());
    server.get("/slurm/v0.0.42/jobs", listed);
    server.get(
        "/slurm/v0.0.41/jobs",
        json!({"jobs": [{
            "job_id": {"set": true, "number": 7},
            "name": "train",
            "user_name": "alice",
            "job_state": "RUNNING",
            "time_limit": 60,
            "tres_req_str": "cpu=4,mem=8G"
        }]}),
    );
    let ctx = RequestContext::new();

    let mut seen = Vec::new();
    for version in ["v0.0.40", "v0.0.41", "v0.0.42"] {
        let adapter = server.adapter(version);
        let page = adapter.jobs().list(&ctx, None).await.unwrap();
        assert_eq!(page.total, 1, "{version}");
        seen.push(page.items[0].clone());
    }

    for job in &seen {
        assert_eq!(job.job_id, 7);
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.time_limit, Some(60));
        assert_eq!(job.user_name.as_deref(), Some("alice"));
        assert_eq!(job.tres_requested.get("mem"), Some(&8192));
    }
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1], seen[2]);
}

#[tokio::test]
async fn node_cpu_load_is_a_fraction_in_every_version() {
    let server = FakeSlurmrestd::start().await;
    server.get(
        "/slurm/v0.0.40/nodes",
        json!({"nodes": [{"name": "n1", "state": ["IDLE"], "cpu_load": {"set": true, "number": 125}}]}),
    );
    server.get(
        "/slurm/v0.0.43/nodes",
        json!({"nodes": [{"name": "n1", "state": ["IDLE"], "cpu_load": 125}]}),
    );
    let ctx = RequestContext::new();

    for version in ["v0.0.40", "v0.0.43"] {
        let page = server.adapter(version).nodes().list(&ctx, None).await.unwrap();
        let node = &page.items[0];
        assert_eq!(node.cpu_load, Some(1.25), "{version}");
        assert_eq!(node.state, vec![NodeState::Idle]);
    }
}

// ============================================================================
// Request shapes
// ============================================================================

#[tokio::test]
async fn submit_places_script_per_version() {
    let server = FakeSlurmrestd::start().await;
    server.route(
        Method::POST,
        "/slurm/v0.0.40/job/submit",
        200,
        json!({"job_id": 100}),
    );
    server.route(
        Method::POST,
        "/slurm/v0.0.43/job/submit",
        200,
        json!({"result": {"job_id": 101}}),
    );
    let ctx = RequestContext::new();
    let mut submission = JobSubmission::new("#!/bin/sh\nhostname");
    submission.name = Some("smoke".into());

    let old = server
        .adapter("v0.0.40")
        .jobs()
        .submit(&ctx, &submission)
        .await
        .unwrap();
    assert_eq!(old.job_id, 100);
    let body = server.last_request().unwrap().body.unwrap();
    assert_eq!(body["script"], "#!/bin/sh\nhostname");
    assert_eq!(body["job"]["name"], "smoke");

    let new = server
        .adapter("v0.0.43")
        .jobs()
        .submit(&ctx, &submission)
        .await
        .unwrap();
    assert_eq!(new.job_id, 101);
    let body = server.last_request().unwrap().body.unwrap();
    assert!(body.get("script").is_none());
    assert_eq!(body["job"]["script"], "#!/bin/sh\nhostname");
}

#[tokio::test]
async fn signal_travels_as_query() {
    let server = FakeSlurmrestd::start().await;
    server.route(Method::DELETE, "/slurm/v0.0.42/job/9", 200, json!({}));

    server
        .adapter("v0.0.42")
        .jobs()
        .signal(&RequestContext::new(), 9, "SIGTERM")
        .await
        .unwrap();

    let sent = server.last_request().unwrap();
    assert_eq!(sent.method, Method::DELETE);
    assert_eq!(sent.query.as_deref(), Some("signal=SIGTERM"));
}

#[tokio::test]
async fn configured_headers_reach_the_server() {
    let server = FakeSlurmrestd::start().await;
    server.get("/slurm/v0.0.42/ping", json!({"pings": []}));
    let config = ClientConfig::new(server.endpoint())
        .with_api_version("stable")
        .with_header("X-SLURM-USER-NAME", "alice")
        .with_header("X-SLURM-USER-TOKEN", "secret");

    server
        .adapter_with(config)
        .standalone()
        .ping(&RequestContext::new())
        .await
        .unwrap();

    let sent = server.last_request().unwrap();
    assert_eq!(sent.headers["x-slurm-user-name"], "alice");
    assert_eq!(sent.headers["x-slurm-user-token"], "secret");
}

#[tokio::test]
async fn adapters_share_one_pool() {
    let server = FakeSlurmrestd::start().await;
    server.get("/slurm/v0.0.42/ping", json!({"pings": []}));
    server.get("/slurm/v0.0.43/ping", json!({"pings": []}));
    let pool = Arc::new(HttpClientPool::new(PoolConfig::default()).unwrap());
    let config = ClientConfig::new(server.endpoint());
    let v42 = connect(&config.clone().with_api_version("v0.0.42"), pool.clone()).unwrap();
    let v43 = connect(&config.with_api_version("v0.0.43"), pool.clone()).unwrap();
    let ctx = RequestContext::new();

    v42.standalone().ping(&ctx).await.unwrap();
    v43.standalone().ping(&ctx).await.unwrap();

    assert_eq!(pool.len(), 1);
    let stats = pool.client_stats(&server.endpoint()).unwrap();
    assert_eq!(stats.use_count, 2);
    assert_eq!(stats.active_connections, 0);
}

#[tokio::test]
async fn concurrent_calls_reuse_the_cached_client() {
    let server = FakeSlurmrestd::start().await;
    server.get("/slurm/v0.0.44/licenses", json!({"licenses": []}));
    let pool = Arc::new(HttpClientPool::new(PoolConfig::default()).unwrap());
    let config = ClientConfig::new(server.endpoint()).with_api_version("v0.0.44");
    let adapter = connect(&config, pool.clone()).unwrap();
    let ctx = RequestContext::new();

    let calls = (0..8).map(|_| adapter.standalone().licenses(&ctx));
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.client_stats(&server.endpoint()).unwrap().use_count, 8);
    assert_eq!(server.requests().len(), 8);
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn unknown_path_is_not_found_with_details() {
    let server = FakeSlurmrestd::start().await;

    let err = server
        .adapter("v0.0.44")
        .jobs()
        .get(&RequestContext::new(), 404)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.details(), Some("Unable to find endpoint"));
    assert_eq!(err.version(), Some(slurm_adapter::ApiVersion::V0044));
}

#[tokio::test]
async fn error_envelope_on_success_status_fails() {
    let server = FakeSlurmrestd::start().await;
    server.get(
        "/slurm/v0.0.42/job/5",
        json!({"jobs": [], "errors": [{"error": "Invalid job id specified"}]}),
    );

    let err = server
        .adapter("v0.0.42")
        .jobs()
        .get(&RequestContext::new(), 5)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn server_failures_are_classified() {
    let server = FakeSlurmrestd::start().await;
    server.route(Method::GET, "/slurm/v0.0.43/nodes", 503, json!({}));
    server.route(Method::GET, "/slurm/v0.0.43/partitions", 401, json!({}));
    let adapter = server.adapter("v0.0.43");
    let ctx = RequestContext::new();

    let err = adapter.nodes().list(&ctx, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    assert!(err.kind().is_retryable());

    let err = adapter.partitions().list(&ctx, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(!err.kind().is_retryable());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let server = FakeSlurmrestd::start().await;
    let endpoint = server.endpoint();
    server.shutdown().await;

    let adapter =
        slurm_adapter::connect_with_own_pool(&ClientConfig::new(endpoint).with_api_version("latest"))
            .unwrap();
    let err = adapter
        .standalone()
        .ping(&RequestContext::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkError);
}

// ============================================================================
// Accounting
// ============================================================================

#[tokio::test]
async fn account_update_rewrites_whole_record() {
    let server = FakeSlurmrestd::start().await;
    server.get(
        "/slurmdb/v0.0.42/account/physics",
        json!({"accounts": [{
            "name": "physics",
            "description": "Physics",
            "organization": "science"
        }]}),
    );
    server.route(Method::POST, "/slurmdb/v0.0.42/accounts", 200, json!({}));

    let update = slurm_types::AccountUpdate {
        description: Some("Physics department".into()),
        ..slurm_types::AccountUpdate::default()
    };
    server
        .adapter("v0.0.42")
        .accounts()
        .update(&RequestContext::new(), "physics", &update)
        .await
        .unwrap();

    let written = server.last_request().unwrap().body.unwrap();
    assert_eq!(written["accounts"][0]["name"], "physics");
    assert_eq!(written["accounts"][0]["description"], "Physics department");
    assert_eq!(written["accounts"][0]["organization"], "science");
}
