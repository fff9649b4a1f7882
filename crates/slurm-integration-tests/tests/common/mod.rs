//! Shared fixtures: a fake `slurmrestd` over loopback HTTP and an
//! in-process recording client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use parking_lot::Mutex;
use serde_json::{Value, json};
use slurm_adapter::{Adapter, ClientConfig, connect_with_own_pool};
use slurm_wire::{BoxFuture, WireClient, WireRequest, WireResponse, WireResult};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Default test timeout.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Install a test-writer subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct FakeState {
    routes: Mutex<HashMap<(Method, String), (u16, Value)>>,
    requests: Mutex<Vec<Recorded>>,
}

/// A `slurmrestd` stand-in answering canned JSON per method and path.
///
/// Unrouted requests get a 404 with a Slurm-style error envelope.
pub struct FakeSlurmrestd {
    addr: SocketAddr,
    state: Arc<FakeState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeSlurmrestd {
    /// Bind an ephemeral loopback port and start serving.
    pub async fn start() -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(FakeState::default());
        let router: Router = Router::new().fallback(respond).with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Base URL of the server.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer `method path` with `status` and `body` until replaced.
    pub fn route(&self, method: Method, path: &str, status: u16, body: Value) {
        self.state
            .routes
            .lock()
            .insert((method, path.to_string()), (status, body));
    }

    /// Shorthand for a 200 GET route.
    pub fn get(&self, path: &str, body: Value) {
        self.route(Method::GET, path, 200, body);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<Recorded> {
        self.state.requests.lock().last().cloned()
    }

    /// An adapter for `version` connected to this server.
    pub fn adapter(&self, version: &str) -> Adapter {
        self.adapter_with(ClientConfig::new(self.endpoint()).with_api_version(version))
    }

    /// An adapter built from `config`, whose endpoint should be this server.
    pub fn adapter_with(&self, config: ClientConfig) -> Adapter {
        connect_with_own_pool(&config).unwrap()
    }

    /// Stop serving and wait for the server task.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = tokio::time::timeout(TEST_TIMEOUT, handle).await;
        }
    }
}

impl Drop for FakeSlurmrestd {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn respond(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    state.requests.lock().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body: serde_json::from_slice(&body).ok(),
    });

    let routed = state.routes.lock().get(&(method, path)).cloned();
    match routed {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": [{"error": "Unable to find endpoint"}]})),
        ),
    }
}

/// Answers every request with `200 {}` and records it.
#[derive(Debug, Default)]
pub struct RecordingClient {
    requests: Mutex<Vec<WireRequest>>,
}

impl RecordingClient {
    /// A shareable client.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().clone()
    }
}

impl WireClient for RecordingClient {
    fn execute<'a>(&'a self, request: WireRequest) -> BoxFuture<'a, WireResult<WireResponse>> {
        self.requests.lock().push(request);
        Box::pin(std::future::ready(Ok(WireResponse::json(200, &json!({})))))
    }
}
