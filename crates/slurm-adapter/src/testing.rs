//! A scripted [`WireClient`] for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use slurm_wire::{BoxFuture, WireClient, WireError, WireRequest, WireResponse, WireResult};

use crate::capability::Capabilities;
use crate::manager::ManagerBase;
use crate::request::Requester;
use crate::version::ApiVersion;

/// Manager state bound to `client` at `version`.
pub fn base(client: &Arc<ScriptedClient>, version: ApiVersion) -> ManagerBase {
    ManagerBase::new(
        Requester::new(client.clone(), version),
        Arc::new(Capabilities::for_version(version)),
    )
}

#[derive(Debug)]
enum Reply {
    Response(WireResponse),
    Error(String),
}

/// Replays queued replies in order and records every request.
///
/// Once the queue is empty the fallback reply (if any) is repeated;
/// otherwise a 404 is returned.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Option<WireResponse>>,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<WireRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: WireResponse) {
        self.replies.lock().push_back(Reply::Response(response));
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push(WireResponse::json(status, &body));
    }

    pub fn push_ok(&self) {
        self.push_json(200, json!({}));
    }

    pub fn push_error(&self, message: &str) {
        self.replies.lock().push_back(Reply::Error(message.to_string()));
    }

    pub fn set_fallback(&self, status: u16, body: Value) {
        *self.fallback.lock() = Some(WireResponse::json(status, &body));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<WireRequest> {
        self.requests.lock().last().cloned()
    }

    fn next_reply(&self) -> WireResult<WireResponse> {
        match self.replies.lock().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Error(message)) => Err(WireError::Other(message)),
            None => Ok(self.fallback.lock().clone().unwrap_or_else(|| {
                WireResponse::json(404, &json!({"errors": [{"error": "no scripted reply"}]}))
            })),
        }
    }
}

impl WireClient for ScriptedClient {
    fn execute<'a>(&'a self, request: WireRequest) -> BoxFuture<'a, WireResult<WireResponse>> {
        self.requests.lock().push(request);
        let delay = *self.delay.lock();
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.next_reply()
        })
    }
}
