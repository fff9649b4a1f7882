//! Per-call cancellation, deadline and correlation id.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{SlurmError, SlurmResult};

/// Carried into every adapter operation.
///
/// Cloning shares the cancellation token; [`child`](Self::child) derives a
/// token that is cancelled with its parent but can also be cancelled alone.
#[derive(Debug, Clone)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    request_id: Uuid,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// A context that never expires on its own.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
            request_id: Uuid::new_v4(),
        }
    }

    /// A context driven by an existing token.
    #[must_use]
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::new()
        }
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_in(timeout)
    }

    /// Set the deadline `timeout` from now, keeping an earlier one.
    #[must_use]
    pub fn deadline_in(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(self.deadline.map_or(candidate, |d| d.min(candidate)));
        self
    }

    /// A context cancelled with this one, sharing its deadline and id.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
            request_id: self.request_id,
        }
    }

    /// Cancel this context and its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The cancellation token.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Correlation id.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail fast if the context is already cancelled or expired.
    pub fn check(&self) -> SlurmResult<()> {
        if self.token.is_cancelled() {
            return Err(SlurmError::cancelled());
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SlurmError::deadline_exceeded());
        }
        Ok(())
    }

    /// Resolves when the context is cancelled or its deadline passes.
    pub async fn done(&self) -> SlurmError {
        tokio::select! {
            biased;
            () = self.token.cancelled() => SlurmError::cancelled(),
            () = wait_for(self.deadline) => SlurmError::deadline_exceeded(),
        }
    }

    /// Run `future` unless the context ends first.
    pub async fn run<F: Future>(&self, future: F) -> SlurmResult<F::Output> {
        self.check()?;
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            output = future => Ok(output),
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
