//! Dispatch through a [`WireClient`] and classify the outcome.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use slurm_wire::{ResponseEnvelope, WireClient, WireRequest, path};
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::{SlurmError, SlurmResult};
use crate::version::ApiVersion;

/// A version-bound handle on the wire client shared by every manager of one
/// adapter.
#[derive(Clone)]
pub struct Requester {
    client: Arc<dyn WireClient>,
    version: ApiVersion,
}

impl fmt::Debug for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requester")
            .field("client", &self.client)
            .field("version", &self.version)
            .finish()
    }
}

impl Requester {
    /// Bind `client` to `version`.
    #[must_use]
    pub fn new(client: Arc<dyn WireClient>, version: ApiVersion) -> Self {
        Self { client, version }
    }

    /// Version every request is built for.
    #[must_use]
    pub const fn version(&self) -> ApiVersion {
        self.version
    }

    /// `/slurm/{version}/...`
    #[must_use]
    pub fn slurm(&self, segments: &[&str]) -> String {
        path::slurm(self.version.as_str(), segments)
    }

    /// `/slurmdb/{version}/...`
    #[must_use]
    pub fn slurmdb(&self, segments: &[&str]) -> String {
        path::slurmdb(self.version.as_str(), segments)
    }

    /// Send `request` and return the decoded envelope of a successful
    /// response.
    ///
    /// Non-2xx statuses map through [`SlurmError::from_status`]; a 2xx
    /// response whose envelope carries errors is also a failure.
    pub async fn send(
        &self,
        ctx: &RequestContext,
        request: WireRequest,
    ) -> SlurmResult<ResponseEnvelope> {
        ctx.check()?;
        let request = request.with_request_id(ctx.request_id().to_string());
        let method = request.method;
        let path = request.path.clone();

        debug!(
            version = %self.version,
            %method,
            path = %path,
            request_id = %ctx.request_id(),
            "Dispatching request"
        );

        let response = ctx
            .run(self.client.execute(request))
            .await?
            .map_err(|err| SlurmError::from_wire(err, self.version))?;

        let envelope = ResponseEnvelope::parse(&response.body);

        if !response.is_success() {
            warn!(
                version = %self.version,
                status = response.status,
                %method,
                path = %path,
                "Request failed"
            );
            let mut err = SlurmError::from_status(response.status, self.version);
            if let Some(message) = envelope.as_ref().ok().and_then(|e| e.first_error()) {
                err = err.with_details(message.text());
            }
            return Err(err);
        }

        let envelope = envelope.map_err(|err| {
            SlurmError::malformed(format!("undecodable response from {path}"))
                .with_status(response.status)
                .with_version(self.version)
                .with_source(err)
        })?;

        if let Some(message) = envelope.first_error() {
            return Err(SlurmError::from_api_message(
                message,
                response.status,
                self.version,
            ));
        }

        Ok(envelope)
    }

    /// Like [`send`](Self::send) for calls whose response body is ignored.
    pub async fn execute(&self, ctx: &RequestContext, request: WireRequest) -> SlurmResult<()> {
        self.send(ctx, request).await.map(|_| ())
    }

    /// Decode every item under `key`, mapping each with `map`.
    ///
    /// Items that fail to decode or map are logged and skipped.
    pub fn items<W, T>(
        &self,
        envelope: &mut ResponseEnvelope,
        key: &str,
        map: impl Fn(W) -> SlurmResult<T>,
    ) -> Vec<T>
    where
        W: DeserializeOwned,
    {
        envelope
            .take_items::<W>(key)
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let mapped = item
                    .map_err(|err| SlurmError::malformed(err.to_string()))
                    .and_then(&map);
                match mapped {
                    Ok(value) => Some(value),
                    Err(err) => {
                        warn!(
                            version = %self.version,
                            key,
                            index,
                            error = %err,
                            "Skipping undecodable item"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Decode the first item under `key`.
    ///
    /// An absent or empty collection is `NotFound` naming `what`.
    pub fn one<W, T>(
        &self,
        envelope: &mut ResponseEnvelope,
        key: &str,
        what: &str,
        map: impl Fn(W) -> SlurmResult<T>,
    ) -> SlurmResult<T>
    where
        W: DeserializeOwned,
    {
        let first = envelope.take_items::<W>(key).into_iter().next();
        let result = match first {
            None => Err(SlurmError::not_found(format!("{what} not found"))),
            Some(Err(err)) => {
                Err(SlurmError::malformed(format!("undecodable {what}")).with_source(err))
            }
            Some(Ok(wire)) => map(wire),
        };
        result.map_err(|err| err.with_version(self.version))
    }

    /// Decode a single object under `key`; absent means the default.
    pub fn object<W>(&self, envelope: &mut ResponseEnvelope, key: &str) -> SlurmResult<W>
    where
        W: DeserializeOwned + Default,
    {
        match envelope.take_object::<W>(key) {
            None => Ok(W::default()),
            Some(result) => result.map_err(|err| {
                SlurmError::malformed(format!("undecodable {key}"))
                    .with_version(self.version)
                    .with_source(err)
            }),
        }
    }
}
