//! Field mappers between wire records and the common model.
//!
//! Accounting records and cluster reports never changed across the
//! supported versions and are mapped by free functions in [`accounting`]
//! and [`report`]. Controller records did change; each version describes
//! its own shapes through a [`Dialect`], built on the shared helpers in
//! [`controller`].
//!
//! Mappers never fail on absent optional fields. A missing required field
//! is `MALFORMED_RESPONSE`.

pub mod accounting;
pub mod controller;
pub mod report;
pub mod tres;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use slurm_types::{
    Job, JobAllocation, JobSubmission, JobSubmitResponse, JobUpdate, Node, Partition,
    ReservationCreate,
};

use crate::capability::Operation;
use crate::error::{SlurmError, SlurmResult};
use crate::version::ApiVersion;

/// How one API version spells controller records.
///
/// Implemented by the marker types in [`crate::versions`]. Managers are
/// generic over a dialect, so each version gets its own monomorphised
/// managers without a class hierarchy.
pub trait Dialect: Send + Sync + 'static {
    /// Version this dialect speaks.
    const VERSION: ApiVersion;

    /// Job record.
    type Job: DeserializeOwned + Send;
    /// Node record.
    type Node: DeserializeOwned + Send;
    /// Partition record.
    type Partition: DeserializeOwned + Send;
    /// Submit response payload.
    type Submitted: DeserializeOwned + Send;

    /// Job to the common model.
    fn job(wire: Self::Job) -> SlurmResult<Job>;

    /// Node to the common model.
    fn node(wire: Self::Node) -> SlurmResult<Node>;

    /// Partition to the common model.
    fn partition(wire: Self::Partition) -> SlurmResult<Partition>;

    /// Body of `POST job/submit`.
    fn submit_body(submission: &JobSubmission) -> SlurmResult<Value>;

    /// Submit response to the common model. Warnings are added by the caller.
    fn submitted(wire: Self::Submitted) -> SlurmResult<JobSubmitResponse>;

    /// Body of `POST job/{id}` for a field update.
    fn update_body(update: &JobUpdate) -> SlurmResult<Value> {
        let _ = update;
        Err(SlurmError::not_implemented(
            Operation::JobUpdate.as_str(),
            Self::VERSION,
        ))
    }

    /// Body of `POST job/{id}` that holds or releases a job.
    fn hold_body(hold: bool) -> SlurmResult<Value> {
        let operation = if hold {
            Operation::JobHold
        } else {
            Operation::JobRelease
        };
        Err(SlurmError::not_implemented(operation.as_str(), Self::VERSION))
    }

    /// Body of `POST job/allocate`.
    fn allocate_body(allocation: &JobAllocation) -> SlurmResult<Value> {
        let _ = allocation;
        Err(SlurmError::not_implemented(
            Operation::JobAllocate.as_str(),
            Self::VERSION,
        ))
    }

    /// Body of `POST reservation` and `POST reservation/{name}`.
    fn reservation_body(request: &ReservationCreate) -> SlurmResult<Value> {
        let _ = request;
        Err(SlurmError::not_implemented(
            Operation::ReservationCreate.as_str(),
            Self::VERSION,
        ))
    }
}

/// Serialize a request body.
pub fn body<T: Serialize>(value: &T) -> SlurmResult<Value> {
    serde_json::to_value(value).map_err(|err| {
        SlurmError::validation("request body could not be encoded").with_source(err)
    })
}

/// A field the wire schema marks required.
pub fn required<T>(value: Option<T>, entity: &str, field: &str) -> SlurmResult<T> {
    value.ok_or_else(|| SlurmError::missing_field(entity, field))
}

/// Treat blank strings as absent.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
