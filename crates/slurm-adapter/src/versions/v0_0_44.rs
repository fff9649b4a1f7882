//! v0.0.44 (Slurm 25.11). Records are those of v0.0.43.

use serde_json::Value;
use slurm_types::{
    Job, JobAllocation, JobSubmission, JobSubmitResponse, JobUpdate, Node, Partition,
    ReservationCreate,
};
use slurm_wire::schema::v0_0_44 as schema;

use super::V0043;
use super::v0_0_42::ensure_no_exclusive;
use crate::error::SlurmResult;
use crate::mapper::Dialect;
use crate::version::ApiVersion;

/// The v0.0.44 dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V0044;

impl Dialect for V0044 {
    const VERSION: ApiVersion = ApiVersion::V0044;

    type Job = schema::JobInfo;
    type Node = schema::NodeInfo;
    type Partition = schema::PartitionInfo;
    type Submitted = schema::JobSubmitResponse;

    fn job(wire: schema::JobInfo) -> SlurmResult<Job> {
        V0043::job(wire)
    }

    fn node(wire: schema::NodeInfo) -> SlurmResult<Node> {
        V0043::node(wire)
    }

    fn partition(wire: schema::PartitionInfo) -> SlurmResult<Partition> {
        V0043::partition(wire)
    }

    fn submit_body(submission: &JobSubmission) -> SlurmResult<Value> {
        ensure_no_exclusive(submission, Self::VERSION)?;
        V0043::submit_body(submission)
    }

    fn submitted(wire: schema::JobSubmitResponse) -> SlurmResult<JobSubmitResponse> {
        V0043::submitted(wire)
    }

    fn update_body(update: &JobUpdate) -> SlurmResult<Value> {
        V0043::update_body(update)
    }

    fn hold_body(hold: bool) -> SlurmResult<Value> {
        V0043::hold_body(hold)
    }

    fn allocate_body(allocation: &JobAllocation) -> SlurmResult<Value> {
        V0043::allocate_body(allocation)
    }

    fn reservation_body(request: &ReservationCreate) -> SlurmResult<Value> {
        V0043::reservation_body(request)
    }
}
