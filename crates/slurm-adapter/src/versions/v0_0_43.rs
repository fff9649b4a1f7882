//! v0.0.43 (Slurm 25.05 and 25.11).
//!
//! Controller records are those of v0.0.42. Reservations become writable.

use serde_json::Value;
use slurm_types::{
    Job, JobAllocation, JobSubmission, JobSubmitResponse, JobUpdate, Node, Partition,
    ReservationCreate,
};
use slurm_wire::NoVal;
use slurm_wire::noval::timestamp_to_wire;
use slurm_wire::schema::v0_0_43 as schema;

use super::V0042;
use super::v0_0_42::ensure_no_exclusive;
use crate::error::SlurmResult;
use crate::mapper::{Dialect, body};
use crate::version::ApiVersion;

/// The v0.0.43 dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V0043;

impl Dialect for V0043 {
    const VERSION: ApiVersion = ApiVersion::V0043;

    type Job = schema::JobInfo;
    type Node = schema::NodeInfo;
    type Partition = schema::PartitionInfo;
    type Submitted = schema::JobSubmitResponse;

    fn job(wire: schema::JobInfo) -> SlurmResult<Job> {
        V0042::job(wire)
    }

    fn node(wire: schema::NodeInfo) -> SlurmResult<Node> {
        V0042::node(wire)
    }

    fn partition(wire: schema::PartitionInfo) -> SlurmResult<Partition> {
        V0042::partition(wire)
    }

    fn submit_body(submission: &JobSubmission) -> SlurmResult<Value> {
        ensure_no_exclusive(submission, Self::VERSION)?;
        V0042::submit_body(submission)
    }

    fn submitted(wire: schema::JobSubmitResponse) -> SlurmResult<JobSubmitResponse> {
        V0042::submitted(wire)
    }

    fn update_body(update: &JobUpdate) -> SlurmResult<Value> {
        V0042::update_body(update)
    }

    fn hold_body(hold: bool) -> SlurmResult<Value> {
        V0042::hold_body(hold)
    }

    fn allocate_body(allocation: &JobAllocation) -> SlurmResult<Value> {
        V0042::allocate_body(allocation)
    }

    fn reservation_body(request: &ReservationCreate) -> SlurmResult<Value> {
        body(&reservation_description(request))
    }
}

fn reservation_description(request: &ReservationCreate) -> schema::ReservationDescription {
    schema::ReservationDescription {
        name: request.name.clone(),
        start_time: request.start_time.map(|t| timestamp_to_wire(Some(t))),
        end_time: request.end_time.map(|t| timestamp_to_wire(Some(t))),
        duration: request.duration_minutes.map(NoVal::set),
        node_list: request.node_list.clone(),
        node_count: request.node_count.map(NoVal::set),
        accounts: request.accounts.clone(),
        users: request.users.clone(),
        partition: request.partition.clone(),
        flags: request.flags.clone(),
    }
}
