//! v0.0.40 (Slurm 24.05).
//!
//! The oldest supported dialect. Jobs report `minimum_switches` and an
//! `exclusive` flag list, the submit body carries the script beside the
//! description, and node load is a wrapped number. Job updates and hold are
//! not available.

use serde_json::Value;
use slurm_types::{Job, JobSubmission, JobSubmitResponse, Node, Partition};
use slurm_wire::noval::unwrap;
use slurm_wire::schema::v0_0_40 as schema;

use crate::error::SlurmResult;
use crate::mapper::controller::{self, PartitionLimits};
use crate::mapper::{Dialect, body};
use crate::version::ApiVersion;

/// The v0.0.40 dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V0040;

impl Dialect for V0040 {
    const VERSION: ApiVersion = ApiVersion::V0040;

    type Job = schema::JobInfo;
    type Node = schema::NodeInfo;
    type Partition = schema::PartitionInfo;
    type Submitted = schema::JobSubmitResponse;

    fn job(wire: schema::JobInfo) -> SlurmResult<Job> {
        let mut job = controller::job(wire.base)?;
        job.exclusive = controller::exclusive(wire.exclusive.as_ref());
        job.required_switches = wire.minimum_switches;
        Ok(job)
    }

    fn node(wire: schema::NodeInfo) -> SlurmResult<Node> {
        controller::node(wire.base, unwrap(&wire.cpu_load))
    }

    fn partition(wire: schema::PartitionInfo) -> SlurmResult<Partition> {
        let maximums = wire.maximums.unwrap_or_default();
        let limits = PartitionLimits {
            max_time: unwrap(&maximums.time),
            max_nodes: unwrap(&maximums.nodes),
            max_oversubscribe: maximums.oversubscribe.and_then(|o| o.jobs),
        };
        controller::partition(wire.base, limits)
    }

    fn submit_body(submission: &JobSubmission) -> SlurmResult<Value> {
        body(&schema::JobSubmitRequest {
            script: submission.script.clone(),
            job: schema::JobDescription {
                base: controller::job_description(submission),
                minimum_switches: submission.required_switches,
                exclusive: submission.exclusive.map(controller::exclusive_flags),
            },
        })
    }

    fn submitted(wire: schema::JobSubmitResponse) -> SlurmResult<JobSubmitResponse> {
        controller::submitted(wire.job_id, wire.step_id, wire.job_submit_user_msg)
    }
}
