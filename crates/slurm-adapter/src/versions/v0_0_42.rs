//! v0.0.42 (Slurm 25.05).
//!
//! The script moves inside the job description, `exclusive` and partition
//! oversubscription are gone, and jobs can be held and released through
//! the description's `hold` flag. Submit responses nest their ids under
//! `result`.

use serde_json::Value;
use slurm_types::{
    Job, JobAllocation, JobSubmission, JobSubmitResponse, JobUpdate, Node, Partition,
};
use slurm_wire::noval::unwrap;
use slurm_wire::schema::v0_0_42 as schema;

use crate::error::{SlurmError, SlurmResult};
use crate::mapper::controller::{self, PartitionLimits};
use crate::mapper::{Dialect, body};
use crate::version::ApiVersion;

/// The v0.0.42 dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V0042;

impl Dialect for V0042 {
    const VERSION: ApiVersion = ApiVersion::V0042;

    type Job = schema::JobInfo;
    type Node = schema::NodeInfo;
    type Partition = schema::PartitionInfo;
    type Submitted = schema::JobSubmitResponse;

    fn job(wire: schema::JobInfo) -> SlurmResult<Job> {
        let mut job = controller::job(wire.base)?;
        job.required_switches = wire.required_switches;
        Ok(job)
    }

    fn node(wire: schema::NodeInfo) -> SlurmResult<Node> {
        controller::node(wire.base, wire.cpu_load)
    }

    fn partition(wire: schema::PartitionInfo) -> SlurmResult<Partition> {
        let maximums = wire.maximums.unwrap_or_default();
        let limits = PartitionLimits {
            max_time: unwrap(&maximums.time),
            max_nodes: unwrap(&maximums.nodes),
            max_oversubscribe: None,
        };
        controller::partition(wire.base, limits)
    }

    fn submit_body(submission: &JobSubmission) -> SlurmResult<Value> {
        ensure_no_exclusive(submission, Self::VERSION)?;
        body(&schema::JobSubmitRequest {
            job: schema::JobDescription {
                base: controller::job_description(submission),
                script: Some(submission.script.clone()),
                required_switches: submission.required_switches,
                hold: None,
            },
        })
    }

    fn submitted(wire: schema::JobSubmitResponse) -> SlurmResult<JobSubmitResponse> {
        let result = wire.into_result();
        controller::submitted(result.job_id, result.step_id, result.job_submit_user_msg)
    }

    fn update_body(update: &JobUpdate) -> SlurmResult<Value> {
        body(&schema::JobDescription {
            base: controller::job_update_description(update),
            ..schema::JobDescription::default()
        })
    }

    fn hold_body(hold: bool) -> SlurmResult<Value> {
        body(&schema::JobDescription {
            hold: Some(hold),
            ..schema::JobDescription::default()
        })
    }

    fn allocate_body(allocation: &JobAllocation) -> SlurmResult<Value> {
        body(&schema::JobAllocRequest {
            job: schema::JobDescription {
                base: controller::allocation_description(allocation),
                ..schema::JobDescription::default()
            },
        })
    }
}

/// Versions from v0.0.42 on have no exclusivity flag list.
pub(crate) fn ensure_no_exclusive(
    submission: &JobSubmission,
    version: ApiVersion,
) -> SlurmResult<()> {
    if submission.exclusive.is_some() {
        return Err(
            SlurmError::validation(format!("exclusive is not accepted by {version}"))
                .with_version(version),
        );
    }
    Ok(())
}
