//! v0.0.41 (Slurm 24.11).
//!
//! Job records arrive flat, with every number either wrapped or bare
//! depending on the server build. Switch constraints are renamed to
//! `required_switches`. Partitions and submit responses keep the v0.0.40
//! shape.

use serde_json::Value;
use slurm_types::{
    Job, JobSubmission, JobSubmitResponse, JobUpdate, Node, Partition, TresMap,
    parse_tres_string,
};
use slurm_wire::noval::{unwrap, unwrap_list, unwrap_timestamp};
use slurm_wire::schema::v0_0_41 as schema;

use super::V0040;
use crate::error::SlurmResult;
use crate::mapper::controller;
use crate::mapper::{Dialect, body, non_empty, required};
use crate::version::ApiVersion;

/// The v0.0.41 dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V0041;

impl Dialect for V0041 {
    const VERSION: ApiVersion = ApiVersion::V0041;

    type Job = schema::JobInfo;
    type Node = schema::NodeInfo;
    type Partition = schema::PartitionInfo;
    type Submitted = schema::JobSubmitResponse;

    fn job(wire: schema::JobInfo) -> SlurmResult<Job> {
        Ok(Job {
            job_id: required(unwrap(&wire.job_id), "job", "job_id")?,
            name: wire.name.unwrap_or_default(),
            user_id: unwrap(&wire.user_id),
            user_name: non_empty(wire.user_name),
            group_id: unwrap(&wire.group_id),
            account: non_empty(wire.account),
            partition: non_empty(wire.partition),
            qos: non_empty(wire.qos),
            state: controller::job_state(wire.job_state.as_ref()),
            state_reason: non_empty(wire.state_reason).filter(|r| r != "None"),
            time_limit: unwrap(&wire.time_limit),
            submit_time: unwrap_timestamp(&wire.submit_time),
            start_time: unwrap_timestamp(&wire.start_time),
            end_time: unwrap_timestamp(&wire.end_time),
            priority: unwrap(&wire.priority),
            cpus: unwrap(&wire.cpus),
            node_count: unwrap(&wire.node_count),
            node_list: non_empty(wire.nodes),
            working_directory: non_empty(wire.current_working_directory),
            command: non_empty(wire.command),
            standard_output: non_empty(wire.standard_output),
            standard_error: non_empty(wire.standard_error),
            array_job_id: unwrap(&wire.array_job_id).filter(|id| *id != 0),
            array_task_id: unwrap(&wire.array_task_id),
            features: unwrap_list(wire.features.as_ref()).unwrap_or_default(),
            tres_requested: tres(wire.tres_req_str.as_deref()),
            tres_allocated: tres(wire.tres_alloc_str.as_deref()),
            exclusive: controller::exclusive(wire.exclusive.as_ref()),
            required_switches: unwrap(&wire.required_switches),
            exit_code: wire.exit_code.and_then(|code| unwrap(&code.return_code)),
            comment: non_empty(wire.comment),
        })
    }

    fn node(wire: schema::NodeInfo) -> SlurmResult<Node> {
        controller::node(wire.base, unwrap(&wire.cpu_load))
    }

    fn partition(wire: schema::PartitionInfo) -> SlurmResult<Partition> {
        V0040::partition(wire)
    }

    fn submit_body(submission: &JobSubmission) -> SlurmResult<Value> {
        body(&schema::JobSubmitRequest {
            script: submission.script.clone(),
            job: schema::JobDescription {
                base: controller::job_description(submission),
                required_switches: submission.required_switches,
                exclusive: submission.exclusive.map(controller::exclusive_flags),
            },
        })
    }

    fn submitted(wire: schema::JobSubmitResponse) -> SlurmResult<JobSubmitResponse> {
        V0040::submitted(wire)
    }

    fn update_body(update: &JobUpdate) -> SlurmResult<Value> {
        body(&schema::JobDescription {
            base: controller::job_update_description(update),
            ..schema::JobDescription::default()
        })
    }
}

fn tres(raw: Option<&str>) -> TresMap {
    raw.map(parse_tres_string).unwrap_or_default()
}
