//! Controller records built from the shared wire bodies.
//!
//! Version dialects call these with the fields their schema flattens in,
//! then fill in what only they report.

use slurm_types::{
    Job, JobAllocateResponse, JobAllocation, JobState, JobSubmission, JobSubmitResponse,
    JobUpdate, Node, NodeState, NodeUpdate, Partition, PartitionState, Reservation,
    parse_tres_string,
};
use slurm_wire::noval::{unwrap, unwrap_csv, unwrap_list, unwrap_timestamp};
use slurm_wire::schema::base::{
    JobBase, JobDescriptionBase, NodeBase, NodeUpdateRequest, PartitionBase,
};
use slurm_wire::schema::shared::ReservationInfo;
use slurm_wire::{CsvList, NoVal};

use super::{non_empty, required};
use crate::error::SlurmResult;

/// Wire `cpu_load` is hundredths of a CPU.
const CPU_LOAD_SCALE: f64 = 100.0;

/// Primary state from a state-flag list. Unknown names are kept verbatim.
pub fn job_state(states: Option<&CsvList>) -> JobState {
    states
        .and_then(CsvList::first)
        .map(|state| JobState::from_wire(&state))
        .unwrap_or_default()
}

/// Every reported node state flag, base state first.
pub fn node_states(states: Option<&CsvList>) -> Vec<NodeState> {
    unwrap_list(states)
        .unwrap_or_default()
        .iter()
        .map(|state| NodeState::from_wire(state))
        .collect()
}

/// Whether an exclusivity flag list requests whole nodes.
pub fn exclusive(flags: Option<&CsvList>) -> Option<bool> {
    let flags = unwrap_list(flags)?;
    Some(flags.iter().any(|flag| {
        !flag.eq_ignore_ascii_case("false") && !flag.eq_ignore_ascii_case("oversubscribe")
    }))
}

/// Exclusivity request for versions that still accept the flag list.
#[must_use]
pub fn exclusive_flags(exclusive: bool) -> Vec<String> {
    vec![if exclusive { "true" } else { "false" }.to_string()]
}

/// Submit outcome. `job_id` is required.
pub fn submitted(
    job_id: Option<u32>,
    step_id: Option<String>,
    user_message: Option<String>,
) -> SlurmResult<JobSubmitResponse> {
    Ok(JobSubmitResponse {
        job_id: required(job_id, "submit response", "job_id")?,
        step_id: non_empty(step_id),
        user_message: non_empty(user_message),
        warnings: Vec::new(),
    })
}

/// Allocate outcome. `job_id` is required.
pub fn allocated(
    job_id: Option<u32>,
    user_message: Option<String>,
) -> SlurmResult<JobAllocateResponse> {
    Ok(JobAllocateResponse {
        job_id: required(job_id, "allocate response", "job_id")?,
        user_message: non_empty(user_message),
        warnings: Vec::new(),
    })
}

/// Job from the shared body. `job_id` is required.
pub fn job(base: JobBase) -> SlurmResult<Job> {
    Ok(Job {
        job_id: required(base.job_id, "job", "job_id")?,
        name: base.name.unwrap_or_default(),
        user_id: base.user_id,
        user_name: non_empty(base.user_name),
        group_id: base.group_id,
        account: non_empty(base.account),
        partition: non_empty(base.partition),
        qos: non_empty(base.qos),
        state: job_state(base.job_state.as_ref()),
        state_reason: non_empty(base.state_reason).filter(|r| r != "None"),
        time_limit: unwrap(&base.time_limit),
        submit_time: unwrap_timestamp(&base.submit_time),
        start_time: unwrap_timestamp(&base.start_time),
        end_time: unwrap_timestamp(&base.end_time),
        priority: unwrap(&base.priority),
        cpus: unwrap(&base.cpus),
        node_count: unwrap(&base.node_count),
        node_list: non_empty(base.nodes),
        working_directory: non_empty(base.current_working_directory),
        command: non_empty(base.command),
        standard_output: non_empty(base.standard_output),
        standard_error: non_empty(base.standard_error),
        array_job_id: unwrap(&base.array_job_id).filter(|id| *id != 0),
        array_task_id: unwrap(&base.array_task_id),
        features: unwrap_csv(base.features.as_deref()).unwrap_or_default(),
        tres_requested: base.tres_req_str.as_deref().map(parse_tres_string).unwrap_or_default(),
        tres_allocated: base.tres_alloc_str.as_deref().map(parse_tres_string).unwrap_or_default(),
        exclusive: None,
        required_switches: None,
        exit_code: base.exit_code.and_then(|code| unwrap(&code.return_code)),
        comment: non_empty(base.comment),
    })
}

/// Description fields every version accepts, from a submission.
#[must_use]
pub fn job_description(submission: &JobSubmission) -> JobDescriptionBase {
    JobDescriptionBase {
        name: submission.name.clone(),
        account: submission.account.clone(),
        partition: submission.partition.clone(),
        qos: submission.qos.clone(),
        current_working_directory: submission.working_directory.clone(),
        environment: submission.environment_entries(),
        time_limit: submission.time_limit.map(NoVal::set),
        minimum_cpus: submission.cpus,
        minimum_nodes: submission.nodes,
        memory_per_node: submission.memory_per_node.map(NoVal::set),
        priority: None,
        standard_output: submission.standard_output.clone(),
        standard_error: submission.standard_error.clone(),
        comment: submission.comment.clone(),
    }
}

/// Description fields of an allocation. No script is sent.
#[must_use]
pub fn allocation_description(allocation: &JobAllocation) -> JobDescriptionBase {
    JobDescriptionBase {
        name: allocation.name.clone(),
        account: Some(allocation.account.clone()),
        partition: allocation.partition.clone(),
        qos: allocation.qos.clone(),
        current_working_directory: allocation.working_directory.clone(),
        environment: allocation.environment_entries(),
        time_limit: allocation.time_limit.map(NoVal::set),
        minimum_cpus: allocation.cpus,
        minimum_nodes: allocation.nodes,
        memory_per_node: allocation.memory_per_node.map(NoVal::set),
        ..JobDescriptionBase::default()
    }
}

/// Description fields carrying a job update.
#[must_use]
pub fn job_update_description(update: &JobUpdate) -> JobDescriptionBase {
    JobDescriptionBase {
        name: update.name.clone(),
        partition: update.partition.clone(),
        qos: update.qos.clone(),
        time_limit: update.time_limit.map(NoVal::set),
        priority: update.priority.map(NoVal::set),
        comment: update.comment.clone(),
        ..JobDescriptionBase::default()
    }
}

/// Node from the shared body plus the version's already unwrapped
/// centi-load. `name` is required.
pub fn node(base: NodeBase, cpu_load: Option<u64>) -> SlurmResult<Node> {
    Ok(Node {
        name: required(base.name, "node", "name")?,
        hostname: non_empty(base.hostname),
        address: non_empty(base.address),
        architecture: non_empty(base.architecture),
        operating_system: non_empty(base.operating_system),
        state: node_states(base.state.as_ref()),
        cpus: base.cpus,
        alloc_cpus: base.alloc_cpus,
        cpu_load: cpu_load.map(|load| load as f64 / CPU_LOAD_SCALE),
        real_memory: base.real_memory,
        free_memory: unwrap(&base.free_mem),
        alloc_memory: base.alloc_memory,
        features: unwrap_list(base.features.as_ref()).unwrap_or_default(),
        active_features: unwrap_list(base.active_features.as_ref()).unwrap_or_default(),
        partitions: unwrap_list(base.partitions.as_ref()).unwrap_or_default(),
        gres: non_empty(base.gres),
        reason: non_empty(base.reason),
        boot_time: unwrap_timestamp(&base.boot_time),
        last_busy: unwrap_timestamp(&base.last_busy),
        weight: base.weight,
        tres: base.tres.as_deref().map(parse_tres_string).unwrap_or_default(),
    })
}

/// Node update body, identical in every version.
#[must_use]
pub fn node_update(update: &NodeUpdate) -> NodeUpdateRequest {
    NodeUpdateRequest {
        state: update
            .state
            .iter()
            .map(|state| state.as_str().to_string())
            .collect(),
        reason: update.reason.clone(),
        features: update.features.clone(),
        weight: update.weight.map(NoVal::set),
        comment: update.comment.clone(),
    }
}

/// Partition maximums as reported by a version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionLimits {
    /// Maximum time in minutes.
    pub max_time: Option<u32>,
    /// Maximum nodes per job.
    pub max_nodes: Option<u32>,
    /// Oversubscription limit, where reported.
    pub max_oversubscribe: Option<u32>,
}

/// Partition from the shared body. `name` is required.
pub fn partition(base: PartitionBase, limits: PartitionLimits) -> SlurmResult<Partition> {
    let nodes = base.nodes.unwrap_or_default();
    Ok(Partition {
        name: required(base.name, "partition", "name")?,
        state: base
            .partition
            .and_then(|p| p.state)
            .and_then(|s| s.first())
            .map(|s| PartitionState::from_wire(&s))
            .unwrap_or_default(),
        nodes: non_empty(nodes.configured),
        total_cpus: base.cpus.and_then(|c| c.total),
        total_nodes: nodes.total,
        max_time: limits.max_time,
        default_time: base.defaults.and_then(|d| unwrap(&d.time)),
        max_nodes: limits.max_nodes,
        min_nodes: base.minimums.and_then(|m| m.nodes),
        priority_tier: base.priority.and_then(|p| p.tier),
        max_oversubscribe: limits.max_oversubscribe,
        allowed_accounts: unwrap_csv(base.accounts.and_then(|a| a.allowed).as_deref())
            .unwrap_or_default(),
        allowed_groups: unwrap_csv(base.groups.and_then(|g| g.allowed).as_deref())
            .unwrap_or_default(),
        qos: non_empty(base.qos.and_then(|q| q.assigned)),
        tres: base
            .tres
            .and_then(|t| t.configured)
            .as_deref()
            .map(parse_tres_string)
            .unwrap_or_default(),
    })
}

/// Reservation, identical in every version. `name` is required.
pub fn reservation(wire: ReservationInfo) -> SlurmResult<Reservation> {
    Ok(Reservation {
        name: required(wire.name, "reservation", "name")?,
        accounts: unwrap_csv(wire.accounts.as_deref()).unwrap_or_default(),
        users: unwrap_csv(wire.users.as_deref()).unwrap_or_default(),
        start_time: unwrap_timestamp(&wire.start_time),
        end_time: unwrap_timestamp(&wire.end_time),
        node_list: non_empty(wire.node_list),
        node_count: wire.node_count,
        core_count: wire.core_count,
        partition: non_empty(wire.partition),
        flags: unwrap_list(wire.flags.as_ref()).unwrap_or_default(),
        features: non_empty(wire.features),
        tres: wire.tres.as_deref().map(parse_tres_string).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_job_absent_vs_zero() {
        let base: JobBase = serde_json::from_value(json!({
            "job_id": 42,
            "name": "train",
            "job_state": ["RUNNING", "CONFIGURING"],
            "time_limit": {"set": false, "number": 60},
            "priority": {"set": true, "number": 0},
            "submit_time": {"set": true, "number": 1_700_000_000},
            "start_time": {"set": true, "number": 0},
            "tres_req_str": "cpu=4,mem=8G,node=1",
            "features": "a100, nvlink",
            "exit_code": {"status": ["SUCCESS"], "return_code": {"set": true, "number": 0}}
        }))
        .unwrap();
        let job = job(base).unwrap();
        assert_eq!(job.job_id, 42);
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.time_limit, None);
        assert_eq!(job.priority, Some(0));
        assert_eq!(job.submit_time.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(job.start_time, None);
        assert_eq!(job.tres_requested.get("mem"), Some(&8192));
        assert_eq!(job.features, vec!["a100", "nvlink"]);
        assert_eq!(job.exit_code, Some(0));
    }

    #[test]
    fn test_job_unknown_state_passes_through() {
        let base = JobBase {
            job_id: Some(1),
            job_state: Some(CsvList::Csv("RESV_DEL_HOLD".into())),
            ..JobBase::default()
        };
        assert_eq!(job(base).unwrap().state, JobState::Other("RESV_DEL_HOLD".into()));
    }

    #[test]
    fn test_job_without_id_is_malformed() {
        let err = job(JobBase::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.message().contains("job_id"));
    }

    #[test]
    fn test_node_cpu_load_fraction() {
        let base: NodeBase = serde_json::from_value(json!({
            "name": "n01",
            "state": ["IDLE", "DRAIN"],
            "features": "gpu,ib",
            "free_mem": {"set": true, "number": 2048}
        }))
        .unwrap();
        let node = node(base, Some(250)).unwrap();
        assert_eq!(node.cpu_load, Some(2.5));
        assert_eq!(node.state, vec![NodeState::Idle, NodeState::Drain]);
        assert_eq!(node.features, vec!["gpu", "ib"]);
        assert_eq!(node.free_memory, Some(2048));
    }

    #[test]
    fn test_node_update_body() {
        let body = serde_json::to_value(node_update(&NodeUpdate::drain("bad dimm"))).unwrap();
        assert_eq!(body, json!({"state": ["DRAIN"], "reason": "bad dimm"}));
    }

    #[test]
    fn test_partition_nested_blocks() {
        let base: PartitionBase = serde_json::from_value(json!({
            "name": "gpu",
            "nodes": {"configured": "gpu[01-04]", "total": 4},
            "cpus": {"total": 256},
            "partition": {"state": ["UP"]},
            "defaults": {"time": {"set": true, "number": 30}},
            "accounts": {"allowed": "physics,chem"},
            "tres": {"configured": "cpu=256,gres/gpu=16"}
        }))
        .unwrap();
        let limits = PartitionLimits {
            max_time: Some(1440),
            ..PartitionLimits::default()
        };
        let partition = partition(base, limits).unwrap();
        assert_eq!(partition.state, PartitionState::Up);
        assert_eq!(partition.nodes.as_deref(), Some("gpu[01-04]"));
        assert_eq!(partition.total_nodes, Some(4));
        assert_eq!(partition.default_time, Some(30));
        assert_eq!(partition.max_time, Some(1440));
        assert_eq!(partition.allowed_accounts, vec!["physics", "chem"]);
        assert_eq!(partition.tres.get("gres/gpu"), Some(&16));
    }

    #[test]
    fn test_reservation_csv_fields() {
        let wire: ReservationInfo = serde_json::from_value(json!({
            "name": "maint",
            "accounts": "ops,admin",
            "users": "",
            "start_time": {"set": true, "number": 1_700_000_000},
            "node_list": "n[01-02]",
            "flags": ["MAINT", "IGNORE_JOBS"]
        }))
        .unwrap();
        let reservation = reservation(wire).unwrap();
        assert_eq!(reservation.accounts, vec!["ops", "admin"]);
        assert!(reservation.users.is_empty());
        assert_eq!(reservation.flags, vec!["MAINT", "IGNORE_JOBS"]);
        assert_eq!(reservation.end_time, None);
    }

    #[test_case(None, None ; "absent")]
    #[test_case(Some(vec![]), Some(false) ; "empty list")]
    #[test_case(Some(vec!["USER"]), Some(true) ; "user")]
    #[test_case(Some(vec!["FALSE"]), Some(false) ; "explicit false")]
    fn test_exclusive(flags: Option<Vec<&str>>, expected: Option<bool>) {
        let flags = flags.map(|f| CsvList::List(f.into_iter().map(String::from).collect()));
        assert_eq!(exclusive(flags.as_ref()), expected);
    }
}
