//! Cluster-wide reports.

use slurm_types::{
    ControllerPing, DatabaseConfig, DatabaseDiagnostics, Diagnostics, Instance, License, RpcStat,
    Share,
};
use slurm_wire::noval::{unwrap, unwrap_timestamp};
use slurm_wire::schema::shared::{
    ControllerStatistics, DatabaseConfigReport, DatabaseStatistics, InstanceInfo, LicenseInfo,
    NamedRef, PingInfo, ShareInfo,
};
use tracing::warn;

use super::{accounting, non_empty, required};
use crate::error::SlurmResult;

/// License pool. `LicenseName` is required.
pub fn license(wire: LicenseInfo) -> SlurmResult<License> {
    Ok(License {
        name: required(wire.license_name, "license", "LicenseName")?,
        total: wire.total.unwrap_or(0),
        used: wire.used.unwrap_or(0),
        free: wire.free.unwrap_or(0),
        reserved: wire.reserved.unwrap_or(0),
        remote: wire.remote.unwrap_or(false),
    })
}

/// Fairshare entry. `name` is required.
pub fn share(wire: ShareInfo) -> SlurmResult<Share> {
    Ok(Share {
        name: required(wire.name, "share", "name")?,
        cluster: non_empty(wire.cluster),
        parent: non_empty(wire.parent),
        partition: non_empty(wire.partition),
        shares: unwrap(&wire.shares),
        shares_normalized: unwrap(&wire.shares_normalized),
        effective_usage: unwrap(&wire.effective_usage),
        fairshare_factor: wire.fairshare.and_then(|f| unwrap(&f.factor)),
    })
}

/// Controller statistics. Every field is optional.
#[must_use]
pub fn diagnostics(wire: ControllerStatistics) -> Diagnostics {
    Diagnostics {
        sampled_at: unwrap_timestamp(&wire.req_time),
        server_thread_count: wire.server_thread_count,
        agent_queue_size: wire.agent_queue_size,
        jobs_submitted: wire.jobs_submitted,
        jobs_started: wire.jobs_started,
        jobs_completed: wire.jobs_completed,
        jobs_canceled: wire.jobs_canceled,
        jobs_failed: wire.jobs_failed,
        jobs_pending: wire.jobs_pending,
        jobs_running: wire.jobs_running,
        schedule_cycle_last: wire.schedule_cycle_last,
        schedule_cycle_mean: wire.schedule_cycle_mean,
    }
}

/// Accounting daemon statistics. RPC entries without a name are dropped.
#[must_use]
pub fn database_diagnostics(wire: DatabaseStatistics) -> DatabaseDiagnostics {
    DatabaseDiagnostics {
        time_start: unwrap_timestamp(&wire.time_start),
        rpcs: wire
            .rpcs
            .into_iter()
            .filter_map(|rpc| {
                let time = rpc.time.unwrap_or_default();
                Some(RpcStat {
                    rpc: non_empty(rpc.rpc)?,
                    count: rpc.count.unwrap_or(0),
                    total_time: time.total.unwrap_or(0),
                })
            })
            .collect(),
    }
}

/// Accounting object names plus known TRES.
#[must_use]
pub fn database_config(wire: DatabaseConfigReport) -> DatabaseConfig {
    let names = |refs: Vec<NamedRef>| -> Vec<String> {
        refs.into_iter().filter_map(|r| non_empty(r.name)).collect()
    };
    DatabaseConfig {
        clusters: names(wire.clusters),
        accounts: names(wire.accounts),
        users: names(wire.users),
        qos: names(wire.qos),
        tres: wire
            .tres
            .into_iter()
            .filter_map(|entry| match accounting::tres_definition(entry) {
                Ok(definition) => Some(definition),
                Err(err) => {
                    warn!(error = %err, "Skipping TRES without a type");
                    None
                }
            })
            .collect(),
    }
}

/// Accounting instance. `cluster` is required.
pub fn instance(wire: InstanceInfo) -> SlurmResult<Instance> {
    let time = wire.time.unwrap_or_default();
    Ok(Instance {
        cluster: required(non_empty(wire.cluster), "instance", "cluster")?,
        extra: non_empty(wire.extra),
        instance_id: non_empty(wire.instance_id),
        instance_type: non_empty(wire.instance_type),
        node_name: non_empty(wire.node_name),
        time_start: unwrap_timestamp(&time.time_start),
        time_end: unwrap_timestamp(&time.time_end),
    })
}

/// One controller's ping result.
///
/// v0.0.40 reports `pinged: "UP"`; later versions report `responding`.
/// Either is accepted.
pub fn ping(wire: PingInfo) -> SlurmResult<ControllerPing> {
    let responding = wire
        .responding
        .or_else(|| wire.pinged.as_deref().map(|p| p.eq_ignore_ascii_case("UP")))
        .unwrap_or(false);
    Ok(ControllerPing {
        hostname: required(wire.hostname, "ping", "hostname")?,
        responding,
        latency_us: wire.latency,
        mode: non_empty(wire.mode),
    })
}
