//! Accounting records, identical across every supported version.

use std::collections::BTreeSet;

use slurm_types::{Account, AdminLevel, Association, Cluster, Qos, TresDefinition, User, WcKey};
use slurm_wire::noval::{unwrap, unwrap_list, unwrap_number};
use slurm_wire::schema::shared::{
    AccountInfo, ActiveJobs, AssociationDefaults, AssociationInfo, AssociationJobLimits,
    AssociationMax, AssociationShort, ClusterInfo, ControllerAddress, JobsPer, NamedRef, PerJob,
    PerUser, QosInfo, QosJobLimits, QosLimits, QosMax, QosPreempt, TresLimits, TresPer,
    UserDefaults, UserInfo, WallClock, WckeyInfo,
};
use slurm_wire::{NoVal, WireTres};

use super::{non_empty, required, tres};
use crate::error::SlurmResult;

fn names(refs: Vec<NamedRef>) -> Vec<String> {
    refs.into_iter().filter_map(|r| non_empty(r.name)).collect()
}

fn refs(names: &[String]) -> Vec<NamedRef> {
    names
        .iter()
        .map(|name| NamedRef {
            name: Some(name.clone()),
        })
        .collect()
}

/// Account from the wire. `name` is required.
pub fn account(wire: AccountInfo) -> SlurmResult<Account> {
    Ok(Account {
        name: required(wire.name, "account", "name")?,
        description: non_empty(wire.description),
        organization: non_empty(wire.organization),
        coordinators: names(wire.coordinators),
        flags: wire.flags,
        parent_account: None,
        child_accounts: Vec::new(),
    })
}

/// Account to the wire.
#[must_use]
pub fn account_to_wire(account: &Account) -> AccountInfo {
    AccountInfo {
        name: Some(account.name.clone()),
        description: account.description.clone(),
        organization: account.organization.clone(),
        coordinators: refs(&account.coordinators),
        flags: account.flags.clone(),
    }
}

/// Association from the wire. `account` and `cluster` are required; an
/// account-level association has an empty user.
pub fn association(wire: AssociationInfo) -> SlurmResult<Association> {
    let max = wire.max.unwrap_or_default();
    let jobs = max.jobs.unwrap_or_default();
    let limits = max.tres.unwrap_or_default();
    let per_job = limits.per.map(|per| per.job).unwrap_or_default();

    Ok(Association {
        id: wire.id,
        account: required(wire.account, "association", "account")?,
        user: wire.user.unwrap_or_default(),
        cluster: required(wire.cluster, "association", "cluster")?,
        partition: non_empty(wire.partition),
        parent_account: non_empty(wire.parent_account),
        is_default: wire.is_default.unwrap_or(false),
        default_qos: non_empty(wire.default.and_then(|d| d.qos)),
        qos: unwrap_list(wire.qos.as_ref()).unwrap_or_default(),
        shares: wire.shares_raw,
        priority: unwrap(&wire.priority),
        max_jobs: unwrap(&jobs.active),
        max_submit_jobs: unwrap(&jobs.total),
        max_wall_per_job: unwrap(&jobs.per.and_then(|p| p.wall_clock)),
        max_tres_per_job: tres::to_common(&per_job),
        grp_tres: tres::to_common(&limits.total),
    })
}

/// Association to the wire.
#[must_use]
pub fn association_to_wire(association: &Association) -> AssociationInfo {
    let per_job = tres::to_wire(&association.max_tres_per_job);
    AssociationInfo {
        id: association.id,
        account: Some(association.account.clone()),
        cluster: Some(association.cluster.clone()),
        partition: association.partition.clone(),
        user: Some(association.user.clone()),
        parent_account: association.parent_account.clone(),
        is_default: Some(association.is_default),
        shares_raw: association.shares,
        default: association.default_qos.clone().map(|qos| AssociationDefaults { qos: Some(qos) }),
        qos: (!association.qos.is_empty()).then(|| association.qos.clone().into()),
        max: Some(AssociationMax {
            jobs: Some(AssociationJobLimits {
                active: association.max_jobs.map(NoVal::set),
                total: association.max_submit_jobs.map(NoVal::set),
                per: association.max_wall_per_job.map(|wall| JobsPer {
                    wall_clock: Some(NoVal::set(wall)),
                }),
            }),
            tres: Some(TresLimits {
                total: tres::to_wire(&association.grp_tres),
                per: (!per_job.is_empty()).then_some(TresPer {
                    job: per_job,
                    user: Vec::new(),
                }),
            }),
        }),
        priority: association.priority.map(NoVal::set),
    }
}

/// QoS from the wire. `name` is required.
pub fn qos(wire: QosInfo) -> SlurmResult<Qos> {
    let max = wire.limits.and_then(|l| l.max).unwrap_or_default();
    let jobs = max.jobs.unwrap_or_default();
    let limits = max.tres.unwrap_or_default();
    let per = limits.per.unwrap_or_default();
    let preempt = wire.preempt.unwrap_or_default();

    Ok(Qos {
        name: required(wire.name, "qos", "name")?,
        id: wire.id,
        description: non_empty(wire.description),
        flags: wire.flags,
        priority: unwrap(&wire.priority),
        usage_factor: unwrap(&wire.usage_factor),
        max_wall_per_job: unwrap(&max.wall_clock.and_then(|w| w.per).and_then(|p| p.job)),
        max_jobs_per_user: unwrap(&jobs.active_jobs.and_then(|a| a.per).and_then(|p| p.user)),
        max_submit_jobs_per_user: unwrap(&jobs.per.and_then(|p| p.user)),
        max_tres_per_job: tres::to_common(&per.job),
        max_tres_per_user: tres::to_common(&per.user),
        preempt: preempt.list,
        preempt_mode: preempt.mode,
    })
}

/// QoS to the wire.
#[must_use]
pub fn qos_to_wire(qos: &Qos) -> QosInfo {
    QosInfo {
        name: Some(qos.name.clone()),
        id: qos.id,
        description: qos.description.clone(),
        flags: qos.flags.clone(),
        priority: qos.priority.map(NoVal::set),
        usage_factor: qos.usage_factor.map(NoVal::set),
        limits: Some(QosLimits {
            max: Some(QosMax {
                wall_clock: qos.max_wall_per_job.map(|wall| WallClock {
                    per: Some(PerJob {
                        job: Some(NoVal::set(wall)),
                    }),
                }),
                jobs: Some(QosJobLimits {
                    per: qos.max_submit_jobs_per_user.map(|n| PerUser {
                        user: Some(NoVal::set(n)),
                    }),
                    active_jobs: qos.max_jobs_per_user.map(|n| ActiveJobs {
                        per: Some(PerUser {
                            user: Some(NoVal::set(n)),
                        }),
                    }),
                }),
                tres: Some(TresLimits {
                    total: Vec::new(),
                    per: Some(TresPer {
                        job: tres::to_wire(&qos.max_tres_per_job),
                        user: tres::to_wire(&qos.max_tres_per_user),
                    }),
                }),
            }),
        }),
        preempt: Some(QosPreempt {
            list: qos.preempt.clone(),
            mode: qos.preempt_mode.clone(),
        }),
    }
}

/// User from the wire. `name` is required.
pub fn user(wire: UserInfo) -> SlurmResult<User> {
    let defaults = wire.default.unwrap_or_default();
    let mut seen = BTreeSet::new();
    let accounts = wire
        .associations
        .into_iter()
        .filter_map(|a| non_empty(a.account))
        .filter(|account| seen.insert(account.clone()))
        .collect();

    Ok(User {
        name: required(wire.name, "user", "name")?,
        default_account: non_empty(defaults.account),
        default_wckey: non_empty(defaults.wckey),
        admin_level: wire
            .administrator_level
            .and_then(|level| level.first())
            .map(|level| AdminLevel::from_wire(&level))
            .unwrap_or_default(),
        accounts,
        coordinator_of: names(wire.coordinators),
        flags: wire.flags,
    })
}

/// User to the wire. Every account becomes an association on `cluster`
/// when one is given.
#[must_use]
pub fn user_to_wire(user: &User, cluster: Option<&str>) -> UserInfo {
    UserInfo {
        name: Some(user.name.clone()),
        default: Some(UserDefaults {
            account: user.default_account.clone(),
            wckey: user.default_wckey.clone(),
        }),
        administrator_level: Some(vec![user.admin_level.as_str().to_string()].into()),
        associations: user
            .accounts
            .iter()
            .map(|account| AssociationShort {
                account: Some(account.clone()),
                cluster: cluster.map(ToString::to_string),
                partition: None,
                user: Some(user.name.clone()),
            })
            .collect(),
        coordinators: refs(&user.coordinator_of),
        flags: user.flags.clone(),
    }
}

/// WCKey from the wire. `name`, `user` and `cluster` are required.
pub fn wckey(wire: WckeyInfo) -> SlurmResult<WcKey> {
    Ok(WcKey {
        id: wire.id,
        name: required(wire.name, "wckey", "name")?,
        user: required(wire.user, "wckey", "user")?,
        cluster: required(wire.cluster, "wckey", "cluster")?,
        flags: wire.flags,
    })
}

/// WCKey to the wire.
#[must_use]
pub fn wckey_to_wire(wckey: &WcKey) -> WckeyInfo {
    WckeyInfo {
        id: wckey.id,
        name: Some(wckey.name.clone()),
        cluster: Some(wckey.cluster.clone()),
        user: Some(wckey.user.clone()),
        flags: wckey.flags.clone(),
    }
}

/// Cluster from the wire. `name` is required.
pub fn cluster(wire: ClusterInfo) -> SlurmResult<Cluster> {
    let controller = wire.controller.unwrap_or_default();
    Ok(Cluster {
        name: required(wire.name, "cluster", "name")?,
        nodes: non_empty(wire.nodes),
        controller_host: non_empty(controller.host),
        controller_port: controller.port.filter(|port| *port != 0),
        rpc_version: wire.rpc_version,
        select_plugin: non_empty(wire.select_plugin),
        flags: wire.flags,
        tres: tres::to_common(&wire.tres),
    })
}

/// Cluster to the wire.
#[must_use]
pub fn cluster_to_wire(cluster: &Cluster) -> ClusterInfo {
    ClusterInfo {
        name: Some(cluster.name.clone()),
        nodes: cluster.nodes.clone(),
        controller: (cluster.controller_host.is_some() || cluster.controller_port.is_some())
            .then(|| ControllerAddress {
                host: cluster.controller_host.clone(),
                port: cluster.controller_port,
            }),
        flags: cluster.flags.clone(),
        rpc_version: cluster.rpc_version,
        select_plugin: cluster.select_plugin.clone(),
        tres: tres::to_wire(&cluster.tres),
    }
}

/// TRES definition from the wire. `type` is required.
pub fn tres_definition(wire: WireTres) -> SlurmResult<TresDefinition> {
    Ok(TresDefinition {
        id: unwrap_number(&wire.id),
        kind: required(wire.kind, "tres", "type")?,
        name: non_empty(wire.name),
        count: unwrap_number(&wire.count),
    })
}

/// TRES definition to the wire.
#[must_use]
pub fn tres_definition_to_wire(definition: &TresDefinition) -> WireTres {
    WireTres {
        kind: Some(definition.kind.clone()),
        name: definition.name.clone(),
        id: definition.id.map(i64::from),
        count: definition.count.and_then(|c| i64::try_from(c).ok()),
    }
}
