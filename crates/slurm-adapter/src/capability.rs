//! Which operations each API version exposes.
//!
//! Managers consult [`Capabilities::ensure`] before touching the network, so
//! an operation a version lacks fails with `NOT_IMPLEMENTED` and no request
//! is sent. Resources a version lacks entirely are wired to
//! [`crate::stub::Unsupported`].

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{SlurmError, SlurmResult};
use crate::version::ApiVersion;

/// A resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    /// Jobs.
    Jobs,
    /// Nodes.
    Nodes,
    /// Partitions.
    Partitions,
    /// Accounts.
    Accounts,
    /// Associations.
    Associations,
    /// QoS.
    Qos,
    /// Reservations.
    Reservations,
    /// Users.
    Users,
    /// Workload characterization keys.
    WcKeys,
    /// Clusters.
    Clusters,
    /// Cluster-wide queries.
    Standalone,
}

macro_rules! operations {
    ($($variant:ident => ($resource:ident, $name:literal),)*) => {
        /// Every manager operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[allow(missing_docs)]
        pub enum Operation {
            $($variant,)*
        }

        impl Operation {
            /// Every operation, grouped by resource.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Dotted name, e.g. `jobs.update`.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Resource this operation belongs to.
            #[must_use]
            pub const fn resource(self) -> Resource {
                match self {
                    $(Self::$variant => Resource::$resource,)*
                }
            }
        }
    };
}

operations! {
    JobList => (Jobs, "jobs.list"),
    JobGet => (Jobs, "jobs.get"),
    JobSubmit => (Jobs, "jobs.submit"),
    JobUpdate => (Jobs, "jobs.update"),
    JobCancel => (Jobs, "jobs.cancel"),
    JobSignal => (Jobs, "jobs.signal"),
    JobHold => (Jobs, "jobs.hold"),
    JobRelease => (Jobs, "jobs.release"),
    JobRequeue => (Jobs, "jobs.requeue"),
    JobWatch => (Jobs, "jobs.watch"),
    JobAllocate => (Jobs, "jobs.allocate"),
    JobNotify => (Jobs, "jobs.notify"),
    NodeList => (Nodes, "nodes.list"),
    NodeGet => (Nodes, "nodes.get"),
    NodeUpdate => (Nodes, "nodes.update"),
    NodeDelete => (Nodes, "nodes.delete"),
    NodeWatch => (Nodes, "nodes.watch"),
    PartitionList => (Partitions, "partitions.list"),
    PartitionGet => (Partitions, "partitions.get"),
    PartitionCreate => (Partitions, "partitions.create"),
    PartitionUpdate => (Partitions, "partitions.update"),
    PartitionDelete => (Partitions, "partitions.delete"),
    AccountList => (Accounts, "accounts.list"),
    AccountGet => (Accounts, "accounts.get"),
    AccountCreate => (Accounts, "accounts.create"),
    AccountUpdate => (Accounts, "accounts.update"),
    AccountDelete => (Accounts, "accounts.delete"),
    AccountHierarchy => (Accounts, "accounts.hierarchy"),
    AccountCreateAssociation => (Accounts, "accounts.create_association"),
    AssociationList => (Associations, "associations.list"),
    AssociationGet => (Associations, "associations.get"),
    AssociationCreate => (Associations, "associations.create"),
    AssociationUpdate => (Associations, "associations.update"),
    AssociationDelete => (Associations, "associations.delete"),
    QosList => (Qos, "qos.list"),
    QosGet => (Qos, "qos.get"),
    QosCreate => (Qos, "qos.create"),
    QosUpdate => (Qos, "qos.update"),
    QosDelete => (Qos, "qos.delete"),
    ReservationList => (Reservations, "reservations.list"),
    ReservationGet => (Reservations, "reservations.get"),
    ReservationCreate => (Reservations, "reservations.create"),
    ReservationUpdate => (Reservations, "reservations.update"),
    ReservationDelete => (Reservations, "reservations.delete"),
    UserList => (Users, "users.list"),
    UserGet => (Users, "users.get"),
    UserCreate => (Users, "users.create"),
    UserUpdate => (Users, "users.update"),
    UserDelete => (Users, "users.delete"),
    UserCreateAssociation => (Users, "users.create_association"),
    WcKeyList => (WcKeys, "wckeys.list"),
    WcKeyGet => (WcKeys, "wckeys.get"),
    WcKeyCreate => (WcKeys, "wckeys.create"),
    WcKeyDelete => (WcKeys, "wckeys.delete"),
    ClusterList => (Clusters, "clusters.list"),
    ClusterGet => (Clusters, "clusters.get"),
    ClusterCreate => (Clusters, "clusters.create"),
    ClusterDelete => (Clusters, "clusters.delete"),
    Licenses => (Standalone, "standalone.licenses"),
    Shares => (Standalone, "standalone.shares"),
    Diagnostics => (Standalone, "standalone.diagnostics"),
    DatabaseDiagnostics => (Standalone, "standalone.database_diagnostics"),
    Tres => (Standalone, "standalone.tres"),
    CreateTres => (Standalone, "standalone.create_tres"),
    Config => (Standalone, "standalone.config"),
    Reconfigure => (Standalone, "standalone.reconfigure"),
    Ping => (Standalone, "standalone.ping"),
    PingDatabase => (Standalone, "standalone.ping_database"),
    Instance => (Standalone, "standalone.instance"),
    Instances => (Standalone, "standalone.instances"),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operations one API version lacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    version: ApiVersion,
    unsupported: BTreeSet<Operation>,
}

impl Capabilities {
    /// The capability set of `version`.
    #[must_use]
    pub fn for_version(version: ApiVersion) -> Self {
        use ApiVersion::{V0040, V0041, V0042, V0043, V0044};

        let from = |first: ApiVersion| version < first;
        let except = |excluded: &[ApiVersion]| excluded.contains(&version);
        let only = |included: &[ApiVersion]| !included.contains(&version);

        let unsupported = Operation::ALL
            .iter()
            .copied()
            .filter(|op| match op {
                Operation::PartitionCreate
                | Operation::PartitionUpdate
                | Operation::PartitionDelete => true,
                Operation::ReservationCreate
                | Operation::ReservationUpdate
                | Operation::ReservationDelete => from(V0043),
                Operation::JobUpdate => except(&[V0040]),
                Operation::JobSignal => except(&[V0041, V0044]),
                Operation::JobHold
                | Operation::JobRelease
                | Operation::JobRequeue
                | Operation::JobAllocate => from(V0042),
                Operation::JobWatch
                | Operation::NodeWatch
                | Operation::JobNotify
                | Operation::AccountCreateAssociation
                | Operation::UserCreateAssociation => from(V0043),
                Operation::NodeDelete => except(&[V0042]),
                Operation::AssociationUpdate | Operation::AssociationDelete => except(&[V0040]),
                Operation::QosDelete => except(&[V0042]),
                Operation::Config | Operation::PingDatabase => except(&[V0040]),
                Operation::CreateTres
                | Operation::Reconfigure
                | Operation::Instance
                | Operation::Instances => only(&[V0041, V0043]),
                op if matches!(op.resource(), Resource::WcKeys | Resource::Clusters) => {
                    except(&[V0041])
                }
                _ => false,
            })
            .collect();

        Self {
            version,
            unsupported,
        }
    }

    /// Version these capabilities describe.
    #[must_use]
    pub const fn version(&self) -> ApiVersion {
        self.version
    }

    /// Returns true if `operation` is exposed.
    #[must_use]
    pub fn supports(&self, operation: Operation) -> bool {
        !self.unsupported.contains(&operation)
    }

    /// Returns true if any operation of `resource` is exposed.
    #[must_use]
    pub fn supports_resource(&self, resource: Resource) -> bool {
        Operation::ALL
            .iter()
            .any(|op| op.resource() == resource && self.supports(*op))
    }

    /// Operations this version lacks, in declaration order.
    #[must_use]
    pub fn unsupported(&self) -> Vec<Operation> {
        self.unsupported.iter().copied().collect()
    }

    /// Fail with `NOT_IMPLEMENTED` if `operation` is not exposed.
    pub fn ensure(&self, operation: Operation) -> SlurmResult<()> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(SlurmError::not_implemented(operation.as_str(), self.version))
        }
    }
}
