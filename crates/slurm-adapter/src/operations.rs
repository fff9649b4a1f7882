//! Resource manager interfaces.
//!
//! One trait per resource family. Every version adapter hands out
//! implementations of these: a real manager, or [`crate::stub::Unsupported`]
//! when the version has no such resource. The traits are object safe;
//! methods return a [`BoxFuture`] borrowing `self` and the arguments.

use slurm_types::{
    Account, AccountAssociationRequest, AccountFilter, AccountHierarchy, AccountUpdate,
    Association, AssociationFilter, AssociationUpdate, Cluster, ClusterFilter, DatabaseConfig,
    DatabaseDiagnostics, Diagnostics, Instance, InstanceFilter, Job, JobAllocateResponse,
    JobAllocation, JobEvent, JobFilter, JobSubmission, JobSubmitResponse, JobUpdate,
    JobWatchOptions, License, Node, NodeEvent, NodeFilter, NodeUpdate, NodeWatchOptions, Page,
    Partition, PartitionFilter, PartitionUpdate, PingReport, Qos, QosFilter, QosUpdate,
    Reservation, ReservationCreate, ReservationFilter, ReservationUpdate, Share, TresDefinition,
    User, UserAssociationRequest, UserFilter, UserUpdate, WcKey, WcKeyFilter,
};
use slurm_wire::BoxFuture;
use tokio::sync::mpsc;

use crate::context::RequestContext;
use crate::error::SlurmResult;

/// Shorthand for the future every operation returns.
pub type OpFuture<'a, T> = BoxFuture<'a, SlurmResult<T>>;

/// Jobs on the controller.
pub trait JobOperations: Send + Sync {
    /// List jobs, filtered and paginated client-side.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a JobFilter>,
    ) -> OpFuture<'a, Page<Job>>;

    /// Fetch one job.
    fn get<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, Job>;

    /// Submit a batch job.
    fn submit<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission: &'a JobSubmission,
    ) -> OpFuture<'a, JobSubmitResponse>;

    /// Change an existing job.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        job_id: u32,
        update: &'a JobUpdate,
    ) -> OpFuture<'a, ()>;

    /// Cancel a job.
    fn cancel<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()>;

    /// Send a signal, e.g. `SIGUSR1`.
    fn signal<'a>(
        &'a self,
        ctx: &'a RequestContext,
        job_id: u32,
        signal: &'a str,
    ) -> OpFuture<'a, ()>;

    /// Hold a pending job.
    fn hold<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()>;

    /// Release a held job.
    fn release<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()>;

    /// Requeue a job.
    fn requeue<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()>;

    /// Poll for job changes until `ctx` is cancelled or the receiver is
    /// dropped.
    fn watch<'a>(
        &'a self,
        ctx: &'a RequestContext,
        options: JobWatchOptions,
    ) -> OpFuture<'a, mpsc::Receiver<JobEvent>>;

    /// Request an allocation without a batch script.
    fn allocate<'a>(
        &'a self,
        ctx: &'a RequestContext,
        allocation: &'a JobAllocation,
    ) -> OpFuture<'a, JobAllocateResponse>;

    /// Leave a message on a job. Delivered as the job's comment.
    fn notify<'a>(
        &'a self,
        ctx: &'a RequestContext,
        job_id: u32,
        message: &'a str,
    ) -> OpFuture<'a, ()>;
}

/// Compute nodes on the controller.
pub trait NodeOperations: Send + Sync {
    /// List nodes.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a NodeFilter>,
    ) -> OpFuture<'a, Page<Node>>;

    /// Fetch one node.
    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Node>;

    /// Change a node.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a NodeUpdate,
    ) -> OpFuture<'a, ()>;

    /// Remove a node from the controller.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;

    /// Drain a node. `reason` is required.
    fn drain<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        reason: &'a str,
    ) -> OpFuture<'a, ()>;

    /// Return a drained or down node to service.
    fn resume<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;

    /// Poll for node changes.
    fn watch<'a>(
        &'a self,
        ctx: &'a RequestContext,
        options: NodeWatchOptions,
    ) -> OpFuture<'a, mpsc::Receiver<NodeEvent>>;
}

/// Partitions on the controller.
pub trait PartitionOperations: Send + Sync {
    /// List partitions.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a PartitionFilter>,
    ) -> OpFuture<'a, Page<Partition>>;

    /// Fetch one partition.
    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Partition>;

    /// Create a partition.
    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        partition: &'a Partition,
    ) -> OpFuture<'a, ()>;

    /// Change a partition.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a PartitionUpdate,
    ) -> OpFuture<'a, ()>;

    /// Remove a partition.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;
}

/// Accounts in the accounting database.
pub trait AccountOperations: Send + Sync {
    /// List accounts.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a AccountFilter>,
    ) -> OpFuture<'a, Page<Account>>;

    /// Fetch one account.
    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Account>;

    /// Create an account.
    fn create<'a>(&'a self, ctx: &'a RequestContext, account: &'a Account) -> OpFuture<'a, ()>;

    /// Change an account.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a AccountUpdate,
    ) -> OpFuture<'a, ()>;

    /// Remove an account.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;

    /// Parent links between accounts, from account-level associations.
    fn hierarchy<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, AccountHierarchy>;

    /// Create account-level associations on one cluster.
    fn create_association<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a AccountAssociationRequest,
    ) -> OpFuture<'a, ()>;
}

/// Associations in the accounting database, addressed by composite key.
pub trait AssociationOperations: Send + Sync {
    /// List associations.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a AssociationFilter>,
    ) -> OpFuture<'a, Page<Association>>;

    /// Fetch one association by `account:user:cluster[:partition]`.
    fn get<'a>(&'a self, ctx: &'a RequestContext, key: &'a str) -> OpFuture<'a, Association>;

    /// Create an association.
    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        association: &'a Association,
    ) -> OpFuture<'a, ()>;

    /// Change an association.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        key: &'a str,
        update: &'a AssociationUpdate,
    ) -> OpFuture<'a, ()>;

    /// Remove an association.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, key: &'a str) -> OpFuture<'a, ()>;
}

/// QoS definitions.
pub trait QosOperations: Send + Sync {
    /// List QoS.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a QosFilter>,
    ) -> OpFuture<'a, Page<Qos>>;

    /// Fetch one QoS.
    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Qos>;

    /// Create a QoS.
    fn create<'a>(&'a self, ctx: &'a RequestContext, qos: &'a Qos) -> OpFuture<'a, ()>;

    /// Change a QoS.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a QosUpdate,
    ) -> OpFuture<'a, ()>;

    /// Remove a QoS.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;
}

/// Advanced reservations.
pub trait ReservationOperations: Send + Sync {
    /// List reservations.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a ReservationFilter>,
    ) -> OpFuture<'a, Page<Reservation>>;

    /// Fetch one reservation.
    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Reservation>;

    /// Create a reservation.
    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        reservation: &'a ReservationCreate,
    ) -> OpFuture<'a, ()>;

    /// Change a reservation.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a ReservationUpdate,
    ) -> OpFuture<'a, ()>;

    /// Remove a reservation.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;
}

/// Users in the accounting database.
pub trait UserOperations: Send + Sync {
    /// List users.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a UserFilter>,
    ) -> OpFuture<'a, Page<User>>;

    /// Fetch one user.
    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, User>;

    /// Create a user.
    fn create<'a>(&'a self, ctx: &'a RequestContext, user: &'a User) -> OpFuture<'a, ()>;

    /// Change a user.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a UserUpdate,
    ) -> OpFuture<'a, ()>;

    /// Remove a user.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;

    /// Add users to an account on one cluster.
    fn create_association<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a UserAssociationRequest,
    ) -> OpFuture<'a, ()>;
}

/// Workload characterization keys.
pub trait WcKeyOperations: Send + Sync {
    /// List keys.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a WcKeyFilter>,
    ) -> OpFuture<'a, Page<WcKey>>;

    /// Fetch one key by database id.
    fn get<'a>(&'a self, ctx: &'a RequestContext, id: &'a str) -> OpFuture<'a, WcKey>;

    /// Create a key.
    fn create<'a>(&'a self, ctx: &'a RequestContext, wckey: &'a WcKey) -> OpFuture<'a, ()>;

    /// Remove a key by database id.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, id: &'a str) -> OpFuture<'a, ()>;
}

/// Clusters registered in the accounting database.
pub trait ClusterOperations: Send + Sync {
    /// List clusters.
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a ClusterFilter>,
    ) -> OpFuture<'a, Page<Cluster>>;

    /// Fetch one cluster.
    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Cluster>;

    /// Register a cluster.
    fn create<'a>(&'a self, ctx: &'a RequestContext, cluster: &'a Cluster) -> OpFuture<'a, ()>;

    /// Remove a cluster.
    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()>;
}

/// Cluster-wide queries.
pub trait StandaloneOperations: Send + Sync {
    /// License pools.
    fn licenses<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Vec<License>>;

    /// Fairshare tree.
    fn shares<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Vec<Share>>;

    /// Controller statistics.
    fn diagnostics<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Diagnostics>;

    /// Accounting daemon statistics.
    fn database_diagnostics<'a>(
        &'a self,
        ctx: &'a RequestContext,
    ) -> OpFuture<'a, DatabaseDiagnostics>;

    /// Known TRES.
    fn tres<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Vec<TresDefinition>>;

    /// Register TRES.
    fn create_tres<'a>(
        &'a self,
        ctx: &'a RequestContext,
        definitions: &'a [TresDefinition],
    ) -> OpFuture<'a, ()>;

    /// Names of the objects in the accounting database.
    fn config<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, DatabaseConfig>;

    /// Ask the controller to re-read its configuration.
    fn reconfigure<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, ()>;

    /// Ping the controllers.
    fn ping<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, PingReport>;

    /// Ping the accounting daemon.
    fn ping_database<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, PingReport>;

    /// The first cloud instance matching `filter`.
    fn instance<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: &'a InstanceFilter,
    ) -> OpFuture<'a, Instance>;

    /// Cloud instances known to the accounting database.
    fn instances<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a InstanceFilter>,
    ) -> OpFuture<'a, Vec<Instance>>;
}
