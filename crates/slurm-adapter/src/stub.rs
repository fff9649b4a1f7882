//! Managers for resources an API version does not expose.

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
use tokio::sync::mpsc;

use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmError;
use crate::operations::{
    AccountOperations, AssociationOperations, ClusterOperations, JobOperations, NodeOperations,
    OpFuture, PartitionOperations, QosOperations, ReservationOperations, StandaloneOperations,
    UserOperations, WcKeyOperations,
};
use crate::version::ApiVersion;

/// Implements every manager trait by failing with `NOT_IMPLEMENTED`.
///
/// No request is ever sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported {
    version: ApiVersion,
}

impl Unsupported {
    /// A stub reporting `version`.
    #[must_use]
    pub const fn new(version: ApiVersion) -> Self {
        Self { version }
    }

    /// Version named in every error.
    #[must_use]
    pub const fn version(&self) -> ApiVersion {
        self.version
    }

    fn fail<'a, T: Send + 'a>(&self, operation: Operation) -> OpFuture<'a, T> {
        let err = SlurmError::not_implemented(operation.as_str(), self.version);
        Box::pin(std::future::ready(Err(err)))
    }
}

impl JobOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a JobFilter>,
    ) -> OpFuture<'a, Page<Job>> {
        self.fail(Operation::JobList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: u32) -> OpFuture<'a, Job> {
        self.fail(Operation::JobGet)
    }

    fn submit<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a JobSubmission,
    ) -> OpFuture<'a, JobSubmitResponse> {
        self.fail(Operation::JobSubmit)
    }

    fn update<'a>(&'a self, _: &'a RequestContext, _: u32, _: &'a JobUpdate) -> OpFuture<'a, ()> {
        self.fail(Operation::JobUpdate)
    }

    fn cancel<'a>(&'a self, _: &'a RequestContext, _: u32) -> OpFuture<'a, ()> {
        self.fail(Operation::JobCancel)
    }

    fn signal<'a>(&'a self, _: &'a RequestContext, _: u32, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::JobSignal)
    }

    fn hold<'a>(&'a self, _: &'a RequestContext, _: u32) -> OpFuture<'a, ()> {
        self.fail(Operation::JobHold)
    }

    fn release<'a>(&'a self, _: &'a RequestContext, _: u32) -> OpFuture<'a, ()> {
        self.fail(Operation::JobRelease)
    }

    fn requeue<'a>(&'a self, _: &'a RequestContext, _: u32) -> OpFuture<'a, ()> {
        self.fail(Operation::JobRequeue)
    }

    fn watch<'a>(
        &'a self,
        _: &'a RequestContext,
        _: JobWatchOptions,
    ) -> OpFuture<'a, mpsc::Receiver<JobEvent>> {
        self.fail(Operation::JobWatch)
    }

    fn allocate<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a JobAllocation,
    ) -> OpFuture<'a, JobAllocateResponse> {
        self.fail(Operation::JobAllocate)
    }

    fn notify<'a>(&'a self, _: &'a RequestContext, _: u32, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::JobNotify)
    }
}

impl NodeOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a NodeFilter>,
    ) -> OpFuture<'a, Page<Node>> {
        self.fail(Operation::NodeList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, Node> {
        self.fail(Operation::NodeGet)
    }

    fn update<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a str,
        _: &'a NodeUpdate,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::NodeUpdate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::NodeDelete)
    }

    fn drain<'a>(&'a self, _: &'a RequestContext, _: &'a str, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::NodeUpdate)
    }

    fn resume<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::NodeUpdate)
    }

    fn watch<'a>(
        &'a self,
        _: &'a RequestContext,
        _: NodeWatchOptions,
    ) -> OpFuture<'a, mpsc::Receiver<NodeEvent>> {
        self.fail(Operation::NodeWatch)
    }
}

impl PartitionOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a PartitionFilter>,
    ) -> OpFuture<'a, Page<Partition>> {
        self.fail(Operation::PartitionList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, Partition> {
        self.fail(Operation::PartitionGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a Partition) -> OpFuture<'a, ()> {
        self.fail(Operation::PartitionCreate)
    }

    fn update<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a str,
        _: &'a PartitionUpdate,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::PartitionUpdate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::PartitionDelete)
    }
}

impl AccountOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a AccountFilter>,
    ) -> OpFuture<'a, Page<Account>> {
        self.fail(Operation::AccountList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, Account> {
        self.fail(Operation::AccountGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a Account) -> OpFuture<'a, ()> {
        self.fail(Operation::AccountCreate)
    }

    fn update<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a str,
        _: &'a AccountUpdate,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::AccountUpdate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::AccountDelete)
    }

    fn hierarchy<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, AccountHierarchy> {
        self.fail(Operation::AccountHierarchy)
    }

    fn create_association<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a AccountAssociationRequest,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::AccountCreateAssociation)
    }
}

impl AssociationOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a AssociationFilter>,
    ) -> OpFuture<'a, Page<Association>> {
        self.fail(Operation::AssociationList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, Association> {
        self.fail(Operation::AssociationGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a Association) -> OpFuture<'a, ()> {
        self.fail(Operation::AssociationCreate)
    }

    fn update<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a str,
        _: &'a AssociationUpdate,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::AssociationUpdate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::AssociationDelete)
    }
}

impl QosOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a QosFilter>,
    ) -> OpFuture<'a, Page<Qos>> {
        self.fail(Operation::QosList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, Qos> {
        self.fail(Operation::QosGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a Qos) -> OpFuture<'a, ()> {
        self.fail(Operation::QosCreate)
    }

    fn update<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a str,
        _: &'a QosUpdate,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::QosUpdate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::QosDelete)
    }
}

impl ReservationOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a ReservationFilter>,
    ) -> OpFuture<'a, Page<Reservation>> {
        self.fail(Operation::ReservationList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, Reservation> {
        self.fail(Operation::ReservationGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a ReservationCreate) -> OpFuture<'a, ()> {
        self.fail(Operation::ReservationCreate)
    }

    fn update<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a str,
        _: &'a ReservationUpdate,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::ReservationUpdate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::ReservationDelete)
    }
}

impl UserOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a UserFilter>,
    ) -> OpFuture<'a, Page<User>> {
        self.fail(Operation::UserList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, User> {
        self.fail(Operation::UserGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a User) -> OpFuture<'a, ()> {
        self.fail(Operation::UserCreate)
    }

    fn update<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a str,
        _: &'a UserUpdate,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::UserUpdate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::UserDelete)
    }

    fn create_association<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a UserAssociationRequest,
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::UserCreateAssociation)
    }
}

impl WcKeyOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a WcKeyFilter>,
    ) -> OpFuture<'a, Page<WcKey>> {
        self.fail(Operation::WcKeyList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, WcKey> {
        self.fail(Operation::WcKeyGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a WcKey) -> OpFuture<'a, ()> {
        self.fail(Operation::WcKeyCreate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::WcKeyDelete)
    }
}

impl ClusterOperations for Unsupported {
    fn list<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a ClusterFilter>,
    ) -> OpFuture<'a, Page<Cluster>> {
        self.fail(Operation::ClusterList)
    }

    fn get<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, Cluster> {
        self.fail(Operation::ClusterGet)
    }

    fn create<'a>(&'a self, _: &'a RequestContext, _: &'a Cluster) -> OpFuture<'a, ()> {
        self.fail(Operation::ClusterCreate)
    }

    fn delete<'a>(&'a self, _: &'a RequestContext, _: &'a str) -> OpFuture<'a, ()> {
        self.fail(Operation::ClusterDelete)
    }
}

impl StandaloneOperations for Unsupported {
    fn licenses<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, Vec<License>> {
        self.fail(Operation::Licenses)
    }

    fn shares<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, Vec<Share>> {
        self.fail(Operation::Shares)
    }

    fn diagnostics<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, Diagnostics> {
        self.fail(Operation::Diagnostics)
    }

    fn database_diagnostics<'a>(
        &'a self,
        _: &'a RequestContext,
    ) -> OpFuture<'a, DatabaseDiagnostics> {
        self.fail(Operation::DatabaseDiagnostics)
    }

    fn tres<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, Vec<TresDefinition>> {
        self.fail(Operation::Tres)
    }

    fn create_tres<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a [TresDefinition],
    ) -> OpFuture<'a, ()> {
        self.fail(Operation::CreateTres)
    }

    fn config<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, DatabaseConfig> {
        self.fail(Operation::Config)
    }

    fn reconfigure<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, ()> {
        self.fail(Operation::Reconfigure)
    }

    fn ping<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, PingReport> {
        self.fail(Operation::Ping)
    }

    fn ping_database<'a>(&'a self, _: &'a RequestContext) -> OpFuture<'a, PingReport> {
        self.fail(Operation::PingDatabase)
    }

    fn instance<'a>(
        &'a self,
        _: &'a RequestContext,
        _: &'a InstanceFilter,
    ) -> OpFuture<'a, Instance> {
        self.fail(Operation::Instance)
    }

    fn instances<'a>(
        &'a self,
        _: &'a RequestContext,
        _: Option<&'a InstanceFilter>,
    ) -> OpFuture<'a, Vec<Instance>> {
        self.fail(Operation::Instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn assert_stub_error(err: &SlurmError, version: ApiVersion) {
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        assert!(err.to_string().contains("not implemented"));
        assert!(err.to_string().contains(version.as_str()));
        assert_eq!(err.version(), Some(version));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_every_wckey_method_fails() {
        let stub = Unsupported::new(ApiVersion::V0041);
        let ctx = RequestContext::new();
        let key = WcKey::default();

        let v = ApiVersion::V0041;

        let err = WcKeyOperations::list(&stub, &ctx, None).await.unwrap_err();
        assert_stub_error(&err, v);
        let err = WcKeyOperations::get(&stub, &ctx, "1").await.unwrap_err();
        assert_stub_error(&err, v);
        let err = WcKeyOperations::create(&stub, &ctx, &key).await.unwrap_err();
        assert_stub_error(&err, v);
        let err = WcKeyOperations::delete(&stub, &ctx, "1").await.unwrap_err();
        assert_stub_error(&err, v);
    }

    #[tokio::test]
    async fn test_job_methods_name_operation() {
        let stub = Unsupported::new(ApiVersion::V0044);
        let ctx = RequestContext::new();
        let err = JobOperations::signal(&stub, &ctx, 7, "SIGTERM").await.unwrap_err();
        assert_stub_error(&err, ApiVersion::V0044);
        assert!(err.message().contains("jobs.signal"));
    }

    #[tokio::test]
    async fn test_standalone_methods_fail() {
        let stub = Unsupported::new(ApiVersion::V0040);
        let ctx = RequestContext::new();
        assert_stub_error(&stub.config(&ctx).await.unwrap_err(), ApiVersion::V0040);
        assert_stub_error(&stub.reconfigure(&ctx).await.unwrap_err(), ApiVersion::V0040);
        assert_stub_error(&stub.create_tres(&ctx, &[]).await.unwrap_err(), ApiVersion::V0040);
        let err = stub.instances(&ctx, None).await.unwrap_err();
        assert_stub_error(&err, ApiVersion::V0040);
        assert!(err.message().contains("standalone.instances"));
        let err = stub.instance(&ctx, &InstanceFilter::default()).await.unwrap_err();
        assert!(err.message().contains("standalone.instance"));
    }

    #[tokio::test]
    async fn test_allocation_and_association_methods_fail() {
        let stub = Unsupported::new(ApiVersion::V0042);
        let ctx = RequestContext::new();
        let v = ApiVersion::V0042;

        let err = JobOperations::allocate(&stub, &ctx, &JobAllocation::new("physics"))
            .await
            .unwrap_err();
        assert_stub_error(&err, v);
        assert!(err.message().contains("jobs.allocate"));
        let err = JobOperations::notify(&stub, &ctx, 7, "hello").await.unwrap_err();
        assert!(err.message().contains("jobs.notify"));
        let err = AccountOperations::create_association(
            &stub,
            &ctx,
            &AccountAssociationRequest::default(),
        )
        .await
        .unwrap_err();
        assert_stub_error(&err, v);
        assert!(err.message().contains("accounts.create_association"));
        let err = UserOperations::create_association(&stub, &ctx, &UserAssociationRequest::default())
            .await
            .unwrap_err();
        assert!(err.message().contains("users.create_association"));
    }
}
