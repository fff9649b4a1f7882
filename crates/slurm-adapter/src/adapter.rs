//! The version adapter: one set of managers bound to one API version.

use std::fmt;
use std::sync::Arc;

use slurm_wire::WireClient;
use tracing::debug;

use crate::capability::{Capabilities, Resource};
use crate::manager::{
    AccountManager, AssociationManager, ClusterManager, JobManager, ManagerBase, NodeManager,
    PartitionManager, QosManager, ReservationManager, StandaloneManager, UserManager,
    WcKeyManager,
};
use crate::mapper::Dialect;
use crate::operations::{
    AccountOperations, AssociationOperations, ClusterOperations, JobOperations, NodeOperations,
    PartitionOperations, QosOperations, ReservationOperations, StandaloneOperations,
    UserOperations, WcKeyOperations,
};
use crate::request::Requester;
use crate::stub::Unsupported;
use crate::version::ApiVersion;

/// Version-agnostic access to every resource manager.
///
/// Callers hold an adapter as `dyn VersionAdapter` and never see which
/// API version sits behind it, except through [`capabilities`].
///
/// [`capabilities`]: VersionAdapter::capabilities
pub trait VersionAdapter: Send + Sync + fmt::Debug {
    /// API version every request is built for.
    fn version(&self) -> ApiVersion;

    /// Operations this version exposes.
    fn capabilities(&self) -> &Capabilities;

    /// Jobs.
    fn jobs(&self) -> &dyn JobOperations;

    /// Nodes.
    fn nodes(&self) -> &dyn NodeOperations;

    /// Partitions.
    fn partitions(&self) -> &dyn PartitionOperations;

    /// Accounts.
    fn accounts(&self) -> &dyn AccountOperations;

    /// Associations.
    fn associations(&self) -> &dyn AssociationOperations;

    /// QoS.
    fn qos(&self) -> &dyn QosOperations;

    /// Reservations.
    fn reservations(&self) -> &dyn ReservationOperations;

    /// Users.
    fn users(&self) -> &dyn UserOperations;

    /// Workload characterization keys.
    fn wckeys(&self) -> &dyn WcKeyOperations;

    /// Clusters.
    fn clusters(&self) -> &dyn ClusterOperations;

    /// Licenses, shares, diagnostics, TRES, config and ping.
    fn standalone(&self) -> &dyn StandaloneOperations;
}

/// Managers for one API version sharing a single wire client.
pub struct Adapter {
    capabilities: Arc<Capabilities>,
    jobs: Box<dyn JobOperations>,
    nodes: Box<dyn NodeOperations>,
    partitions: Box<dyn PartitionOperations>,
    accounts: Box<dyn AccountOperations>,
    associations: Box<dyn AssociationOperations>,
    qos: Box<dyn QosOperations>,
    reservations: Box<dyn ReservationOperations>,
    users: Box<dyn UserOperations>,
    wckeys: Box<dyn WcKeyOperations>,
    clusters: Box<dyn ClusterOperations>,
    standalone: Box<dyn StandaloneOperations>,
}

impl Adapter {
    /// Bind every manager for dialect `D` to `client`.
    ///
    /// Resources the version lacks entirely are served by [`Unsupported`].
    #[must_use]
    pub fn new<D: Dialect>(client: Arc<dyn WireClient>) -> Self {
        let version = D::VERSION;
        let capabilities = Arc::new(Capabilities::for_version(version));
        let base = ManagerBase::new(Requester::new(client, version), capabilities.clone());
        let stub = Unsupported::new(version);

        let wckeys: Box<dyn WcKeyOperations> =
            if capabilities.supports_resource(Resource::WcKeys) {
                Box::new(WcKeyManager::new(base.clone()))
            } else {
                Box::new(stub)
            };
        let clusters: Box<dyn ClusterOperations> =
            if capabilities.supports_resource(Resource::Clusters) {
                Box::new(ClusterManager::new(base.clone()))
            } else {
                Box::new(stub)
            };

        debug!(
            version = %version,
            unsupported = capabilities.unsupported().len(),
            "Adapter created"
        );

        Self {
            jobs: Box::new(JobManager::<D>::new(base.clone())),
            nodes: Box::new(NodeManager::<D>::new(base.clone())),
            partitions: Box::new(PartitionManager::<D>::new(base.clone())),
            accounts: Box::new(AccountManager::new(base.clone())),
            associations: Box::new(AssociationManager::new(base.clone())),
            qos: Box::new(QosManager::new(base.clone())),
            reservations: Box::new(ReservationManager::<D>::new(base.clone())),
            users: Box::new(UserManager::new(base.clone())),
            wckeys,
            clusters,
            standalone: Box::new(StandaloneManager::new(base)),
            capabilities,
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("version", &self.capabilities.version())
            .field("unsupported", &self.capabilities.unsupported())
            .finish_non_exhaustive()
    }
}

impl VersionAdapter for Adapter {
    fn version(&self) -> ApiVersion {
        self.capabilities.version()
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn jobs(&self) -> &dyn JobOperations {
        self.jobs.as_ref()
    }

    fn nodes(&self) -> &dyn NodeOperations {
        self.nodes.as_ref()
    }

    fn partitions(&self) -> &dyn PartitionOperations {
        self.partitions.as_ref()
    }

    fn accounts(&self) -> &dyn AccountOperations {
        self.accounts.as_ref()
    }

    fn associations(&self) -> &dyn AssociationOperations {
        self.associations.as_ref()
    }

    fn qos(&self) -> &dyn QosOperations {
        self.qos.as_ref()
    }

    fn reservations(&self) -> &dyn ReservationOperations {
        self.reservations.as_ref()
    }

    fn users(&self) -> &dyn UserOperations {
        self.users.as_ref()
    }

    fn wckeys(&self) -> &dyn WcKeyOperations {
        self.wckeys.as_ref()
    }

    fn clusters(&self) -> &dyn ClusterOperations {
        self.clusters.as_ref()
    }

    fn standalone(&self) -> &dyn StandaloneOperations {
        self.standalone.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::capability::Operation;
    use crate::context::RequestContext;
    use crate::error::ErrorKind;
    use crate::testing::ScriptedClient;
    use crate::versions::{V0040, V0041, V0042};

    #[test]
    fn test_reports_version() {
        let adapter = Adapter::new::<V0042>(ScriptedClient::new());
        assert_eq!(adapter.version(), ApiVersion::V0042);
        assert_eq!(adapter.capabilities().version(), ApiVersion::V0042);
        assert!(adapter.capabilities().supports(Operation::JobHold));
    }

    #[tokio::test]
    async fn test_missing_resources_use_stub() {
        let client = ScriptedClient::new();
        let adapter = Adapter::new::<V0041>(client.clone());
        let ctx = RequestContext::new();

        let err = adapter.wckeys().list(&ctx, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        let err = adapter.clusters().get(&ctx, "c1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_managers_share_client() {
        let client = ScriptedClient::new();
        client.push_json(200, json!({"jobs": []}));
        client.push_json(200, json!({"clusters": [{"name": "c1"}]}));
        let adapter: Box<dyn VersionAdapter> = Box::new(Adapter::new::<V0040>(client.clone()));
        let ctx = RequestContext::new();

        assert!(adapter.jobs().list(&ctx, None).await.unwrap().is_empty());
        let cluster = adapter.clusters().get(&ctx, "c1").await.unwrap();
        assert_eq!(cluster.name, "c1");

        let paths: Vec<_> = client.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["/slurm/v0.0.40/jobs", "/slurmdb/v0.0.40/cluster/c1"]
        );
    }

    #[test]
    fn test_debug_lists_gaps() {
        let adapter = Adapter::new::<V0041>(ScriptedClient::new());
        let rendered = format!("{adapter:?}");
        assert!(rendered.contains("V0041"));
        assert!(rendered.contains("WcKeyList"));
    }
}
