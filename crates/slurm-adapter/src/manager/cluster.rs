use slurm_types::{Cluster, ClusterFilter, Page, apply_filter};
use slurm_wire::WireRequest;
use tracing::info;

use super::{ManagerBase, collection, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmResult;
use crate::mapper::accounting;
use crate::operations::{ClusterOperations, OpFuture};

/// Clusters registered in the accounting database.
#[derive(Debug, Clone)]
pub struct ClusterManager {
    base: ManagerBase,
}

impl ClusterManager {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self { base }
    }

    fn cluster_path(&self, name: &str) -> SlurmResult<String> {
        Ok(self
            .base
            .requester()
            .slurmdb(&["cluster", identifier("cluster name", name)?]))
    }
}

impl ClusterOperations for ClusterManager {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a ClusterFilter>,
    ) -> OpFuture<'a, Page<Cluster>> {
        Box::pin(self.base.guarded(Operation::ClusterList, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["clusters"])))
                .await?;
            let clusters = requester.items(&mut envelope, "clusters", accounting::cluster);
            Ok(apply_filter(clusters, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Cluster> {
        Box::pin(self.base.guarded(Operation::ClusterGet, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(self.cluster_path(name)?))
                .await?;
            requester.one(
                &mut envelope,
                "clusters",
                &format!("cluster {name}"),
                accounting::cluster,
            )
        }))
    }

    fn create<'a>(&'a self, ctx: &'a RequestContext, cluster: &'a Cluster) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::ClusterCreate, async move {
            cluster.validate()?;
            let requester = self.base.requester();
            let body = collection("clusters", &[accounting::cluster_to_wire(cluster)])?;
            requester
                .execute(ctx, WireRequest::post(requester.slurmdb(&["clusters"]), body))
                .await?;
            info!(version = %self.base.version(), cluster = %cluster.name, "Cluster created");
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::ClusterDelete, async move {
            self.base
                .requester()
                .execute(ctx, WireRequest::delete(self.cluster_path(name)?))
                .await?;
            info!(version = %self.base.version(), cluster = name, "Cluster deleted");
            Ok(())
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{ScriptedClient, base};
    use crate::version::ApiVersion;

    #[tokio::test]
    async fn test_list_paginates() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({"clusters": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}),
        );
        let manager = ClusterManager::new(base(&client, ApiVersion::V0043));
        let filter = ClusterFilter {
            page: slurm_types::Pagination::new(1, 1),
            ..ClusterFilter::default()
        };
        let page = manager
            .list(&RequestContext::new(), Some(&filter))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].name, "b");
    }

    #[tokio::test]
    async fn test_get_controller_address() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({"clusters": [{
                "name": "c1",
                "controller": {"host": "ctl", "port": 6817}
            }]}),
        );
        let manager = ClusterManager::new(base(&client, ApiVersion::V0040));
        let cluster = manager.get(&RequestContext::new(), "c1").await.unwrap();
        assert_eq!(cluster.controller_host.as_deref(), Some("ctl"));
        assert_eq!(cluster.controller_port, Some(6817));
    }

    #[tokio::test]
    async fn test_create_posts_collection() {
        let client = ScriptedClient::new();
        client.push_ok();
        let manager = ClusterManager::new(base(&client, ApiVersion::V0042));
        manager
            .create(&RequestContext::new(), &Cluster::new("c2"))
            .await
            .unwrap();
        let sent = client.last_request().unwrap();
        assert_eq!(sent.path, "/slurmdb/v0.0.42/clusters");
        assert_eq!(sent.body.unwrap()["clusters"][0]["name"], "c2");
    }
}
