use std::fmt;
use std::marker::PhantomData;

use slurm_types::{Node, NodeEvent, NodeFilter, NodeUpdate, NodeWatchOptions, Page, apply_filter};
use slurm_wire::WireRequest;
use tokio::sync::mpsc;
use tracing::info;

use super::{ManagerBase, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmResult;
use crate::mapper::controller::node_update;
use crate::mapper::{Dialect, body};
use crate::operations::{NodeOperations, OpFuture};
use crate::request::Requester;
use crate::watch::{NodeTracker, spawn_watch, validate_interval};

/// Compute nodes, spoken in dialect `D`.
pub struct NodeManager<D> {
    base: ManagerBase,
    dialect: PhantomData<fn() -> D>,
}

impl<D> Clone for NodeManager<D> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            dialect: PhantomData,
        }
    }
}

impl<D> fmt::Debug for NodeManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeManager").field("base", &self.base).finish()
    }
}

impl<D: Dialect> NodeManager<D> {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self {
            base,
            dialect: PhantomData,
        }
    }

    fn node_path(&self, name: &str) -> SlurmResult<String> {
        let name = identifier("node name", name)?;
        Ok(self.base.requester().slurm(&["node", name]))
    }

    async fn apply(&self, ctx: &RequestContext, name: &str, update: &NodeUpdate) -> SlurmResult<()> {
        update.validate()?;
        let request = WireRequest::post(self.node_path(name)?, body(&node_update(update))?);
        self.base.requester().execute(ctx, request).await?;
        info!(
            version = %D::VERSION,
            node = name,
            state = update.state.as_ref().map(|s| s.as_str()),
            "Node updated"
        );
        Ok(())
    }
}

async fn fetch_nodes<D: Dialect>(
    requester: &Requester,
    ctx: &RequestContext,
) -> SlurmResult<Vec<Node>> {
    let mut envelope = requester
        .send(ctx, WireRequest::get(requester.slurm(&["nodes"])))
        .await?;
    Ok(requester.items(&mut envelope, "nodes", D::node))
}

impl<D: Dialect> NodeOperations for NodeManager<D> {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a NodeFilter>,
    ) -> OpFuture<'a, Page<Node>> {
        Box::pin(self.base.guarded(Operation::NodeList, async move {
            let nodes = fetch_nodes::<D>(self.base.requester(), ctx).await?;
            Ok(apply_filter(nodes, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Node> {
        Box::pin(self.base.guarded(Operation::NodeGet, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(self.node_path(name)?))
                .await?;
            requester.one(&mut envelope, "nodes", &format!("node {name}"), D::node)
        }))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a NodeUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::NodeUpdate, self.apply(ctx, name, update)))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::NodeDelete, async move {
            self.base
                .requester()
                .execute(ctx, WireRequest::delete(self.node_path(name)?))
                .await?;
            info!(version = %D::VERSION, node = name, "Node deleted");
            Ok(())
        }))
    }

    fn drain<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        reason: &'a str,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::NodeUpdate, async move {
            self.apply(ctx, name, &NodeUpdate::drain(reason)).await
        }))
    }

    fn resume<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::NodeUpdate, async move {
            self.apply(ctx, name, &NodeUpdate::resume()).await
        }))
    }

    fn watch<'a>(
        &'a self,
        ctx: &'a RequestContext,
        options: NodeWatchOptions,
    ) -> OpFuture<'a, mpsc::Receiver<NodeEvent>> {
        Box::pin(self.base.guarded(Operation::NodeWatch, async move {
            validate_interval(options.poll_interval)?;
            let requester = self.base.requester().clone();
            Ok(spawn_watch(
                ctx,
                "nodes",
                options.poll_interval,
                options.buffer,
                NodeTracker::new(&options),
                move |ctx| {
                    let requester = requester.clone();
                    async move { fetch_nodes::<D>(&requester, &ctx).await }
                },
            ))
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use slurm_types::NodeState;
    use slurm_wire::Method;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{ScriptedClient, base};
    use crate::version::ApiVersion;
    use crate::versions::{V0040, V0042, V0043};

    #[tokio::test]
    async fn test_list_filters_by_state() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({"nodes": [
                {"name": "n1", "state": ["IDLE"], "cpu_load": 0},
                {"name": "n2", "state": ["IDLE", "DRAIN"], "cpu_load": 50},
                {"name": "n3", "state": ["ALLOCATED"], "cpu_load": 800}
            ]}),
        );
        let manager = NodeManager::<V0043>::new(base(&client, ApiVersion::V0043));
        let filter = NodeFilter {
            states: vec![NodeState::Idle],
            ..NodeFilter::default()
        };
        let page = manager
            .list(&RequestContext::new(), Some(&filter))
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["n1", "n2"]);
        assert_eq!(page.items[1].cpu_load, Some(0.5));
    }

    #[tokio::test]
    async fn test_get_rejects_blank_name() {
        let client = ScriptedClient::new();
        let manager = NodeManager::<V0043>::new(base(&client, ApiVersion::V0043));
        let err = manager.get(&RequestContext::new(), "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_drain_requires_reason() {
        let client = ScriptedClient::new();
        let manager = NodeManager::<V0043>::new(base(&client, ApiVersion::V0043));
        let err = manager
            .drain(&RequestContext::new(), "n1", " ")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_drain_and_resume_bodies() {
        let client = ScriptedClient::new();
        client.set_fallback(200, json!({}));
        let manager = NodeManager::<V0043>::new(base(&client, ApiVersion::V0043));
        let ctx = RequestContext::new();

        manager.drain(&ctx, "n1", "bad dimm").await.unwrap();
        manager.resume(&ctx, "n1").await.unwrap();

        let sent = client.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, "/slurm/v0.0.43/node/n1");
        let drain = sent[0].body.clone().unwrap();
        assert_eq!(drain["state"], json!(["DRAIN"]));
        assert_eq!(drain["reason"], "bad dimm");
        assert_eq!(sent[1].body.clone().unwrap()["state"], json!(["RESUME"]));
    }

    #[tokio::test]
    async fn test_delete_gated_by_version() {
        let client = ScriptedClient::new();
        client.push_ok();
        let ctx = RequestContext::new();

        let v42 = NodeManager::<V0042>::new(base(&client, ApiVersion::V0042));
        assert_eq!(
            v42.delete(&ctx, "n1").await.unwrap_err().kind(),
            ErrorKind::NotImplemented
        );
        assert!(client.requests().is_empty());

        let v40 = NodeManager::<V0040>::new(base(&client, ApiVersion::V0040));
        v40.delete(&ctx, "n1").await.unwrap();
        let sent = client.last_request().unwrap();
        assert_eq!(sent.method, Method::Delete);
        assert_eq!(sent.path, "/slurm/v0.0.40/node/n1");
    }

    #[tokio::test]
    async fn test_watch_unsupported_before_v0043() {
        let client = ScriptedClient::new();
        let manager = NodeManager::<V0042>::new(base(&client, ApiVersion::V0042));
        let err = manager
            .watch(&RequestContext::new(), NodeWatchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
    }
}
