use slurm_types::{
    Association, AssociationFilter, AssociationUpdate, Page, apply_filter,
};
use slurm_wire::WireRequest;
use tracing::info;

use super::{ManagerBase, collection};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::{SlurmError, SlurmResult};
use crate::key::AssociationKey;
use crate::mapper::accounting;
use crate::operations::{AssociationOperations, OpFuture};

/// Associations, addressed by `account:user:cluster[:partition]`.
#[derive(Debug, Clone)]
pub struct AssociationManager {
    base: ManagerBase,
}

/// Single-valued filter fields the accounting API can apply itself.
fn server_query(filter: &AssociationFilter) -> Vec<(&'static str, &str)> {
    [
        ("account", &filter.accounts),
        ("user", &filter.users),
        ("cluster", &filter.clusters),
        ("partition", &filter.partitions),
    ]
    .into_iter()
    .filter_map(|(key, values)| match values.as_slice() {
        [single] => Some((key, single.as_str())),
        _ => None,
    })
    .collect()
}

impl AssociationManager {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self { base }
    }

    fn keyed(&self, method: fn(String) -> WireRequest, key: &AssociationKey) -> WireRequest {
        key.to_query()
            .into_iter()
            .fold(method(self.base.requester().slurmdb(&["association"])), |req, (k, v)| {
                req.with_query(k, v)
            })
    }

    async fn fetch(&self, ctx: &RequestContext, key: &AssociationKey) -> SlurmResult<Association> {
        let requester = self.base.requester();
        let mut envelope = requester
            .send(ctx, self.keyed(WireRequest::get, key))
            .await?;
        // Without a partition the server also returns partition-level rows.
        requester
            .items(&mut envelope, "associations", accounting::association)
            .into_iter()
            .find(|association| key.matches(association))
            .ok_or_else(|| SlurmError::not_found(format!("association {key} not found")))
    }

    async fn write(&self, ctx: &RequestContext, association: &Association) -> SlurmResult<()> {
        association.validate()?;
        let requester = self.base.requester();
        let body = collection(
            "associations",
            &[accounting::association_to_wire(association)],
        )?;
        requester
            .execute(
                ctx,
                WireRequest::post(requester.slurmdb(&["associations"]), body),
            )
            .await
    }
}

impl AssociationOperations for AssociationManager {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a AssociationFilter>,
    ) -> OpFuture<'a, Page<Association>> {
        Box::pin(self.base.guarded(Operation::AssociationList, async move {
            let requester = self.base.requester();
            let mut request = WireRequest::get(requester.slurmdb(&["associations"]));
            for (key, value) in filter.map(server_query).unwrap_or_default() {
                request = request.with_query(key, value);
            }
            let mut envelope = requester.send(ctx, request).await?;
            let associations =
                requester.items(&mut envelope, "associations", accounting::association);
            Ok(apply_filter(associations, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, key: &'a str) -> OpFuture<'a, Association> {
        Box::pin(self.base.guarded(Operation::AssociationGet, async move {
            self.fetch(ctx, &AssociationKey::decode(key)?).await
        }))
    }

    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        association: &'a Association,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::AssociationCreate, async move {
            self.write(ctx, association).await?;
            info!(
                version = %self.base.version(),
                key = %AssociationKey::from(association),
                "Association created"
            );
            Ok(())
        }))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        key: &'a str,
        update: &'a AssociationUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::AssociationUpdate, async move {
            let key = AssociationKey::decode(key)?;
            let mut association = self.fetch(ctx, &key).await?;
            update.apply(&mut association);
            self.write(ctx, &association).await?;
            info!(version = %self.base.version(), key = %key, "Association updated");
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, key: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::AssociationDelete, async move {
            let key = AssociationKey::decode(key)?;
            self.base
                .requester()
                .execute(ctx, self.keyed(WireRequest::delete, &key))
                .await?;
            info!(version = %self.base.version(), key = %key, "Association deleted");
            Ok(())
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use slurm_wire::Method;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{ScriptedClient, base};
    use crate::version::ApiVersion;

    fn rows() -> serde_json::Value {
        json!({"associations": [
            {"account": "physics", "user": "alice", "cluster": "c1", "partition": "gpu"},
            {"account": "physics", "user": "alice", "cluster": "c1"},
            {"account": "physics", "user": "bob", "cluster": "c1"}
        ]})
    }

    #[test]
    fn test_server_query_only_single_values() {
        let filter = AssociationFilter {
            accounts: vec!["physics".into()],
            users: vec!["alice".into(), "bob".into()],
            ..AssociationFilter::default()
        };
        assert_eq!(server_query(&filter), vec![("account", "physics")]);
    }

    #[tokio::test]
    async fn test_list_sends_query_and_post_filters() {
        let client = ScriptedClient::new();
        client.push_json(200, rows());
        let manager = AssociationManager::new(base(&client, ApiVersion::V0043));
        let filter = AssociationFilter {
            accounts: vec!["physics".into()],
            users: vec!["alice".into(), "carol".into()],
            ..AssociationFilter::default()
        };
        let page = manager
            .list(&RequestContext::new(), Some(&filter))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        let sent = client.last_request().unwrap();
        assert_eq!(sent.query_value("account"), Some("physics"));
        assert_eq!(sent.query_value("user"), None);
    }

    #[tokio::test]
    async fn test_get_by_key_matches_exactly() {
        let client = ScriptedClient::new();
        client.push_json(200, rows());
        let manager = AssociationManager::new(base(&client, ApiVersion::V0043));
        let association = manager
            .get(&RequestContext::new(), "physics:alice:c1")
            .await
            .unwrap();
        assert_eq!(association.partition, None);

        let sent = client.last_request().unwrap();
        assert_eq!(sent.path, "/slurmdb/v0.0.43/association");
        assert_eq!(sent.query_value("cluster"), Some("c1"));
        assert_eq!(sent.query_value("partition"), None);
    }

    #[tokio::test]
    async fn test_bad_key_is_validation() {
        let client = ScriptedClient::new();
        let manager = AssociationManager::new(base(&client, ApiVersion::V0043));
        let err = manager
            .get(&RequestContext::new(), "physics:alice")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_unsupported_on_v0040() {
        let client = ScriptedClient::new();
        let manager = AssociationManager::new(base(&client, ApiVersion::V0040));
        let ctx = RequestContext::new();
        let err = manager
            .update(&ctx, "a:u:c", &AssociationUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        let err = manager.delete(&ctx, "a:u:c").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_partition_key() {
        let client = ScriptedClient::new();
        client.push_ok();
        let manager = AssociationManager::new(base(&client, ApiVersion::V0042));
        manager
            .delete(&RequestContext::new(), "physics:alice:c1:gpu")
            .await
            .unwrap();
        let sent = client.last_request().unwrap();
        assert_eq!(sent.method, Method::Delete);
        assert_eq!(sent.query_value("partition"), Some("gpu"));
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let client = ScriptedClient::new();
        client.push_json(200, rows());
        client.push_ok();
        let manager = AssociationManager::new(base(&client, ApiVersion::V0041));
        let update = AssociationUpdate {
            max_jobs: Some(10),
            ..AssociationUpdate::default()
        };
        manager
            .update(&RequestContext::new(), "physics:bob:c1", &update)
            .await
            .unwrap();
        let written = client.last_request().unwrap().body.unwrap();
        let row = &written["associations"][0];
        assert_eq!(row["user"], "bob");
        assert_eq!(row["max"]["jobs"]["active"]["number"], 10);
    }
}
