use slurm_types::{Page, WcKey, WcKeyFilter, apply_filter};
use slurm_wire::WireRequest;
use tracing::info;

use super::{ManagerBase, collection, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmResult;
use crate::mapper::accounting;
use crate::operations::{OpFuture, WcKeyOperations};

/// Workload characterization keys, addressed by database id.
#[derive(Debug, Clone)]
pub struct WcKeyManager {
    base: ManagerBase,
}

impl WcKeyManager {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self { base }
    }

    fn wckey_path(&self, id: &str) -> SlurmResult<String> {
        Ok(self
            .base
            .requester()
            .slurmdb(&["wckey", identifier("wckey id", id)?]))
    }
}

impl WcKeyOperations for WcKeyManager {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a WcKeyFilter>,
    ) -> OpFuture<'a, Page<WcKey>> {
        Box::pin(self.base.guarded(Operation::WcKeyList, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["wckeys"])))
                .await?;
            let wckeys = requester.items(&mut envelope, "wckeys", accounting::wckey);
            Ok(apply_filter(wckeys, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, id: &'a str) -> OpFuture<'a, WcKey> {
        Box::pin(self.base.guarded(Operation::WcKeyGet, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(self.wckey_path(id)?))
                .await?;
            requester.one(
                &mut envelope,
                "wckeys",
                &format!("wckey {id}"),
                accounting::wckey,
            )
        }))
    }

    fn create<'a>(&'a self, ctx: &'a RequestContext, wckey: &'a WcKey) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::WcKeyCreate, async move {
            wckey.validate()?;
            let requester = self.base.requester();
            let body = collection("wckeys", &[accounting::wckey_to_wire(wckey)])?;
            requester
                .execute(ctx, WireRequest::post(requester.slurmdb(&["wckeys"]), body))
                .await?;
            info!(
                version = %self.base.version(),
                wckey = %wckey.name,
                user = %wckey.user,
                "WCKey created"
            );
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, id: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::WcKeyDelete, async move {
            self.base
                .requester()
                .execute(ctx, WireRequest::delete(self.wckey_path(id)?))
                .await?;
            info!(version = %self.base.version(), id, "WCKey deleted");
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

    #[tokio::test]
    async fn test_get_by_id() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({"wckeys": [{"id": 3, "name": "ml", "user": "alice", "cluster": "c1"}]}),
        );
        let manager = WcKeyManager::new(base(&client, ApiVersion::V0042));
        let wckey = manager.get(&RequestContext::new(), "3").await.unwrap();
        assert_eq!(wckey.id, Some(3));
        assert_eq!(wckey.name, "ml");
        assert_eq!(
            client.last_request().unwrap().path,
            "/slurmdb/v0.0.42/wckey/3"
        );
    }

    #[tokio::test]
    async fn test_create_requires_user_and_cluster() {
        let client = ScriptedClient::new();
        let manager = WcKeyManager::new(base(&client, ApiVersion::V0042));
        let wckey = WcKey {
            name: "ml".into(),
            ..WcKey::default()
        };
        let err = manager
            .create(&RequestContext::new(), &wckey)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let client = ScriptedClient::new();
        client.set_fallback(200, json!({}));
        let manager = WcKeyManager::new(base(&client, ApiVersion::V0044));
        let ctx = RequestContext::new();
        let wckey = WcKey {
            name: "ml".into(),
            user: "alice".into(),
            cluster: "c1".into(),
            ..WcKey::default()
        };
        manager.create(&ctx, &wckey).await.unwrap();
        manager.delete(&ctx, "12").await.unwrap();

        let sent = client.requests();
        assert_eq!(sent[0].path, "/slurmdb/v0.0.44/wckeys");
        assert_eq!(sent[0].body.as_ref().unwrap()["wckeys"][0]["user"], "alice");
        assert_eq!(sent[1].method, Method::Delete);
        assert_eq!(sent[1].path, "/slurmdb/v0.0.44/wckey/12");
    }
}
