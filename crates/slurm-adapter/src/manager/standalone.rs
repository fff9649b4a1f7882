use slurm_types::{
    DatabaseConfig, DatabaseDiagnostics, Diagnostics, Instance, InstanceFilter, License,
    PingReport, Share, TresDefinition,
};
use slurm_wire::WireRequest;
use slurm_wire::schema::shared::{
    ControllerStatistics, DatabaseConfigReport, DatabaseStatistics, SharesReport,
};
use tracing::{info, warn};

use super::{ManagerBase, collection};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::{SlurmError, SlurmResult};
use crate::mapper::{accounting, report};
use crate::operations::{OpFuture, StandaloneOperations};

/// Cluster-wide queries on both daemons.
#[derive(Debug, Clone)]
pub struct StandaloneManager {
    base: ManagerBase,
}

impl StandaloneManager {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self { base }
    }

    async fn ping_at(&self, ctx: &RequestContext, path: String) -> SlurmResult<PingReport> {
        let requester = self.base.requester();
        let mut envelope = requester.send(ctx, WireRequest::get(path)).await?;
        let slurm_version = envelope.slurm_release();
        let cluster = envelope.cluster();
        Ok(PingReport {
            controllers: requester.items(&mut envelope, "pings", report::ping),
            slurm_version,
            cluster,
        })
    }

    fn instance_request(&self, resource: &str, filter: Option<&InstanceFilter>) -> WireRequest {
        let path = self.base.requester().slurmdb(&[resource]);
        filter
            .map(InstanceFilter::to_query)
            .unwrap_or_default()
            .into_iter()
            .fold(WireRequest::get(path), |request, (key, value)| {
                request.with_query(key, value)
            })
    }
}

impl StandaloneOperations for StandaloneManager {
    fn licenses<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Vec<License>> {
        Box::pin(self.base.guarded(Operation::Licenses, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurm(&["licenses"])))
                .await?;
            Ok(requester.items(&mut envelope, "licenses", report::license))
        }))
    }

    fn shares<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Vec<Share>> {
        Box::pin(self.base.guarded(Operation::Shares, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurm(&["shares"])))
                .await?;
            let wire: SharesReport = requester.object(&mut envelope, "shares")?;
            Ok(wire
                .shares
                .into_iter()
                .filter_map(|entry| match report::share(entry) {
                    Ok(share) => Some(share),
                    Err(err) => {
                        warn!(error = %err, "Skipping share entry");
                        None
                    }
                })
                .collect())
        }))
    }

    fn diagnostics<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Diagnostics> {
        Box::pin(self.base.guarded(Operation::Diagnostics, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurm(&["diag"])))
                .await?;
            let wire: ControllerStatistics = requester.object(&mut envelope, "statistics")?;
            Ok(report::diagnostics(wire))
        }))
    }

    fn database_diagnostics<'a>(
        &'a self,
        ctx: &'a RequestContext,
    ) -> OpFuture<'a, DatabaseDiagnostics> {
        Box::pin(self.base.guarded(Operation::DatabaseDiagnostics, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["diag"])))
                .await?;
            let wire: DatabaseStatistics = requester.object(&mut envelope, "statistics")?;
            Ok(report::database_diagnostics(wire))
        }))
    }

    fn tres<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, Vec<TresDefinition>> {
        Box::pin(self.base.guarded(Operation::Tres, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["tres"])))
                .await?;
            Ok(requester.items(&mut envelope, "TRES", accounting::tres_definition))
        }))
    }

    fn create_tres<'a>(
        &'a self,
        ctx: &'a RequestContext,
        definitions: &'a [TresDefinition],
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::CreateTres, async move {
            if definitions.is_empty() {
                return Err(SlurmError::validation("no TRES to create"));
            }
            for definition in definitions {
                definition.validate()?;
            }
            let wire: Vec<_> = definitions
                .iter()
                .map(accounting::tres_definition_to_wire)
                .collect();
            let requester = self.base.requester();
            requester
                .execute(
                    ctx,
                    WireRequest::post(requester.slurmdb(&["tres"]), collection("TRES", &wire)?),
                )
                .await?;
            info!(version = %self.base.version(), count = definitions.len(), "TRES created");
            Ok(())
        }))
    }

    fn config<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, DatabaseConfig> {
        Box::pin(self.base.guarded(Operation::Config, async move {
            let requester = self.base.requester();
            let envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["config"])))
                .await?;
            let wire: DatabaseConfigReport = envelope.payload_as().map_err(|err| {
                SlurmError::malformed("undecodable accounting configuration").with_source(err)
            })?;
            Ok(report::database_config(wire))
        }))
    }

    fn reconfigure<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::Reconfigure, async move {
            let requester = self.base.requester();
            requester
                .execute(ctx, WireRequest::get(requester.slurm(&["reconfigure"])))
                .await?;
            info!(version = %self.base.version(), "Controller reconfigured");
            Ok(())
        }))
    }

    fn ping<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, PingReport> {
        Box::pin(self.base.guarded(Operation::Ping, async move {
            self.ping_at(ctx, self.base.requester().slurm(&["ping"])).await
        }))
    }

    fn ping_database<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, PingReport> {
        Box::pin(self.base.guarded(Operation::PingDatabase, async move {
            self.ping_at(ctx, self.base.requester().slurmdb(&["ping"])).await
        }))
    }

    fn instance<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: &'a InstanceFilter,
    ) -> OpFuture<'a, Instance> {
        Box::pin(self.base.guarded(Operation::Instance, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, self.instance_request("instance", Some(filter)))
                .await?;
            requester.one(&mut envelope, "instances", "instance", report::instance)
        }))
    }

    fn instances<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a InstanceFilter>,
    ) -> OpFuture<'a, Vec<Instance>> {
        Box::pin(self.base.guarded(Operation::Instances, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, self.instance_request("instances", filter))
                .await?;
            Ok(requester.items(&mut envelope, "instances", report::instance))
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{ScriptedClient, base};
    use crate::version::ApiVersion;

    fn manager(client: &std::sync::Arc<ScriptedClient>, version: ApiVersion) -> StandaloneManager {
        StandaloneManager::new(base(client, version))
    }

    #[tokio::test]
    async fn test_ping_reads_meta() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({
                "meta": {"slurm": {"release": "24.05.3", "cluster": "hpc"}},
                "pings": [
                    {"hostname": "ctl1", "pinged": "UP", "latency": 100, "mode": "primary"},
                    {"hostname": "ctl2", "pinged": "DOWN"}
                ]
            }),
        );
        let report = manager(&client, ApiVersion::V0040)
            .ping(&RequestContext::new())
            .await
            .unwrap();
        assert_eq!(report.controllers.len(), 2);
        assert!(report.is_healthy());
        assert_eq!(report.slurm_version.as_deref(), Some("24.05.3"));
        assert_eq!(report.cluster.as_deref(), Some("hpc"));
        assert_eq!(client.last_request().unwrap().path, "/slurm/v0.0.40/ping");
    }

    #[tokio::test]
    async fn test_ping_database_gated() {
        let client = ScriptedClient::new();
        let err = manager(&client, ApiVersion::V0040)
            .ping_database(&RequestContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_licenses_and_shares() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({"licenses": [{"LicenseName": "matlab", "Total": 10, "Used": 4, "Free": 6}]}),
        );
        client.push_json(
            200,
            json!({"shares": {"shares": [
                {"name": "root", "shares": {"set": true, "number": 1}},
                {"cluster": "hpc"}
            ]}}),
        );
        let manager = manager(&client, ApiVersion::V0042);
        let ctx = RequestContext::new();

        let licenses = manager.licenses(&ctx).await.unwrap();
        assert_eq!(licenses[0].name, "matlab");
        assert_eq!(licenses[0].free, 6);

        let shares = manager.shares(&ctx).await.unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].name, "root");
    }

    #[tokio::test]
    async fn test_create_tres_only_where_exposed() {
        let client = ScriptedClient::new();
        client.push_ok();
        let definitions = [TresDefinition {
            kind: "gres".into(),
            name: Some("gpu".into()),
            ..TresDefinition::default()
        }];
        let ctx = RequestContext::new();

        let err = manager(&client, ApiVersion::V0042)
            .create_tres(&ctx, &definitions)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotImplemented);

        manager(&client, ApiVersion::V0043)
            .create_tres(&ctx, &definitions)
            .await
            .unwrap();
        let sent = client.last_request().unwrap();
        assert_eq!(sent.path, "/slurmdb/v0.0.43/tres");
        assert_eq!(sent.body.unwrap()["TRES"][0]["type"], "gres");
    }

    #[tokio::test]
    async fn test_config_names() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({
                "clusters": [{"name": "hpc"}],
                "accounts": [{"name": "root"}, {"name": "physics"}],
                "TRES": [{"type": "cpu", "id": 1}]
            }),
        );
        let config = manager(&client, ApiVersion::V0041)
            .config(&RequestContext::new())
            .await
            .unwrap();
        assert_eq!(config.clusters, vec!["hpc"]);
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.tres[0].kind, "cpu");
    }

    #[tokio::test]
    async fn test_diagnostics_statistics() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({"statistics": {"server_thread_count": 3, "jobs_running": 12}}),
        );
        let diagnostics = manager(&client, ApiVersion::V0044)
            .diagnostics(&RequestContext::new())
            .await
            .unwrap();
        assert_eq!(diagnostics.server_thread_count, Some(3));
        assert_eq!(diagnostics.jobs_running, Some(12));
    }

    #[tokio::test]
    async fn test_instances_send_filter() {
        let client = ScriptedClient::new();
        client.push_json(
            200,
            json!({"instances": [
                {"cluster": "main", "instance_id": "i-1", "node_name": "cloud1"},
                {"instance_id": "i-orphan"},
                {"cluster": "main", "instance_id": "i-2", "node_name": "cloud2"}
            ]}),
        );
        let manager = manager(&client, ApiVersion::V0041);
        let filter = InstanceFilter {
            clusters: vec!["main".into()],
            instance_types: vec!["m5.large".into()],
            ..InstanceFilter::default()
        };
        let instances = manager
            .instances(&RequestContext::new(), Some(&filter))
            .await
            .unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[1].node_name.as_deref(), Some("cloud2"));

        let sent = client.last_request().unwrap();
        assert_eq!(sent.path, "/slurmdb/v0.0.41/instances");
        assert_eq!(sent.query_value("cluster"), Some("main"));
        assert_eq!(sent.query_value("instance_type"), Some("m5.large"));
        assert_eq!(sent.query_value("node_list"), None);
    }

    #[tokio::test]
    async fn test_instance_empty_is_not_found() {
        let client = ScriptedClient::new();
        client.push_json(200, json!({"instances": []}));
        let manager = manager(&client, ApiVersion::V0043);
        let filter = InstanceFilter {
            instance_ids: vec!["i-9".into()],
            ..InstanceFilter::default()
        };
        let err = manager
            .instance(&RequestContext::new(), &filter)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let sent = client.last_request().unwrap();
        assert_eq!(sent.path, "/slurmdb/v0.0.43/instance");
        assert_eq!(sent.query_value("instance_id"), Some("i-9"));
    }

    #[tokio::test]
    async fn test_instances_only_on_odd_releases() {
        let client = ScriptedClient::new();
        for version in [ApiVersion::V0040, ApiVersion::V0042, ApiVersion::V0044] {
            let err = manager(&client, version)
                .instances(&RequestContext::new(), None)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotImplemented);
            assert_eq!(err.version(), Some(version));
        }
        assert!(client.requests().is_empty());
    }
}
