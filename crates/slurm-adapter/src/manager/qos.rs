use slurm_types::{Page, Qos, QosFilter, QosUpdate, apply_filter};
use slurm_wire::WireRequest;
use tracing::info;

use super::{ManagerBase, collection, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmResult;
use crate::mapper::accounting;
use crate::operations::{OpFuture, QosOperations};

/// QoS definitions.
#[derive(Debug, Clone)]
pub struct QosManager {
    base: ManagerBase,
}

impl QosManager {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self { base }
    }

    fn qos_path(&self, name: &str) -> SlurmResult<String> {
        Ok(self
            .base
            .requester()
            .slurmdb(&["qos", identifier("qos name", name)?]))
    }

    async fn fetch(&self, ctx: &RequestContext, name: &str) -> SlurmResult<Qos> {
        let requester = self.base.requester();
        let mut envelope = requester
            .send(ctx, WireRequest::get(self.qos_path(name)?))
            .await?;
        requester.one(&mut envelope, "qos", &format!("qos {name}"), accounting::qos)
    }

    async fn write(&self, ctx: &RequestContext, qos: &Qos) -> SlurmResult<()> {
        qos.validate()?;
        let requester = self.base.requester();
        let body = collection("qos", &[accounting::qos_to_wire(qos)])?;
        requester
            .execute(ctx, WireRequest::post(requester.slurmdb(&["qos"]), body))
            .await
    }
}

impl QosOperations for QosManager {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a QosFilter>,
    ) -> OpFuture<'a, Page<Qos>> {
        Box::pin(self.base.guarded(Operation::QosList, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["qos"])))
                .await?;
            let qos = requester.items(&mut envelope, "qos", accounting::qos);
            Ok(apply_filter(qos, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Qos> {
        Box::pin(self.base.guarded(Operation::QosGet, self.fetch(ctx, name)))
    }

    fn create<'a>(&'a self, ctx: &'a RequestContext, qos: &'a Qos) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::QosCreate, async move {
            self.write(ctx, qos).await?;
            info!(version = %self.base.version(), qos = %qos.name, "QoS created");
            Ok(())
        }))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a QosUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::QosUpdate, async move {
            let mut qos = self.fetch(ctx, name).await?;
            update.apply(&mut qos);
            self.write(ctx, &qos).await?;
            info!(version = %self.base.version(), qos = name, "QoS updated");
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::QosDelete, async move {
            self.base
                .requester()
                .execute(ctx, WireRequest::delete(self.qos_path(name)?))
                .await?;
            info!(version = %self.base.version(), qos = name, "QoS deleted");
            Ok(())
        }))
    }
}
