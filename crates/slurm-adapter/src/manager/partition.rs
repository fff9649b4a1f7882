use std::fmt;
use std::marker::PhantomData;

use slurm_types::{Page, Partition, PartitionFilter, PartitionUpdate, apply_filter};
use slurm_wire::WireRequest;

use super::{ManagerBase, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::{SlurmError, SlurmResult};
use crate::mapper::Dialect;
use crate::operations::{OpFuture, PartitionOperations};

/// Partitions, spoken in dialect `D`.
///
/// Partitions are configured in `slurm.conf`; the REST API only reads them.
pub struct PartitionManager<D> {
    base: ManagerBase,
    dialect: PhantomData<fn() -> D>,
}

impl<D> Clone for PartitionManager<D> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            dialect: PhantomData,
        }
    }
}

impl<D> fmt::Debug for PartitionManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionManager")
            .field("base", &self.base)
            .finish()
    }
}

impl<D: Dialect> PartitionManager<D> {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self {
            base,
            dialect: PhantomData,
        }
    }

    fn no_endpoint<T>(operation: Operation) -> SlurmResult<T> {
        Err(SlurmError::not_implemented(operation.as_str(), D::VERSION))
    }
}

impl<D: Dialect> PartitionOperations for PartitionManager<D> {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a PartitionFilter>,
    ) -> OpFuture<'a, Page<Partition>> {
        Box::pin(self.base.guarded(Operation::PartitionList, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurm(&["partitions"])))
                .await?;
            let partitions = requester.items(&mut envelope, "partitions", D::partition);
            Ok(apply_filter(partitions, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Partition> {
        Box::pin(self.base.guarded(Operation::PartitionGet, async move {
            let requester = self.base.requester();
            let path = requester.slurm(&["partition", identifier("partition name", name)?]);
            let mut envelope = requester.send(ctx, WireRequest::get(path)).await?;
            requester.one(
                &mut envelope,
                "partitions",
                &format!("partition {name}"),
                D::partition,
            )
        }))
    }

    fn create<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        partition: &'a Partition,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::PartitionCreate, async move {
            partition.validate()?;
            Self::no_endpoint(Operation::PartitionCreate)
        }))
    }

    fn update<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        name: &'a str,
        _update: &'a PartitionUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::PartitionUpdate, async move {
            identifier("partition name", name)?;
            Self::no_endpoint(Operation::PartitionUpdate)
        }))
    }

    fn delete<'a>(&'a self, _ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::PartitionDelete, async move {
            identifier("partition name", name)?;
            Self::no_endpoint(Operation::PartitionDelete)
        }))
    }
}
