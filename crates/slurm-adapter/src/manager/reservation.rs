use std::fmt;
use std::marker::PhantomData;

use slurm_types::{
    Page, Reservation, ReservationCreate, ReservationFilter, ReservationUpdate, apply_filter,
};
use slurm_wire::WireRequest;
use tracing::info;

use super::{ManagerBase, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmResult;
use crate::mapper::Dialect;
use crate::mapper::controller::reservation;
use crate::operations::{OpFuture, ReservationOperations};

/// Advanced reservations, written in dialect `D`.
///
/// Records read the same in every version; only the write body is
/// version-specific.
pub struct ReservationManager<D> {
    base: ManagerBase,
    dialect: PhantomData<fn() -> D>,
}

impl<D> Clone for ReservationManager<D> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            dialect: PhantomData,
        }
    }
}

impl<D> fmt::Debug for ReservationManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservationManager")
            .field("base", &self.base)
            .finish()
    }
}

impl<D: Dialect> ReservationManager<D> {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self {
            base,
            dialect: PhantomData,
        }
    }

    fn reservation_path(&self, name: &str) -> SlurmResult<String> {
        let name = identifier("reservation name", name)?;
        Ok(self.base.requester().slurm(&["reservation", name]))
    }

    async fn fetch(&self, ctx: &RequestContext, name: &str) -> SlurmResult<Reservation> {
        let requester = self.base.requester();
        let mut envelope = requester
            .send(ctx, WireRequest::get(self.reservation_path(name)?))
            .await?;
        requester.one(
            &mut envelope,
            "reservations",
            &format!("reservation {name}"),
            reservation,
        )
    }

    async fn write(&self, ctx: &RequestContext, request: &ReservationCreate) -> SlurmResult<()> {
        request.validate()?;
        let requester = self.base.requester();
        let body = D::reservation_body(request)?;
        requester
            .execute(ctx, WireRequest::post(requester.slurm(&["reservation"]), body))
            .await
    }
}

impl<D: Dialect> ReservationOperations for ReservationManager<D> {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a ReservationFilter>,
    ) -> OpFuture<'a, Page<Reservation>> {
        Box::pin(self.base.guarded(Operation::ReservationList, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurm(&["reservations"])))
                .await?;
            let reservations = requester.items(&mut envelope, "reservations", reservation);
            Ok(apply_filter(reservations, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Reservation> {
        Box::pin(self.base.guarded(Operation::ReservationGet, self.fetch(ctx, name)))
    }

    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a ReservationCreate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::ReservationCreate, async move {
            self.write(ctx, request).await?;
            info!(version = %D::VERSION, reservation = %request.name, "Reservation created");
            Ok(())
        }))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a ReservationUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::ReservationUpdate, async move {
            let existing = self.fetch(ctx, name).await?;
            let mut request = ReservationCreate::from_existing(&existing);
            update.apply(&mut request);
            self.write(ctx, &request).await?;
            info!(version = %D::VERSION, reservation = name, "Reservation updated");
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::ReservationDelete, async move {
            self.base
                .requester()
                .execute(ctx, WireRequest::delete(self.reservation_path(name)?))
                .await?;
            info!(version = %D::VERSION, reservation = name, "Reservation deleted");
            Ok(())
        }))
    }
}
