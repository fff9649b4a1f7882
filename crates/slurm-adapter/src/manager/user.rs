use slurm_types::{Page, User, UserAssociationRequest, UserFilter, UserUpdate, apply_filter};
use slurm_wire::WireRequest;
use tracing::info;

use super::{ManagerBase, associations_body, collection, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmResult;
use crate::mapper::accounting;
use crate::operations::{OpFuture, UserOperations};

/// Users in the accounting database.
#[derive(Debug, Clone)]
pub struct UserManager {
    base: ManagerBase,
}

impl UserManager {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self { base }
    }

    fn user_path(&self, name: &str) -> SlurmResult<String> {
        Ok(self
            .base
            .requester()
            .slurmdb(&["user", identifier("user name", name)?]))
    }

    async fn fetch(&self, ctx: &RequestContext, name: &str) -> SlurmResult<User> {
        let requester = self.base.requester();
        let mut envelope = requester
            .send(ctx, WireRequest::get(self.user_path(name)?))
            .await?;
        requester.one(
            &mut envelope,
            "users",
            &format!("user {name}"),
            accounting::user,
        )
    }

    async fn write(&self, ctx: &RequestContext, user: &User) -> SlurmResult<()> {
        user.validate()?;
        let requester = self.base.requester();
        let body = collection("users", &[accounting::user_to_wire(user, None)])?;
        requester
            .execute(ctx, WireRequest::post(requester.slurmdb(&["users"]), body))
            .await
    }
}

impl UserOperations for UserManager {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a UserFilter>,
    ) -> OpFuture<'a, Page<User>> {
        Box::pin(self.base.guarded(Operation::UserList, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["users"])))
                .await?;
            let users = requester.items(&mut envelope, "users", accounting::user);
            Ok(apply_filter(users, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, User> {
        Box::pin(self.base.guarded(Operation::UserGet, self.fetch(ctx, name)))
    }

    fn create<'a>(&'a self, ctx: &'a RequestContext, user: &'a User) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::UserCreate, async move {
            self.write(ctx, user).await?;
            info!(version = %self.base.version(), user = %user.name, "User created");
            Ok(())
        }))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a UserUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::UserUpdate, async move {
            let mut user = self.fetch(ctx, name).await?;
            update.apply(&mut user);
            self.write(ctx, &user).await?;
            info!(version = %self.base.version(), user = name, "User updated");
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::UserDelete, async move {
            self.base
                .requester()
                .execute(ctx, WireRequest::delete(self.user_path(name)?))
                .await?;
            info!(version = %self.base.version(), user = name, "User deleted");
            Ok(())
        }))
    }

    fn create_association<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a UserAssociationRequest,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::UserCreateAssociation, async move {
            request.validate()?;
            let requester = self.base.requester();
            let body = associations_body(&request.associations())?;
            requester
                .execute(ctx, WireRequest::post(requester.slurmdb(&["associations"]), body))
                .await?;
            info!(
                version = %self.base.version(),
                account = %request.account,
                count = request.users.len(),
                "User associations created"
            );
            Ok(())
        }))
    }
}
