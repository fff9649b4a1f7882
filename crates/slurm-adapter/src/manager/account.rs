use slurm_types::{
    Account, AccountAssociationRequest, AccountFilter, AccountHierarchy, AccountUpdate, Page,
    apply_filter,
};
use slurm_wire::WireRequest;
use tracing::info;

use super::{ManagerBase, associations_body, collection, identifier};
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::SlurmResult;
use crate::mapper::accounting;
use crate::operations::{AccountOperations, OpFuture};

/// Accounts in the accounting database.
///
/// Writes go through `POST accounts`, which creates or replaces; an update
/// reads the account, applies the delta and writes it back.
#[derive(Debug, Clone)]
pub struct AccountManager {
    base: ManagerBase,
}

impl AccountManager {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self { base }
    }

    async fn fetch(&self, ctx: &RequestContext, name: &str) -> SlurmResult<Account> {
        let requester = self.base.requester();
        let path = requester.slurmdb(&["account", identifier("account name", name)?]);
        let mut envelope = requester.send(ctx, WireRequest::get(path)).await?;
        requester.one(
            &mut envelope,
            "accounts",
            &format!("account {name}"),
            accounting::account,
        )
    }

    async fn write(&self, ctx: &RequestContext, account: &Account) -> SlurmResult<()> {
        account.validate()?;
        let requester = self.base.requester();
        let body = collection("accounts", &[accounting::account_to_wire(account)])?;
        requester
            .execute(ctx, WireRequest::post(requester.slurmdb(&["accounts"]), body))
            .await
    }
}

impl AccountOperations for AccountManager {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a AccountFilter>,
    ) -> OpFuture<'a, Page<Account>> {
        Box::pin(self.base.guarded(Operation::AccountList, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["accounts"])))
                .await?;
            let accounts = requester.items(&mut envelope, "accounts", accounting::account);
            Ok(apply_filter(accounts, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, Account> {
        Box::pin(self.base.guarded(Operation::AccountGet, self.fetch(ctx, name)))
    }

    fn create<'a>(&'a self, ctx: &'a RequestContext, account: &'a Account) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::AccountCreate, async move {
            self.write(ctx, account).await?;
            info!(version = %self.base.version(), account = %account.name, "Account created");
            Ok(())
        }))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        name: &'a str,
        update: &'a AccountUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::AccountUpdate, async move {
            let mut account = self.fetch(ctx, name).await?;
            update.apply(&mut account);
            self.write(ctx, &account).await?;
            info!(version = %self.base.version(), account = name, "Account updated");
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, ctx: &'a RequestContext, name: &'a str) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::AccountDelete, async move {
            let requester = self.base.requester();
            let path = requester.slurmdb(&["account", identifier("account name", name)?]);
            requester.execute(ctx, WireRequest::delete(path)).await?;
            info!(version = %self.base.version(), account = name, "Account deleted");
            Ok(())
        }))
    }

    fn hierarchy<'a>(&'a self, ctx: &'a RequestContext) -> OpFuture<'a, AccountHierarchy> {
        Box::pin(self.base.guarded(Operation::AccountHierarchy, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(requester.slurmdb(&["associations"])))
                .await?;
            let associations =
                requester.items(&mut envelope, "associations", accounting::association);
            Ok(AccountHierarchy::from_associations(&associations))
        }))
    }

    fn create_association<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a AccountAssociationRequest,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::AccountCreateAssociation, async move {
            request.validate()?;
            let requester = self.base.requester();
            let body = associations_body(&request.associations())?;
            requester
                .execute(ctx, WireRequest::post(requester.slurmdb(&["associations"]), body))
                .await?;
            info!(
                version = %self.base.version(),
                cluster = %request.options.cluster,
                count = request.accounts.len(),
                "Account associations created"
            );
            Ok(())
        }))
    }
}
