//! User/account/cluster associations.

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_of_opt, any_str};
use crate::tres::TresMap;

/// An association between an account, a user, a cluster and optionally a
/// partition.
///
/// Account-level associations have an empty `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Database id.
    pub id: Option<u32>,
    /// Account name.
    pub account: String,
    /// User name; empty for account-level associations.
    pub user: String,
    /// Cluster name.
    pub cluster: String,
    /// Partition name.
    pub partition: Option<String>,
    /// Parent account name.
    pub parent_account: Option<String>,
    /// Whether this is the user's default association.
    pub is_default: bool,
    /// Default QoS.
    pub default_qos: Option<String>,
    /// Allowed QoS.
    pub qos: Vec<String>,
    /// Fairshare shares.
    pub shares: Option<u32>,
    /// Association priority.
    pub priority: Option<u32>,
    /// Maximum running jobs.
    pub max_jobs: Option<u32>,
    /// Maximum submitted jobs.
    pub max_submit_jobs: Option<u32>,
    /// Maximum wall time per job in minutes.
    pub max_wall_per_job: Option<u32>,
    /// Per-job TRES limits.
    pub max_tres_per_job: TresMap,
    /// Aggregate TRES limits.
    pub grp_tres: TresMap,
}

impl Association {
    /// Create an association for `account`, `user` and `cluster`.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        user: impl Into<String>,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            user: user.into(),
            cluster: cluster.into(),
            ..Self::default()
        }
    }

    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("account", &self.account)?;
        require("user", &self.user)?;
        require("cluster", &self.cluster)
    }
}

/// Options shared by bulk association creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationOptions {
    /// Cluster name. Required.
    pub cluster: String,
    /// Partition name.
    pub partition: Option<String>,
    /// Default QoS, also added to the allowed list.
    pub qos: Option<String>,
    /// Maximum running jobs.
    pub max_jobs: Option<u32>,
    /// Association priority.
    pub priority: Option<u32>,
}

impl AssociationOptions {
    /// Options for `cluster` with nothing else set.
    #[must_use]
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            ..Self::default()
        }
    }

    fn build(&self, account: &str, user: &str) -> Association {
        let qos = self.qos.clone().filter(|q| !q.trim().is_empty());
        Association {
            partition: self.partition.clone().filter(|p| !p.trim().is_empty()),
            qos: qos.iter().cloned().collect(),
            default_qos: qos,
            max_jobs: self.max_jobs,
            priority: self.priority,
            ..Association::new(account, user, self.cluster.clone())
        }
    }
}

/// Account-level associations for several accounts on one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssociationRequest {
    /// Account names.
    pub accounts: Vec<String>,
    /// Shared options.
    pub options: AssociationOptions,
}

impl AccountAssociationRequest {
    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        if self.accounts.is_empty() {
            return Err(TypesError::invalid("accounts", "at least one account is required"));
        }
        for account in &self.accounts {
            require("account", account)?;
        }
        require("cluster", &self.options.cluster)
    }

    /// One account-level association per account.
    #[must_use]
    pub fn associations(&self) -> Vec<Association> {
        self.accounts
            .iter()
            .map(|account| self.options.build(account, ""))
            .collect()
    }
}

/// User associations for several users under one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAssociationRequest {
    /// User names.
    pub users: Vec<String>,
    /// Account the users join.
    pub account: String,
    /// Shared options.
    pub options: AssociationOptions,
}

impl UserAssociationRequest {
    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        if self.users.is_empty() {
            return Err(TypesError::invalid("users", "at least one user is required"));
        }
        for user in &self.users {
            require("user", user)?;
        }
        require("account", &self.account)?;
        require("cluster", &self.options.cluster)
    }

    /// One association per user.
    #[must_use]
    pub fn associations(&self) -> Vec<Association> {
        self.users
            .iter()
            .map(|user| self.options.build(&self.account, user))
            .collect()
    }
}

/// Fields that may change on an existing association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationUpdate {
    /// New default QoS.
    pub default_qos: Option<String>,
    /// Replacement QoS list.
    pub qos: Option<Vec<String>>,
    /// New shares.
    pub shares: Option<u32>,
    /// New priority.
    pub priority: Option<u32>,
    /// New running jobs limit.
    pub max_jobs: Option<u32>,
    /// New submitted jobs limit.
    pub max_submit_jobs: Option<u32>,
    /// New wall time limit in minutes.
    pub max_wall_per_job: Option<u32>,
    /// Replacement per-job TRES limits.
    pub max_tres_per_job: Option<TresMap>,
    /// New default flag.
    pub is_default: Option<bool>,
}

impl AssociationUpdate {
    /// Apply this delta to an existing association.
    pub fn apply(&self, association: &mut Association) {
        if let Some(qos) = &self.default_qos {
            association.default_qos = Some(qos.clone());
        }
        if let Some(qos) = &self.qos {
            association.qos.clone_from(qos);
        }
        if let Some(tres) = &self.max_tres_per_job {
            association.max_tres_per_job.clone_from(tres);
        }
        association.shares = self.shares.or(association.shares);
        association.priority = self.priority.or(association.priority);
        association.max_jobs = self.max_jobs.or(association.max_jobs);
        association.max_submit_jobs = self.max_submit_jobs.or(association.max_submit_jobs);
        association.max_wall_per_job = self.max_wall_per_job.or(association.max_wall_per_job);
        association.is_default = self.is_default.unwrap_or(association.is_default);
    }
}

/// Post-decode criteria for association lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationFilter {
    /// Accounts to keep.
    pub accounts: Vec<String>,
    /// Users to keep.
    pub users: Vec<String>,
    /// Clusters to keep.
    pub clusters: Vec<String>,
    /// Partitions to keep.
    pub partitions: Vec<String>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Association> for AssociationFilter {
    fn matches(&self, association: &Association) -> bool {
        any_str(&self.accounts, &association.account)
            && any_str(&self.users, &association.user)
            && any_str(&self.clusters, &association.cluster)
            && any_of_opt(&self.partitions, association.partition.as_deref())
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
