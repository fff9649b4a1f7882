//! Workload characterization keys.

use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_str};

/// A workload characterization key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcKey {
    /// Database id.
    pub id: Option<u32>,
    /// Key name.
    pub name: String,
    /// Owning user.
    pub user: String,
    /// Cluster.
    pub cluster: String,
    /// Flags.
    pub flags: Vec<String>,
}

impl WcKey {
    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("name", &self.name)?;
        require("user", &self.user)?;
        require("cluster", &self.cluster)
    }
}

/// Post-decode criteria for wckey lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcKeyFilter {
    /// Names to keep.
    pub names: Vec<String>,
    /// Users to keep.
    pub users: Vec<String>,
    /// Clusters to keep.
    pub clusters: Vec<String>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<WcKey> for WcKeyFilter {
    fn matches(&self, key: &WcKey) -> bool {
        any_str(&self.names, &key.name)
            && any_str(&self.users, &key.user)
            && any_str(&self.clusters, &key.cluster)
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
