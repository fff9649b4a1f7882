//! Clusters registered in the accounting database.

use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_str};
use crate::tres::TresMap;

/// A cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster name.
    pub name: String,
    /// Node list expression.
    pub nodes: Option<String>,
    /// Controller host.
    pub controller_host: Option<String>,
    /// Controller port.
    pub controller_port: Option<u16>,
    /// RPC protocol version.
    pub rpc_version: Option<u32>,
    /// Select plugin.
    pub select_plugin: Option<String>,
    /// Flags.
    pub flags: Vec<String>,
    /// Cluster TRES.
    pub tres: TresMap,
}

impl Cluster {
    /// Create a cluster with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("name", &self.name)
    }
}

/// Post-decode criteria for cluster lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterFilter {
    /// Cluster names to keep.
    pub names: Vec<String>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Cluster> for ClusterFilter {
    fn matches(&self, cluster: &Cluster) -> bool {
        any_str(&self.names, &cluster.name)
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
