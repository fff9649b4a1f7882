//! Resource managers.
//!
//! Each manager turns one family of operations into wire requests for its
//! adapter's version. Every call first checks the version's capabilities,
//! so an unsupported operation fails before any request is built; errors
//! leaving a manager always carry the version.
//!
//! Controller resources whose records differ between versions are generic
//! over a [`Dialect`](crate::mapper::Dialect). Accounting resources are
//! shaped identically in every version and are not.

mod account;
mod association;
mod cluster;
mod job;
mod node;
mod partition;
mod qos;
mod reservation;
mod standalone;
mod user;
mod wckey;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use slurm_types::Association;

pub use account::AccountManager;
pub use association::AssociationManager;
pub use cluster::ClusterManager;
pub use job::JobManager;
pub use node::NodeManager;
pub use partition::PartitionManager;
pub use qos::QosManager;
pub use reservation::ReservationManager;
pub use standalone::StandaloneManager;
pub use user::UserManager;
pub use wckey::WcKeyManager;

use crate::capability::{Capabilities, Operation};
use crate::error::{SlurmError, SlurmResult};
use crate::mapper::{accounting, body};
use crate::request::Requester;
use crate::version::ApiVersion;

/// State shared by every manager of one adapter.
#[derive(Debug, Clone)]
pub struct ManagerBase {
    requester: Requester,
    capabilities: Arc<Capabilities>,
}

impl ManagerBase {
    /// Bind a requester to the capabilities of its version.
    #[must_use]
    pub fn new(requester: Requester, capabilities: Arc<Capabilities>) -> Self {
        Self {
            requester,
            capabilities,
        }
    }

    /// The requester.
    #[must_use]
    pub const fn requester(&self) -> &Requester {
        &self.requester
    }

    /// Version of the adapter.
    #[must_use]
    pub const fn version(&self) -> ApiVersion {
        self.requester.version()
    }

    /// Run `body` if `operation` is supported, tagging any error with the
    /// version.
    pub(crate) async fn guarded<T>(
        &self,
        operation: Operation,
        body: impl Future<Output = SlurmResult<T>>,
    ) -> SlurmResult<T> {
        self.capabilities.ensure(operation)?;
        body.await.map_err(|err| err.with_version(self.version()))
    }
}

/// `{key: [items...]}`, the accounting API's write shape.
pub(crate) fn collection<T: Serialize>(key: &str, items: &[T]) -> SlurmResult<Value> {
    let items = items.iter().map(body).collect::<SlurmResult<Vec<_>>>()?;
    let mut map = Map::new();
    map.insert(key.to_string(), Value::Array(items));
    Ok(Value::Object(map))
}

/// `POST associations` body carrying every association in `associations`.
pub(crate) fn associations_body(associations: &[Association]) -> SlurmResult<Value> {
    let wire: Vec<_> = associations
        .iter()
        .map(accounting::association_to_wire)
        .collect();
    collection("associations", &wire)
}

/// Reject a blank identifier before it reaches a path.
pub(crate) fn identifier<'a>(field: &str, value: &'a str) -> SlurmResult<&'a str> {
    if value.trim().is_empty() {
        return Err(SlurmError::validation(format!("{field} is required")));
    }
    Ok(value)
}
