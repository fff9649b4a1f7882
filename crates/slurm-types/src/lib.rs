//! # slurm-types
//!
//! The version-independent common model exposed by the Slurm adapter layer.
//!
//! Every entity here is plain data. Wire wrappers, version quirks and
//! "present versus zero" ambiguity are resolved before these values are
//! built, so callers never see which API version produced them.
//!
//! ## Entities
//!
//! - [`Job`], [`Node`], [`Partition`], [`Reservation`] from the controller
//! - [`Account`], [`Association`], [`User`], [`Qos`], [`WcKey`], [`Cluster`]
//!   from the accounting database
//! - [`License`], [`Share`], [`Diagnostics`], [`PingReport`] and friends for
//!   cluster-wide queries
//!
//! ## Helpers
//!
//! - [`TresMap`] with [`parse_tres_string`] / [`format_tres_string`]
//! - [`format_duration`] / [`parse_duration`] for Slurm time limits
//! - [`ListFilter`] and [`apply_filter`] for post-decode filtering
//! - [`AccountHierarchy`] for name-based parent/child lookup
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use slurm_types::{format_duration, parse_tres_string};
//!
//! let tres = parse_tres_string("cpu=4,mem=2G");
//! assert_eq!(tres.get("mem"), Some(&2048));
//! assert_eq!(format_duration(Duration::from_secs(91_815)), "25:30:15");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod association;
pub mod cluster;
pub mod duration;
pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod job;
pub mod node;
pub mod partition;
pub mod qos;
pub mod reservation;
pub mod standalone;
pub mod tres;
pub mod user;
pub mod watch;
pub mod wckey;

pub use account::{Account, AccountFilter, AccountUpdate};
pub use association::{
    AccountAssociationRequest, Association, AssociationFilter, AssociationOptions,
    AssociationUpdate, UserAssociationRequest,
};
pub use cluster::{Cluster, ClusterFilter};
pub use duration::{format_duration, format_minutes, parse_duration};
pub use error::{TypesError, TypesResult};
pub use filter::{ListFilter, Page, Pagination, apply_filter, paginate};
pub use hierarchy::AccountHierarchy;
pub use job::{
    Job, JobAllocateResponse, JobAllocation, JobFilter, JobState, JobSubmission, JobSubmitResponse,
    JobUpdate,
};
pub use node::{Node, NodeFilter, NodeState, NodeUpdate};
pub use partition::{Partition, PartitionFilter, PartitionState, PartitionUpdate};
pub use qos::{Qos, QosFilter, QosUpdate};
pub use reservation::{Reservation, ReservationCreate, ReservationFilter, ReservationUpdate};
pub use standalone::{
    ControllerPing, DatabaseConfig, DatabaseDiagnostics, Diagnostics, Instance, InstanceFilter,
    License, PingReport, RpcStat, Share, TresDefinition,
};
pub use tres::{TresMap, format_tres_string, parse_memory_mb, parse_tres_string};
pub use user::{AdminLevel, User, UserFilter, UserUpdate};
pub use watch::{
    JobEvent, JobEventKind, JobWatchOptions, NodeEvent, NodeEventKind, NodeWatchOptions,
};
pub use wckey::{WcKey, WcKeyFilter};
