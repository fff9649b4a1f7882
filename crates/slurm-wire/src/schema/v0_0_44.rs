//! v0.0.44 wire shapes (Slurm 25.11).
//!
//! Same records as v0.0.43.

pub use super::base::NodeUpdateRequest;
pub use super::shared::ReservationInfo;
pub use super::v0_0_43::{
    JobAllocRequest, JobAllocResponse, JobDescription, JobInfo, JobSubmitRequest,
    JobSubmitResponse, NodeInfo, PartitionInfo, ReservationDescription, SubmitResult,
};

/// Path segment of this version.
pub const VERSION: &str = "v0.0.44";
