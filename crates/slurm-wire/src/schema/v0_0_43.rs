//! v0.0.43 wire shapes (Slurm 25.05 and 25.11).
//!
//! Controller records are unchanged from v0.0.42. Reservations become
//! writable.

use serde::{Deserialize, Serialize};

use crate::noval::NoVal;

pub use super::base::NodeUpdateRequest;
pub use super::shared::ReservationInfo;
pub use super::v0_0_42::{
    JobAllocRequest, JobAllocResponse, JobDescription, JobInfo, JobSubmitRequest,
    JobSubmitResponse, NodeInfo, PartitionInfo, SubmitResult,
};

/// Path segment of this version.
pub const VERSION: &str = "v0.0.43";

/// Body of `POST /slurm/v0.0.43/reservation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationDescription {
    /// Name.
    pub name: String,
    /// Start, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NoVal<i64>>,
    /// End, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NoVal<i64>>,
    /// Duration, minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<NoVal<u32>>,
    /// Nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_list: Vec<String>,
    /// Node count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_count: Option<NoVal<u32>>,
    /// Accounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
    /// Users.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    /// Partition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    /// Flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_reservation_description_lists() {
        let desc = ReservationDescription {
            name: "maint".into(),
            start_time: Some(NoVal::set(1_700_000_000)),
            duration: Some(NoVal::set(60)),
            users: vec!["root".into()],
            ..ReservationDescription::default()
        };
        let value = serde_json::to_value(&desc).unwrap();
        assert_eq!(value["users"], json!(["root"]));
        assert_eq!(value["duration"]["number"], 60);
        assert!(value.get("node_list").is_none());
    }
}
