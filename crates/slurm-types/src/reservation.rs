//! Advanced reservations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_str};
use crate::tres::TresMap;

/// An advanced reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation name.
    pub name: String,
    /// Accounts allowed to use it.
    pub accounts: Vec<String>,
    /// Users allowed to use it.
    pub users: Vec<String>,
    /// Start time.
    pub start_time: Option<DateTime<Utc>>,
    /// End time.
    pub end_time: Option<DateTime<Utc>>,
    /// Reserved node list expression.
    pub node_list: Option<String>,
    /// Reserved node count.
    pub node_count: Option<u32>,
    /// Reserved core count.
    pub core_count: Option<u32>,
    /// Partition.
    pub partition: Option<String>,
    /// Flags.
    pub flags: Vec<String>,
    /// Required features.
    pub features: Option<String>,
    /// Reserved TRES.
    pub tres: TresMap,
}

impl Reservation {
    /// Returns true if `at` falls inside the reservation window.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_time.is_some_and(|start| start <= at)
            && self.end_time.is_none_or(|end| at < end)
    }
}

/// A reservation to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCreate {
    /// Reservation name.
    pub name: String,
    /// Start time.
    pub start_time: Option<DateTime<Utc>>,
    /// End time. Either this or `duration_minutes` is required.
    pub end_time: Option<DateTime<Utc>>,
    /// Duration in minutes.
    pub duration_minutes: Option<u32>,
    /// Nodes to reserve.
    pub node_list: Vec<String>,
    /// Node count, when nodes are not named.
    pub node_count: Option<u32>,
    /// Allowed accounts.
    pub accounts: Vec<String>,
    /// Allowed users.
    pub users: Vec<String>,
    /// Partition.
    pub partition: Option<String>,
    /// Flags.
    pub flags: Vec<String>,
}

impl ReservationCreate {
    /// Check required fields before dispatch.
    pub fn validate(&self) -> TypesResult<()> {
        require("name", &self.name)?;
        if self.start_time.is_none() {
            return Err(TypesError::missing("start_time"));
        }
        if self.end_time.is_none() && self.duration_minutes.is_none() {
            return Err(TypesError::missing("end_time"));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(TypesError::invalid("end_time", "must be after start_time"));
            }
        }
        if self.accounts.is_empty() && self.users.is_empty() {
            return Err(TypesError::missing("accounts"));
        }
        Ok(())
    }

    /// Build a create request carrying the state of an existing reservation.
    #[must_use]
    pub fn from_existing(reservation: &Reservation) -> Self {
        Self {
            name: reservation.name.clone(),
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            duration_minutes: None,
            node_list: reservation
                .node_list
                .iter()
                .flat_map(|list| list.split(','))
                .map(str::trim)
                .filter(|node| !node.is_empty())
                .map(ToString::to_string)
                .collect(),
            node_count: reservation.node_count,
            accounts: reservation.accounts.clone(),
            users: reservation.users.clone(),
            partition: reservation.partition.clone(),
            flags: reservation.flags.clone(),
        }
    }
}

/// Fields that may change on an existing reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationUpdate {
    /// New start time.
    pub start_time: Option<DateTime<Utc>>,
    /// New end time.
    pub end_time: Option<DateTime<Utc>>,
    /// Replacement account list.
    pub accounts: Option<Vec<String>>,
    /// Replacement user list.
    pub users: Option<Vec<String>>,
    /// Replacement node list.
    pub node_list: Option<Vec<String>>,
    /// Replacement flags.
    pub flags: Option<Vec<String>>,
}

impl ReservationUpdate {
    /// Apply this delta to a create request built from the existing reservation.
    pub fn apply(&self, request: &mut ReservationCreate) {
        request.start_time = self.start_time.or(request.start_time);
        request.end_time = self.end_time.or(request.end_time);
        if let Some(accounts) = &self.accounts {
            request.accounts.clone_from(accounts);
        }
        if let Some(users) = &self.users {
            request.users.clone_from(users);
        }
        if let Some(nodes) = &self.node_list {
            request.node_list.clone_from(nodes);
        }
        if let Some(flags) = &self.flags {
            request.flags.clone_from(flags);
        }
    }
}

/// Post-decode criteria for reservation lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFilter {
    /// Reservation names to keep.
    pub names: Vec<String>,
    /// Keep reservations open to any of these accounts.
    pub accounts: Vec<String>,
    /// Keep reservations open to any of these users.
    pub users: Vec<String>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Reservation> for ReservationFilter {
    fn matches(&self, reservation: &Reservation) -> bool {
        any_str(&self.names, &reservation.name)
            && (self.accounts.is_empty()
                || self.accounts.iter().any(|a| reservation.accounts.contains(a)))
            && (self.users.is_empty() || self.users.iter().any(|u| reservation.users.contains(u)))
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
