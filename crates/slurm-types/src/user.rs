//! Accounting users.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_of, any_of_opt, any_str};

/// Administrative privilege level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdminLevel {
    /// Regular user.
    #[default]
    None,
    /// Operator.
    Operator,
    /// Administrator.
    Administrator,
    /// A level this adapter does not model.
    Other(String),
}

impl AdminLevel {
    /// Map a wire level name, keeping unknown names verbatim.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "not set" => Self::None,
            "operator" => Self::Operator,
            "administrator" | "admin" => Self::Administrator,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Wire name of this level.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "None",
            Self::Operator => "Operator",
            Self::Administrator => "Administrator",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AdminLevel {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<AdminLevel> for String {
    fn from(value: AdminLevel) -> Self {
        value.as_str().to_string()
    }
}

/// A user in the accounting database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User name.
    pub name: String,
    /// Default account.
    pub default_account: Option<String>,
    /// Default workload characterization key.
    pub default_wckey: Option<String>,
    /// Administrative level.
    pub admin_level: AdminLevel,
    /// Accounts the user is associated with.
    pub accounts: Vec<String>,
    /// Accounts the user coordinates.
    pub coordinator_of: Vec<String>,
    /// Flags.
    pub flags: Vec<String>,
}

impl User {
    /// Create a user with a name.
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

/// Fields that may change on an existing user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New default account.
    pub default_account: Option<String>,
    /// New default wckey.
    pub default_wckey: Option<String>,
    /// New admin level.
    pub admin_level: Option<AdminLevel>,
}

impl UserUpdate {
    /// Apply this delta to an existing user.
    pub fn apply(&self, user: &mut User) {
        if let Some(account) = &self.default_account {
            user.default_account = Some(account.clone());
        }
        if let Some(wckey) = &self.default_wckey {
            user.default_wckey = Some(wckey.clone());
        }
        if let Some(level) = &self.admin_level {
            user.admin_level = level.clone();
        }
    }
}

/// Post-decode criteria for user lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    /// User names to keep.
    pub names: Vec<String>,
    /// Default accounts to keep.
    pub default_accounts: Vec<String>,
    /// Admin levels to keep.
    pub admin_levels: Vec<AdminLevel>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        any_str(&self.names, &user.name)
            && any_of_opt(&self.default_accounts, user.default_account.as_deref())
            && any_of(&self.admin_levels, &user.admin_level)
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}
