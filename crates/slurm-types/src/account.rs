//! Accounting accounts.

use serde::{Deserialize, Serialize};

use crate::error::{TypesResult, require};
use crate::filter::{ListFilter, Pagination, any_of_opt, any_str};

/// An account in the accounting database.
///
/// `parent_account` and `child_accounts` are names. They are filled in from
/// associations by [`crate::AccountHierarchy::annotate`], not by the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Organization.
    pub organization: Option<String>,
    /// Coordinator user names.
    pub coordinators: Vec<String>,
    /// Account flags.
    pub flags: Vec<String>,
    /// Parent account name.
    pub parent_account: Option<String>,
    /// Direct child account names.
    pub child_accounts: Vec<String>,
}

impl Account {
    /// Create an account with a name.
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

/// Fields that may change on an existing account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// New description.
    pub description: Option<String>,
    /// New organization.
    pub organization: Option<String>,
    /// Replacement coordinator list.
    pub coordinators: Option<Vec<String>>,
}

impl AccountUpdate {
    /// Apply this delta to an existing account.
    pub fn apply(&self, account: &mut Account) {
        if let Some(description) = &self.description {
            account.description = Some(description.clone());
        }
        if let Some(organization) = &self.organization {
            account.organization = Some(organization.clone());
        }
        if let Some(coordinators) = &self.coordinators {
            account.coordinators.clone_from(coordinators);
        }
    }
}

/// Post-decode criteria for account lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFilter {
    /// Account names to keep.
    pub names: Vec<String>,
    /// Organizations to keep.
    pub organizations: Vec<String>,
    /// Pagination.
    pub page: Pagination,
}

impl ListFilter<Account> for AccountFilter {
    fn matches(&self, account: &Account) -> bool {
        any_str(&self.names, &account.name)
            && any_of_opt(&self.organizations, account.organization.as_deref())
    }

    fn pagination(&self) -> Pagination {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_apply_only_touches_set_fields() {
        let mut account = Account {
            name: "physics".into(),
            description: Some("old".into()),
            organization: Some("science".into()),
            ..Account::default()
        };
        let update = AccountUpdate {
            description: Some("new".into()),
            ..AccountUpdate::default()
        };
        update.apply(&mut account);
        assert_eq!(account.description.as_deref(), Some("new"));
        assert_eq!(account.organization.as_deref(), Some("science"));
    }

    #[test]
    fn test_validate() {
        assert!(Account::default().validate().is_err());
        assert!(Account::new("physics").validate().is_ok());
    }

    #[test]
    fn test_filter_by_organization() {
        let mut a = Account::new("a");
        a.organization = Some("org1".into());
        let b = Account::new("b");
        let filter = AccountFilter {
            organizations: vec!["org1".into()],
            ..AccountFilter::default()
        };
        assert!(filter.matches(&a));
        assert!(!filter.matches(&b));
    }
}
