//! Account hierarchy reconstructed from associations.
//!
//! Parents and children are resolved by name on demand. Nothing here holds
//! references between entities.

use std::collections::{BTreeMap, BTreeSet};

use crate::account::Account;
use crate::association::Association;

/// Name-keyed parent links between accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountHierarchy {
    parents: BTreeMap<String, String>,
}

impl AccountHierarchy {
    /// Collect parent links from account-level associations (empty user).
    #[must_use]
    pub fn from_associations(associations: &[Association]) -> Self {
        let parents = associations
            .iter()
            .filter(|a| a.user.is_empty())
            .filter_map(|a| {
                let parent = a.parent_account.as_deref()?.trim();
                (!parent.is_empty() && parent != a.account)
                    .then(|| (a.account.clone(), parent.to_string()))
            })
            .collect();
        Self { parents }
    }

    /// Parent account name.
    #[must_use]
    pub fn parent_of(&self, account: &str) -> Option<&str> {
        self.parents.get(account).map(String::as_str)
    }

    /// Direct children, sorted by name.
    #[must_use]
    pub fn children_of(&self, account: &str) -> Vec<&str> {
        self.parents
            .iter()
            .filter(|(_, parent)| parent.as_str() == account)
            .map(|(child, _)| child.as_str())
            .collect()
    }

    /// Ancestors from nearest to root. Stops if the links form a cycle.
    #[must_use]
    pub fn ancestors(&self, account: &str) -> Vec<&str> {
        let mut seen = BTreeSet::from([account]);
        let mut chain = Vec::new();
        let mut current = account;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Fill `parent_account` and `child_accounts` on each account.
    pub fn annotate(&self, accounts: &mut [Account]) {
        for account in accounts {
            account.parent_account = self.parent_of(&account.name).map(ToString::to_string);
            account.child_accounts = self
                .children_of(&account.name)
                .into_iter()
                .map(ToString::to_string)
                .collect();
        }
    }
}
