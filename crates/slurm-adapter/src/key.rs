//! Composite association keys: `account:user:cluster[:partition]`.

use std::fmt;
use std::str::FromStr;

use slurm_types::Association;

use crate::error::{SlurmError, SlurmResult};

const SEPARATOR: char = ':';

/// Identity of an association where the API has no single opaque id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AssociationKey {
    /// Account name.
    pub account: String,
    /// User name.
    pub user: String,
    /// Cluster name.
    pub cluster: String,
    /// Partition name.
    pub partition: Option<String>,
}

impl AssociationKey {
    /// Create a key without a partition.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        user: impl Into<String>,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            user: user.into(),
            cluster: cluster.into(),
            partition: None,
        }
    }

    /// Add a partition.
    #[must_use]
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    /// Render as `account:user:cluster[:partition]`.
    #[must_use]
    pub fn encode(&self) -> String {
        encode(
            &self.account,
            &self.user,
            &self.cluster,
            self.partition.as_deref(),
        )
    }

    /// Parse `account:user:cluster[:partition]`.
    ///
    /// Fewer than three parts, or an empty account, user or cluster is a
    /// validation error. An empty fourth part means no partition. Parts after
    /// the fourth are ignored.
    pub fn decode(key: &str) -> SlurmResult<Self> {
        let parts: Vec<&str> = key.split(SEPARATOR).collect();
        let (account, user, cluster, partition) = match parts.as_slice() {
            [account, user, cluster] => (*account, *user, *cluster, None),
            [account, user, cluster, partition, ..] => {
                (*account, *user, *cluster, Some(*partition))
            }
            _ => {
                return Err(SlurmError::validation(format!(
                    "invalid association key {key:?}: expected account:user:cluster[:partition]"
                )));
            }
        };

        for (field, value) in [("account", account), ("user", user), ("cluster", cluster)] {
            if value.trim().is_empty() {
                return Err(SlurmError::validation(format!(
                    "invalid association key {key:?}: {field} is empty"
                )));
            }
        }

        Ok(Self {
            account: account.to_string(),
            user: user.to_string(),
            cluster: cluster.to_string(),
            partition: partition
                .filter(|p| !p.is_empty())
                .map(ToString::to_string),
        })
    }

    /// Query parameters identifying this association on the accounting API.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("account".to_string(), self.account.clone()),
            ("user".to_string(), self.user.clone()),
            ("cluster".to_string(), self.cluster.clone()),
        ];
        if let Some(partition) = &self.partition {
            query.push(("partition".to_string(), partition.clone()));
        }
        query
    }

    /// Returns true if `association` has this identity.
    #[must_use]
    pub fn matches(&self, association: &Association) -> bool {
        association.account == self.account
            && association.user == self.user
            && association.cluster == self.cluster
            && association.partition.as_deref().filter(|p| !p.is_empty())
                == self.partition.as_deref()
    }
}

impl From<&Association> for AssociationKey {
    fn from(association: &Association) -> Self {
        Self {
            account: association.account.clone(),
            user: association.user.clone(),
            cluster: association.cluster.clone(),
            partition: association.partition.clone().filter(|p| !p.is_empty()),
        }
    }
}

impl fmt::Display for AssociationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for AssociationKey {
    type Err = SlurmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Render `account:user:cluster[:partition]`.
#[must_use]
pub fn encode(account: &str, user: &str, cluster: &str, partition: Option<&str>) -> String {
    match partition.filter(|p| !p.is_empty()) {
        Some(partition) => format!("{account}:{user}:{cluster}:{partition}"),
        None => format!("{account}:{user}:{cluster}"),
    }
}

/// Parse `account:user:cluster[:partition]`.
pub fn decode(key: &str) -> SlurmResult<AssociationKey> {
    AssociationKey::decode(key)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_encode_three_parts() {
        assert_eq!(encode("physics", "alice", "hpc", None), "physics:alice:hpc");
    }

    #[test]
    fn test_encode_four_parts() {
        let key = AssociationKey::new("physics", "alice", "hpc").with_partition("gpu");
        assert_eq!(key.to_string(), "physics:alice:hpc:gpu");
    }

    #[test]
    fn test_decode_with_partition() {
        let key = decode("physics:alice:hpc:gpu").unwrap();
        assert_eq!(key.account, "physics");
        assert_eq!(key.user, "alice");
        assert_eq!(key.cluster, "hpc");
        assert_eq!(key.partition.as_deref(), Some("gpu"));
    }

    #[test]
    fn test_decode_empty_partition_is_none() {
        let key = decode("physics:alice:hpc:").unwrap();
        assert_eq!(key.partition, None);
    }

    #[test_case("a:u" ; "two parts")]
    #[test_case("a" ; "one part")]
    #[test_case("" ; "empty")]
    #[test_case("a::c" ; "empty user")]
    #[test_case(":u:c" ; "empty account")]
    fn test_decode_rejects(input: &str) {
        let err = decode(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn test_decode_ignores_parts_after_partition() {
        let key = decode("physics:alice:hpc:gpu:extra:more").unwrap();
        assert_eq!(key, AssociationKey::new("physics", "alice", "hpc").with_partition("gpu"));
    }

    #[test]
    fn test_to_query() {
        let query = AssociationKey::new("a", "u", "c").with_partition("p").to_query();
        assert_eq!(query.len(), 4);
        assert_eq!(query[3], ("partition".to_string(), "p".to_string()));
    }

    #[test]
    fn test_matches_association() {
        let mut association = Association::new("a", "u", "c");
        let key = AssociationKey::from(&association);
        assert!(key.matches(&association));
        association.partition = Some("p".to_string());
        assert!(!key.matches(&association));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            account in "[a-z][a-z0-9_]{0,8}",
            user in "[a-z][a-z0-9_]{0,8}",
            cluster in "[a-z][a-z0-9_]{0,8}",
            partition in proptest::option::of("[a-z][a-z0-9_]{0,8}"),
        ) {
            let encoded = encode(&account, &user, &cluster, partition.as_deref());
            let decoded = decode(&encoded).unwrap();
            prop_assert_eq!(decoded.account, account);
            prop_assert_eq!(decoded.user, user);
            prop_assert_eq!(decoded.cluster, cluster);
            prop_assert_eq!(decoded.partition, partition);
        }
    }
}
