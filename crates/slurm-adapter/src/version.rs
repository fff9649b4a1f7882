//! API version identifiers and the release compatibility matrix.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SlurmError;

/// Accepts `v0.0.42` and `0.0.42`.
static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v?0\.0\.(\d{2})$").unwrap_or_else(|_| unreachable!()));

/// A supported Slurm REST API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiVersion {
    /// v0.0.40
    V0040,
    /// v0.0.41
    V0041,
    /// v0.0.42
    V0042,
    /// v0.0.43
    V0043,
    /// v0.0.44
    V0044,
}

/// A wire change introduced between two adjacent versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakingChange {
    /// Version that introduced the change.
    pub introduced_in: ApiVersion,
    /// What changed.
    pub description: &'static str,
}

const BREAKING_CHANGES: &[BreakingChange] = &[
    BreakingChange {
        introduced_in: ApiVersion::V0041,
        description: "job field minimum_switches renamed to required_switches",
    },
    BreakingChange {
        introduced_in: ApiVersion::V0042,
        description: "job exclusive and partition oversubscribe fields removed",
    },
    BreakingChange {
        introduced_in: ApiVersion::V0042,
        description: "node cpu_load reported as a bare integer",
    },
    BreakingChange {
        introduced_in: ApiVersion::V0042,
        description: "job script moved inside the job description",
    },
    BreakingChange {
        introduced_in: ApiVersion::V0043,
        description: "reservation create, update and delete endpoints added",
    },
];

impl ApiVersion {
    /// Every supported version, oldest first.
    pub const ALL: [Self; 5] = [
        Self::V0040,
        Self::V0041,
        Self::V0042,
        Self::V0043,
        Self::V0044,
    ];

    /// Newest supported version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V0044
    }

    /// Version recommended for production use.
    #[must_use]
    pub const fn stable() -> Self {
        Self::V0042
    }

    /// Path segment, e.g. `v0.0.42`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V0040 => "v0.0.40",
            Self::V0041 => "v0.0.41",
            Self::V0042 => "v0.0.42",
            Self::V0043 => "v0.0.43",
            Self::V0044 => "v0.0.44",
        }
    }

    /// Slurm releases whose `slurmrestd` serves this version.
    #[must_use]
    pub const fn supported_slurm_releases(self) -> &'static [&'static str] {
        match self {
            Self::V0040 => &["24.05", "24.11", "25.05"],
            Self::V0041 => &["24.11", "25.05", "25.11"],
            Self::V0042 | Self::V0043 => &["25.05", "25.11"],
            Self::V0044 => &["25.11"],
        }
    }

    /// Whether `release` (e.g. `24.11` or `24.11.3`) serves this version.
    #[must_use]
    pub fn is_compatible_with(self, release: &str) -> bool {
        let short = major_minor(release);
        self.supported_slurm_releases()
            .iter()
            .any(|supported| *supported == short)
    }

    /// Newest version served by `release`.
    #[must_use]
    pub fn best_for_slurm(release: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|v| v.is_compatible_with(release))
    }

    /// Wire changes crossed when moving from `from` to `to`, in either
    /// direction.
    #[must_use]
    pub fn breaking_changes(from: Self, to: Self) -> Vec<BreakingChange> {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        BREAKING_CHANGES
            .iter()
            .filter(|c| c.introduced_in > low && c.introduced_in <= high)
            .copied()
            .collect()
    }
}

fn major_minor(release: &str) -> &str {
    let mut dots = release.match_indices('.').map(|(i, _)| i);
    match (dots.next(), dots.next()) {
        (Some(_), Some(second)) => &release[..second],
        _ => release,
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = SlurmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "latest" => return Ok(Self::latest()),
            "stable" => return Ok(Self::stable()),
            _ => {}
        }
        let minor = VERSION_REGEX
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        match minor {
            Some("40") => Ok(Self::V0040),
            Some("41") => Ok(Self::V0041),
            Some("42") => Ok(Self::V0042),
            Some("43") => Ok(Self::V0043),
            Some("44") => Ok(Self::V0044),
            _ => Err(SlurmError::unsupported_version(s)),
        }
    }
}
