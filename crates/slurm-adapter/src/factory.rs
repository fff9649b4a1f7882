//! Adapter construction from a version string.

use std::sync::Arc;

use slurm_wire::WireClient;

use crate::adapter::Adapter;
use crate::error::SlurmResult;
use crate::version::ApiVersion;
use crate::versions::{V0040, V0041, V0042, V0043, V0044};

/// Build the adapter for `version`, a version string or alias.
///
/// Accepts `v0.0.42`, `0.0.42`, `latest` and `stable`. Anything else fails
/// with `UNSUPPORTED_VERSION`.
pub fn build(version: &str, client: Arc<dyn WireClient>) -> SlurmResult<Adapter> {
    let version: ApiVersion = version.parse()?;
    Ok(build_version(version, client))
}

/// Build the adapter for a resolved version.
#[must_use]
pub fn build_version(version: ApiVersion, client: Arc<dyn WireClient>) -> Adapter {
    match version {
        ApiVersion::V0040 => Adapter::new::<V0040>(client),
        ApiVersion::V0041 => Adapter::new::<V0041>(client),
        ApiVersion::V0042 => Adapter::new::<V0042>(client),
        ApiVersion::V0043 => Adapter::new::<V0043>(client),
        ApiVersion::V0044 => Adapter::new::<V0044>(client),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::adapter::VersionAdapter;
    use crate::error::ErrorKind;
    use crate::testing::ScriptedClient;

    #[test_case("v0.0.40", ApiVersion::V0040 ; "prefixed")]
    #[test_case("0.0.43", ApiVersion::V0043 ; "bare")]
    #[test_case("latest", ApiVersion::V0044 ; "latest alias")]
    #[test_case("stable", ApiVersion::V0042 ; "stable alias")]
    fn test_build(input: &str, expected: ApiVersion) {
        let adapter = build(input, ScriptedClient::new()).unwrap();
        assert_eq!(adapter.version(), expected);
    }

    #[test_case("v0.0.39" ; "too old")]
    #[test_case("v0.0.45" ; "too new")]
    #[test_case("" ; "empty")]
    fn test_build_rejects(input: &str) {
        let err = build(input, ScriptedClient::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
    }

    #[test]
    fn test_every_version_builds() {
        for version in ApiVersion::ALL {
            let adapter = build_version(version, ScriptedClient::new());
            assert_eq!(adapter.version(), version);
            assert_eq!(adapter.capabilities().version(), version);
        }
    }
}
