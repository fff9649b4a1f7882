//! One [`Dialect`](crate::mapper::Dialect) per supported API version.
//!
//! Newer dialects delegate to the release they inherit from and override
//! only what changed.

pub mod v0_0_40;
pub mod v0_0_41;
pub mod v0_0_42;
pub mod v0_0_43;
pub mod v0_0_44;

pub use v0_0_40::V0040;
pub use v0_0_41::V0041;
pub use v0_0_42::V0042;
pub use v0_0_43::V0043;
pub use v0_0_44::V0044;
