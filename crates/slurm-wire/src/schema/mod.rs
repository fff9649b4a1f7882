//! Typed wire schemas, one module per API version.
//!
//! Records that never changed live in [`shared`] and [`base`]; each version
//! module re-exports what it inherits and defines what differs, so a
//! version's complete vocabulary is always `schema::v0_0_4x::*`.

pub mod base;
pub mod shared;
pub mod v0_0_40;
pub mod v0_0_41;
pub mod v0_0_42;
pub mod v0_0_43;
pub mod v0_0_44;
