//! Integration test crate for the Slurm REST adapter layer.
//!
//! This crate exists solely to run tests that span the adapter, wire and
//! pool crates. It has no public API; all functionality is in the test
//! modules.

#![forbid(unsafe_code)]
