//! # slurm-wire
//!
//! The wire boundary of the Slurm REST adapter layer.
//!
//! ## Overview
//!
//! - [`noval`]: the `{set, infinite, number}` wrapper, list-or-CSV fields and
//!   the helpers that collapse them into plain `Option`s
//! - [`schema`]: typed records for API v0.0.40 through v0.0.44
//! - [`ResponseEnvelope`]: `errors`/`warnings`/`meta` plus raw payload keys
//! - [`WireClient`]: the transport seam; [`HttpWireClient`] implements it on
//!   top of `slurm-pool`
//!
//! ## Example
//!
//! ```rust
//! use slurm_wire::noval::{NoVal, unwrap};
//!
//! let unset: NoVal<u32> = serde_json::from_str(r#"{"set": false, "number": 9}"#).unwrap();
//! let zero: NoVal<u32> = serde_json::from_str(r#"{"set": true, "number": 0}"#).unwrap();
//! assert_eq!(unwrap(&unset), None);
//! assert_eq!(unwrap(&zero), Some(0));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod noval;
pub mod path;
pub mod schema;

pub use client::{BoxFuture, Method, WireClient, WireRequest, WireResponse};
pub use envelope::{ApiMessage, ResponseEnvelope};
pub use error::{WireError, WireResult};
pub use http::HttpWireClient;
pub use noval::{CsvList, Flexible, NoVal, OptionalValue};
pub use schema::shared::WireTres;
