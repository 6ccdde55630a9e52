//! scanhint core - shared abstractions for the plan analyzer and maintenance tooling
//!
//! This crate defines the pieces every other scanhint crate depends on:
//!
//! - `Connection` / `Transaction` - traits implemented by database drivers
//! - `Value`, `Row`, `QueryResult` - driver-neutral result types
//! - `ConnectionSettings` - where and how to connect
//! - `ScanhintError` - the shared error type

mod connection;
mod error;
mod settings;
mod types;

pub use connection::*;
pub use error::*;
pub use settings::*;
pub use types::*;
