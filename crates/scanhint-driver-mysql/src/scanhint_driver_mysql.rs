//! MySQL driver implementation

mod connection;

pub use connection::{MySqlConnection, MySqlTransaction};
