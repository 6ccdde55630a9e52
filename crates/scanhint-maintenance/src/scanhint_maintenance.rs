//! scanhint maintenance - periodic transactional housekeeping
//!
//! - [`MaintenanceTask`]: one transactional pass that counts a table and
//!   reads the InnoDB buffer pool size, committing on success and rolling
//!   back on failure
//! - [`Scheduler`]: runs a [`ScheduledJob`] at a fixed interval until its
//!   cancellation token fires

mod error;
mod scheduler;
mod task;

pub use error::*;
pub use scheduler::*;
pub use task::*;
