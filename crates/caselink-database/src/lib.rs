//! # caselink-database
//!
//! PostgreSQL connection management and the concrete store implementations
//! behind the sharing facade's persistence ports.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{PgEntityStore, PgShareLedger};
