//! Store implementations backed by PostgreSQL.

mod map;

pub mod entity_store;
pub mod share_ledger;

pub use entity_store::PgEntityStore;
pub use share_ledger::PgShareLedger;
