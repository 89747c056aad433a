//! Persistence layer: libSQL-backed storage for users, service requests,
//! and per-user settings.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{Database, StoredRequest, StoredUser};
