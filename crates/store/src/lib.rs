//! Local store mimicking the upstream research database.
//!
//! Holds the center / patient / visit / document-type tree, the files
//! ingested under it, their sync state, and the remote folder id cached at
//! each level. Everything lives in one SQLite connection behind a mutex;
//! each write is a single statement.

pub mod error;
mod schema;
mod store;
mod structure;

pub use error::StoreError;
pub use schema::{document_code, visit_code};
pub use store::Store;
pub use structure::{CenterNode, DocumentNode, PatientNode, VisitNode};
