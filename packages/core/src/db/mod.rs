//! Database Layer
//!
//! This module holds everything the hierarchy engine reads from:
//!
//! - `HierarchyStore` - the read-only repository trait the engine depends on
//! - `MemoryStore` - arena-backed in-memory implementation (fixtures, audits)
//! - `DatabaseService` / `TursoStore` - libsql-backed relational implementation
//!
//! Writes to nodes and catalogs belong to the catalog CRUD layer; the insert
//! helpers exposed here exist for fixtures and imports.

mod database;
mod error;
mod memory_store;
mod node_store;
mod turso_store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use memory_store::MemoryStore;
pub use node_store::HierarchyStore;
pub use turso_store::TursoStore;
