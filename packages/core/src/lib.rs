//! Infracat Core Hierarchy Engine
//!
//! This crate provides the read-only graph logic over the infrastructure
//! catalog: a forest of nodes (Direction, Department, Area, Sector Chief,
//! Supervisor, School, Annex) linked by `parent_id`, each pointing at a row
//! in one of seven instance catalogs.
//!
//! # Architecture
//!
//! - **Adjacency list**: Nodes store only their parent id; children are found
//!   by query, never cached
//! - **Untrusted structure**: Cycles and orphans may exist in stored data and
//!   are detected rather than assumed away
//! - **libsql/Turso**: Embedded SQLite-compatible storage behind the
//!   [`db::HierarchyStore`] trait, with an in-memory store for tests
//!
//! # Modules
//!
//! - [`models`] - Nodes, instance catalogs and traversal results
//! - [`services`] - `HierarchyService` and name resolution
//! - [`db`] - Store trait, libsql and in-memory implementations
//! - [`config`] - Depth bounds, placeholder name and type mapping

pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::{ConfigError, HierarchyConfig};
pub use models::*;
pub use services::*;
