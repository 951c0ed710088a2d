//! Business Services
//!
//! This module contains the hierarchy engine and its collaborators:
//!
//! - `HierarchyService` - Root paths, children, subtrees, dependency chains
//!   and integrity validation
//! - `InstanceResolver` - Catalog dispatch for display names
//! - `integrity` - Full-store structural sweep
//!
//! Services are read-only. They coordinate between the store layer and the
//! caller, enforcing depth bounds and cycle safety on every traversal.

pub mod error;
pub mod hierarchy_service;
pub mod instance_resolver;
pub mod integrity;

pub use error::HierarchyError;
pub use hierarchy_service::HierarchyService;
pub use instance_resolver::InstanceResolver;
