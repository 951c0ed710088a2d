//! Data Models
//!
//! This module contains the data structures used by the hierarchy engine:
//!
//! - `HierarchyNode` - One row of the self-referencing containment tree
//! - `InstanceType` / `InstanceRecord` - The seven instance catalogs and their rows
//! - Traversal results (`SubtreeNode`, `ChainEntry`, `NodeDetails`, `IntegrityReport`)

mod hierarchy;
mod instance;
mod node;

pub use hierarchy::{ChainEntry, IntegrityReport, NodeDetails, SubtreeNode, TraversalOptions};
pub use instance::{InstanceRecord, InstanceType, InstanceTypeMapping};
pub use node::{HierarchyNode, InstanceId, NodeId};
