//! HierarchyStore Trait - Read-Only Repository Abstraction
//!
//! The hierarchy engine never writes. It sees the node table and the seven
//! instance catalogs only through this narrow interface, so the relational
//! backend (`TursoStore`) and the in-memory fake (`MemoryStore`) are
//! interchangeable.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: Every lookup is a potential I/O suspension point
//! 2. **Absence is not an error**: point lookups return `Ok(None)` for missing rows
//! 3. **Error Handling**: Uses `anyhow::Result` for flexible error context;
//!    the service maps failures into `HierarchyError::QueryFailed`
//!
//! # Examples
//!
//! ```rust,no_run
//! use infracat_core::db::{HierarchyStore, MemoryStore};
//! use infracat_core::models::HierarchyNode;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let memory = MemoryStore::new();
//!     memory.insert_node(HierarchyNode::new(1, 10, 1, None)).await;
//!
//!     let store: Arc<dyn HierarchyStore> = Arc::new(memory);
//!     let root = store.get_node(1).await?;
//!     assert!(root.is_some());
//!     Ok(())
//! }
//! ```

use crate::models::{HierarchyNode, InstanceId, InstanceRecord, InstanceType, NodeId};
use anyhow::Result;
use async_trait::async_trait;

/// Read-only access to hierarchy nodes and instance catalogs
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so the service can be shared
/// across request handlers.
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    /// Point lookup by node id
    ///
    /// # Returns
    ///
    /// - `Ok(Some(node))` if the node exists (active or not)
    /// - `Ok(None)` if it does not
    /// - `Err(_)` if the backend fails
    async fn get_node(&self, node_id: NodeId) -> Result<Option<HierarchyNode>>;

    /// All nodes whose `parent_id` equals `parent_id`, ascending by `node_id`
    ///
    /// Returns inactive nodes too; liveness filtering is the caller's concern.
    async fn get_children(&self, parent_id: NodeId) -> Result<Vec<HierarchyNode>>;

    /// Every node in the store, ascending by `node_id`
    ///
    /// Backs the integrity sweep and root enumeration.
    async fn list_nodes(&self) -> Result<Vec<HierarchyNode>>;

    /// Point lookup against the catalog selected by `kind`
    async fn get_instance(
        &self,
        kind: InstanceType,
        instance_id: InstanceId,
    ) -> Result<Option<InstanceRecord>>;
}
