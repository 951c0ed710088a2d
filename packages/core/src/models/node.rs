//! Hierarchy Node Data Structures
//!
//! This module defines `HierarchyNode`, one row of the self-referencing
//! containment tree (Direction → Department → Area → Sector-Chief →
//! Supervisor → School → Annex).
//!
//! # Architecture
//!
//! - **Adjacency list**: `parent_id` points at another node's `node_id`;
//!   `None` marks the top of a branch
//! - **Polymorphic instance**: `(instance_type_id, instance_id)` selects a row
//!   in one of the seven instance catalogs
//! - **Soft delete**: `state = false` hides a node from child enumeration and
//!   subtree materialization unless inactive nodes are requested
//!
//! Audit fields are written by the catalog CRUD layer and are read-only here.
//!
//! # Examples
//!
//! ```rust
//! use infracat_core::models::HierarchyNode;
//!
//! let direction = HierarchyNode::new(1, 10, 1, None);
//! let area = HierarchyNode::new(2, 20, 3, Some(1));
//!
//! assert!(direction.is_root());
//! assert_eq!(area.parent_id, Some(1));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a hierarchy node
pub type NodeId = i64;

/// Primary key of a row in an instance catalog
pub type InstanceId = i64;

/// One position in the organizational/physical containment tree.
///
/// # Fields
///
/// - `node_id`: Unique identifier
/// - `instance_id`: Row id inside the catalog selected by `instance_type_id`
/// - `instance_type_id`: Catalog discriminator (see `InstanceTypeMapping`)
/// - `parent_id`: Optional parent node (None means this node is a root)
/// - `state`: Liveness flag (false = soft-deleted)
/// - `created_at` / `updated_at` / `user_id`: Audit fields owned by the CRUD layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    /// Unique identifier
    pub node_id: NodeId,

    /// Identifier inside the instance catalog selected by `instance_type_id`
    pub instance_id: InstanceId,

    /// Catalog discriminator
    pub instance_type_id: i64,

    /// Parent node reference (None for roots)
    pub parent_id: Option<NodeId>,

    /// Liveness flag
    #[serde(default = "default_state")]
    pub state: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Acting user recorded by the CRUD layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

fn default_state() -> bool {
    true
}

impl HierarchyNode {
    /// Create an active node stamped with the current time
    pub fn new(
        node_id: NodeId,
        instance_id: InstanceId,
        instance_type_id: i64,
        parent_id: Option<NodeId>,
    ) -> Self {
        Self {
            node_id,
            instance_id,
            instance_type_id,
            parent_id,
            state: true,
            created_at: Utc::now(),
            updated_at: None,
            user_id: None,
        }
    }

    /// Builder-style setter for the liveness flag
    pub fn with_state(mut self, state: bool) -> Self {
        self.state = state;
        self
    }

    /// Builder-style setter for the acting user
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// True when the node has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// True when the node points at itself
    pub fn is_self_parented(&self) -> bool {
        self.parent_id == Some(self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_active() {
        let node = HierarchyNode::new(7, 70, 6, Some(4));
        assert!(node.state);
        assert!(!node.is_root());
        assert!(!node.is_self_parented());
        assert!(node.user_id.is_none());
    }

    #[test]
    fn test_self_parented_detection() {
        let node = HierarchyNode::new(9, 90, 5, Some(9));
        assert!(node.is_self_parented());
    }

    #[test]
    fn test_serializes_camel_case() {
        let node = HierarchyNode::new(2, 20, 3, Some(1)).with_user(42);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["nodeId"], 2);
        assert_eq!(json["instanceTypeId"], 3);
        assert_eq!(json["parentId"], 1);
        assert_eq!(json["userId"], 42);
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_state_defaults_to_active_when_missing() {
        let json = serde_json::json!({
            "nodeId": 1,
            "instanceId": 10,
            "instanceTypeId": 1,
            "parentId": null,
            "createdAt": "2025-01-03T00:00:00Z"
        });
        let node: HierarchyNode = serde_json::from_value(json).unwrap();
        assert!(node.state);
        assert!(node.is_root());
    }
}
