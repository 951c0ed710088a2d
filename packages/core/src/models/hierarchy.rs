//! Traversal Result Types
//!
//! Plain structured data returned by `HierarchyService`, serialized as
//! camelCase JSON by the HTTP layer.

use serde::{Deserialize, Serialize};

use super::instance::InstanceType;
use super::node::{HierarchyNode, InstanceId, NodeId};

/// Options shared by children enumeration and subtree materialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraversalOptions {
    /// Include soft-deleted (`state = false`) nodes
    #[serde(default)]
    pub include_inactive: bool,
}

impl TraversalOptions {
    pub fn including_inactive() -> Self {
        Self {
            include_inactive: true,
        }
    }

    /// Whether `node` passes the liveness filter
    pub fn admits(&self, node: &HierarchyNode) -> bool {
        self.include_inactive || node.state
    }
}

/// A node annotated with its distance from the materialization root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtreeNode {
    #[serde(flatten)]
    pub node: HierarchyNode,

    /// Distance from the materialization root (root = 0)
    pub level: u32,

    /// Child subtrees ordered by ascending `node_id`
    pub children: Vec<SubtreeNode>,
}

impl SubtreeNode {
    /// Total nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SubtreeNode::node_count).sum::<usize>()
    }

    /// Deepest level present in this subtree
    pub fn max_level(&self) -> u32 {
        self.children
            .iter()
            .map(SubtreeNode::max_level)
            .max()
            .unwrap_or(self.level)
    }

    /// Pre-order list of node ids, starting with this node
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.node_count());
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<NodeId>) {
        out.push(self.node.node_id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

/// One breadcrumb of a dependency chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub node_id: NodeId,
    pub instance_id: InstanceId,

    /// Display name from the instance catalog, or the unknown sentinel
    pub resolved_name: String,

    /// Catalog label, or the unknown sentinel for unmapped type ids
    pub instance_type_name: String,

    /// Distance from the chain root (root = 0)
    pub level: u32,
}

/// A node with its resolved catalog metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    #[serde(flatten)]
    pub node: HierarchyNode,

    /// Catalog selected by `instance_type_id`; None when the id is unmapped
    pub instance_type: Option<InstanceType>,

    /// Catalog label, or the unknown sentinel
    pub instance_type_name: String,

    /// Backing table, when the type is mapped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_table: Option<String>,
}

/// Result of a full sweep over the node store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// Nodes with no parent (expected roots)
    pub nodes_without_parent: Vec<NodeId>,

    /// Nodes whose parent does not exist
    pub orphans: Vec<NodeId>,

    /// Nodes that are their own parent
    pub cycles: Vec<NodeId>,

    /// Nodes whose `instance_type_id` is not in the configured mapping
    pub unknown_instance_types: Vec<NodeId>,

    /// Number of nodes swept
    pub total_nodes: usize,
}

impl IntegrityReport {
    /// No orphans, self-cycles or unmapped types
    pub fn is_healthy(&self) -> bool {
        self.orphans.is_empty() && self.cycles.is_empty() && self.unknown_instance_types.is_empty()
    }
}
