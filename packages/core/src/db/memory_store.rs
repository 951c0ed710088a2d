//! MemoryStore - In-Memory HierarchyStore
//!
//! Nodes live in an arena (`Vec<HierarchyNode>`) addressed through an
//! id → slot index, with a second index from parent id to child slots.
//! `parent_id` stays a plain id, so cycles and orphans can be represented
//! exactly as a corrupted relational table would hold them.
//!
//! Used as the fixture store in tests and benchmarks, and as a snapshot
//! target for offline audits.

use crate::db::node_store::HierarchyStore;
use crate::models::{HierarchyNode, InstanceId, InstanceRecord, InstanceType, NodeId};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct NodeArena {
    slots: Vec<HierarchyNode>,
    index: HashMap<NodeId, usize>,
    by_parent: HashMap<NodeId, Vec<usize>>,
}

impl NodeArena {
    fn insert(&mut self, node: HierarchyNode) {
        if let Some(&slot) = self.index.get(&node.node_id) {
            if let Some(old_parent) = self.slots[slot].parent_id {
                if let Some(siblings) = self.by_parent.get_mut(&old_parent) {
                    siblings.retain(|s| *s != slot);
                }
            }
            if let Some(parent) = node.parent_id {
                self.by_parent.entry(parent).or_default().push(slot);
            }
            self.slots[slot] = node;
            return;
        }

        let slot = self.slots.len();
        self.index.insert(node.node_id, slot);
        if let Some(parent) = node.parent_id {
            self.by_parent.entry(parent).or_default().push(slot);
        }
        self.slots.push(node);
    }

    fn get(&self, node_id: NodeId) -> Option<&HierarchyNode> {
        self.index.get(&node_id).map(|slot| &self.slots[*slot])
    }

    fn children(&self, parent_id: NodeId) -> Vec<HierarchyNode> {
        let mut children: Vec<HierarchyNode> = self
            .by_parent
            .get(&parent_id)
            .map(|slots| slots.iter().map(|s| self.slots[*s].clone()).collect())
            .unwrap_or_default();
        children.sort_by_key(|n| n.node_id);
        children
    }
}

/// In-memory implementation of [`HierarchyStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: RwLock<NodeArena>,
    instances: RwLock<HashMap<(InstanceType, InstanceId), InstanceRecord>>,
    failing_catalogs: RwLock<HashSet<InstanceType>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node
    pub async fn insert_node(&self, node: HierarchyNode) {
        self.nodes.write().await.insert(node);
    }

    /// Insert several nodes in order
    pub async fn insert_nodes(&self, nodes: impl IntoIterator<Item = HierarchyNode>) {
        let mut arena = self.nodes.write().await;
        for node in nodes {
            arena.insert(node);
        }
    }

    /// Insert or replace a catalog row
    pub async fn insert_instance(&self, kind: InstanceType, record: InstanceRecord) {
        self.instances
            .write()
            .await
            .insert((kind, record.instance_id), record);
    }

    /// Delete a catalog row without touching nodes that reference it
    pub async fn remove_instance(&self, kind: InstanceType, instance_id: InstanceId) -> bool {
        self.instances
            .write()
            .await
            .remove(&(kind, instance_id))
            .is_some()
    }

    /// Make every lookup against `kind` fail with a backend error
    pub async fn fail_catalog(&self, kind: InstanceType) {
        self.failing_catalogs.write().await.insert(kind);
    }

    pub async fn node_count(&self) -> usize {
        self.nodes.read().await.slots.len()
    }
}

#[async_trait]
impl HierarchyStore for MemoryStore {
    async fn get_node(&self, node_id: NodeId) -> Result<Option<HierarchyNode>> {
        Ok(self.nodes.read().await.get(node_id).cloned())
    }

    async fn get_children(&self, parent_id: NodeId) -> Result<Vec<HierarchyNode>> {
        Ok(self.nodes.read().await.children(parent_id))
    }

    async fn list_nodes(&self) -> Result<Vec<HierarchyNode>> {
        let mut nodes = self.nodes.read().await.slots.clone();
        nodes.sort_by_key(|n| n.node_id);
        Ok(nodes)
    }

    async fn get_instance(
        &self,
        kind: InstanceType,
        instance_id: InstanceId,
    ) -> Result<Option<InstanceRecord>> {
        if self.failing_catalogs.read().await.contains(&kind) {
            return Err(anyhow::anyhow!("Catalog '{}' is unavailable", kind.table_name()));
        }
        Ok(self.instances.read().await.get(&(kind, instance_id)).cloned())
    }
}
