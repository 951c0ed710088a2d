//! Hierarchy Service - Infrastructure Tree Engine
//!
//! This module provides the read-only graph logic over the node store:
//!
//! - Root-path reconstruction (`get_root_path`)
//! - Children enumeration (`get_children`)
//! - Bounded subtree materialization (`get_subtree`)
//! - Dependency-chain name resolution across the seven instance catalogs
//!   (`get_dependency_chain`)
//! - Structural integrity validation (`validate_integrity`)
//!
//! # Traversal Model
//!
//! Every step is an independent point lookup against the store: root paths
//! cost O(depth) round trips and subtrees O(subtree size). Nothing is cached
//! between calls.
//!
//! # Corrupted Data
//!
//! Writes belong to the catalog CRUD layer, so `parent_id` may contain cycles
//! or dangling references. Ancestor walks keep a visited set and abort with
//! `CycleDetected`; descents are capped by a validated depth and skip nodes
//! they have already emitted.

use crate::config::HierarchyConfig;
use crate::db::HierarchyStore;
use crate::models::{
    ChainEntry, HierarchyNode, IntegrityReport, NodeDetails, NodeId, SubtreeNode,
    TraversalOptions,
};
use crate::services::error::HierarchyError;
use crate::services::instance_resolver::InstanceResolver;
use crate::services::integrity;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Ancestors visited by an upward walk, in visiting order
#[derive(Debug, Default)]
struct AncestorTrail {
    seen: HashSet<NodeId>,
    order: Vec<NodeId>,
}

impl AncestorTrail {
    fn starting_at(node_id: NodeId) -> Self {
        let mut trail = Self::default();
        trail.enter(node_id);
        trail
    }

    /// Record a visit; false if the node was already on the trail
    fn enter(&mut self, node_id: NodeId) -> bool {
        if self.seen.insert(node_id) {
            self.order.push(node_id);
            true
        } else {
            false
        }
    }

    /// Visited ids followed by the revisited one
    fn closing_at(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut chain = self.order.clone();
        chain.push(node_id);
        chain
    }
}

/// Read-only engine over the infrastructure hierarchy
///
/// # Examples
///
/// ```no_run
/// use infracat_core::db::MemoryStore;
/// use infracat_core::models::HierarchyNode;
/// use infracat_core::services::HierarchyService;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStore::new();
///     store.insert_node(HierarchyNode::new(1, 10, 1, None)).await;
///     store.insert_node(HierarchyNode::new(2, 20, 3, Some(1))).await;
///
///     let service = HierarchyService::with_defaults(Arc::new(store));
///     let path = service.get_root_path(2).await?;
///     assert_eq!(path.len(), 2);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct HierarchyService {
    /// Node store and instance catalogs
    store: Arc<dyn HierarchyStore>,

    /// Catalog dispatch for display names
    resolver: InstanceResolver,

    /// Validated bounds and type mapping
    config: Arc<HierarchyConfig>,
}

impl HierarchyService {
    /// Create a service after validating `config`
    pub fn new(
        store: Arc<dyn HierarchyStore>,
        config: HierarchyConfig,
    ) -> Result<Self, HierarchyError> {
        config.validate()?;
        let resolver = InstanceResolver::new(
            store.clone(),
            config.instance_types.clone(),
            config.unknown_name.clone(),
        );

        Ok(Self {
            store,
            resolver,
            config: Arc::new(config),
        })
    }

    /// Create a service with the default configuration
    pub fn with_defaults(store: Arc<dyn HierarchyStore>) -> Self {
        let config = HierarchyConfig::default();
        let resolver = InstanceResolver::new(
            store.clone(),
            config.instance_types.clone(),
            config.unknown_name.clone(),
        );
        Self {
            store,
            resolver,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    async fn fetch_node(
        &self,
        node_id: NodeId,
    ) -> Result<Option<HierarchyNode>, HierarchyError> {
        self.store
            .get_node(node_id)
            .await
            .map_err(|e| HierarchyError::query_failed(e.to_string()))
    }

    async fn require_node(&self, node_id: NodeId) -> Result<HierarchyNode, HierarchyError> {
        self.fetch_node(node_id)
            .await?
            .ok_or_else(|| HierarchyError::node_not_found(node_id))
    }

    async fn fetch_children(
        &self,
        parent_id: NodeId,
        options: TraversalOptions,
    ) -> Result<Vec<HierarchyNode>, HierarchyError> {
        let mut children: Vec<HierarchyNode> = self
            .store
            .get_children(parent_id)
            .await
            .map_err(|e| HierarchyError::query_failed(e.to_string()))?
            .into_iter()
            .filter(|child| child.parent_id == Some(parent_id) && options.admits(child))
            .collect();
        children.sort_by_key(|child| child.node_id);
        Ok(children)
    }

    /// Get the node with its resolved catalog metadata
    ///
    /// An unmapped `instance_type_id` is reported as `instance_type: None`
    /// with the placeholder type name; it does not fail the lookup.
    pub async fn get_node(&self, node_id: NodeId) -> Result<NodeDetails, HierarchyError> {
        let node = self.require_node(node_id).await?;
        let instance_type = self.resolver.resolve_type(node.instance_type_id);
        if instance_type.is_none() {
            tracing::warn!(
                node_id,
                instance_type_id = node.instance_type_id,
                "node references an unmapped instance type"
            );
        }

        Ok(NodeDetails {
            instance_type_name: self.resolver.type_name(node.instance_type_id),
            instance_table: instance_type.map(|kind| kind.table_name().to_string()),
            instance_type,
            node,
        })
    }

    /// Get the nodes from the forest root down to and including `node_id`
    ///
    /// Ancestors are included regardless of their liveness flag.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `node_id` or any ancestor it references is missing
    /// - `CycleDetected` if the parent chain revisits a node
    pub async fn get_root_path(
        &self,
        node_id: NodeId,
    ) -> Result<Vec<HierarchyNode>, HierarchyError> {
        let start = self.require_node(node_id).await?;
        let mut trail = AncestorTrail::starting_at(node_id);
        let mut path = vec![start];

        while let Some(parent_id) = path.last().and_then(|n| n.parent_id) {
            if !trail.enter(parent_id) {
                let chain = trail.closing_at(parent_id);
                tracing::error!(node_id, ?chain, "cycle in parent chain");
                return Err(HierarchyError::cycle_detected(parent_id, chain));
            }
            tracing::debug!(node_id, parent_id, "ascending");
            path.push(self.require_node(parent_id).await?);
        }

        path.reverse();
        Ok(path)
    }

    /// Get the active children of `node_id`, ascending by id
    pub async fn get_children(
        &self,
        node_id: NodeId,
    ) -> Result<Vec<HierarchyNode>, HierarchyError> {
        self.get_children_with_options(node_id, TraversalOptions::default())
            .await
    }

    /// Get the children of `node_id`, ascending by id
    ///
    /// Returns an empty list for leaves. Fails with `NodeNotFound` if
    /// `node_id` itself does not exist.
    pub async fn get_children_with_options(
        &self,
        node_id: NodeId,
        options: TraversalOptions,
    ) -> Result<Vec<HierarchyNode>, HierarchyError> {
        self.require_node(node_id).await?;
        self.fetch_children(node_id, options).await
    }

    /// Get every root (node without parent), ascending by id
    pub async fn get_roots(
        &self,
        options: TraversalOptions,
    ) -> Result<Vec<HierarchyNode>, HierarchyError> {
        let nodes = self
            .store
            .list_nodes()
            .await
            .map_err(|e| HierarchyError::query_failed(e.to_string()))?;

        let mut roots: Vec<HierarchyNode> = nodes
            .into_iter()
            .filter(|n| n.is_root() && options.admits(n))
            .collect();
        roots.sort_by_key(|n| n.node_id);
        Ok(roots)
    }

    /// Materialize the active subtree under `node_id`, at most `max_depth` levels deep
    pub async fn get_subtree(
        &self,
        node_id: NodeId,
        max_depth: u32,
    ) -> Result<SubtreeNode, HierarchyError> {
        self.get_subtree_with_options(node_id, max_depth, TraversalOptions::default())
            .await
    }

    /// Materialize the subtree using the configured default depth
    pub async fn get_subtree_default(
        &self,
        node_id: NodeId,
    ) -> Result<SubtreeNode, HierarchyError> {
        self.get_subtree(node_id, self.config.default_depth).await
    }

    /// Materialize the subtree under `node_id`
    ///
    /// The root has level 0; nodes below `max_depth` are omitted entirely.
    /// A node reached twice (only possible with a corrupted parent chain)
    /// is emitted once.
    ///
    /// # Errors
    ///
    /// - `InvalidDepth` if `max_depth` lies outside the configured range
    /// - `NodeNotFound` if `node_id` does not exist
    pub async fn get_subtree_with_options(
        &self,
        node_id: NodeId,
        max_depth: u32,
        options: TraversalOptions,
    ) -> Result<SubtreeNode, HierarchyError> {
        if !self.config.depth_in_range(max_depth) {
            return Err(HierarchyError::invalid_depth(
                max_depth,
                self.config.min_depth,
                self.config.max_depth,
            ));
        }

        let root = self.require_node(node_id).await?;
        let mut emitted = HashSet::from([node_id]);
        self.build_subtree(root, 0, max_depth, options, &mut emitted)
            .await
    }

    /// Ids of every node below `node_id` within `max_depth`, in pre-order
    pub async fn get_descendant_ids(
        &self,
        node_id: NodeId,
        max_depth: u32,
    ) -> Result<Vec<NodeId>, HierarchyError> {
        let subtree = self.get_subtree(node_id, max_depth).await?;
        Ok(subtree.ids().into_iter().skip(1).collect())
    }

    fn build_subtree<'a>(
        &'a self,
        node: HierarchyNode,
        level: u32,
        max_depth: u32,
        options: TraversalOptions,
        emitted: &'a mut HashSet<NodeId>,
    ) -> BoxFuture<'a, Result<SubtreeNode, HierarchyError>> {
        Box::pin(async move {
            if level > max_depth || max_depth > self.config.max_depth {
                return Err(HierarchyError::depth_exceeded(
                    node.node_id,
                    max_depth as usize,
                ));
            }

            let mut children = Vec::new();
            if level < max_depth {
                for child in self.fetch_children(node.node_id, options).await? {
                    if !emitted.insert(child.node_id) {
                        tracing::warn!(
                            node_id = child.node_id,
                            parent_id = node.node_id,
                            "node already materialized; skipping"
                        );
                        continue;
                    }
                    let subtree = self
                        .build_subtree(child, level + 1, max_depth, options, &mut *emitted)
                        .await?;
                    children.push(subtree);
                }
            }

            tracing::debug!(
                node_id = node.node_id,
                level,
                children = children.len(),
                "materialized"
            );
            Ok(SubtreeNode {
                node,
                level,
                children,
            })
        })
    }

    /// Get the root path of `node_id` with a display name per node
    ///
    /// Names come from the catalog selected by each node's type id. A missing
    /// catalog row, an unmapped type or a failed lookup yields the configured
    /// placeholder for that entry only.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `node_id` or an ancestor is missing
    /// - `CycleDetected` if the parent chain revisits a node
    /// - `DepthExceeded` if the chain is longer than `max_chain_length`
    pub async fn get_dependency_chain(
        &self,
        node_id: NodeId,
    ) -> Result<Vec<ChainEntry>, HierarchyError> {
        let mut trail = AncestorTrail::starting_at(node_id);
        self.resolve_chain(node_id, 0, &mut trail).await
    }

    /// Resolve the ancestors first, then append this node on the way back down
    fn resolve_chain<'a>(
        &'a self,
        node_id: NodeId,
        ascent: usize,
        trail: &'a mut AncestorTrail,
    ) -> BoxFuture<'a, Result<Vec<ChainEntry>, HierarchyError>> {
        Box::pin(async move {
            if ascent >= self.config.max_chain_length {
                return Err(HierarchyError::depth_exceeded(
                    node_id,
                    self.config.max_chain_length,
                ));
            }

            let node = self.require_node(node_id).await?;

            let mut chain = match node.parent_id {
                Some(parent_id) => {
                    if !trail.enter(parent_id) {
                        let cycle = trail.closing_at(parent_id);
                        tracing::error!(node_id, chain = ?cycle, "cycle in dependency chain");
                        return Err(HierarchyError::cycle_detected(parent_id, cycle));
                    }
                    self.resolve_chain(parent_id, ascent + 1, &mut *trail)
                        .await?
                }
                None => Vec::with_capacity(ascent + 1),
            };

            let resolved_name = self.resolver.resolve_name(&node).await;
            chain.push(ChainEntry {
                node_id: node.node_id,
                instance_id: node.instance_id,
                resolved_name,
                instance_type_name: self.resolver.type_name(node.instance_type_id),
                level: chain.len() as u32,
            });
            Ok(chain)
        })
    }

    /// Sweep the whole store for roots, orphans, self-cycles and unmapped types
    pub async fn validate_integrity(&self) -> Result<IntegrityReport, HierarchyError> {
        let nodes = self
            .store
            .list_nodes()
            .await
            .map_err(|e| HierarchyError::query_failed(e.to_string()))?;

        let report = integrity::sweep(&nodes, &self.config.instance_types);
        tracing::info!(
            total = report.total_nodes,
            roots = report.nodes_without_parent.len(),
            orphans = report.orphans.len(),
            cycles = report.cycles.len(),
            unknown_types = report.unknown_instance_types.len(),
            "integrity sweep complete"
        );
        Ok(report)
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "hierarchy_service_test.rs"]
mod hierarchy_service_test;
