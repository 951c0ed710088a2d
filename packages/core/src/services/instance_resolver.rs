//! Instance Name Resolution
//!
//! Dispatches a node's `(instance_type_id, instance_id)` pair to the matching
//! instance catalog and returns a display name. Every failure along the way
//! (unmapped type id, missing catalog row, backend error) is cosmetic and
//! degrades to the configured placeholder instead of an error.

use crate::db::HierarchyStore;
use crate::models::{HierarchyNode, InstanceType, InstanceTypeMapping};
use std::sync::Arc;

/// Resolves display names and catalog labels for hierarchy nodes
#[derive(Clone)]
pub struct InstanceResolver {
    store: Arc<dyn HierarchyStore>,
    mapping: InstanceTypeMapping,
    unknown_name: String,
}

impl InstanceResolver {
    pub fn new(
        store: Arc<dyn HierarchyStore>,
        mapping: InstanceTypeMapping,
        unknown_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mapping,
            unknown_name: unknown_name.into(),
        }
    }

    /// Catalog selected by a stored type id, if mapped
    pub fn resolve_type(&self, instance_type_id: i64) -> Option<InstanceType> {
        self.mapping.resolve(instance_type_id)
    }

    /// Catalog label for a stored type id, or the placeholder
    pub fn type_name(&self, instance_type_id: i64) -> String {
        match self.resolve_type(instance_type_id) {
            Some(kind) => kind.label().to_string(),
            None => self.unknown_name.clone(),
        }
    }

    /// Display name of the instance a node points at
    pub async fn resolve_name(&self, node: &HierarchyNode) -> String {
        let Some(kind) = self.resolve_type(node.instance_type_id) else {
            tracing::warn!(
                node_id = node.node_id,
                instance_type_id = node.instance_type_id,
                "unmapped instance type id"
            );
            return self.unknown_name.clone();
        };

        match self.store.get_instance(kind, node.instance_id).await {
            Ok(Some(record)) => record.name,
            Ok(None) => {
                tracing::warn!(
                    node_id = node.node_id,
                    instance_id = node.instance_id,
                    catalog = kind.table_name(),
                    "instance row missing"
                );
                self.unknown_name.clone()
            }
            Err(e) => {
                tracing::warn!(
                    node_id = node.node_id,
                    instance_id = node.instance_id,
                    catalog = kind.table_name(),
                    error = %e,
                    "instance lookup failed"
                );
                self.unknown_name.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::InstanceRecord;

    async fn resolver_with(store: MemoryStore) -> InstanceResolver {
        InstanceResolver::new(Arc::new(store), InstanceTypeMapping::default(), "Unknown")
    }

    #[tokio::test]
    async fn test_resolves_each_catalog() {
        let store = MemoryStore::new();
        for kind in InstanceType::ALL {
            store
                .insert_instance(kind, InstanceRecord::new(1, format!("{} one", kind.label())))
                .await;
        }
        let resolver = resolver_with(store).await;

        for kind in InstanceType::ALL {
            let node = HierarchyNode::new(100, 1, kind.default_type_id(), None);
            assert_eq!(
                resolver.resolve_name(&node).await,
                format!("{} one", kind.label())
            );
            assert_eq!(resolver.type_name(kind.default_type_id()), kind.label());
        }
    }

    #[tokio::test]
    async fn test_missing_row_degrades() {
        let resolver = resolver_with(MemoryStore::new()).await;
        let node = HierarchyNode::new(2, 20, 3, Some(1));
        assert_eq!(resolver.resolve_name(&node).await, "Unknown");
    }

    #[tokio::test]
    async fn test_unmapped_type_degrades() {
        let resolver = resolver_with(MemoryStore::new()).await;
        let node = HierarchyNode::new(2, 20, 42, None);
        assert_eq!(resolver.resolve_name(&node).await, "Unknown");
        assert_eq!(resolver.type_name(42), "Unknown");
        assert!(resolver.resolve_type(42).is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_degrades() {
        let store = MemoryStore::new();
        store
            .insert_instance(InstanceType::Area, InstanceRecord::new(20, "Area X"))
            .await;
        store.fail_catalog(InstanceType::Area).await;
        let resolver = resolver_with(store).await;

        let node = HierarchyNode::new(2, 20, 3, None);
        assert_eq!(resolver.resolve_name(&node).await, "Unknown");
    }

    #[tokio::test]
    async fn test_custom_mapping_and_placeholder() {
        let store = MemoryStore::new();
        store
            .insert_instance(InstanceType::School, InstanceRecord::new(5, "Escuela 5"))
            .await;
        let resolver = InstanceResolver::new(
            Arc::new(store),
            InstanceTypeMapping::from_pairs([(60, InstanceType::School)]),
            "Sin nombre",
        );

        assert_eq!(
            resolver
                .resolve_name(&HierarchyNode::new(1, 5, 60, None))
                .await,
            "Escuela 5"
        );
        // 6 is the conventional School id, but not in this mapping
        assert_eq!(
            resolver.resolve_name(&HierarchyNode::new(1, 5, 6, None)).await,
            "Sin nombre"
        );
    }
}
