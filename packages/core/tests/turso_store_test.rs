//! Integration tests for TursoStore and HierarchyService over libsql
//!
//! Tests cover:
//! - Schema initialization and node round trips through SQL
//! - Children ordering from the relational store
//! - Catalog lookups, including deleted instance rows
//! - End-to-end traversal and integrity over corrupted data

use anyhow::Result;
use infracat_core::{
    db::{DatabaseService, HierarchyStore, TursoStore},
    HierarchyError, HierarchyNode, HierarchyService, InstanceRecord, InstanceType,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Test helper: Create a store backed by a fresh database file
async fn create_test_store() -> Result<(Arc<TursoStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("catalog.db");
    let db = Arc::new(DatabaseService::new(db_path).await?);
    Ok((Arc::new(TursoStore::new(db)), temp_dir))
}

/// Direction 1 → Area 2 → Supervisor 4 → School 7; the Area has no catalog row
async fn seed_scenario(store: &TursoStore) -> Result<()> {
    for node in [
        HierarchyNode::new(1, 10, 1, None),
        HierarchyNode::new(2, 20, 3, Some(1)),
        HierarchyNode::new(4, 40, 5, Some(2)),
        HierarchyNode::new(7, 70, 6, Some(4)),
    ] {
        store.insert_node(&node).await?;
    }
    store
        .insert_instance(InstanceType::Direction, &InstanceRecord::new(10, "Direction X"))
        .await?;
    store
        .insert_instance(InstanceType::Supervisor, &InstanceRecord::new(40, "Supervisor Y"))
        .await?;
    store
        .insert_instance(
            InstanceType::School,
            &InstanceRecord::new(70, "School Z").with_location(3),
        )
        .await?;
    Ok(())
}

// =========================================================================
// Store Tests
// =========================================================================

#[tokio::test]
async fn test_schema_initialization_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("nested").join("catalog.db");

    let first = Arc::new(DatabaseService::new(db_path.clone()).await?);
    TursoStore::new(first)
        .insert_node(&HierarchyNode::new(1, 10, 1, None))
        .await?;

    // Reopening keeps existing rows
    let second = Arc::new(DatabaseService::new(db_path).await?);
    let node = TursoStore::new(second).get_node(1).await?;
    assert!(node.is_some(), "Node should survive reopening the database");
    Ok(())
}

#[tokio::test]
async fn test_node_round_trip() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;

    let node = HierarchyNode::new(5, 50, 7, Some(3))
        .with_state(false)
        .with_user(12);
    store.insert_node(&node).await?;

    let loaded = store.get_node(5).await?.expect("node should exist");
    assert_eq!(loaded.instance_id, 50);
    assert_eq!(loaded.instance_type_id, 7);
    assert_eq!(loaded.parent_id, Some(3));
    assert!(!loaded.state);
    assert_eq!(loaded.user_id, Some(12));
    assert_eq!(loaded.created_at, node.created_at);

    assert!(store.get_node(404).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_children_ordered_by_id() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;
    for id in [9, 3, 6] {
        store
            .insert_node(&HierarchyNode::new(id, id, 2, Some(1)))
            .await?;
    }
    store.insert_node(&HierarchyNode::new(1, 1, 1, None)).await?;

    let children: Vec<_> = store
        .get_children(1)
        .await?
        .into_iter()
        .map(|n| n.node_id)
        .collect();
    assert_eq!(children, vec![3, 6, 9]);
    assert!(store.get_children(9).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_instance_lookup_and_delete() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;
    seed_scenario(&store).await?;

    let school = store
        .get_instance(InstanceType::School, 70)
        .await?
        .expect("school row should exist");
    assert_eq!(school.name, "School Z");
    assert_eq!(school.location_id, Some(3));

    // Same id in another catalog is a different row
    assert!(store.get_instance(InstanceType::Annex, 70).await?.is_none());

    assert_eq!(store.delete_instance(InstanceType::School, 70).await?, 1);
    assert!(store.get_instance(InstanceType::School, 70).await?.is_none());
    assert!(store.get_node(7).await?.is_some(), "Node must outlive its instance row");
    Ok(())
}

// =========================================================================
// End-to-End Service Tests
// =========================================================================

#[tokio::test]
async fn test_service_traversals_over_libsql() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;
    seed_scenario(&store).await?;
    let service = HierarchyService::with_defaults(store);

    let path: Vec<_> = service
        .get_root_path(7)
        .await?
        .into_iter()
        .map(|n| n.node_id)
        .collect();
    assert_eq!(path, vec![1, 2, 4, 7]);

    let subtree = service.get_subtree(1, 1).await?;
    assert_eq!(subtree.ids(), vec![1, 2]);

    let names: Vec<_> = service
        .get_dependency_chain(7)
        .await?
        .into_iter()
        .map(|e| e.resolved_name)
        .collect();
    assert_eq!(names, vec!["Direction X", "Unknown", "Supervisor Y", "School Z"]);
    Ok(())
}

#[tokio::test]
async fn test_service_detects_corruption_over_libsql() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;
    seed_scenario(&store).await?;
    store
        .insert_node(&HierarchyNode::new(8, 80, 7, Some(500)))
        .await?;
    store
        .insert_node(&HierarchyNode::new(9, 90, 5, Some(9)))
        .await?;
    let service = HierarchyService::with_defaults(store);

    let report = service.validate_integrity().await?;
    assert_eq!(report.orphans, vec![8]);
    assert_eq!(report.cycles, vec![9]);
    assert_eq!(report.nodes_without_parent, vec![1]);
    assert_eq!(report.total_nodes, 6);
    assert!(!report.is_healthy());

    match service.get_root_path(9).await {
        Err(HierarchyError::CycleDetected { node_id, .. }) => assert_eq!(node_id, 9),
        other => panic!("expected CycleDetected, got {:?}", other),
    }
    Ok(())
}
