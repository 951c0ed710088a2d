//! TursoStore - HierarchyStore Implementation for Turso/libsql Backend
//!
//! Thin adapter over [`DatabaseService`]: it runs the point lookups the
//! hierarchy engine needs and converts `libsql::Row` values into models.
//! Writes (`insert_node`, `insert_instance`) exist for fixtures and bulk
//! import; the engine itself never calls them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use infracat_core::db::{DatabaseService, HierarchyStore, TursoStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/infracat.db")).await?);
//!     let store: Arc<dyn HierarchyStore> = Arc::new(TursoStore::new(db));
//!
//!     let node = store.get_node(7).await?;
//!     Ok(())
//! }
//! ```

use crate::db::node_store::HierarchyStore;
use crate::db::{DatabaseError, DatabaseService};
use crate::models::{HierarchyNode, InstanceId, InstanceRecord, InstanceType, NodeId};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::Row;
use std::sync::Arc;

const NODE_COLUMNS: &str =
    "node_id, instance_id, instance_type_id, parent_id, state, created_at, updated_at, user_id";

/// TursoStore implements [`HierarchyStore`] for the libsql backend
pub struct TursoStore {
    db: Arc<DatabaseService>,
}

impl TursoStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Parse timestamp from database - handles both SQLite and RFC3339 formats
    ///
    /// SQLite CURRENT_TIMESTAMP returns: "YYYY-MM-DD HH:MM:SS"
    /// Rows written through this adapter use RFC3339.
    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(DatabaseError::row_decode(format!(
            "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
            s
        ))
        .into())
    }

    /// Convert a `hierarchy_nodes` row (selected with `NODE_COLUMNS`) into a node
    fn row_to_node(row: &Row) -> Result<HierarchyNode> {
        let node_id: i64 = row.get(0).context("Failed to get node_id")?;
        let instance_id: i64 = row.get(1).context("Failed to get instance_id")?;
        let instance_type_id: i64 = row.get(2).context("Failed to get instance_type_id")?;
        let parent_id: Option<i64> = row.get(3).context("Failed to get parent_id")?;
        let state: i64 = row.get(4).context("Failed to get state")?;
        let created_at: String = row.get(5).context("Failed to get created_at")?;
        let updated_at: Option<String> = row.get(6).context("Failed to get updated_at")?;
        let user_id: Option<i64> = row.get(7).context("Failed to get user_id")?;

        Ok(HierarchyNode {
            node_id,
            instance_id,
            instance_type_id,
            parent_id,
            state: state != 0,
            created_at: Self::parse_timestamp(&created_at)?,
            updated_at: updated_at
                .as_deref()
                .map(Self::parse_timestamp)
                .transpose()?,
            user_id,
        })
    }

    async fn query_nodes(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<HierarchyNode>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut stmt = conn.prepare(sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to prepare '{}': {}", sql, e))
        })?;
        let mut rows = stmt.query(params).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", sql, e))
        })?;

        let mut nodes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to fetch row: {}", e))?
        {
            nodes.push(Self::row_to_node(&row)?);
        }
        Ok(nodes)
    }

    /// Insert or replace a node row
    pub async fn insert_node(&self, node: &HierarchyNode) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO hierarchy_nodes ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                NODE_COLUMNS
            ),
            libsql::params![
                node.node_id,
                node.instance_id,
                node.instance_type_id,
                node.parent_id,
                node.state as i64,
                node.created_at.to_rfc3339(),
                node.updated_at.map(|t| t.to_rfc3339()),
                node.user_id,
            ],
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to insert node {}: {}", node.node_id, e))
        })?;
        Ok(())
    }

    /// Insert or replace a catalog row
    pub async fn insert_instance(
        &self,
        kind: InstanceType,
        record: &InstanceRecord,
    ) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (id, name, location_id) VALUES (?, ?, ?)",
                kind.table_name()
            ),
            libsql::params![record.instance_id, record.name.clone(), record.location_id],
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to insert {} row {}: {}",
                kind.table_name(),
                record.instance_id,
                e
            ))
        })?;
        Ok(())
    }

    /// Delete a catalog row; referencing nodes are left untouched
    pub async fn delete_instance(
        &self,
        kind: InstanceType,
        instance_id: InstanceId,
    ) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        let affected = conn
            .execute(
                &format!("DELETE FROM {} WHERE id = ?", kind.table_name()),
                [instance_id],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?;
        Ok(affected)
    }
}

#[async_trait]
impl HierarchyStore for TursoStore {
    async fn get_node(&self, node_id: NodeId) -> Result<Option<HierarchyNode>> {
        let mut nodes = self
            .query_nodes(
                &format!("SELECT {} FROM hierarchy_nodes WHERE node_id = ?", NODE_COLUMNS),
                [node_id],
            )
            .await?;
        Ok(nodes.pop())
    }

    async fn get_children(&self, parent_id: NodeId) -> Result<Vec<HierarchyNode>> {
        self.query_nodes(
            &format!(
                "SELECT {} FROM hierarchy_nodes WHERE parent_id = ? ORDER BY node_id ASC",
                NODE_COLUMNS
            ),
            [parent_id],
        )
        .await
    }

    async fn list_nodes(&self) -> Result<Vec<HierarchyNode>> {
        self.query_nodes(
            &format!("SELECT {} FROM hierarchy_nodes ORDER BY node_id ASC", NODE_COLUMNS),
            (),
        )
        .await
    }

    async fn get_instance(
        &self,
        kind: InstanceType,
        instance_id: InstanceId,
    ) -> Result<Option<InstanceRecord>> {
        let conn = self.db.connect_with_timeout().await?;
        let sql = format!(
            "SELECT id, name, location_id FROM {} WHERE id = ?",
            kind.table_name()
        );
        let mut stmt = conn.prepare(&sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to prepare '{}': {}", sql, e))
        })?;
        let mut rows = stmt.query([instance_id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", sql, e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to fetch row: {}", e))?
        {
            Some(row) => Ok(Some(InstanceRecord {
                instance_id: row.get(0).context("Failed to get id")?,
                name: row.get(1).context("Failed to get name")?,
                location_id: row.get(2).context("Failed to get location_id")?,
            })),
            None => Ok(None),
        }
    }
}
