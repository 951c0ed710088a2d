//! Service Layer Error Types
//!
//! This module defines error types for hierarchy operations. Only structural
//! and not-found failures are errors; unresolved display names degrade to a
//! placeholder inside the service and never surface here.

use crate::config::ConfigError;
use crate::models::NodeId;
use thiserror::Error;

/// Hierarchy operation errors
#[derive(Error, Debug)]
pub enum HierarchyError {
    /// Node not found by ID
    #[error("Node not found: {node_id}")]
    NodeNotFound { node_id: NodeId },

    /// The parent chain revisits a node
    #[error("Cycle detected at node {node_id} (chain: {chain:?})")]
    CycleDetected { node_id: NodeId, chain: Vec<NodeId> },

    /// Requested depth outside the accepted range
    #[error("Invalid depth {depth}: must lie in [{min}, {max}]")]
    InvalidDepth { depth: u32, min: u32, max: u32 },

    /// Traversal would go past its bound
    #[error("Depth limit {limit} exceeded at node {node_id}")]
    DepthExceeded { node_id: NodeId, limit: usize },

    /// Backing store failure
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Service configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

impl HierarchyError {
    /// Create a node not found error
    pub fn node_not_found(node_id: NodeId) -> Self {
        Self::NodeNotFound { node_id }
    }

    /// Create a cycle detected error
    pub fn cycle_detected(node_id: NodeId, chain: Vec<NodeId>) -> Self {
        Self::CycleDetected { node_id, chain }
    }

    /// Create an invalid depth error
    pub fn invalid_depth(depth: u32, min: u32, max: u32) -> Self {
        Self::InvalidDepth { depth, min, max }
    }

    /// Create a depth exceeded error
    pub fn depth_exceeded(node_id: NodeId, limit: usize) -> Self {
        Self::DepthExceeded { node_id, limit }
    }

    /// Create a query failed error
    pub fn query_failed(msg: impl Into<String>) -> Self {
        Self::QueryFailed(msg.into())
    }

    /// Machine-readable error code for the HTTP layer
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NodeNotFound { .. } => "NODE_NOT_FOUND",
            Self::CycleDetected { .. } => "CYCLE_DETECTED",
            Self::InvalidDepth { .. } => "INVALID_DEPTH",
            Self::DepthExceeded { .. } => "DEPTH_EXCEEDED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. })
    }

    /// Errors caused by the request itself rather than stored data or the backend
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. } | Self::InvalidDepth { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(HierarchyError::node_not_found(3).error_code(), "NODE_NOT_FOUND");
        assert_eq!(
            HierarchyError::cycle_detected(9, vec![9]).error_code(),
            "CYCLE_DETECTED"
        );
        assert_eq!(
            HierarchyError::invalid_depth(0, 1, 50).error_code(),
            "INVALID_DEPTH"
        );
        assert_eq!(
            HierarchyError::depth_exceeded(1, 50).error_code(),
            "DEPTH_EXCEEDED"
        );
        assert_eq!(HierarchyError::query_failed("x").error_code(), "QUERY_FAILED");
    }

    #[test]
    fn test_classification() {
        assert!(HierarchyError::node_not_found(1).is_not_found());
        assert!(HierarchyError::invalid_depth(99, 1, 50).is_client_error());
        assert!(!HierarchyError::cycle_detected(1, vec![]).is_client_error());
        assert!(!HierarchyError::query_failed("down").is_client_error());
    }

    #[test]
    fn test_messages() {
        let err = HierarchyError::invalid_depth(0, 1, 50);
        assert_eq!(err.to_string(), "Invalid depth 0: must lie in [1, 50]");
        let err = HierarchyError::cycle_detected(9, vec![9, 9]);
        assert_eq!(err.to_string(), "Cycle detected at node 9 (chain: [9, 9])");
    }
}
