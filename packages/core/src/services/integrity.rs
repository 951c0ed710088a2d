//! Structural integrity sweep over the node store
//!
//! Reports roots, orphans (parent id absent from the store), trivial
//! self-cycles (`parent_id == node_id`) and nodes whose type id is not in the
//! configured mapping. Longer cycles are not searched for here; ancestor walks
//! detect them on demand with a visited set.

use crate::models::{HierarchyNode, InstanceTypeMapping, IntegrityReport, NodeId};
use std::collections::HashSet;

/// Classify every node of a full store snapshot
pub fn sweep(nodes: &[HierarchyNode], mapping: &InstanceTypeMapping) -> IntegrityReport {
    let known: HashSet<NodeId> = nodes.iter().map(|n| n.node_id).collect();
    let mut report = IntegrityReport {
        total_nodes: nodes.len(),
        ..Default::default()
    };

    for node in nodes {
        match node.parent_id {
            None => report.nodes_without_parent.push(node.node_id),
            Some(_) if node.is_self_parented() => report.cycles.push(node.node_id),
            Some(parent) if !known.contains(&parent) => report.orphans.push(node.node_id),
            Some(_) => {}
        }

        if mapping.resolve(node.instance_type_id).is_none() {
            report.unknown_instance_types.push(node.node_id);
        }
    }

    report.nodes_without_parent.sort_unstable();
    report.orphans.sort_unstable();
    report.cycles.sort_unstable();
    report.unknown_instance_types.sort_unstable();
    report
}
