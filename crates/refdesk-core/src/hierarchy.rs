// Branch hierarchy flattening.
//
// Branches are regions (`parent_id == 0`) with sub-regions one level down.
// Pickers show them as a single list: each region followed by its own
// sub-regions. Only two levels are represented; a record whose parent is
// not a region does not appear.

use refdesk_api::types::{Branch, BranchOption, BranchTreeNode};
use serde::Serialize;

/// A record that knows its own id and its parent's.
pub trait HierarchyNode {
    fn id(&self) -> u64;
    /// `0` for a root.
    fn parent_id(&self) -> u64;
}

impl HierarchyNode for BranchOption {
    fn id(&self) -> u64 {
        self.id
    }

    fn parent_id(&self) -> u64 {
        self.parent_id
    }
}

impl HierarchyNode for Branch {
    fn id(&self) -> u64 {
        self.id
    }

    fn parent_id(&self) -> u64 {
        self.parent_id
    }
}

/// Roots in input order, each immediately followed by its direct children
/// in input order.
pub fn flatten_two_level<N: HierarchyNode>(nodes: &[N]) -> Vec<&N> {
    let mut out = Vec::with_capacity(nodes.len());
    for root in nodes.iter().filter(|n| n.parent_id() == 0) {
        out.push(root);
        out.extend(
            nodes
                .iter()
                .filter(|n| n.parent_id() != 0 && n.parent_id() == root.id()),
        );
    }
    out
}

/// One line of a nested branch listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeRow<'a> {
    /// `0` for a region, `1` for a sub-region.
    pub depth: u8,
    pub id: u64,
    pub name: &'a str,
    pub parent_id: u64,
}

/// Flatten the `tree=1` picklist shape: each node, then its `childrens`.
pub fn flatten_tree(nodes: &[BranchTreeNode]) -> Vec<TreeRow<'_>> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(TreeRow {
            depth: 0,
            id: node.id,
            name: &node.name,
            parent_id: node.parent_id,
        });
        out.extend(node.childrens.iter().map(|child| TreeRow {
            depth: 1,
            id: child.id,
            name: &child.name,
            parent_id: child.parent_id,
        }));
    }
    out
}
