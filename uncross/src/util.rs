use petgraph::prelude::{EdgeIndex, NodeIndex};

use crate::Tree;

/// Struct to climb up a `Tree`.
///
/// This struct does not borrow from the tree in order to allow mutation during climbing.
///
/// `Climber` advances to the next node in the tree before returning the previous node. This means
/// that removing a node that was just returned through the `next` method will not invalidate the
/// climber. Through this mechanism, reattachment of the node returned from `next` will not be
/// reflected in the path since the `Climber` already advanced past it. If the updated path is
/// important, the climber should be re-initialized with the previously returned node.
pub struct Climber {
    cur: Option<(NodeIndex, EdgeIndex)>,
}

impl Climber {
    /// Constructs a new `Climber`.
    pub fn new(node: NodeIndex, tree: &Tree) -> Self {
        let cur = tree.parent(node);
        Climber { cur }
    }

    /// Moves up the tree by following the incoming edge.
    ///
    /// This method behaves like an iterator, returning `Some(NodeIndex)` before reaching the final
    /// state. Calling this method again in the final state will return `None`.
    pub fn next(&mut self, tree: &Tree) -> Option<NodeIndex> {
        self.next_with_edge(tree).map(|(node, _)| node)
    }

    /// Moves up the tree by following the incoming edge.
    ///
    /// Returns a tuple of `(NodeIndex, EdgeIndex)` where `NodeIndex` is the parent node's index
    /// and `EdgeIndex` is the incoming edge`s index.
    pub fn next_with_edge(&mut self, tree: &Tree) -> Option<(NodeIndex, EdgeIndex)> {
        if let Some((node, edge)) = self.cur {
            self.cur = tree.parent(node);
            Some((node, edge))
        } else {
            None
        }
    }
}

// path from the root down to node, both inclusive
fn root_path(tree: &Tree, node: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![node];
    let mut climber = Climber::new(node, tree);
    while let Some(ancestor) = climber.next(tree) {
        path.push(ancestor);
    }
    path.reverse();
    path
}

/// Get the least common ancestor of two nodes.
///
/// The paths from both nodes to the root are compared starting at the root, the last node on
/// which both paths agree is returned. If `a` dominates `b`, `a` is returned and the least
/// common ancestor of a node with itself is the node.
///
/// Returns `None` if the nodes do not share a root.
pub fn lca(tree: &Tree, a: NodeIndex, b: NodeIndex) -> Option<NodeIndex> {
    root_path(tree, a)
        .into_iter()
        .zip(root_path(tree, b))
        .take_while(|(a, b)| a == b)
        .last()
        .map(|(common, _)| common)
}
