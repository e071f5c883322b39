use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use failure::Error;
use petgraph::prelude::{Dfs, Direction, EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;

use crate::error::TransformError;
use crate::util::Climber;
use crate::{Edge, Marks, Node, Span};

/// `Tree`
///
/// `Tree`s represent discontinuous constituency trees and consist of `Node`s. The nodes are
/// either `Terminal`s or `NonTerminal`s. Relations between nodes are expressed as `Edge`s, each
/// node except for the root has exactly one incoming edge.
///
/// Children are stored unordered, every method returning children orders them by the position
/// of their leftmost terminal.
#[derive(Debug, Clone)]
pub struct Tree {
    graph: StableGraph<Node, Edge>,
    n_terminals: usize,
    root: NodeIndex,
    marks: HashMap<NodeIndex, Marks>,
}

impl Tree {
    pub(crate) fn new(graph: StableGraph<Node, Edge>, n_terminals: usize, root: NodeIndex) -> Self {
        Tree {
            graph,
            n_terminals,
            root,
            marks: HashMap::new(),
        }
    }

    /// Get the number of terminals in the tree.
    pub fn n_terminals(&self) -> usize {
        self.n_terminals
    }

    /// Get the index of the root of the tree.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get the terminals of the tree in sentence order.
    pub fn terminals(&self) -> Vec<NodeIndex> {
        let mut terminals = self
            .graph
            .node_indices()
            .filter(|idx| self.graph[*idx].is_terminal())
            .collect::<Vec<_>>();
        terminals.sort_by_key(|&idx| self.leftmost(idx));
        terminals
    }

    /// Get an iterator over the nonterminals in the tree.
    pub fn nonterminals<'a>(&'a self) -> impl Iterator<Item = NodeIndex> + 'a {
        self.graph
            .node_indices()
            .filter(move |idx| !self.graph[*idx].is_terminal())
    }

    /// Get the parent and corresponding edge of a tree node.
    ///
    /// * Returns `NodeIndex` of immediately dominating node and corresponding `EdgeIndex`.
    /// * Returns `None` if `node` doesn't exist or doesn't have incoming edges.
    pub fn parent(&self, node: NodeIndex) -> Option<(NodeIndex, EdgeIndex)> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge_ref| (edge_ref.source(), edge_ref.id()))
    }

    /// Get the label of the edge connecting `node` to its parent.
    ///
    /// Returns `None` for the root and for unlabeled edges.
    pub fn edge_label(&self, node: NodeIndex) -> Option<&str> {
        self.parent(node)
            .and_then(|(_, edge)| self.graph[edge].label())
    }

    /// Get `node`'s children ordered by their leftmost terminal.
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut children = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|child| (self.leftmost(child), child))
            .collect::<Vec<_>>();
        children.sort();
        children.into_iter().map(|(_, child)| child).collect()
    }

    /// Returns whether `node` has any children.
    pub fn has_children(&self, node: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .next()
            .is_some()
    }

    /// Get the sibling immediately to the right of `node`.
    pub fn right_sibling(&self, node: NodeIndex) -> Option<NodeIndex> {
        let (parent, _) = self.parent(node)?;
        let siblings = self.children(parent);
        siblings
            .iter()
            .position(|&sibling| sibling == node)
            .and_then(|position| siblings.get(position + 1).cloned())
    }

    /// Get the terminals dominated by `node` in sentence order.
    ///
    /// A terminal dominates only itself.
    pub fn descendent_terminals(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut terminals = Vec::new();
        let mut dfs = Dfs::new(&self.graph, node);
        while let Some(descendent) = dfs.next(&self.graph) {
            if let Node::Terminal(terminal) = &self.graph[descendent] {
                terminals.push((terminal.idx(), descendent));
            }
        }
        terminals.sort();
        terminals.into_iter().map(|(_, terminal)| terminal).collect()
    }

    /// Get the span of terminal positions covered by `node`.
    pub fn span(&self, node: NodeIndex) -> Span {
        if let Node::Terminal(terminal) = &self.graph[node] {
            return terminal.span();
        }
        let coverage = self
            .descendent_terminals(node)
            .into_iter()
            .filter_map(|terminal| self.graph[terminal].terminal().map(|t| t.idx()))
            .collect::<Vec<_>>();
        // safe to unwrap, every nonterminal dominates at least one terminal
        Span::from_vec(coverage).unwrap()
    }

    // position of the leftmost terminal dominated by node
    fn leftmost(&self, node: NodeIndex) -> usize {
        let mut dfs = Dfs::new(&self.graph, node);
        let mut leftmost = usize::max_value();
        while let Some(descendent) = dfs.next(&self.graph) {
            if let Node::Terminal(terminal) = &self.graph[descendent] {
                leftmost = leftmost.min(terminal.idx());
            }
        }
        leftmost
    }

    /// Returns whether all nodes in the tree cover continuous spans.
    pub fn is_continuous(&self) -> bool {
        self.nonterminals()
            .all(|nt| self.span(nt).is_continuous())
    }

    /// Preorder traversal starting at `node`.
    pub fn preorder(&self, node: NodeIndex) -> Preorder {
        Preorder {
            tree: self,
            stack: vec![node],
        }
    }

    /// Postorder traversal starting at `node`.
    pub fn postorder(&self, node: NodeIndex) -> Postorder {
        Postorder {
            tree: self,
            stack: vec![(node, false)],
        }
    }

    /// Move `node` with its subtree below `new_parent`.
    ///
    /// The incoming edge of `node` is replaced by an edge from `new_parent` carrying the same
    /// label. Returns an error if `node` is the root.
    pub fn reattach(&mut self, node: NodeIndex, new_parent: NodeIndex) -> Result<(), Error> {
        let (_, edge_id) = self
            .parent(node)
            .ok_or_else(|| TransformError::RootReattachment)?;
        // safe to unwrap, edge_id was just looked up
        let edge = self.graph.remove_edge(edge_id).unwrap();
        self.graph.add_edge(new_parent, node, edge);
        Ok(())
    }

    /// Add `node` as a new child of `parent`.
    pub(crate) fn push_child(&mut self, parent: NodeIndex, node: Node, edge: Edge) -> NodeIndex {
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, edge);
        idx
    }

    /// Remove `node` and all its edges from the tree.
    ///
    /// Children of `node` are left without parent, they have to be reattached beforehand.
    pub(crate) fn remove_node(&mut self, node: NodeIndex) -> Option<Node> {
        self.marks.remove(&node);
        self.graph.remove_node(node)
    }

    /// Get the annotations of `node`.
    pub fn marks(&self, node: NodeIndex) -> Marks {
        self.marks.get(&node).cloned().unwrap_or_default()
    }

    /// Get the annotations of `node` mutably.
    pub fn marks_mut(&mut self, node: NodeIndex) -> &mut Marks {
        self.marks.entry(node).or_insert_with(Marks::default)
    }

    /// Get an immutable reference to the underlying `StableGraph`.
    pub fn graph(&self) -> &StableGraph<Node, Edge> {
        &self.graph
    }

    // number of edges between node and the root
    fn depth(&self, node: NodeIndex) -> usize {
        let mut climber = Climber::new(node, self);
        let mut depth = 0;
        while climber.next(self).is_some() {
            depth += 1;
        }
        depth
    }

    // Node indices ordered independently of insertion order: by span, terminals first, by form
    // or label, by depth to separate unary chains with identical labels.
    fn canonical_order(&self) -> Vec<NodeIndex> {
        let mut keyed = self
            .graph
            .node_indices()
            .map(|idx| {
                let text = match &self.graph[idx] {
                    Node::Terminal(terminal) => terminal.form(),
                    Node::NonTerminal(nt) => nt.label(),
                };
                let key = (
                    self.span(idx),
                    !self.graph[idx].is_terminal(),
                    text,
                    self.depth(idx),
                );
                (key, idx)
            })
            .collect::<Vec<_>>();
        keyed.sort_by(|(key1, _), (key2, _)| key1.cmp(key2));
        keyed.into_iter().map(|(_, idx)| idx).collect()
    }

    // parent content, parent span and incoming edge of node
    fn attachment(&self, node: NodeIndex) -> Option<(&Node, Span, &Edge)> {
        self.parent(node)
            .map(|(parent, edge)| (&self.graph[parent], self.span(parent), &self.graph[edge]))
    }
}

/// Trees are equal if their nodes can be paired such that paired nodes have equal content,
/// equal incoming edges and equal parents. `Marks` are not compared.
impl PartialEq for Tree {
    fn eq(&self, other: &Tree) -> bool {
        if self.n_terminals != other.n_terminals
            || self.graph.node_count() != other.graph.node_count()
        {
            return false;
        }

        self.canonical_order()
            .into_iter()
            .zip(other.canonical_order())
            .all(|(node1, node2)| {
                self[node1] == other[node2] && self.attachment(node1) == other.attachment(node2)
            })
    }
}

impl Index<NodeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &<Self as Index<NodeIndex>>::Output {
        &self.graph[index]
    }
}

impl Index<EdgeIndex> for Tree {
    type Output = Edge;

    fn index(&self, index: EdgeIndex) -> &<Self as Index<EdgeIndex>>::Output {
        &self.graph[index]
    }
}

impl IndexMut<NodeIndex> for Tree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.graph[index]
    }
}

impl IndexMut<EdgeIndex> for Tree {
    fn index_mut(&mut self, index: EdgeIndex) -> &mut Edge {
        &mut self.graph[index]
    }
}

/// Lazy preorder traversal over a `Tree`.
///
/// Children are visited in the order returned by `Tree::children`.
pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(node).into_iter().rev());
        Some(node)
    }
}

/// Lazy postorder traversal over a `Tree`.
///
/// Children are visited in the order returned by `Tree::children`.
pub struct Postorder<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeIndex, bool)>,
}

impl<'a> Iterator for Postorder<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded || !self.tree.has_children(node) {
                return Some(node);
            }
            self.stack.push((node, true));
            self.stack.extend(
                self.tree
                    .children(node)
                    .into_iter()
                    .rev()
                    .map(|child| (child, false)),
            );
        }
        None
    }
}
