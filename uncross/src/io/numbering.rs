use std::collections::HashMap;
use std::ops::Index;

use petgraph::prelude::NodeIndex;

use crate::{Node, Tree};

/// Lowest number assigned to a non-root nonterminal.
pub const FIRST_NONTERMINAL: usize = 500;

/// Highest node number representable in export format.
pub const MAX_NODE_NUMBER: usize = 999;

/// Node numbers of a `Tree` in export format.
///
/// * The root is numbered `0`.
/// * Terminals are numbered by their 1-based position.
/// * Nonterminals are grouped by level, the length of the longest path down to one of their
///   terminals. Numbers are handed out from `500` upwards, lowest level first, left to right by
///   leftmost terminal within a level.
///
/// The numbering is a function of the tree structure alone, numbering the same tree twice
/// yields the same numbers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportNumbering {
    numbers: HashMap<NodeIndex, usize>,
    n_nonterminals: usize,
}

impl ExportNumbering {
    /// Number the nodes of `tree`.
    pub fn new(tree: &Tree) -> Self {
        let root = tree.root();
        let mut levels = HashMap::new();
        let mut nonterminals = Vec::new();
        let mut numbers = HashMap::new();

        // children are visited before their parents
        for node in tree.postorder(root) {
            match &tree[node] {
                Node::Terminal(terminal) => {
                    levels.insert(node, 0);
                    numbers.insert(node, terminal.idx() + 1);
                }
                Node::NonTerminal(_) => {
                    let level = tree
                        .children(node)
                        .into_iter()
                        .map(|child| levels[&child] + 1)
                        .max()
                        .unwrap_or(0);
                    levels.insert(node, level);
                    if node != root {
                        nonterminals.push((level, tree.span(node).lower(), node));
                    }
                }
            }
        }
        nonterminals.sort();

        let n_nonterminals = nonterminals.len();
        for (offset, (_, _, node)) in nonterminals.into_iter().enumerate() {
            numbers.insert(node, FIRST_NONTERMINAL + offset);
        }
        numbers.insert(root, 0);

        ExportNumbering {
            numbers,
            n_nonterminals,
        }
    }

    /// Get the number of `node`.
    ///
    /// Returns `None` if `node` was not part of the numbered tree.
    pub fn get(&self, node: NodeIndex) -> Option<usize> {
        self.numbers.get(&node).cloned()
    }

    /// Get the number of non-root nonterminals.
    pub fn n_nonterminals(&self) -> usize {
        self.n_nonterminals
    }

    /// Returns whether all nonterminal numbers fit into the export format.
    pub fn fits(&self) -> bool {
        self.n_nonterminals == 0 || FIRST_NONTERMINAL + self.n_nonterminals - 1 <= MAX_NODE_NUMBER
    }
}

impl Index<NodeIndex> for ExportNumbering {
    type Output = usize;

    fn index(&self, node: NodeIndex) -> &usize {
        &self.numbers[&node]
    }
}
