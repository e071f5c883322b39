use failure::Error;

use crate::Tree;

static HEAD_EDGE: &str = "HD";
static NOMINAL_KERNEL_EDGE: &str = "NK";

/// Trait to mark the head daughter of each nonterminal.
///
/// The head is chosen among the children by their edge labels:
///
/// 1. the leftmost child attached through `HD`,
/// 2. the rightmost child attached through `NK`,
/// 3. the leftmost child.
///
/// The head is marked through `Marks::head`, all of its siblings are marked as non-heads. The
/// root is never a head.
pub trait MarkHeads {
    fn mark_heads(&mut self) -> Result<(), Error>;
}

impl MarkHeads for Tree {
    fn mark_heads(&mut self) -> Result<(), Error> {
        let root = self.root();
        self.marks_mut(root).head = false;

        let nonterminals = self
            .preorder(root)
            .filter(|&node| self.has_children(node))
            .collect::<Vec<_>>();
        for node in nonterminals {
            let children = self.children(node);
            let head = {
                let edges = children
                    .iter()
                    .map(|&child| self.edge_label(child))
                    .collect::<Vec<_>>();
                edges
                    .iter()
                    .position(|&edge| edge == Some(HEAD_EDGE))
                    .or_else(|| {
                        edges
                            .iter()
                            .rposition(|&edge| edge == Some(NOMINAL_KERNEL_EDGE))
                    })
                    .unwrap_or(0)
            };
            for (position, child) in children.into_iter().enumerate() {
                self.marks_mut(child).head = position == head;
            }
        }

        Ok(())
    }
}
