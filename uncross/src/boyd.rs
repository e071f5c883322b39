use failure::Error;
use log::debug;
use petgraph::prelude::NodeIndex;

use crate::error::TransformError;
use crate::{Marks, Tree};

/// Trait to split discontinuous nonterminals into continuous blocks.
///
/// Splitting follows Boyd (2007), "Discontinuity Revisited: An Improved Conversion to
/// Context-Free Representations". Nodes are visited bottom up, the children of each node are
/// grouped into maximal blocks covering continuous spans. If there is more than one block, the
/// node is replaced by one copy per block, attached to the node's parent through the node's edge
/// label.
///
/// Every copy is marked as `split` and inherits the `head` mark of the replaced node. A copy is
/// the `head_block` if it covers a child carrying the head lineage, i.e. an unsplit head
/// daughter or the head block of a split head daughter.
///
/// Requires head marks, see `MarkHeads`.
pub trait BoydSplit {
    /// Split discontinuous nodes.
    ///
    /// If `marking` is `true`, copies are labeled `LABEL*i` with `i` the 1-based position of the
    /// block.
    ///
    /// Returns `TransformError::HeadBlocks` if a split does not produce exactly one head block.
    fn boyd_split(&mut self, marking: bool) -> Result<(), Error>;
}

impl BoydSplit for Tree {
    fn boyd_split(&mut self, marking: bool) -> Result<(), Error> {
        // copies introduced by splitting are not revisited
        let nodes = self.postorder(self.root()).collect::<Vec<_>>();
        for node in nodes {
            {
                let marks = self.marks_mut(node);
                marks.split = false;
                marks.head_block = true;
            }

            let blocks = blocks(self, node);
            if blocks.len() > 1 {
                split(self, node, blocks, marking)?;
            }
        }
        Ok(())
    }
}

// group the ordered children of node into maximal continuous blocks
fn blocks(tree: &Tree, node: NodeIndex) -> Vec<Vec<NodeIndex>> {
    let mut blocks: Vec<Vec<NodeIndex>> = Vec::new();
    let mut prev_last = None;
    for child in tree.children(node) {
        let span = tree.span(child);
        match prev_last {
            Some(last) if span.lower() <= last + 1 => (),
            _ => blocks.push(Vec::new()),
        }
        prev_last = Some(span.last());
        // safe to unwrap, a block was pushed for the first child
        blocks.last_mut().unwrap().push(child);
    }
    blocks
}

fn split(
    tree: &mut Tree,
    node: NodeIndex,
    blocks: Vec<Vec<NodeIndex>>,
    marking: bool,
) -> Result<(), Error> {
    let (parent, edge) = tree
        .parent(node)
        .ok_or_else(|| TransformError::MissingParent(tree[node].to_string()))?;
    let edge = tree[edge].clone();
    let head = tree.marks(node).head;
    let label = tree[node].label().to_owned();
    debug!("Splitting {} into {} blocks", label, blocks.len());

    let mut n_head_blocks = 0;
    for (i, block) in blocks.into_iter().enumerate() {
        let mut copy = tree[node].clone();
        if marking {
            copy.set_label(format!("{}*{}", label, i + 1));
        }
        let head_block = block
            .iter()
            .any(|&child| tree.marks(child).carries_head());
        let copy_idx = tree.push_child(parent, copy, edge.clone());
        for child in block {
            tree.reattach(child, copy_idx)?;
        }
        *tree.marks_mut(copy_idx) = Marks {
            head,
            split: true,
            head_block,
        };
        if head_block {
            n_head_blocks += 1;
        }
    }
    tree.remove_node(node);

    if n_head_blocks != 1 {
        return Err(TransformError::HeadBlocks {
            label,
            count: n_head_blocks,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;

    use failure::Error;

    use crate::error::TransformError;
    use crate::io::ExportReader;
    use crate::{AttachRoot, BoydSplit, MarkHeads, Span, Tree};

    fn read(path: &str) -> Vec<Tree> {
        ExportReader::new(BufReader::new(File::open(path).unwrap()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn tree(input: &str) -> Tree {
        ExportReader::new(input.as_bytes())
            .next()
            .unwrap()
            .unwrap()
    }

    fn discontinuous() -> Tree {
        // X covers w1 and w3 with w3 as head, Y covers w2
        tree(
            "#BOS 1
w1\tA\t--\tNK\t500
w2\tB\t--\tHD\t501
w3\tC\t--\tHD\t500
#500\tX\t--\tOA\t0
#501\tY\t--\tMO\t0
#EOS 1",
        )
    }

    fn split_pipeline(tree: &mut Tree, marking: bool) -> Result<(), Error> {
        tree.attach_root()?;
        tree.mark_heads()?;
        tree.boyd_split(marking)
    }

    #[test]
    fn split_with_marking() {
        let mut tree = discontinuous();
        tree.mark_heads().unwrap();
        tree.boyd_split(true).unwrap();
        assert!(tree.is_continuous());

        let terminals = tree.terminals();
        let (x1, _) = tree.parent(terminals[0]).unwrap();
        let (x2, _) = tree.parent(terminals[2]).unwrap();
        assert_eq!(tree[x1].label(), "X*1");
        assert_eq!(tree[x2].label(), "X*2");
        assert_eq!(tree.edge_label(x1), Some("OA"));
        assert_eq!(tree.edge_label(x2), Some("OA"));
        assert_eq!(tree.parent(x1).unwrap().0, tree.root());
        assert_eq!(tree.parent(x2).unwrap().0, tree.root());

        let x1_marks = tree.marks(x1);
        assert!(x1_marks.split);
        assert!(!x1_marks.head_block);
        let x2_marks = tree.marks(x2);
        assert!(x2_marks.split);
        assert!(x2_marks.head_block);
        // the root's head is the leftmost child, X
        assert!(x1_marks.head && x2_marks.head);
        assert_eq!(tree.span(x1), Span::from(0));
        assert_eq!(tree.span(x2), Span::from(2));
    }

    #[test]
    fn split_without_marking() {
        let mut tree = discontinuous();
        tree.mark_heads().unwrap();
        tree.boyd_split(false).unwrap();
        let labels = tree
            .children(tree.root())
            .into_iter()
            .map(|child| tree[child].label().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["X", "Y", "X"]);
    }

    #[test]
    fn continuous_unchanged() {
        let mut tree = tree(
            "#BOS 1
Das\tART\t--\tNK\t500
Buch\tNN\t--\tNK\t500
.\t$.\t--\t--\t0
#500\tNP\t--\t--\t0
#EOS 1",
        );
        let original = tree.clone();
        tree.mark_heads().unwrap();
        tree.boyd_split(true).unwrap();
        assert_eq!(tree, original);
        for node in tree.preorder(tree.root()).collect::<Vec<_>>() {
            assert!(!tree.marks(node).split);
            assert!(tree.marks(node).head_block);
        }
    }

    #[test]
    fn nested_split() {
        let mut trees = read("testdata/tiger.export");
        let mut tree = trees.remove(4);
        split_pipeline(&mut tree, true).unwrap();
        assert!(tree.is_continuous());
        let terminals = tree.terminals();
        // VP*1 (VP*1 Darüber) muss (VP*2 (VP*2 nachgedacht) werden)
        let (inner1, _) = tree.parent(terminals[0]).unwrap();
        let (outer1, _) = tree.parent(inner1).unwrap();
        let (inner2, _) = tree.parent(terminals[2]).unwrap();
        let (outer2, _) = tree.parent(inner2).unwrap();
        assert_eq!(tree.parent(terminals[3]).unwrap().0, outer2);
        for (node, label, head_block) in vec![
            (inner1, "VP*1", false),
            (outer1, "VP*1", false),
            (inner2, "VP*2", true),
            (outer2, "VP*2", true),
        ] {
            assert_eq!(tree[node].label(), label);
            assert_eq!(tree.marks(node).head_block, head_block);
        }
    }

    #[test]
    fn matches_reference_output() {
        for (pipeline, marking) in vec![("split", false), ("split_marking", true)] {
            let mut trees = read("testdata/tiger.export");
            for tree in &mut trees {
                split_pipeline(tree, marking).unwrap();
            }
            let path = format!("testdata/tiger.{}.export4", pipeline);
            assert_eq!(trees, read(&path));
        }
    }

    #[test]
    fn span_conservation() {
        for mut tree in read("testdata/tiger.export") {
            let original = tree.clone();
            split_pipeline(&mut tree, false).unwrap();
            assert!(tree.is_continuous());
            assert_eq!(tree.n_terminals(), original.n_terminals());
            let mut coverage = tree
                .children(tree.root())
                .into_iter()
                .flat_map(|child| tree.span(child).into_iter().collect::<Vec<_>>())
                .collect::<Vec<_>>();
            coverage.sort();
            assert_eq!(coverage, (0..tree.n_terminals()).collect::<Vec<_>>());
            // every node still covers exactly the terminals of its children
            for nt in tree.nonterminals().collect::<Vec<_>>() {
                let mut from_children = tree
                    .children(nt)
                    .into_iter()
                    .flat_map(|child| tree.span(child).into_iter().collect::<Vec<_>>())
                    .collect::<Vec<_>>();
                from_children.sort();
                assert_eq!(from_children, tree.span(nt).into_iter().collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn missing_head_marks() {
        let mut tree = discontinuous();
        let err = tree.boyd_split(false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TransformError>(),
            Some(&TransformError::HeadBlocks {
                label: "X".into(),
                count: 0
            })
        );
    }
}
