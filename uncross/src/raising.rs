use failure::Error;

use crate::error::TransformError;
use crate::Tree;

/// Trait to remove crossing branches by raising.
///
/// Removes all nodes introduced by `BoydSplit` that are not the head block of their split. The
/// children of a removed node are attached to the node's parent, keeping their edge labels.
/// Afterwards, discontinuous non-head material hangs from the nearest remaining ancestor.
///
/// Requires split marks, see `BoydSplit`.
pub trait Raise {
    fn raise(&mut self) -> Result<(), Error>;
}

impl Raise for Tree {
    fn raise(&mut self) -> Result<(), Error> {
        let root = self.root();
        let removal = self
            .preorder(root)
            .filter(|&node| node != root)
            .filter(|&node| {
                let marks = self.marks(node);
                marks.split && !marks.head_block
            })
            .collect::<Vec<_>>();

        for node in removal {
            let (parent, _) = self
                .parent(node)
                .ok_or_else(|| TransformError::MissingParent(self[node].to_string()))?;
            for child in self.children(node) {
                self.reattach(child, parent)?;
            }
            self.remove_node(node);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;

    use crate::io::ExportReader;
    use crate::{AttachRoot, BoydSplit, MarkHeads, Raise, Tree};

    fn read(path: &str) -> Vec<Tree> {
        ExportReader::new(BufReader::new(File::open(path).unwrap()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn raising(tree: &mut Tree) {
        tree.attach_root().unwrap();
        tree.mark_heads().unwrap();
        tree.boyd_split(false).unwrap();
        tree.raise().unwrap();
    }

    #[test]
    fn raise_non_head_block() {
        let mut tree = ExportReader::new(
            "#BOS 1
w1\tA\t--\tNK\t500
w2\tB\t--\tHD\t501
w3\tC\t--\tHD\t500
#500\tX\t--\tOA\t0
#501\tY\t--\tMO\t0
#EOS 1"
                .as_bytes(),
        )
        .next()
        .unwrap()
        .unwrap();
        tree.mark_heads().unwrap();
        tree.boyd_split(true).unwrap();
        tree.raise().unwrap();

        let terminals = tree.terminals();
        let root = tree.root();
        assert_eq!(tree.parent(terminals[0]).unwrap().0, root);
        assert_eq!(tree.edge_label(terminals[0]), Some("NK"));
        let (x2, _) = tree.parent(terminals[2]).unwrap();
        assert_eq!(tree[x2].label(), "X*2");
        assert_eq!(tree.parent(x2).unwrap().0, root);
        let labels = tree
            .children(root)
            .into_iter()
            .map(|child| tree[child].to_string())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["A w1", "Y", "X*2"]);
        assert!(tree.is_continuous());
    }

    #[test]
    fn continuous_noop() {
        let trees = read("testdata/tiger.export");
        // "Gut ." is continuous and has no material at the root to reattach
        let mut tree = trees[3].clone();
        raising(&mut tree);
        assert_eq!(tree, trees[3]);
        for node in tree.preorder(tree.root()).collect::<Vec<_>>() {
            assert!(!tree.marks(node).split);
        }
    }

    #[test]
    fn matches_reference_output() {
        let mut trees = read("testdata/tiger.export");
        for tree in &mut trees {
            raising(tree);
            assert!(tree.is_continuous());
        }
        assert_eq!(trees, read("testdata/tiger.raising.export4"));
    }

    #[test]
    fn nested_raise() {
        let mut tree = read("testdata/tiger.export").remove(4);
        raising(&mut tree);
        let terminals = tree.terminals();
        let (s, _) = tree.parent(terminals[1]).unwrap();
        assert_eq!(tree[s].label(), "S");
        // Darüber is raised through both removed blocks
        assert_eq!(tree.parent(terminals[0]).unwrap().0, s);
        assert_eq!(tree.edge_label(terminals[0]), Some("MO"));
        let (vp, _) = tree.parent(terminals[2]).unwrap();
        let (outer_vp, _) = tree.parent(vp).unwrap();
        assert_eq!(tree.parent(outer_vp).unwrap().0, s);
        assert_eq!(tree.parent(terminals[3]).unwrap().0, outer_vp);
    }
}
