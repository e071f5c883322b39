use failure::Error;

use crate::util::lca;
use crate::Tree;

/// Trait to reattach children of the virtual root.
///
/// Treebanks such as NeGra, TIGER and TueBa-D/Z attach punctuation and other material directly
/// to the virtual root node. Each child of the root is moved to the least common ancestor of the
/// terminal left of its leftmost terminal and the terminal right of its rightmost terminal.
///
/// The children of the root are visited left to right. Adjacent root children on the right are
/// skipped over to find the right neighbour, while root children starting inside of the current
/// material are ignored. Children touching the start or end of the sentence and children whose
/// least common ancestor is the root stay attached to the root.
pub trait AttachRoot {
    fn attach_root(&mut self) -> Result<(), Error>;
}

impl AttachRoot for Tree {
    fn attach_root(&mut self) -> Result<(), Error> {
        let root = self.root();
        let terminals = self.terminals();

        for child in self.children(root) {
            let span = self.span(child);
            let lower = span.lower();
            let mut upper = span.upper();

            // skip over adjacent siblings to find the right neighbour
            let mut focus_last = span.last();
            let mut sibling = self.right_sibling(child);
            while let Some(sibling_idx) = sibling {
                let sibling_span = self.span(sibling_idx);
                if sibling_span.lower() < focus_last {
                    sibling = self.right_sibling(sibling_idx);
                    continue;
                }
                // gap, sibling is not adjacent to the focus
                if sibling_span.lower() > focus_last + 1 {
                    break;
                }
                upper = sibling_span.upper();
                focus_last = sibling_span.last();
                sibling = self.right_sibling(sibling_idx);
            }

            if lower == 0 || upper >= terminals.len() {
                continue;
            }

            if let Some(target) = lca(self, terminals[lower - 1], terminals[upper]) {
                if target != root {
                    self.reattach(child, target)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;

    use crate::io::ExportReader;
    use crate::{AttachRoot, Tree};

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

    #[test]
    fn attach_punctuation() {
        let mut tree = tree(
            "#BOS 1
Er\t\t\tPPER\t--\t\t\tSB\t501
sagte\t\t\tVVFIN\t--\t\t\tHD\t501
,\t\t\t$,\t--\t\t\t--\t0
dass\t\t\tKOUS\t--\t\t\tCP\t500
er\t\t\tPPER\t--\t\t\tSB\t500
kommt\t\t\tVVFIN\t--\t\t\tHD\t500
.\t\t\t$.\t--\t\t\t--\t0
#500\t\t\tS\t--\t\t\tOC\t501
#501\t\t\tS\t--\t\t\t--\t0
#EOS 1",
        );
        tree.attach_root().unwrap();
        let terminals = tree.terminals();
        let (comma_parent, _) = tree.parent(terminals[2]).unwrap();
        let (sagte_parent, _) = tree.parent(terminals[1]).unwrap();
        assert_eq!(comma_parent, sagte_parent);
        assert_eq!(tree.edge_label(terminals[2]), None);
        // sentence final punctuation touches the boundary
        assert_eq!(tree.parent(terminals[6]).unwrap().0, tree.root());
        assert_eq!(tree.children(tree.root()).len(), 2);
    }

    #[test]
    fn skip_adjacent_siblings() {
        // "(" and ")" are both attached to the root, the right neighbour of "(" is found by
        // skipping over the adjacent ")"
        let mut tree = tree(
            "#BOS 1
Sie\t\t\tPPER\t--\t\t\tSB\t501
kam\t\t\tVVFIN\t--\t\t\tHD\t501
(\t\t\t$(\t--\t\t\t--\t0
)\t\t\t$(\t--\t\t\t--\t0
heute\t\t\tADV\t--\t\t\tMO\t500
an\t\t\tPTKVZ\t--\t\t\tSVP\t500
#500\t\t\tVP\t--\t\t\tOC\t501
#501\t\t\tS\t--\t\t\t--\t0
#EOS 1",
        );
        tree.attach_root().unwrap();
        let terminals = tree.terminals();
        let (s, _) = tree.parent(terminals[0]).unwrap();
        assert_eq!(tree.parent(terminals[2]).unwrap().0, s);
        assert_eq!(tree.parent(terminals[3]).unwrap().0, s);
        assert_eq!(tree.children(tree.root()), vec![s]);
    }

    #[test]
    fn skip_siblings_inside_focus() {
        // the comma lies inside of the discontinuous NP and is skipped when looking for the
        // right neighbour of the NP, "hier" is adjacent to the NP and extends it
        let mut tree = tree(
            "#BOS 1
Gestern\tADV\t--\tMO\t501
den\tART\t--\tNK\t500
,\t$,\t--\t--\t0
Mann\tNN\t--\tNK\t500
hier\tADV\t--\t--\t0
gesehen\tVVPP\t--\tHD\t501
#500\tNP\t--\tOA\t0
#501\tS\t--\t--\t0
#EOS 1",
        );
        tree.attach_root().unwrap();
        let terminals = tree.terminals();
        let (s, _) = tree.parent(terminals[0]).unwrap();
        let (np, _) = tree.parent(terminals[1]).unwrap();
        assert_eq!(tree[s].label(), "S");
        assert_eq!(tree[np].label(), "NP");
        assert_eq!(tree.parent(np).unwrap().0, s);
        assert_eq!(tree.parent(terminals[2]).unwrap().0, np);
        assert_eq!(tree.parent(terminals[4]).unwrap().0, s);
        assert_eq!(tree.children(tree.root()), vec![s]);
    }

    #[test]
    fn chain_of_adjacent_siblings() {
        // each adjacent sibling moves the focus, the right neighbour of "ja" is "gesehen"
        let mut tree = tree(
            "#BOS 1
Er\tPPER\t--\tSB\t500
ja\tADV\t--\tMO\t0
wohl\tADV\t--\tMO\t0
auch\tADV\t--\tMO\t0
gesehen\tVVPP\t--\tHD\t500
#500\tS\t--\t--\t0
#EOS 1",
        );
        tree.attach_root().unwrap();
        let terminals = tree.terminals();
        let (s, _) = tree.parent(terminals[0]).unwrap();
        for &adverb in &terminals[1..4] {
            assert_eq!(tree.parent(adverb).unwrap().0, s);
            assert_eq!(tree.edge_label(adverb), Some("MO"));
        }
        assert_eq!(tree.children(tree.root()), vec![s]);
    }

    #[test]
    fn keep_at_root() {
        // the neighbours of the comma belong to different children of the root
        let mut tree = tree(
            "#BOS 1
Den\tART\t--\tNK\t500
hat\tVAFIN\t--\tHD\t501
,\t$,\t--\t--\t0
Mann\tNN\t--\tNK\t500
gesehen\tVVPP\t--\tHD\t501
#500\tNP\t--\t--\t0
#501\tVP\t--\t--\t0
#EOS 1",
        );
        let original = tree.clone();
        tree.attach_root().unwrap();
        assert_eq!(tree, original);
        assert_eq!(tree.children(tree.root()).len(), 3);
    }

    #[test]
    fn matches_reference_output() {
        let mut trees = read("testdata/tiger.export");
        for tree in &mut trees {
            tree.attach_root().unwrap();
        }
        assert_eq!(trees, read("testdata/tiger.root.export4"));
    }

    #[test]
    fn idempotent() {
        for mut tree in read("testdata/tiger.export") {
            tree.attach_root().unwrap();
            let once = tree.clone();
            tree.attach_root().unwrap();
            assert_eq!(tree, once);
        }
    }
}
