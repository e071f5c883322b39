/// Transient per-node annotations of the transformation stages.
///
/// Marks are only meaningful between their producer and their consumer:
///
/// * `head` is set by `MarkHeads::mark_heads` and read by `BoydSplit::boyd_split`.
/// * `split` and `head_block` are set by `BoydSplit::boyd_split` and read by `Raise::raise`.
///
/// Nodes that were never annotated report `Marks::default()`, i.e. all flags `false`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Marks {
    /// The node is the head daughter of its parent.
    pub head: bool,
    /// The node was introduced by splitting a discontinuous node.
    pub split: bool,
    /// The node covers the propagated head lineage of the split node.
    pub head_block: bool,
}

impl Marks {
    /// Returns whether the node carries the head lineage into a block.
    ///
    /// This holds for head daughters that are either unsplit or the head block of an
    /// earlier split.
    pub fn carries_head(self) -> bool {
        self.head && (!self.split || self.head_block)
    }
}

#[cfg(test)]
mod tests {
    use super::Marks;

    #[test]
    fn carries_head() {
        assert!(!Marks::default().carries_head());
        let head = Marks {
            head: true,
            ..Marks::default()
        };
        assert!(head.carries_head());
        let split_head = Marks {
            head: true,
            split: true,
            head_block: false,
        };
        assert!(!split_head.carries_head());
        let head_block = Marks {
            head_block: true,
            ..split_head
        };
        assert!(head_block.carries_head());
    }
}
