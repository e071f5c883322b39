use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Range;

use failure::Error;

/// Terminal positions covered by a node.
///
/// A span is a non-empty range `lower..upper` of 0-based terminal positions with optional
/// gaps. Nodes with gaps in their span are discontinuous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    lower: usize,
    upper: usize,
    gaps: Option<BTreeSet<usize>>,
}

impl From<usize> for Span {
    fn from(idx: usize) -> Self {
        Span::new(idx, idx + 1)
    }
}

impl Span {
    /// Continuous span, panics if the range is empty.
    pub(crate) fn new(lower: usize, upper: usize) -> Self {
        assert!(lower < upper, "Span lower bound has to be below upper bound.");
        Span {
            lower,
            upper,
            gaps: None,
        }
    }

    /// Build a span from the positions of the covered terminals.
    ///
    /// Positions may be unordered and contain duplicates. Returns an error if `coverage` is
    /// empty.
    pub(crate) fn from_vec(coverage: Vec<usize>) -> Result<Self, Error> {
        let coverage = coverage.into_iter().collect::<BTreeSet<_>>();
        let (lower, upper) = match (coverage.iter().next(), coverage.iter().next_back()) {
            (Some(&first), Some(&last)) => (first, last + 1),
            _ => return Err(format_err!("Can't build span from empty vec")),
        };
        let gaps = (lower..upper)
            .filter(|idx| !coverage.contains(idx))
            .collect::<BTreeSet<_>>();
        if gaps.is_empty() {
            Ok(Span::new(lower, upper))
        } else {
            Ok(Span {
                lower,
                upper,
                gaps: Some(gaps),
            })
        }
    }

    /// Position of the leftmost covered terminal.
    pub fn lower(&self) -> usize {
        self.lower
    }

    /// Exclusive upper bound, one past the rightmost covered terminal.
    pub fn upper(&self) -> usize {
        self.upper
    }

    /// Position of the rightmost covered terminal.
    pub fn last(&self) -> usize {
        self.upper - 1
    }

    /// Get the number of covered terminals.
    pub fn n_indices(&self) -> usize {
        self.upper - self.lower - self.gaps.as_ref().map(BTreeSet::len).unwrap_or(0)
    }

    /// Get the uncovered positions between `lower` and `upper`.
    pub fn gaps(&self) -> Option<&BTreeSet<usize>> {
        self.gaps.as_ref()
    }

    pub fn is_continuous(&self) -> bool {
        self.gaps.is_none()
    }
}

impl Ord for Span {
    /// Spans are ordered by lower bound, then upper bound, then number of covered terminals.
    fn cmp(&self, other: &Span) -> Ordering {
        self.lower
            .cmp(&other.lower)
            .then(self.upper.cmp(&other.upper))
            .then(self.n_indices().cmp(&other.n_indices()))
    }
}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Span) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> IntoIterator for &'a Span {
    type Item = usize;
    type IntoIter = SpanIter<'a>;

    fn into_iter(self) -> SpanIter<'a> {
        SpanIter {
            range: self.lower..self.upper,
            gaps: self.gaps.as_ref(),
        }
    }
}

/// Iterator over the covered positions of a `Span`.
#[derive(Debug, Eq, PartialEq)]
pub struct SpanIter<'a> {
    range: Range<usize>,
    gaps: Option<&'a BTreeSet<usize>>,
}

impl<'a> Iterator for SpanIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let gaps = self.gaps;
        self.range
            .find(|idx| gaps.map(|gaps| !gaps.contains(idx)).unwrap_or(true))
    }
}
