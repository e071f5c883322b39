use std::fmt;
use std::mem;

/// Edge connecting a node to its parent.
///
/// Carries the grammatical function, e.g. `HD` or `NK`. Unlabeled edges are written as `--` in
/// export format.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Edge {
    label: Option<String>,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label().unwrap_or("--"))
    }
}

impl<S> From<Option<S>> for Edge
where
    S: Into<String>,
{
    fn from(label: Option<S>) -> Self {
        Edge {
            label: label.map(Into::into),
        }
    }
}

impl Edge {
    /// Create a new Edge with the given label.
    pub fn new<S>(label: Option<S>) -> Self
    where
        S: Into<String>,
    {
        Edge::from(label)
    }

    /// Get the Edge label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(String::as_str)
    }

    /// Set the Edge label, returns the replaced label.
    pub fn set_label<S>(&mut self, new_label: Option<S>) -> Option<String>
    where
        S: Into<String>,
    {
        mem::replace(&mut self.label, new_label.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use crate::Edge;

    #[test]
    fn display() {
        assert_eq!(Edge::new(Some("HD")).to_string(), "HD");
        assert_eq!(Edge::default().to_string(), "--");
    }

    #[test]
    fn set_label() {
        let mut edge = Edge::from(Some("NK"));
        assert_eq!(edge.set_label(None::<String>), Some("NK".to_string()));
        assert_eq!(edge.label(), None);
    }
}
