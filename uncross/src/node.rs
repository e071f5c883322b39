use std::fmt;
use std::mem;

use crate::Span;

/// Node of a constituency tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    NonTerminal(NonTerminal),
    Terminal(Terminal),
}

impl Node {
    /// Returns whether `self` is a `Node::Terminal`.
    pub fn is_terminal(&self) -> bool {
        match self {
            Node::Terminal(_) => true,
            Node::NonTerminal(_) => false,
        }
    }

    /// Returns `None` if `self` is a `Node::NonTerminal`.
    pub fn terminal(&self) -> Option<&Terminal> {
        match self {
            Node::Terminal(terminal) => Some(terminal),
            Node::NonTerminal(_) => None,
        }
    }

    /// Returns `None` if `self` is a `Node::NonTerminal`.
    pub fn terminal_mut(&mut self) -> Option<&mut Terminal> {
        match self {
            Node::Terminal(terminal) => Some(terminal),
            Node::NonTerminal(_) => None,
        }
    }

    /// Returns `None` if `self` is a `Node::Terminal`.
    pub fn nonterminal(&self) -> Option<&NonTerminal> {
        match self {
            Node::NonTerminal(nt) => Some(nt),
            Node::Terminal(_) => None,
        }
    }

    /// Get the content of the label column.
    ///
    /// This is the part-of-speech tag of a `Terminal` and the category of a `NonTerminal`.
    pub fn label(&self) -> &str {
        match self {
            Node::NonTerminal(nt) => nt.label(),
            Node::Terminal(t) => t.tag(),
        }
    }

    /// Replace the label, returning the old one.
    pub fn set_label(&mut self, label: impl Into<String>) -> String {
        match self {
            Node::NonTerminal(nt) => nt.set_label(label),
            Node::Terminal(t) => t.set_tag(label),
        }
    }

    pub fn lemma(&self) -> Option<&str> {
        match self {
            Node::NonTerminal(nt) => nt.lemma(),
            Node::Terminal(t) => t.lemma(),
        }
    }

    pub fn morph(&self) -> Option<&str> {
        match self {
            Node::NonTerminal(nt) => nt.morph(),
            Node::Terminal(t) => t.morph(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Terminal(terminal) => write!(f, "{}", terminal),
            Node::NonTerminal(nt) => write!(f, "{}", nt),
        }
    }
}

/// Inner node of a tree.
///
/// Nonterminal lines in export format carry the same columns as terminal lines. Their word
/// column holds the node number which is reassigned on writing and therefore not stored. Lemma
/// and morphology are kept so they can be written back.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NonTerminal {
    label: String,
    lemma: Option<String>,
    morph: Option<String>,
}

impl NonTerminal {
    pub fn new(label: impl Into<String>) -> Self {
        NonTerminal {
            label: label.into(),
            lemma: None,
            morph: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the category, returning the old one.
    pub fn set_label(&mut self, label: impl Into<String>) -> String {
        mem::replace(&mut self.label, label.into())
    }

    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_ref().map(String::as_str)
    }

    pub fn set_lemma(&mut self, lemma: Option<impl Into<String>>) -> Option<String> {
        mem::replace(&mut self.lemma, lemma.map(Into::into))
    }

    pub fn morph(&self) -> Option<&str> {
        self.morph.as_ref().map(String::as_str)
    }

    pub fn set_morph(&mut self, morph: Option<impl Into<String>>) -> Option<String> {
        mem::replace(&mut self.morph, morph.map(Into::into))
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Leaf of a tree.
///
/// A `Terminal` holds the word form, part-of-speech tag, the optional lemma and morphology
/// columns and its 0-based position in the sentence. The position is fixed on reading,
/// transformations never reorder terminals.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Terminal {
    form: String,
    tag: String,
    lemma: Option<String>,
    morph: Option<String>,
    idx: usize,
}

impl Terminal {
    pub fn new(form: impl Into<String>, tag: impl Into<String>, idx: usize) -> Self {
        Terminal {
            form: form.into(),
            tag: tag.into(),
            lemma: None,
            morph: None,
            idx,
        }
    }

    /// Get the 0-based position in the sentence.
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Get the single position span of the terminal.
    pub fn span(&self) -> Span {
        Span::from(self.idx)
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    /// Get the part-of-speech tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the part-of-speech tag, returning the old one.
    pub fn set_tag(&mut self, tag: impl Into<String>) -> String {
        mem::replace(&mut self.tag, tag.into())
    }

    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_ref().map(String::as_str)
    }

    pub fn set_lemma(&mut self, lemma: Option<impl Into<String>>) -> Option<String> {
        mem::replace(&mut self.lemma, lemma.map(Into::into))
    }

    pub fn morph(&self) -> Option<&str> {
        self.morph.as_ref().map(String::as_str)
    }

    pub fn set_morph(&mut self, morph: Option<impl Into<String>>) -> Option<String> {
        mem::replace(&mut self.morph, morph.map(Into::into))
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.tag, self.form)
    }
}
