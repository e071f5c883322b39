use failure::Fail;

/// Malformed export input or unrepresentable export output.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum FormatError {
    #[fail(display = "Too few fields in line: {}", _0)]
    TooFewFields(String),
    #[fail(display = "Can't parse number {} in line: {}", _0, _1)]
    InvalidNumber(String, String),
    #[fail(display = "Parent number must be 0 or between 500 and 999, got {}", _0)]
    ParentOutOfRange(usize),
    #[fail(display = "Node number must be between 0 and 999, got {}", _0)]
    NodeOutOfRange(usize),
    #[fail(display = "Node number {} defined twice", _0)]
    DuplicateNode(usize),
    #[fail(display = "Malformed sentence boundary: {}", _0)]
    Boundary(String),
    #[fail(display = "Found second #BOS before #EOS: {}", _0)]
    NestedSentence(String),
    #[fail(display = "Found #EOS without #BOS: {}", _0)]
    UnopenedSentence(String),
    #[fail(display = "Sentence {} is not closed by #EOS", _0)]
    UnclosedSentence(usize),
    #[fail(display = "Mismatch in sentence ID: #BOS {} and #EOS {}", _0, _1)]
    SentenceIdMismatch(usize, usize),
    #[fail(display = "Sentence {} without root", _0)]
    MissingRoot(usize),
    #[fail(display = "Nonterminal without children: #{}", _0)]
    EmptyNonTerminal(usize),
    #[fail(display = "Parent #{} is not defined", _0)]
    UndefinedParent(usize),
    #[fail(display = "{} node(s) not attached to the root", _0)]
    Unattached(usize),
    #[fail(display = "Can't number more than 500 nonterminals, got {}", _0)]
    NumberOverflow(usize),
}

/// Invalid names or option values.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum ConfigError {
    #[fail(display = "Unknown pipeline: {}", _0)]
    UnknownPipeline(String),
    #[fail(display = "Unknown output format: {}", _0)]
    UnknownLayout(String),
    #[fail(display = "Unknown input format: {}", _0)]
    UnknownInputFormat(String),
    #[fail(display = "Unknown encoding: {}", _0)]
    UnknownEncoding(String),
    #[fail(display = "Can't parse split specification '{}'", _0)]
    SplitSpecification(String),
    #[fail(display = "'rest' keyword used more than once")]
    RepeatedRest,
    #[fail(
        display = "Treebank smaller than sum of split ({} vs {})",
        available, requested
    )]
    SplitTooLarge { available: usize, requested: usize },
}

/// Violated structural invariant during a transformation.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum TransformError {
    #[fail(display = "Can't reattach the root node")]
    RootReattachment,
    #[fail(display = "Node without parent: {}", _0)]
    MissingParent(String),
    #[fail(
        display = "Splitting {} produced {} head blocks, expected exactly one",
        label, count
    )]
    HeadBlocks { label: String, count: usize },
}
