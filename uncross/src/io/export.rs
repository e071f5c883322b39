use std::collections::HashMap;
use std::io::{BufRead, Write};

use encoding_rs::UTF_8;
use failure::Error;
use pest::Parser;
use petgraph::stable_graph::StableGraph;

use crate::error::FormatError;
use crate::io::numbering::MAX_NODE_NUMBER;
use crate::io::{ExportLayout, ExportNumbering, InputEncoding, WriteTree};
use crate::{Edge, Node, NonTerminal, Terminal, Tree};

const ROOT_LABEL: &str = "VROOT";
const EMPTY_FIELD: &str = "--";

/// Iterator over constituency trees in an export file.
///
/// `next()` moves the reader until the first `#BOS` is found, then collects lines until `#EOS` is
/// found. Lines outside of sentences are ignored, inside of sentences empty lines and `%%`
/// comments are skipped. Returns `Some(Error)` if sentences overlap, the sentence ids of `#BOS`
/// and `#EOS` differ, the input ends inside of a sentence or if the collected lines are not a
/// well formed sentence.
///
/// Lines are decoded with the reader's encoding, UTF-8 unless specified otherwise.
pub struct ExportReader<R>
where
    R: BufRead,
{
    inner: R,
    encoding: InputEncoding,
    buffer: Vec<u8>,
}

impl<R> ExportReader<R>
where
    R: BufRead,
{
    /// Creates a new `ExportReader` over the UTF-8 encoded trees in the reader.
    pub fn new(reader: R) -> Self {
        ExportReader::with_encoding(reader, UTF_8)
    }

    /// Creates a new `ExportReader` decoding its input with `encoding`.
    pub fn with_encoding(reader: R, encoding: impl Into<InputEncoding>) -> Self {
        ExportReader {
            inner: reader,
            encoding: encoding.into(),
            buffer: Vec::new(),
        }
    }

    fn read_line(&mut self) -> Option<Result<String, Error>> {
        self.buffer.clear();
        match self.inner.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.encoding.decode(&self.buffer);
                Some(Ok(line.trim().to_owned()))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<R> Iterator for ExportReader<R>
where
    R: BufRead,
{
    type Item = Result<Tree, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        // sentence id and node lines of the current sentence
        let mut sentence: Option<(usize, Vec<String>)> = None;

        loop {
            let line = match self.read_line() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    return sentence
                        .map(|(id, _)| Err(FormatError::UnclosedSentence(id).into()));
                }
            };

            match sentence {
                None => {
                    if line.starts_with("#BOS") {
                        match parse_boundary(Rule::bos, &line) {
                            Ok(id) => sentence = Some((id, Vec::new())),
                            Err(e) => return Some(Err(e)),
                        }
                    } else if line.starts_with("#EOS") {
                        return Some(Err(FormatError::UnopenedSentence(line).into()));
                    }
                }
                Some((start_id, ref mut lines)) => {
                    if line.starts_with("#BOS") {
                        return Some(Err(FormatError::NestedSentence(line).into()));
                    } else if line.starts_with("#EOS") {
                        let end_id = match parse_boundary(Rule::eos, &line) {
                            Ok(id) => id,
                            Err(e) => return Some(Err(e)),
                        };
                        // guard to make sure we stayed in the same sentence
                        if end_id != start_id {
                            return Some(Err(
                                FormatError::SentenceIdMismatch(start_id, end_id).into()
                            ));
                        }
                        return Some(build_tree(start_id, lines));
                    } else if !line.is_empty() && !line.starts_with("%%") {
                        lines.push(line);
                    }
                }
            }
        }
    }
}

// dummy struct required by pest
#[derive(Parser)]
#[grammar = "io/export.pest"]
struct ExportParser;

// returns the sentence id of a #BOS or #EOS line
fn parse_boundary(rule: Rule, line: &str) -> Result<usize, Error> {
    let malformed = || FormatError::Boundary(line.to_owned());
    let sent_id = ExportParser::parse(rule, line)
        .map_err(|_| malformed())?
        .next()
        .and_then(|pair| {
            pair.into_inner()
                .find(|inner| inner.as_rule() == Rule::sent_id)
        })
        .ok_or_else(malformed)?;
    Ok(sent_id.as_str().parse::<usize>().map_err(|_| malformed())?)
}

// splits a node line into its fields
fn tokenize(line: &str) -> Result<Vec<&str>, Error> {
    let mut parsed = ExportParser::parse(Rule::line, line)?;
    // safe to unwrap, Rule::line matches any input
    let pair = parsed.next().unwrap();
    Ok(pair
        .into_inner()
        .filter(|field| field.as_rule() == Rule::field)
        .map(|field| field.as_str())
        .collect())
}

/// Detect the layout of a tokenized node line.
///
/// A line is in `ExportLayout::Export3` if its fifth field, which holds the parent number in
/// that layout, consists of digits only. Otherwise the line is in `ExportLayout::Export4`.
///
/// Returns `FormatError::TooFewFields` if the line has fewer than five fields.
pub fn detect_layout(fields: &[&str]) -> Result<ExportLayout, Error> {
    match fields.get(4) {
        Some(field) if field.chars().all(|c| c.is_ascii_digit()) => Ok(ExportLayout::Export3),
        Some(_) => Ok(ExportLayout::Export4),
        None => Err(FormatError::TooFewFields(fields.join(" ")).into()),
    }
}

// A single node line in export4 layout.
#[derive(Clone, Debug, Eq, PartialEq)]
struct NodeLine {
    word: String,
    lemma: Option<String>,
    label: String,
    morph: Option<String>,
    edge: Option<String>,
    parent: usize,
}

fn optional(field: &str) -> Option<String> {
    if field == EMPTY_FIELD {
        None
    } else {
        Some(field.to_owned())
    }
}

fn parse_line(line: &str) -> Result<NodeLine, Error> {
    let mut fields = tokenize(line)?;
    if detect_layout(&fields)? == ExportLayout::Export3 {
        fields.insert(1, EMPTY_FIELD);
    }
    if fields.len() < 6 {
        return Err(FormatError::TooFewFields(line.to_owned()).into());
    }
    // fields after the parent number are ignored
    let parent = fields[5]
        .parse::<usize>()
        .map_err(|_| FormatError::InvalidNumber(fields[5].to_owned(), line.to_owned()))?;
    if parent != 0 && (parent < 500 || parent > MAX_NODE_NUMBER) {
        return Err(FormatError::ParentOutOfRange(parent).into());
    }

    Ok(NodeLine {
        word: fields[0].to_owned(),
        lemma: optional(fields[1]),
        label: fields[2].to_owned(),
        morph: optional(fields[3]),
        edge: optional(fields[4]),
        parent,
    })
}

// nonterminal words consist of "#" followed by exactly three digits
fn nonterminal_number(word: &str) -> Option<usize> {
    if !word.starts_with('#') {
        return None;
    }
    let digits = &word[1..];
    if digits.len() == 3 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

// Builds a `Tree` from the node lines of a sentence.
fn build_tree(sent_id: usize, lines: &[String]) -> Result<Tree, Error> {
    // map number -> (node, incoming edge)
    let mut nodes = HashMap::new();
    // map parent number -> child numbers
    let mut edges = HashMap::new();
    let mut n_terminals = 0;

    for line in lines {
        let NodeLine {
            word,
            lemma,
            label,
            morph,
            edge,
            parent,
        } = parse_line(line)?;

        let (num, node) = match nonterminal_number(&word) {
            Some(num) => {
                let mut nt = NonTerminal::new(label);
                nt.set_lemma(lemma);
                nt.set_morph(morph);
                (num, Node::NonTerminal(nt))
            }
            None => {
                n_terminals += 1;
                let mut terminal = Terminal::new(word, label, n_terminals - 1);
                terminal.set_lemma(lemma);
                terminal.set_morph(morph);
                (n_terminals, Node::Terminal(terminal))
            }
        };
        if num > MAX_NODE_NUMBER {
            return Err(FormatError::NodeOutOfRange(num).into());
        }
        // 0 is reserved for the root
        if num == 0 || nodes.contains_key(&num) {
            return Err(FormatError::DuplicateNode(num).into());
        }

        nodes.insert(num, (node, Edge::from(edge)));
        edges.entry(parent).or_insert_with(Vec::new).push(num);
    }

    if !edges.contains_key(&0) {
        return Err(FormatError::MissingRoot(sent_id).into());
    }

    let mut graph = StableGraph::new();
    let root = graph.add_node(Node::NonTerminal(NonTerminal::new(ROOT_LABEL)));
    let mut agenda = vec![(0, root)];
    while let Some((num, idx)) = agenda.pop() {
        let children = edges
            .remove(&num)
            .ok_or_else(|| FormatError::EmptyNonTerminal(num))?;
        for child in children {
            // every number is listed as child exactly once
            let (node, edge) = match nodes.remove(&child) {
                Some(entry) => entry,
                None => continue,
            };
            let is_terminal = node.is_terminal();
            let child_idx = graph.add_node(node);
            graph.add_edge(idx, child_idx, edge);
            if !is_terminal {
                agenda.push((child, child_idx));
            }
        }
    }

    // parents left over are either undefined or unreachable from the root
    if let Some(parent) = edges
        .keys()
        .filter(|parent| !nodes.contains_key(*parent))
        .min()
    {
        return Err(FormatError::UndefinedParent(*parent).into());
    }
    if !nodes.is_empty() {
        return Err(FormatError::Unattached(nodes.len()).into());
    }

    Ok(Tree::new(graph, n_terminals, root))
}

/// Number of tabs following a field of `len` characters.
fn tabs(len: usize) -> &'static str {
    if len < 8 {
        "\t\t\t"
    } else if len < 16 {
        "\t\t"
    } else {
        "\t"
    }
}

/// Writer for trees in export format.
///
/// Sentences are numbered consecutively starting at `1`, regardless of the ids found in the
/// input. Output is always UTF-8.
pub struct ExportWriter<W>
where
    W: Write,
{
    writer: W,
    layout: ExportLayout,
    n_sentences: usize,
}

impl<W> ExportWriter<W>
where
    W: Write,
{
    /// Creates a new `ExportWriter` writing lines in `layout`.
    pub fn new(writer: W, layout: ExportLayout) -> Self {
        ExportWriter {
            writer,
            layout,
            n_sentences: 0,
        }
    }

    /// Get the number of sentences written so far.
    pub fn n_sentences(&self) -> usize {
        self.n_sentences
    }

    /// Flush and return the inner writer.
    pub fn into_inner(mut self) -> Result<W, Error> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn format_line(&self, word: &str, node: &Node, edge: Option<&str>, parent: usize) -> String {
        let morph = node.morph().unwrap_or(EMPTY_FIELD);
        let edge = edge.unwrap_or(EMPTY_FIELD);
        let morph_tabs = tabs(morph.chars().count() + 8);
        match self.layout {
            ExportLayout::Export3 => format!(
                "{}{}{}\t{}{}{}\t{}",
                word,
                tabs(word.chars().count()),
                node.label(),
                morph,
                morph_tabs,
                edge,
                parent
            ),
            ExportLayout::Export4 => {
                let lemma = node.lemma().unwrap_or(EMPTY_FIELD);
                format!(
                    "{}{}{}{}{}\t{}{}{}\t{}",
                    word,
                    tabs(word.chars().count()),
                    lemma,
                    tabs(lemma.chars().count()),
                    node.label(),
                    morph,
                    morph_tabs,
                    edge,
                    parent
                )
            }
        }
    }
}

impl<W> WriteTree for ExportWriter<W>
where
    W: Write,
{
    fn write_tree(&mut self, tree: &Tree) -> Result<(), Error> {
        let numbering = ExportNumbering::new(tree);
        if !numbering.fits() {
            return Err(FormatError::NumberOverflow(numbering.n_nonterminals()).into());
        }

        let mut lines = Vec::with_capacity(tree.graph().node_count());
        for terminal in tree.terminals() {
            let (parent, _) = tree
                .parent(terminal)
                .ok_or_else(|| format_err!("Terminal without parent: {}", tree[terminal]))?;
            // safe to unwrap, terminals are guaranteed to be Node::Terminal
            let form = tree[terminal].terminal().unwrap().form();
            lines.push(self.format_line(
                form,
                &tree[terminal],
                tree.edge_label(terminal),
                numbering[parent],
            ));
        }

        let mut nonterminals = tree
            .nonterminals()
            .filter(|&nt| nt != tree.root())
            .map(|nt| (numbering[nt], nt))
            .collect::<Vec<_>>();
        nonterminals.sort();
        for (number, nt) in nonterminals {
            let (parent, _) = tree
                .parent(nt)
                .ok_or_else(|| format_err!("Nonterminal without parent: {}", tree[nt]))?;
            lines.push(self.format_line(
                &format!("#{}", number),
                &tree[nt],
                tree.edge_label(nt),
                numbering[parent],
            ));
        }

        self.n_sentences += 1;
        writeln!(self.writer, "#BOS {}", self.n_sentences)?;
        for line in lines {
            writeln!(self.writer, "{}", line)?;
        }
        writeln!(self.writer, "#EOS {}", self.n_sentences)?;
        Ok(())
    }
}
