#[macro_use]
extern crate failure;

#[macro_use]
extern crate pest_derive;

mod annotation;
pub use annotation::Marks;

mod boyd;
pub use boyd::BoydSplit;

mod edge;
pub use edge::Edge;

pub mod error;

mod head_marking;
pub use head_marking::MarkHeads;

pub mod io;
pub use io::{ExportReader, ExportWriter, InputEncoding, WriteTree};

mod node;
pub use node::{Node, NonTerminal, Terminal};

pub mod partition;

pub mod pipeline;
pub use pipeline::{Pipeline, Stage};

mod raising;
pub use raising::Raise;

mod root_attachment;
pub use root_attachment::AttachRoot;

mod span;
pub use span::{Span, SpanIter};

mod tree;
pub use tree::{Postorder, Preorder, Tree};

pub mod util;
