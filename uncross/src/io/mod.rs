mod export;
pub use crate::io::export::{detect_layout, ExportReader, ExportWriter};
mod numbering;
pub use crate::io::numbering::ExportNumbering;

use std::borrow::Cow;
use std::convert::TryFrom;

use encoding_rs::Encoding;
use failure::Error;

use crate::error::ConfigError;
use crate::tree::Tree;

/// Trait to write a `Tree`.
pub trait WriteTree {
    fn write_tree(&mut self, tree: &Tree) -> Result<(), Error>;
}

/// Column layouts of the export format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportLayout {
    /// Five columns: word, label, morphology, edge, parent.
    Export3,
    /// Six columns: word, lemma, label, morphology, edge, parent.
    Export4,
}

impl<'a> TryFrom<&'a str> for ExportLayout {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "export3" => Ok(ExportLayout::Export3),
            "export4" => Ok(ExportLayout::Export4),
            _ => Err(ConfigError::UnknownLayout(value.to_owned()).into()),
        }
    }
}

// labels of ISO-8859-1, encoding_rs maps the WHATWG ones to windows-1252
static LATIN1_LABELS: &[&str] = &[
    "latin1",
    "latin-1",
    "l1",
    "iso-8859-1",
    "iso8859-1",
    "iso88591",
    "iso_8859-1",
    "iso_8859-1:1987",
    "iso-ir-100",
    "cp819",
    "ibm819",
    "csisolatin1",
];

/// Character encoding of export input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEncoding {
    /// ISO-8859-1, each byte is decoded to the code point of the same value.
    Latin1,
    /// Any other encoding known to `encoding_rs`.
    Other(&'static Encoding),
}

impl InputEncoding {
    /// Decode `bytes`, removing a byte order mark of `Other` encodings.
    pub fn decode(self, bytes: &[u8]) -> Cow<str> {
        match self {
            InputEncoding::Latin1 => encoding_rs::mem::decode_latin1(bytes),
            InputEncoding::Other(encoding) => encoding.decode_with_bom_removal(bytes).0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InputEncoding::Latin1 => "ISO-8859-1",
            InputEncoding::Other(encoding) => encoding.name(),
        }
    }
}

impl From<&'static Encoding> for InputEncoding {
    fn from(encoding: &'static Encoding) -> Self {
        InputEncoding::Other(encoding)
    }
}

impl<'a> TryFrom<&'a str> for InputEncoding {
    type Error = Error;

    /// Look up an encoding label, case-insensitive.
    ///
    /// Latin-1 labels, including `latin-1`, decode true ISO-8859-1. All other labels are
    /// resolved through the WHATWG label table of `encoding_rs`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let label = value.trim().to_lowercase();
        if LATIN1_LABELS.contains(&label.as_str()) {
            return Ok(InputEncoding::Latin1);
        }
        Encoding::for_label(label.as_bytes())
            .map(InputEncoding::Other)
            .ok_or_else(|| ConfigError::UnknownEncoding(value.to_owned()).into())
    }
}
