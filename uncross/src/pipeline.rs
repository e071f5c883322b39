use std::convert::TryFrom;
use std::fmt;

use failure::Error;
use log::debug;

use crate::error::ConfigError;
use crate::{AttachRoot, BoydSplit, MarkHeads, Raise, Tree};

/// A single transformation step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Leave the tree unchanged.
    Identity,
    /// See `AttachRoot`.
    AttachRoot,
    /// See `MarkHeads`.
    MarkHeads,
    /// See `BoydSplit`, `marking` labels the introduced nodes.
    BoydSplit { marking: bool },
    /// See `Raise`.
    Raise,
}

impl Stage {
    /// Apply the stage to `tree`.
    pub fn apply(self, tree: &mut Tree) -> Result<(), Error> {
        debug!("Applying {}", self);
        match self {
            Stage::Identity => Ok(()),
            Stage::AttachRoot => tree.attach_root(),
            Stage::MarkHeads => tree.mark_heads(),
            Stage::BoydSplit { marking } => tree.boyd_split(marking),
            Stage::Raise => tree.raise(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stage::Identity => write!(f, "identity"),
            Stage::AttachRoot => write!(f, "root attachment"),
            Stage::MarkHeads => write!(f, "head marking"),
            Stage::BoydSplit { marking: false } => write!(f, "boyd split"),
            Stage::BoydSplit { marking: true } => write!(f, "boyd split with marking"),
            Stage::Raise => write!(f, "raising"),
        }
    }
}

/// Named sequences of stages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pipeline {
    /// `none`: unmodified output.
    Identity,
    /// `root`: reattach children of the root.
    Root,
    /// `mark_heads`: only mark heads, the output is unchanged.
    MarkHeads,
    /// `split`: split discontinuous nodes.
    Split,
    /// `split_marking`: split discontinuous nodes and mark the blocks in their labels.
    SplitMarking,
    /// `raising`: remove crossing branches by raising non-head blocks.
    Raising,
}

impl Pipeline {
    /// Get the stages of the pipeline in order of application.
    pub fn stages(self) -> Vec<Stage> {
        match self {
            Pipeline::Identity => vec![Stage::Identity],
            Pipeline::Root => vec![Stage::AttachRoot],
            Pipeline::MarkHeads => vec![Stage::MarkHeads],
            Pipeline::Split => vec![
                Stage::AttachRoot,
                Stage::MarkHeads,
                Stage::BoydSplit { marking: false },
            ],
            Pipeline::SplitMarking => vec![
                Stage::AttachRoot,
                Stage::MarkHeads,
                Stage::BoydSplit { marking: true },
            ],
            Pipeline::Raising => vec![
                Stage::AttachRoot,
                Stage::MarkHeads,
                Stage::BoydSplit { marking: false },
                Stage::Raise,
            ],
        }
    }

    /// Apply all stages to `tree`.
    pub fn apply(self, tree: &mut Tree) -> Result<(), Error> {
        for stage in self.stages() {
            stage.apply(tree)?;
        }
        Ok(())
    }

    /// Get the name of the pipeline.
    pub fn name(self) -> &'static str {
        match self {
            Pipeline::Identity => "none",
            Pipeline::Root => "root",
            Pipeline::MarkHeads => "mark_heads",
            Pipeline::Split => "split",
            Pipeline::SplitMarking => "split_marking",
            Pipeline::Raising => "raising",
        }
    }
}

impl<'a> TryFrom<&'a str> for Pipeline {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "none" => Ok(Pipeline::Identity),
            "root" => Ok(Pipeline::Root),
            "mark_heads" => Ok(Pipeline::MarkHeads),
            "split" => Ok(Pipeline::Split),
            "split_marking" => Ok(Pipeline::SplitMarking),
            "raising" => Ok(Pipeline::Raising),
            _ => Err(ConfigError::UnknownPipeline(value.to_owned()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;
    use std::fs::File;
    use std::io::BufReader;

    use crate::error::ConfigError;
    use crate::io::{ExportLayout, ExportReader, ExportWriter, WriteTree};
    use crate::pipeline::{Pipeline, Stage};

    static NAMES: [&str; 6] = [
        "none",
        "root",
        "mark_heads",
        "split",
        "split_marking",
        "raising",
    ];

    #[test]
    fn names() {
        for name in NAMES.iter() {
            assert_eq!(Pipeline::try_from(*name).unwrap().name(), *name);
        }
        let err = Pipeline::try_from("boyd").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::UnknownPipeline("boyd".into()))
        );
    }

    #[test]
    fn stages() {
        assert_eq!(Pipeline::Identity.stages(), vec![Stage::Identity]);
        assert_eq!(
            Pipeline::SplitMarking.stages(),
            vec![
                Stage::AttachRoot,
                Stage::MarkHeads,
                Stage::BoydSplit { marking: true }
            ]
        );
        assert_eq!(Pipeline::Raising.stages().last(), Some(&Stage::Raise));
    }

    #[test]
    fn reference_outputs() {
        for name in NAMES.iter() {
            let pipeline = Pipeline::try_from(*name).unwrap();
            let reader = BufReader::new(File::open("testdata/tiger.export").unwrap());
            let mut writer = ExportWriter::new(Vec::new(), ExportLayout::Export4);
            for tree in ExportReader::new(reader) {
                let mut tree = tree.unwrap();
                pipeline.apply(&mut tree).unwrap();
                writer.write_tree(&tree).unwrap();
            }
            let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
            // head marks do not show in the output
            let reference = match pipeline {
                Pipeline::MarkHeads => "none",
                _ => *name,
            };
            let target =
                std::fs::read_to_string(format!("testdata/tiger.{}.export4", reference)).unwrap();
            assert_eq!(output, target, "pipeline: {}", name);
        }
    }
}
