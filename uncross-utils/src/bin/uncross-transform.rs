use std::convert::TryFrom;
use std::io::BufRead;

use clap::{App, AppSettings, Arg};
use failure::Error;
use log::info;
use stdinout::{Input, OrExit, Output};

use uncross::error::ConfigError;
use uncross::io::{ExportLayout, InputEncoding};
use uncross::partition::{parse_split_specification, partition};
use uncross::{ExportReader, ExportWriter, Pipeline, Tree, WriteTree};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build().get_matches();
    // safe to unwrap, arguments with default values or required ones are always present
    let pipeline = matches.value_of(PIPELINE).unwrap();
    let pipeline = Pipeline::try_from(pipeline).or_exit("Can't read pipeline.", 1);
    let in_format = matches.value_of(IN_FORMAT).unwrap();
    let in_format = InFormat::try_from(in_format).or_exit("Can't read input format.", 1);
    let encoding = matches.value_of(IN_ENCODING).unwrap();
    let encoding = InputEncoding::try_from(encoding).or_exit("Can't read input encoding.", 1);
    let layout = matches.value_of(OUT_FORMAT).unwrap();
    let layout = ExportLayout::try_from(layout).or_exit("Can't read output format.", 1);

    let in_path = matches.value_of(INPUT).map(ToOwned::to_owned);
    info!(
        "Reading {} in {}",
        in_path.as_ref().map(String::as_str).unwrap_or("<stdin>"),
        encoding.name()
    );
    info!("Pipeline: {}", pipeline.name());
    info!("Output format: {:?}", layout);
    let input = Input::from(in_path);
    let reader = input.buf_read().or_exit("Can't open input reader.", 1);
    let trees = get_reader(in_format, reader, encoding).map(|tree| {
        let mut tree = tree.or_exit("Could not read tree.", 1);
        pipeline
            .apply(&mut tree)
            .or_exit("Could not transform tree.", 1);
        tree
    });

    let out_path = matches.value_of(OUTPUT).map(ToOwned::to_owned);
    match matches.value_of(SPLIT) {
        Some(split) => {
            info!("Split: {}", split);
            // safe to unwrap, clap requires an output file with --split
            let out_path = out_path.unwrap();
            let trees = trees.enumerate().map(log_progress).collect::<Vec<_>>();
            write_parts(&trees, split, &out_path, layout).or_exit("Can't write parts.", 1);
        }
        None => {
            let output = Output::from(out_path);
            let writer = output.write().or_exit("Can't open output writer.", 1);
            let mut writer = ExportWriter::new(writer, layout);
            for tree in trees.enumerate().map(log_progress) {
                writer
                    .write_tree(&tree)
                    .or_exit("Can't write to output.", 1);
            }
            let n_sentences = writer.n_sentences();
            writer.into_inner().or_exit("Can't flush output.", 1);
            info!("Wrote {} sentences", n_sentences);
        }
    }
}

fn log_progress((idx, tree): (usize, Tree)) -> Tree {
    if (idx + 1) % 100 == 0 {
        info!("Processed {} sentences", idx + 1);
    }
    tree
}

fn part_path(out_path: &str, part: usize) -> String {
    format!("{}.{}", out_path, part)
}

fn write_parts(
    trees: &[Tree],
    split: &str,
    out_path: &str,
    layout: ExportLayout,
) -> Result<(), Error> {
    let sizes = parse_split_specification(split, trees.len())?;
    for (idx, part) in partition(trees, &sizes)?.into_iter().enumerate() {
        let path = part_path(out_path, idx);
        info!("Writing {} sentences to {}", part.len(), path);
        let output = Output::from(Some(path));
        let mut writer = ExportWriter::new(output.write()?, layout);
        for tree in part {
            writer.write_tree(tree)?;
        }
        writer.into_inner()?;
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum InFormat {
    Export,
}

impl<'a> TryFrom<&'a str> for InFormat {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "export" => Ok(InFormat::Export),
            _ => Err(ConfigError::UnknownInputFormat(value.to_owned()).into()),
        }
    }
}

fn get_reader<'a, R>(
    in_format: InFormat,
    input: R,
    encoding: InputEncoding,
) -> Box<dyn Iterator<Item = Result<Tree, Error>> + 'a>
where
    R: BufRead + 'a,
{
    match in_format {
        InFormat::Export => Box::new(ExportReader::with_encoding(input, encoding)),
    }
}

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

static PIPELINE: &str = "PIPELINE";
static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";
static IN_FORMAT: &str = "IN_FORMAT";
static IN_ENCODING: &str = "IN_ENCODING";
static OUT_FORMAT: &str = "OUT_FORMAT";
static SPLIT: &str = "SPLIT";

fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("uncross-transform")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version("0.1")
        .about("Remove crossing branches from export treebanks.")
        .arg(
            Arg::with_name(PIPELINE)
                .required(true)
                .possible_values(&[
                    "none",
                    "root",
                    "mark_heads",
                    "split",
                    "split_marking",
                    "raising",
                ])
                .help("Transformation pipeline"),
        )
        .arg(
            Arg::with_name(INPUT)
                .long("input_file")
                .takes_value(true)
                .help("Input file"),
        )
        .arg(
            Arg::with_name(IN_FORMAT)
                .long("input_format")
                .takes_value(true)
                .possible_values(&["export"])
                .default_value("export")
                .help("Input format:"),
        )
        .arg(
            Arg::with_name(IN_ENCODING)
                .long("input_encoding")
                .takes_value(true)
                .default_value("latin1")
                .help(
                    "Input encoding. Latin-1 labels (latin1, latin-1, iso-8859-1, ...) decode \
                     ISO-8859-1, other labels are looked up in the WHATWG table, e.g. \
                     windows-1252 or utf-8",
                ),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long("output_file")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(OUT_FORMAT)
                .long("output_format")
                .takes_value(true)
                .possible_values(&["export3", "export4"])
                .default_value("export3")
                .help("Output format:"),
        )
        .arg(
            Arg::with_name(SPLIT)
                .long("split")
                .takes_value(true)
                .requires(OUTPUT)
                .help(
                    "Split the output into parts, e.g. 80%_10%_rest or 1000#_rest. \
                     Part i is written to OUTPUT.i",
                ),
        )
}
