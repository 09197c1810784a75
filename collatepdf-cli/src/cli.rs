//! Command-line interface definition.
//!
//! Kept free of library calls so `build.rs` can include it to render the
//! man page.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bundle PDF files into one printable document.
///
/// Content pages get a banner with the running page number and the source
/// file name. Divider pages and a table of contents are generated from a
/// plain-text index.
#[derive(Parser, Debug)]
#[command(name = "collatepdf")]
#[command(version, author)]
#[command(about = "Bundle PDF files into one printable document")]
pub struct Cli {
    /// Show debug diagnostics and statistics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write an index file listing PDF files
    ///
    /// Directories are searched recursively and glob patterns are expanded.
    /// Every PDF gets a divider titled after its path.
    ///
    /// Example:
    ///   collatepdf makeindex reports/ appendix/*.pdf -o index.txt
    #[command(name = "makeindex")]
    MakeIndex(MakeIndexArgs),

    /// Build the collated PDF from an index file
    ///
    /// Example:
    ///   collatepdf makepdf index.txt -o bundle.pdf -c cover.pdf -d
    #[command(name = "makepdf")]
    MakePdf(MakePdfArgs),
}

#[derive(Args, Debug)]
pub struct MakeIndexArgs {
    /// PDF files, directories or glob patterns
    #[arg(required = true, value_name = "PATH")]
    pub inputs: Vec<String>,

    /// Index file to write [default: index.txt]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MakePdfArgs {
    /// Index file to read [default: index.txt]
    #[arg(value_name = "INDEX")]
    pub index: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// PDF whose pages are placed before the table of contents
    #[arg(short, long, value_name = "FILE")]
    pub cover: Option<PathBuf>,

    /// TrueType or OpenType font file to embed
    #[arg(short, long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Insert blank pages so that sections start on odd pages
    #[arg(short, long)]
    pub duplex: bool,

    /// Directory that relative paths in the index are resolved against
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Override a parameter, as in `# PARAMS.KEY = VALUE`
    ///
    /// May be repeated. Applied after the index directives.
    ///
    /// Example:
    ///   --set page_format=letter --set overlay_opacity=0.5
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Build everything but do not write the output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}
