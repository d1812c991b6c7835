use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the cobol-symbols binary.
#[derive(Parser, Debug)]
#[command(
    name = "cobol-symbols",
    version,
    about = "Build COBOL symbol tables from a serialized syntax tree"
)]
pub struct CliArgs {
    /// Syntax tree to analyse (JSON).
    pub tree: PathBuf,

    /// Symbol options file (JSON).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// URI of the analysed document. Defaults to a `file://` URI of the tree
    /// path; nodes may still override it per copybook.
    #[arg(long = "documentUri", alias = "document-uri")]
    pub document_uri: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print every program's symbol table.
    Symbols,
    /// Print the semantic errors found while binding.
    Diagnostics,
    /// Print definitions and usages of the element at a position.
    Element {
        /// Document to look in. Defaults to the analysed document.
        #[arg(long)]
        uri: Option<String>,
        /// 0-indexed line.
        #[arg(long)]
        line: u32,
        /// 0-indexed column.
        #[arg(long)]
        character: u32,
    },
}
