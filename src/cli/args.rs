//! Command-line surface: `yulink <directory> [--no-format] [--formatter <bin>] [-v]`.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "yulink", version, about = "Resolve // import directives inside inline assembly blocks")]
pub struct Arguments {
    /// Directory to recursively search for `.presl` files.
    pub directory: PathBuf,

    /// Skip reformatting the emitted `.post.sol` files.
    #[arg(long)]
    pub no_format: bool,

    /// Override the formatter binary from `.yulinkrc.json`.
    #[arg(long)]
    pub formatter: Option<String>,

    /// Print per-file progress instead of just the summary.
    #[arg(short, long)]
    pub verbose: bool,
}
