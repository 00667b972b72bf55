//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use csdiff_core::MetadataItem;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally coloured output (default).
    Human,
    /// A single pretty-printed JSON document.
    Json,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare two versions of a CodeSystem.
    ///
    /// Reports metadata differences, concepts only in one version, and the
    /// property, designation, display and definition changes of concepts in
    /// both. Exit code 0 means identical, 1 means differences were found.
    Diff {
        /// The older (left) document, or `-` for stdin.
        left: PathOrStdin,

        /// The newer (right) document, or `-` for stdin.
        right: PathOrStdin,

        /// Only print the summary line.
        #[arg(long)]
        summary_only: bool,

        /// Metadata item expected to differ between versions (repeatable).
        ///
        /// Replaces the default set (`id`, `version`). Only affects the
        /// `expect_differences` hint, never the comparison itself.
        #[arg(long = "expect-different", value_name = "ITEM")]
        expect_different: Vec<MetadataItem>,
    },

    /// Extract the neighborhood of a concept from the combined graph of two
    /// versions.
    ///
    /// Relationships claimed by only one version are free to traverse, so
    /// the walk follows changes further than unchanged structure. Exit code 1
    /// means the code is defined in neither version.
    Neighborhood {
        /// The older (left) document, or `-` for stdin.
        left: PathOrStdin,

        /// The newer (right) document, or `-` for stdin.
        right: PathOrStdin,

        /// Concept code to centre the neighborhood on.
        code: String,

        /// Traversal radius; the focus concept has depth 1.
        #[arg(long, short = 'r')]
        radius: Option<u32>,

        /// Upper bound applied to `--radius`.
        #[arg(long, default_value_t = csdiff_core::DEFAULT_MAX_RADIUS)]
        max_radius: u32,
    },
}

/// CodeSystem version comparison tool.
///
/// All global flags are marked `global = true` so that clap propagates them
/// to every subcommand.
#[derive(Debug, Parser)]
#[command(
    name = "csdiff",
    version,
    about = "Compare versions of a CodeSystem",
    long_about = "Compare two versions of a CodeSystem document.\n\
                  Diffs metadata and concepts, and extracts change-weighted\n\
                  neighborhoods from the combined concept graph."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log pipeline steps and timing to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `CSDIFF_MAX_FILE_SIZE` environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "CSDIFF_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,

    /// Disable ANSI colour codes in human output.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}
