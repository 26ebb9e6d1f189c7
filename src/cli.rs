//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use clap_complete::generate;

use crate::core::batch::DEFAULT_PATTERN;
use crate::core::chunk::{ChunkStrategy, DEFAULT_CHUNK_SIZE};
use crate::core::convert::ConvertOptions;

const AFTER_HELP: &str = "\
EXAMPLES:
  equation-enhancer                         Launch the two-pane TUI
  equation-enhancer notes.md                Convert, save to enhanced_equations.md
  equation-enhancer notes.md -o out.md      Convert, save to out.md
  cat notes.md | equation-enhancer - --stdout
  equation-enhancer notes.md --regex-only   Offline: regex rewriter only
  equation-enhancer batch docs/ --out-dir converted/
  equation-enhancer config                  Show endpoint, model and API key status
  equation-enhancer completions bash        Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert inline LaTeX \\( ... \\) in Markdown to $ ... $",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Markdown file to convert ('-' reads stdin). Without it the TUI opens.
    pub input: Option<PathBuf>,

    /// Where to save the converted Markdown (a .md extension is added if missing)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the result to stdout instead of saving a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Open the saved file with the system's default application
    #[arg(long, conflicts_with = "stdout")]
    pub open: bool,

    #[command(flatten)]
    pub conversion: ConversionArgs,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

/// Flags shared by every mode that converts text.
#[derive(clap::Args, Debug, Clone)]
pub struct ConversionArgs {
    /// Skip the model and only run the regex rewriter (no API key needed)
    #[arg(long, global = true)]
    pub regex_only: bool,

    /// Override the model ID (default: GEMINI_MODEL or gemini-2.0-flash)
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Characters per model call
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = parse_chunk_size
    )]
    pub chunk_size: usize,

    /// How long inputs are split before each model call
    #[arg(long, value_enum, global = true, default_value_t = SplitArg::Fixed)]
    pub split: SplitArg,

    /// Per-call timeout in seconds (default: ENHANCER_TIMEOUT_SECS or 120)
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("chunk size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitArg {
    /// Every N characters, even inside an equation
    Fixed,
    /// Whole lines packed up to N characters
    Lines,
}

impl From<SplitArg> for ChunkStrategy {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Fixed => ChunkStrategy::Fixed,
            SplitArg::Lines => ChunkStrategy::Lines,
        }
    }
}

impl ConversionArgs {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            chunk_size: self.chunk_size,
            strategy: self.split.into(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the two-pane terminal UI, optionally preloading a file
    Tui {
        /// Markdown file to load into the input pane
        file: Option<PathBuf>,
        /// File that Ctrl+S saves to
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Convert every matching Markdown file under a directory
    Batch {
        /// Directory to search
        dir: PathBuf,
        /// Glob relative to DIR
        #[arg(long, default_value = DEFAULT_PATTERN)]
        glob: String,
        /// Write results under this directory, mirroring the layout
        #[arg(long, value_name = "DIR", conflicts_with = "in_place")]
        out_dir: Option<PathBuf>,
        /// Overwrite the input files
        #[arg(long)]
        in_place: bool,
    },
    /// Show config paths, endpoint, model, and API key status
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Store the API key in the config directory (reads stdin if KEY is omitted)
    SetApiKey {
        key: Option<String>,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// True when this invocation ends up in the TUI.
    pub fn is_tui(&self) -> bool {
        match &self.command {
            Some(Commands::Tui { .. }) => true,
            Some(_) => false,
            None => self.input.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_tui() {
        let args = Args::try_parse_from(["equation-enhancer"]).unwrap();
        assert!(args.is_tui());
        assert_eq!(args.conversion.options(), ConvertOptions::default());
    }

    #[test]
    fn file_argument_with_flags() {
        let args = Args::try_parse_from([
            "equation-enhancer",
            "notes.md",
            "-o",
            "out",
            "--chunk-size",
            "500",
            "--split",
            "lines",
            "-vv",
        ])
        .unwrap();
        assert!(!args.is_tui());
        assert_eq!(args.input, Some(PathBuf::from("notes.md")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(
            args.conversion.options(),
            ConvertOptions {
                chunk_size: 500,
                strategy: ChunkStrategy::Lines
            }
        );
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(Args::try_parse_from(["equation-enhancer", "a.md", "--chunk-size", "0"]).is_err());
    }

    #[test]
    fn stdout_conflicts_with_output() {
        assert!(
            Args::try_parse_from(["equation-enhancer", "a.md", "--stdout", "-o", "x.md"]).is_err()
        );
    }

    #[test]
    fn batch_takes_global_conversion_flags() {
        let args = Args::try_parse_from([
            "equation-enhancer",
            "batch",
            "docs",
            "--regex-only",
            "--in-place",
        ])
        .unwrap();
        assert!(args.conversion.regex_only);
        assert!(!args.is_tui());
        match args.command {
            Some(Commands::Batch { dir, glob, in_place, .. }) => {
                assert_eq!(dir, PathBuf::from("docs"));
                assert_eq!(glob, DEFAULT_PATTERN);
                assert!(in_place);
            }
            _ => panic!("expected batch"),
        }
    }

    #[test]
    fn config_is_not_tui() {
        let args = Args::try_parse_from(["equation-enhancer", "config"]).unwrap();
        assert!(!args.is_tui());
        assert_eq!(
            Args::try_parse_from(["equation-enhancer", "-q", "config"])
                .unwrap()
                .log_level(),
            "error"
        );
    }
}
