use crate::config::{ResultsConfig, DEFAULT_INDENT, MAX_CRITERIA_DEPTH, MAX_EXTEND_DEPTH};
use crate::error::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "oval-criteria")]
#[command(about = "Derive, validate and normalize OVAL result criteria trees")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format for `check` (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Deepest criteria nesting accepted when reading results
    #[arg(long, default_value_t = MAX_CRITERIA_DEPTH)]
    pub max_depth: usize,

    /// Longest chain of extend_definition references followed
    #[arg(long, default_value_t = MAX_EXTEND_DEPTH)]
    pub max_extend_depth: usize,

    /// Indentation of written XML (0 for a single line)
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    pub indent: usize,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive result criteria trees for every definition and write a results skeleton
    Derive {
        /// oval_definitions document
        definitions: String,
    },

    /// Validate the criteria trees of a results document
    Check {
        /// oval_definitions document the results refer to
        definitions: String,

        /// oval_results document
        results: String,
    },

    /// Read a results document and write it back in canonical form
    Normalize {
        /// oval_definitions document the results refer to
        definitions: String,

        /// oval_results document
        results: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Terminal,
    /// JSON output for machine consumption
    Json,
}

impl Args {
    /// Build the library configuration from the command-line flags
    pub fn results_config(&self) -> Result<ResultsConfig> {
        ResultsConfig::new(self.max_depth, self.indent)?.with_max_extend_depth(self.max_extend_depth)
    }
}
