//! Defines the command-line arguments for the ansunit CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::harness::HarnessConfig;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "ansunit",
    version,
    about = "Declarative unit testing for answer set programs."
)]
pub struct AnsUnitArgs {
    /// Test suites in YAML syntax. Directories are searched for `.yaml`/`.yml` files.
    #[arg(required = true)]
    pub suites: Vec<PathBuf>,

    /// Dump the suites with all details pushed to the leaves, then exit.
    #[arg(short = 'c', long)]
    pub dump_canonical: bool,

    /// Dump the flattened test names with filter matching, then exit.
    #[arg(short = 'l', long)]
    pub dump_list: bool,

    /// Increase report detail and log level (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Which solver to run.
    #[arg(short, long, env = "ANSUNIT_SOLVER", default_value = "clingo")]
    pub solver: String,

    /// Print each solver's standard output.
    #[arg(short = 'o', long)]
    pub show_stdout: bool,

    /// Print each solver's standard error.
    #[arg(short = 'e', long)]
    pub show_stderr: bool,

    /// Print each solver command line before running it.
    #[arg(short = 'x', long)]
    pub show_execution: bool,

    /// Only run tests matching this regex (repeatable; all must match).
    #[arg(short = 'm', long, value_name = "REGEX")]
    pub filter_match: Vec<String>,

    /// Only run tests *not* matching this regex (repeatable).
    #[arg(short = 'n', long, value_name = "REGEX")]
    pub filter_nomatch: Vec<String>,

    /// Extra argument for every solver run (repeatable; may start with `-`).
    #[arg(short = 'a', long, value_name = "ARG", allow_hyphen_values = true)]
    pub solver_args: Vec<String>,
}

impl AnsUnitArgs {
    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            solver: self.solver.clone(),
            solver_args: self.solver_args.clone(),
            show_stdout: self.show_stdout,
            show_stderr: self.show_stderr,
            show_execution: self.show_execution,
            verbosity: self.verbose,
            ..HarnessConfig::default()
        }
    }
}
