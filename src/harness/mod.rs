//! Ansunit Test Harness
//!
//! Runs resolved cases against an external solver and classifies each run by the solver's
//! exit code:
//!
//! | Expect  | passes on exit code |
//! |---------|---------------------|
//! | SAT     | 10 or 30            |
//! | UNSAT   | 20                  |
//! | OPTIMAL | 30                  |
//!
//! Cases run one after another. A case whose exit code does not match is a failure; a case
//! whose solver cannot be launched is an error. Neither stops the remaining cases.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::spec::{Outcome, ResolvedCase, DEFAULT_JOINER};

pub mod report;
pub mod runner;

pub use report::{report_results, Summary};
pub use runner::{Invocation, ProcessRunner, SolverOutput, SolverRunner};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Everything that shapes how cases are run and reported.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub solver: String,
    pub solver_args: Vec<String>,
    pub show_stdout: bool,
    pub show_stderr: bool,
    pub show_execution: bool,
    pub verbosity: u8,
    pub joiner: String,
    pub use_colors: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            solver: "clingo".to_string(),
            solver_args: Vec::new(),
            show_stdout: false,
            show_stderr: false,
            show_execution: false,
            verbosity: 0,
            joiner: DEFAULT_JOINER.to_string(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// The solver ran but its exit code does not satisfy the expectation.
    Fail {
        expected: Outcome,
        exit_code: Option<i32>,
    },
    /// The solver could not be run at all.
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: String,
    pub verdict: Verdict,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// Classifies a finished solver run.
pub fn classify(expected: Outcome, exit_code: Option<i32>) -> Verdict {
    match exit_code {
        Some(code) if expected.accepts(code) => Verdict::Pass,
        _ => Verdict::Fail {
            expected,
            exit_code,
        },
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Runs one case. Echoes requested by `config` go to `diagnostics`.
pub fn run_case(
    name: &str,
    case: &ResolvedCase,
    config: &HarnessConfig,
    runner: &dyn SolverRunner,
    diagnostics: &mut dyn Write,
) -> CaseResult {
    let invocation = Invocation::for_case(config, case);
    let command_line = invocation.command_line();
    if config.show_execution {
        echo(diagnostics, name, &format!("EXECUTING: {command_line}"));
    }
    debug!(target: "ansunit::harness", case = name, command = %command_line, "running case");

    let verdict = match runner.run(&invocation, &case.program) {
        Ok(output) => {
            if config.show_stderr {
                echo(diagnostics, name, &output.stderr);
            }
            if config.show_stdout {
                echo(diagnostics, name, &output.stdout);
            }
            classify(case.expect, output.exit_code)
        }
        Err(e) => {
            warn!(target: "ansunit::harness", case = name, error = %e, "solver failed to launch");
            Verdict::Error {
                message: format!("cannot run `{command_line}`: {e}"),
            }
        }
    };

    CaseResult {
        name: name.to_string(),
        verdict,
    }
}

/// Echoes are best effort: a sink that stops accepting output does not change the verdict.
fn echo(diagnostics: &mut dyn Write, name: &str, text: &str) {
    if let Err(e) = writeln!(diagnostics, "{text}") {
        warn!(target: "ansunit::harness", case = name, error = %e, "cannot echo solver output");
    }
}

/// Runs every case in order and returns their results in the same order.
pub fn run_suite<'a, I>(
    cases: I,
    config: &HarnessConfig,
    runner: &dyn SolverRunner,
    diagnostics: &mut dyn Write,
) -> Vec<CaseResult>
where
    I: IntoIterator<Item = (&'a str, &'a ResolvedCase)>,
{
    let results: Vec<CaseResult> = cases
        .into_iter()
        .map(|(name, case)| run_case(name, case, config, runner, &mut *diagnostics))
        .collect();
    info!(
        target: "ansunit::harness",
        cases = results.len(),
        passed = results.iter().filter(|r| r.passed()).count(),
        "suite finished"
    );
    results
}
