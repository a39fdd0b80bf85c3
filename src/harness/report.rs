//! Reporting case results.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::harness::{CaseResult, HarnessConfig, Verdict};
use crate::spec::Outcome;

/// Counts of each verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl Summary {
    pub fn of(results: &[CaseResult]) -> Self {
        results
            .iter()
            .fold(Summary::default(), |mut summary, result| {
                match result.verdict {
                    Verdict::Pass => summary.passed += 1,
                    Verdict::Fail { .. } => summary.failed += 1,
                    Verdict::Error { .. } => summary.errors += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    /// True when every case passed. An empty run counts as a success.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Writes one line per case (passes only when verbose), failure details and a summary.
pub fn report_results(
    results: &[CaseResult],
    config: &HarnessConfig,
    out: &mut dyn WriteColor,
) -> io::Result<Summary> {
    for result in results {
        match &result.verdict {
            Verdict::Pass => {
                if config.verbosity > 0 {
                    tag(out, "PASS", Color::Green)?;
                    writeln!(out, " {}", result.name)?;
                }
            }
            Verdict::Fail {
                expected,
                exit_code,
            } => {
                tag(out, "FAIL", Color::Red)?;
                writeln!(out, " {}", result.name)?;
                writeln!(
                    out,
                    "  expected {}, solver {}",
                    expected,
                    describe_exit(*exit_code)
                )?;
            }
            Verdict::Error { message } => {
                tag(out, "ERROR", Color::Yellow)?;
                writeln!(out, " {}", result.name)?;
                writeln!(out, "  {}", message)?;
            }
        }
    }

    let summary = Summary::of(results);
    writeln!(out)?;
    writeln!(
        out,
        "{} cases: {} passed, {} failed, {} errors",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.errors
    )?;
    Ok(summary)
}

fn tag(out: &mut dyn WriteColor, label: &str, color: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label}:")?;
    out.reset()
}

fn describe_exit(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => match Outcome::from_exit_code(code) {
            Some(outcome) => format!("exited with {code} ({outcome})"),
            None => format!("exited with {code}"),
        },
        None => "was terminated without an exit code".to_string(),
    }
}
