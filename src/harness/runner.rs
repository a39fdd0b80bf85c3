//! Launching the solver.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use crate::harness::HarnessConfig;
use crate::spec::ResolvedCase;

/// The command used to run one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    executable: String,
    arguments: Vec<String>,
}

impl Invocation {
    /// Solver executable, solver-level arguments, then the case's own arguments.
    ///
    /// The executable is used as given. Argument tokens are split on whitespace, so a token
    /// such as `"-n 0"` becomes two arguments; no shell is involved and quotes are literal.
    pub fn for_case(config: &HarnessConfig, case: &ResolvedCase) -> Self {
        Self::new(
            config.solver.clone(),
            config.solver_args.iter().chain(&case.arguments),
        )
    }

    pub fn new<I, S>(executable: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            executable: executable.into(),
            arguments: tokens
                .into_iter()
                .flat_map(|token| {
                    token
                        .as_ref()
                        .split_whitespace()
                        .map(str::to_owned)
                        .collect::<Vec<_>>()
                })
                .collect(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The space-joined command line, as echoed to the user.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.executable)
            .chain(&self.arguments)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What a finished solver process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a solver on one program.
pub trait SolverRunner {
    fn run(&self, invocation: &Invocation, program: &str) -> io::Result<SolverOutput>;
}

/// Runs the solver as a child process, feeding the program through stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl SolverRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation, program: &str) -> io::Result<SolverOutput> {
        if invocation.executable().trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty solver executable",
            ));
        }

        let mut child = Command::new(invocation.executable())
            .args(invocation.arguments())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "solver stdin is not piped"))?;
        let input = program.to_owned();
        // Written from its own thread so a solver that fills its stdout pipe before reading
        // all of stdin cannot deadlock us.
        let writer = thread::spawn(move || match stdin.write_all(input.as_bytes()) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        });

        let output = child.wait_with_output()?;
        writer
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))??;

        Ok(SolverOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
