//! Ansunit Error Handling
//!
//! Every fatal failure of the load, resolution, flattening and selection stages is an
//! [`AnsUnitError`]. These abort a run before any solver process is spawned. Per-case
//! problems (an exit code that does not match the expectation, a solver that cannot be
//! launched) are *not* errors here; they are recorded as verdicts by the harness.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnsUnitError>;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Unified error type for all fatal ansunit failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum AnsUnitError {
    // Module resolution
    #[error("no definition for module '{name}'")]
    #[diagnostic(
        code(ansunit::resolve::undefined_module),
        help("declare it under `Definitions` in this suite or one of its ancestors")
    )]
    UndefinedModule { name: String },

    #[error("invalid definition for module '{name}': {reason}")]
    #[diagnostic(
        code(ansunit::load::invalid_module_definition),
        help("a module is a string, or a mapping with exactly one of `filename`, `reference` or `group`")
    )]
    InvalidModuleDefinition { name: String, reason: String },

    #[error("cannot read module '{name}' from '{}'", path.display())]
    #[diagnostic(code(ansunit::resolve::module_file))]
    ModuleFile {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cyclic module reference: {}", chain.join(" -> "))]
    #[diagnostic(code(ansunit::resolve::cyclic_module_reference))]
    CyclicModuleReference { chain: Vec<String> },

    // Specification structure
    #[error("invalid expectation '{found}' at {at}")]
    #[diagnostic(
        code(ansunit::canonical::invalid_expectation),
        help("`Expect` must be one of SAT, UNSAT or OPTIMAL")
    )]
    InvalidExpectation { at: String, found: String },

    #[error("malformed specification at {at}: {message}")]
    #[diagnostic(code(ansunit::load::malformed_spec))]
    MalformedSpec { at: String, message: String },

    #[error("duplicate test name '{name}'")]
    #[diagnostic(
        code(ansunit::flatten::duplicate_case_name),
        help("sibling tests must stay distinct once the `Test` tag is stripped")
    )]
    DuplicateCaseName { name: String },

    // Selection
    #[error("invalid filter pattern '{pattern}'")]
    #[diagnostic(code(ansunit::select::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // Suite files
    #[error("cannot read suite '{}'", path.display())]
    #[diagnostic(code(ansunit::cli::suite_read))]
    SpecRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("suite '{}' is not valid YAML", path.display())]
    #[diagnostic(code(ansunit::cli::suite_parse))]
    SpecParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot write test report")]
    #[diagnostic(code(ansunit::cli::report))]
    Report(#[source] io::Error),

    #[error("cannot serialize canonical suite")]
    #[diagnostic(code(ansunit::cli::dump))]
    Dump(#[source] serde_yaml::Error),
}

impl AnsUnitError {
    pub(crate) fn malformed(at: &str, message: impl Into<String>) -> Self {
        Self::MalformedSpec {
            at: at.to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: AnsUnitError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_reference_names_the_chain() {
        let err = AnsUnitError::CyclicModuleReference {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic module reference: a -> b -> a");
    }

    #[test]
    fn diagnostic_codes_carry_the_phase() {
        let err = AnsUnitError::UndefinedModule { name: "m".into() };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("ansunit::resolve::undefined_module"));
    }
}
