//! Declarative unit testing for answer set programs.
//!
//! Suites are YAML trees of inheritable contexts. Each leaf resolves into a
//! [`spec::ResolvedCase`] whose program is fed to an external solver; the solver's exit code
//! decides whether the case passes.

pub use crate::errors::{AnsUnitError, Result};

pub mod cli;
pub mod errors;
pub mod harness;
pub mod select;
pub mod spec;
