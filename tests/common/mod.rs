//! # Ansunit Test Helpers
//!
//! Shared fixtures for the integration tests: suites from inline YAML, an in-memory module
//! source and a fake solver script.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ansunit::spec::{canonicalize_root, parse_document, CanonicalNode, ModuleSource, SpecNode};
use ansunit::AnsUnitError;

/// Module files served from memory, keyed by path.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn with(mut self, path: &str, text: &str) -> Self {
        self.files.insert(PathBuf::from(path), text.to_string());
        self
    }
}

impl ModuleSource for MemorySource {
    fn read_module(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

pub fn load(yaml: &str) -> Result<SpecNode, AnsUnitError> {
    let document = parse_document(yaml).expect("fixture must be valid YAML");
    SpecNode::load(&document)
}

pub fn canonical_with(yaml: &str, source: &dyn ModuleSource) -> Result<CanonicalNode, AnsUnitError> {
    canonicalize_root(&load(yaml)?, source)
}

pub fn canonical(yaml: &str) -> Result<CanonicalNode, AnsUnitError> {
    canonical_with(yaml, &MemorySource::default())
}

/// A stand-in solver: appends a line to `log` every time it runs, then exits with the
/// number on the last line of the program it reads from stdin.
pub const FAKE_SOLVER: &str = r#"log="$1"
echo run >> "$log"
code=$(tail -n 1)
exit "$code"
"#;

pub struct SolverFixture {
    pub dir: tempfile::TempDir,
    pub script: PathBuf,
    pub log: PathBuf,
}

impl SolverFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("fake_solver.sh");
        fs::write(&script, FAKE_SOLVER).expect("write fake solver");
        let log = dir.path().join("runs.log");
        Self { dir, script, log }
    }

    /// Writes a suite file next to the solver and returns its path.
    pub fn suite(&self, name: &str, yaml: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, yaml).expect("write suite");
        path
    }

    /// How many times the fake solver ran.
    pub fn runs(&self) -> usize {
        fs::read_to_string(&self.log)
            .map(|log| log.lines().count())
            .unwrap_or(0)
    }

    /// Arguments that point the CLI at the fake solver.
    pub fn solver_args(&self) -> Vec<String> {
        vec![
            "-s".into(),
            "sh".into(),
            "-a".into(),
            self.script.display().to_string(),
            "-a".into(),
            self.log.display().to_string(),
        ]
    }
}
