//! Canonicalization: pushing every context declaration down to the leaves.
//!
//! After canonicalization each leaf is a self-contained [`ResolvedCase`] carrying the solver
//! arguments, the complete program text and the expected outcome class. Any structural
//! problem (undefined module, bad expectation, unreadable file) fails the whole tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_yaml::Value;
use tracing::debug;

use crate::errors::{AnsUnitError, Result};
use crate::spec::context::Context;
use crate::spec::module::{ModuleResolver, ModuleSource};
use crate::spec::node::{child_location, SpecNode, ROOT};

/// Expected category of a solver result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "UNSAT")]
    Unsat,
    #[serde(rename = "OPTIMAL")]
    Optimal,
}

impl Outcome {
    pub const SAT_EXIT_CODE: i32 = 10;
    pub const UNSAT_EXIT_CODE: i32 = 20;
    pub const OPTIMAL_EXIT_CODE: i32 = 30;

    pub fn parse(class: &str) -> Option<Self> {
        match class {
            "SAT" => Some(Outcome::Sat),
            "UNSAT" => Some(Outcome::Unsat),
            "OPTIMAL" => Some(Outcome::Optimal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Sat => "SAT",
            Outcome::Unsat => "UNSAT",
            Outcome::Optimal => "OPTIMAL",
        }
    }

    /// The class a solver reported through its exit code, if it is one of the known codes.
    pub fn from_exit_code(code: i32) -> Option<Self> {
        match code {
            Self::SAT_EXIT_CODE => Some(Outcome::Sat),
            Self::UNSAT_EXIT_CODE => Some(Outcome::Unsat),
            Self::OPTIMAL_EXIT_CODE => Some(Outcome::Optimal),
            _ => None,
        }
    }

    /// Whether a solver exit code satisfies this expectation. An optimal answer is also
    /// satisfiable.
    pub fn accepts(&self, exit_code: i32) -> bool {
        match self {
            Outcome::Sat => {
                exit_code == Self::SAT_EXIT_CODE || exit_code == Self::OPTIMAL_EXIT_CODE
            }
            Outcome::Unsat => exit_code == Self::UNSAT_EXIT_CODE,
            Outcome::Optimal => exit_code == Self::OPTIMAL_EXIT_CODE,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executable test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCase {
    #[serde(rename = "Arguments")]
    pub arguments: Vec<String>,
    #[serde(rename = "Program")]
    pub program: String,
    #[serde(rename = "Expect")]
    pub expect: Outcome,
}

/// The suite tree after canonicalization. Suites keep the original child keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalNode {
    Suite(BTreeMap<String, CanonicalNode>),
    Case(ResolvedCase),
}

impl CanonicalNode {
    /// Number of cases below this node.
    pub fn case_count(&self) -> usize {
        match self {
            CanonicalNode::Suite(children) => children.values().map(Self::case_count).sum(),
            CanonicalNode::Case(_) => 1,
        }
    }
}

/// Canonicalizes a whole document, starting from the default root context.
pub fn canonicalize_root(node: &SpecNode, source: &dyn ModuleSource) -> Result<CanonicalNode> {
    canonicalize(node, &Context::default(), source)
}

/// Canonicalizes `node` below an already merged `parent` context.
pub fn canonicalize(
    node: &SpecNode,
    parent: &Context,
    source: &dyn ModuleSource,
) -> Result<CanonicalNode> {
    canonicalize_at(node, parent, source, ROOT)
}

fn canonicalize_at(
    node: &SpecNode,
    parent: &Context,
    source: &dyn ModuleSource,
    at: &str,
) -> Result<CanonicalNode> {
    let context = parent.merge(node.context());
    match node {
        SpecNode::Suite { children, .. } => {
            let mut canonical = BTreeMap::new();
            for (key, child) in children {
                let child_at = child_location(at, key);
                canonical.insert(
                    key.clone(),
                    canonicalize_at(child, &context, source, &child_at)?,
                );
            }
            Ok(CanonicalNode::Suite(canonical))
        }
        SpecNode::Leaf { .. } => resolve_case(&context, source, at).map(CanonicalNode::Case),
    }
}

/// Builds the case for a leaf whose context is fully merged.
///
/// The program is every fragment of `Modules`, in order, followed by the inline `Program`,
/// joined with newlines.
pub fn resolve_case(context: &Context, source: &dyn ModuleSource, at: &str) -> Result<ResolvedCase> {
    let resolver = ModuleResolver::new(&context.definitions, source);
    let mut fragments = resolver.resolve_all(&context.modules)?;
    fragments.push(context.program.clone());

    let expect = context
        .expect
        .as_str()
        .and_then(Outcome::parse)
        .ok_or_else(|| AnsUnitError::InvalidExpectation {
            at: at.to_string(),
            found: describe(&context.expect),
        })?;

    debug!(
        target: "ansunit::spec",
        at,
        modules = context.modules.len(),
        expect = %expect,
        "resolved case"
    );
    Ok(ResolvedCase {
        arguments: context.arguments.clone(),
        program: fragments.join("\n"),
        expect,
    })
}

/// A value as it would be written in the suite file, on one line.
fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().replace('\n', " "))
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}
