//! The typed suite tree, loaded once from YAML.
//!
//! Keys starting with `Test` name child tests; every other key is a context declaration.
//! A node with at least one child is a [`SpecNode::Suite`], otherwise a [`SpecNode::Leaf`].

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::errors::{AnsUnitError, Result};
use crate::spec::context::{LocalContext, ARGUMENTS, DEFINITIONS, EXPECT, MODULES, PROGRAM};
use crate::spec::module::{Definitions, ModuleDefinition};

/// Prefix that marks a key as a child test.
pub const TEST_TAG: &str = "Test";

/// Location label of the document root in error messages.
pub const ROOT: &str = "<root>";

#[derive(Debug, Clone, PartialEq)]
pub enum SpecNode {
    Suite {
        children: BTreeMap<String, SpecNode>,
        context: LocalContext,
    },
    Leaf {
        context: LocalContext,
    },
}

pub fn is_test_key(key: &str) -> bool {
    key.starts_with(TEST_TAG)
}

/// The name a test is addressed by: its key without the `Test` tag.
///
/// ```
/// use ansunit::spec::display_name;
/// assert_eq!(display_name("TestA"), "A");
/// assert_eq!(display_name("Test choice rule"), "choice rule");
/// ```
pub fn display_name(key: &str) -> &str {
    key.strip_prefix(TEST_TAG).unwrap_or(key).trim_start()
}

pub(crate) fn child_location(at: &str, key: &str) -> String {
    format!("{at}/{key}")
}

/// Parses suite text into a YAML value with `<<` merge keys expanded, so a test that merges
/// an anchored mapping sees its keys as its own declarations.
pub fn parse_document(text: &str) -> serde_yaml::Result<Value> {
    let mut document: Value = serde_yaml::from_str(text)?;
    document.apply_merge()?;
    Ok(document)
}

impl SpecNode {
    /// Loads a suite document. An empty document is a single leaf with no declarations.
    pub fn load(document: &Value) -> Result<Self> {
        Self::load_at(document, ROOT)
    }

    pub fn context(&self) -> &LocalContext {
        match self {
            SpecNode::Suite { context, .. } | SpecNode::Leaf { context } => context,
        }
    }

    fn load_at(value: &Value, at: &str) -> Result<Self> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => {
                return Ok(SpecNode::Leaf {
                    context: LocalContext::default(),
                })
            }
            other => {
                return Err(AnsUnitError::malformed(
                    at,
                    format!("expected a mapping, found {}", kind_of(other)),
                ))
            }
        };

        let mut children = BTreeMap::new();
        let mut context = LocalContext::default();
        for (key, value) in mapping {
            let Some(key) = key.as_str() else {
                return Err(AnsUnitError::malformed(
                    at,
                    format!("key of kind {} is not a string", kind_of(key)),
                ));
            };
            if is_test_key(key) {
                let child = Self::load_at(value, &child_location(at, key))?;
                children.insert(key.to_string(), child);
            } else {
                declare(&mut context, key, value, at)?;
            }
        }

        Ok(if children.is_empty() {
            SpecNode::Leaf { context }
        } else {
            SpecNode::Suite { children, context }
        })
    }
}

fn declare(context: &mut LocalContext, key: &str, value: &Value, at: &str) -> Result<()> {
    match key {
        DEFINITIONS => context.definitions = Some(load_definitions(value, at)?),
        MODULES => context.modules = Some(load_tokens(value, key, at)?),
        ARGUMENTS => context.arguments = Some(load_tokens(value, key, at)?),
        PROGRAM => {
            let text = match value {
                Value::Null => String::new(),
                other => scalar_text(other).ok_or_else(|| {
                    AnsUnitError::malformed(at, format!("`{PROGRAM}` must be text"))
                })?,
            };
            context.program = Some(text);
        }
        // Checked once the leaf's context is merged, so suites may carry any value.
        EXPECT => context.expect = Some(value.clone()),
        _ => {
            context.extra.insert(key.to_string(), value.clone());
        }
    }
    Ok(())
}

fn load_definitions(value: &Value, at: &str) -> Result<Definitions> {
    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Definitions::new()),
        _ => {
            return Err(AnsUnitError::malformed(
                at,
                format!("`{DEFINITIONS}` must map module names to definitions"),
            ))
        }
    };
    mapping
        .iter()
        .map(|(name, definition)| -> Result<(String, ModuleDefinition)> {
            let name = scalar_text(name).ok_or_else(|| {
                AnsUnitError::malformed(at, "module names must be strings")
            })?;
            let definition = ModuleDefinition::from_yaml(&name, definition)?;
            Ok((name, definition))
        })
        .collect()
}

/// A sequence of scalars, or a single scalar standing for a one-element sequence.
fn load_tokens(value: &Value, key: &str, at: &str) -> Result<Vec<String>> {
    let expected = || AnsUnitError::malformed(at, format!("`{key}` must be a list of strings"));
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| scalar_text(item).ok_or_else(expected))
            .collect(),
        scalar => scalar_text(scalar).map(|text| vec![text]).ok_or_else(expected),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<SpecNode> {
        SpecNode::load(&parse_document(text).unwrap())
    }

    #[test]
    fn test_keys_make_a_suite() {
        let node = load(
            r#"
            Expect: UNSAT
            Modules: base
            TestA: {Program: "a."}
            TestB: {}
            "#,
        )
        .unwrap();

        let SpecNode::Suite { children, context } = node else {
            panic!("expected a suite");
        };
        assert_eq!(children.keys().collect::<Vec<_>>(), ["TestA", "TestB"]);
        assert_eq!(context.expect, Some(Value::from("UNSAT")));
        assert_eq!(context.modules, Some(vec!["base".to_string()]));
        assert!(matches!(children["TestB"], SpecNode::Leaf { .. }));
        assert_eq!(
            children["TestA"].context().program.as_deref(),
            Some("a.")
        );
    }

    #[test]
    fn plain_mapping_is_a_leaf() {
        let node = load("{Program: 'p.', Arguments: ['-n', 0], Owner: me}").unwrap();
        let SpecNode::Leaf { context } = node else {
            panic!("expected a leaf");
        };
        assert_eq!(context.arguments, Some(vec!["-n".to_string(), "0".to_string()]));
        assert_eq!(context.extra["Owner"], Value::String("me".into()));
    }

    #[test]
    fn null_test_body_is_an_empty_leaf() {
        let node = load("TestEmpty:").unwrap();
        let SpecNode::Suite { children, .. } = node else {
            panic!("expected a suite");
        };
        assert_eq!(
            children["TestEmpty"],
            SpecNode::Leaf {
                context: LocalContext::default()
            }
        );
    }

    #[test]
    fn definitions_are_validated_at_load_time() {
        let err = load("TestA: {Definitions: {m: {bogus: 1}}}").unwrap_err();
        assert!(matches!(err, AnsUnitError::InvalidModuleDefinition { ref name, .. } if name == "m"));
    }

    #[test]
    fn non_mapping_test_body_is_malformed() {
        let err = load("TestA: [1, 2]").unwrap_err();
        match err {
            AnsUnitError::MalformedSpec { at, .. } => assert_eq!(at, "<root>/TestA"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn expect_is_kept_as_written() {
        let node = load("Expect: [SAT]").unwrap();
        assert_eq!(
            node.context().expect,
            Some(Value::Sequence(vec![Value::from("SAT")]))
        );
    }

    #[test]
    fn merge_keys_become_local_declarations() {
        let node = load(
            r#"
            shared: &shared {Expect: UNSAT, Program: "base."}
            TestA: {<<: *shared}
            TestB: {<<: *shared, Program: "own."}
            "#,
        )
        .unwrap();

        let SpecNode::Suite { children, .. } = node else {
            panic!("expected a suite");
        };
        let a = children["TestA"].context();
        assert_eq!(a.program.as_deref(), Some("base."));
        assert_eq!(a.expect, Some(Value::from("UNSAT")));
        assert!(a.extra.is_empty());
        assert_eq!(children["TestB"].context().program.as_deref(), Some("own."));
    }

    #[test]
    fn display_name_strips_tag_and_spacing() {
        assert_eq!(display_name("TestA"), "A");
        assert_eq!(display_name("Test  spaced"), "spaced");
        assert_eq!(display_name("Test"), "");
    }
}
