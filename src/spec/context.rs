//! Inheritable test context and its merge rules.
//!
//! A context is threaded down the suite tree. At each node the node's own declarations
//! ([`LocalContext`]) are merged into the context inherited from its parent, and the merge
//! is directed by the shape of the *parent* value:
//!
//! - mappings are shallow-copied and extended/overwritten by the local mapping,
//! - sequences are extended by the local sequence (a local scalar counts as one element),
//! - anything else is replaced by the local value.
//!
//! Keys the parent does not know are taken from the local context verbatim.

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::spec::module::Definitions;

pub const DEFINITIONS: &str = "Definitions";
pub const MODULES: &str = "Modules";
pub const ARGUMENTS: &str = "Arguments";
pub const PROGRAM: &str = "Program";
pub const EXPECT: &str = "Expect";

/// A fully merged context. The reserved keys are typed; anything else lives in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub definitions: Definitions,
    pub modules: Vec<String>,
    pub arguments: Vec<String>,
    pub program: String,
    /// Validated only when a leaf is resolved.
    pub expect: Value,
    pub extra: BTreeMap<String, Value>,
}

/// The root context every suite starts from.
impl Default for Context {
    fn default() -> Self {
        Self {
            definitions: Definitions::new(),
            modules: Vec::new(),
            arguments: Vec::new(),
            program: String::new(),
            expect: Value::from("SAT"),
            extra: BTreeMap::new(),
        }
    }
}

/// The keys declared directly on one node, before inheritance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalContext {
    pub definitions: Option<Definitions>,
    pub modules: Option<Vec<String>>,
    pub arguments: Option<Vec<String>>,
    pub program: Option<String>,
    pub expect: Option<Value>,
    pub extra: BTreeMap<String, Value>,
}

impl Context {
    /// Merges `local` below `self`, returning the context seen by the node that declared
    /// `local`. Neither input is modified.
    pub fn merge(&self, local: &LocalContext) -> Context {
        let mut extra: BTreeMap<String, Value> = self
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), merge_value(value, local.extra.get(key))))
            .collect();
        for (key, value) in &local.extra {
            extra.entry(key.clone()).or_insert_with(|| value.clone());
        }

        Context {
            definitions: overlay(&self.definitions, local.definitions.as_ref()),
            modules: append(&self.modules, local.modules.as_deref()),
            arguments: append(&self.arguments, local.arguments.as_deref()),
            program: local.program.as_ref().unwrap_or(&self.program).clone(),
            expect: local.expect.as_ref().unwrap_or(&self.expect).clone(),
            extra,
        }
    }
}

fn overlay<K: Ord + Clone, V: Clone>(
    parent: &BTreeMap<K, V>,
    local: Option<&BTreeMap<K, V>>,
) -> BTreeMap<K, V> {
    let mut merged = parent.clone();
    if let Some(local) = local {
        merged.extend(local.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

fn append<T: Clone>(parent: &[T], local: Option<&[T]>) -> Vec<T> {
    let mut merged = parent.to_vec();
    merged.extend_from_slice(local.unwrap_or_default());
    merged
}

/// Generic merge for keys outside the reserved set, directed by the parent value's shape.
///
/// A local value that cannot extend a parent mapping (e.g. a scalar) replaces it.
pub fn merge_value(parent: &Value, local: Option<&Value>) -> Value {
    let Some(local) = local else {
        return parent.clone();
    };
    match (parent, local) {
        (Value::Mapping(parent), Value::Mapping(local)) => {
            let mut merged = parent.clone();
            for (k, v) in local {
                merged.insert(k.clone(), v.clone());
            }
            Value::Mapping(merged)
        }
        (Value::Sequence(parent), Value::Sequence(local)) => {
            Value::Sequence(parent.iter().chain(local).cloned().collect())
        }
        (Value::Sequence(parent), scalar) => {
            let mut merged = parent.clone();
            merged.push(scalar.clone());
            Value::Sequence(merged)
        }
        (_, local) => local.clone(),
    }
}
