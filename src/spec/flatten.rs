//! Flattening a canonical tree into uniquely named cases.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::errors::{AnsUnitError, Result};
use crate::spec::canonical::{CanonicalNode, ResolvedCase};
use crate::spec::node::display_name;

pub const DEFAULT_JOINER: &str = " :: ";

/// Fully-qualified test name to case. Always iterated in name order.
pub type FlatSuite = BTreeMap<String, ResolvedCase>;

/// Names every case by the path of test names leading to it, starting at `prefix`.
pub fn flatten(node: &CanonicalNode, prefix: &str, joiner: &str) -> Result<FlatSuite> {
    let mut flat = FlatSuite::new();
    flatten_into(node, prefix.to_string(), joiner, &mut flat)?;
    Ok(flat)
}

fn flatten_into(
    node: &CanonicalNode,
    prefix: String,
    joiner: &str,
    flat: &mut FlatSuite,
) -> Result<()> {
    match node {
        CanonicalNode::Suite(children) => {
            for (key, child) in children {
                let name = format!("{prefix}{joiner}{}", display_name(key));
                flatten_into(child, name, joiner, flat)?;
            }
            Ok(())
        }
        CanonicalNode::Case(case) => insert_unique(flat, prefix, case.clone()),
    }
}

/// Moves every case of `other` into `suite`, refusing to overwrite a name.
pub fn extend_unique(suite: &mut FlatSuite, other: FlatSuite) -> Result<()> {
    for (name, case) in other {
        insert_unique(suite, name, case)?;
    }
    Ok(())
}

fn insert_unique(suite: &mut FlatSuite, name: String, case: ResolvedCase) -> Result<()> {
    match suite.entry(name) {
        Entry::Occupied(entry) => Err(AnsUnitError::DuplicateCaseName {
            name: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(case);
            Ok(())
        }
    }
}
