//! Handles the dump modes of the CLI.
//!
//! Both dumps are plain text so they can be diffed and piped; only the test report
//! (see [`crate::harness::report`]) is coloured.

use std::path::Path;

use crate::errors::{AnsUnitError, Result};
use crate::select::Selector;
use crate::spec::{CanonicalNode, FlatSuite};

/// The canonical tree of one suite as a YAML document, opened by a `---` marker naming the
/// suite file so several dumps can be told apart.
pub fn render_canonical(path: &Path, tree: &CanonicalNode) -> Result<String> {
    let body = serde_yaml::to_string(tree).map_err(AnsUnitError::Dump)?;
    Ok(format!("--- # {}\n{body}", path.display()))
}

/// Every test name in order, marked ` * ` when selected and ` - ` otherwise.
pub fn render_listing(suite: &FlatSuite, selector: &Selector) -> String {
    suite
        .keys()
        .map(|name| {
            let marker = if selector.is_selected(name) { " * " } else { " - " };
            format!("{marker}{name}\n")
        })
        .collect()
}
