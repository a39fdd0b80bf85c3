//! Test selection by name.
//!
//! A name is selected when it matches *every* inclusion pattern and *none* of the exclusion
//! patterns. Patterns search anywhere in the name; anchor them with `^`/`$` when needed.

use regex::Regex;

use crate::errors::{AnsUnitError, Result};
use crate::spec::{FlatSuite, ResolvedCase};

#[derive(Debug, Clone, Default)]
pub struct Selector {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl Selector {
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// A selector that selects everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.include.iter().all(|re| re.is_match(name))
            && !self.exclude.iter().any(|re| re.is_match(name))
    }

    /// Selected cases, in name order.
    pub fn select<'a>(&self, suite: &'a FlatSuite) -> Vec<(&'a str, &'a ResolvedCase)> {
        suite
            .iter()
            .filter(|(name, _)| self.is_selected(name))
            .map(|(name, case)| (name.as_str(), case))
            .collect()
    }
}

fn compile<P>(patterns: P) -> Result<Vec<Regex>>
where
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(pattern).map_err(|source| AnsUnitError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}
