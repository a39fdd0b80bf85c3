//! Module definitions and their resolution into program fragments.
//!
//! A module is a named source of program text. It is either literal text, the contents of a
//! file, an alias of another module, or an ordered group of modules. Resolution follows the
//! indirections and yields the fragments in order; the text itself is never inspected.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, trace};

use crate::errors::{AnsUnitError, Result};

/// Module definitions visible at one point of the suite tree, keyed by module name.
pub type Definitions = BTreeMap<String, ModuleDefinition>;

const FILENAME: &str = "filename";
const REFERENCE: &str = "reference";
const GROUP: &str = "group";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDefinition {
    /// Inline program text.
    Literal(String),
    /// Program text read from a file and trimmed.
    File(PathBuf),
    /// Another module, by name.
    Alias(String),
    /// Several modules, concatenated in order.
    Group(Vec<String>),
}

impl ModuleDefinition {
    /// Reads a definition from its YAML form: a string, or a mapping with exactly one of
    /// `filename`, `reference` or `group`.
    pub fn from_yaml(name: &str, value: &Value) -> Result<Self> {
        let invalid = |reason: &str| AnsUnitError::InvalidModuleDefinition {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let mapping = match value {
            Value::String(text) => return Ok(Self::Literal(text.clone())),
            Value::Mapping(mapping) => mapping,
            _ => return Err(invalid("expected a string or a mapping")),
        };
        if mapping.len() != 1 {
            return Err(invalid("expected exactly one key"));
        }
        let Some((key, target)) = mapping.iter().next() else {
            return Err(invalid("expected exactly one key"));
        };

        match key.as_str() {
            Some(FILENAME) => target
                .as_str()
                .map(|path| Self::File(PathBuf::from(path)))
                .ok_or_else(|| invalid("`filename` must be a string")),
            Some(REFERENCE) => target
                .as_str()
                .map(|target| Self::Alias(target.to_string()))
                .ok_or_else(|| invalid("`reference` must be a module name")),
            Some(GROUP) => {
                let Value::Sequence(items) = target else {
                    return Err(invalid("`group` must be a list of module names"));
                };
                items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| invalid("`group` entries must be module names"))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Self::Group)
            }
            _ => Err(invalid("unknown key; expected `filename`, `reference` or `group`")),
        }
    }
}

// ============================================================================
// MODULE SOURCES
// ============================================================================

/// Where file-backed modules get their text from.
pub trait ModuleSource {
    fn read_module(&self, path: &Path) -> io::Result<String>;
}

impl<S: ModuleSource + ?Sized> ModuleSource for &S {
    fn read_module(&self, path: &Path) -> io::Result<String> {
        (**self).read_module(path)
    }
}

/// Reads module files from disk, relative to the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModuleSource;

impl ModuleSource for FsModuleSource {
    fn read_module(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Expands module names against one set of definitions.
pub struct ModuleResolver<'a> {
    definitions: &'a Definitions,
    source: &'a dyn ModuleSource,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(definitions: &'a Definitions, source: &'a dyn ModuleSource) -> Self {
        Self {
            definitions,
            source,
        }
    }

    /// Resolves one module into its ordered program fragments.
    pub fn resolve(&self, name: &str) -> Result<Vec<String>> {
        let mut fragments = Vec::new();
        self.resolve_into(name, &mut Vec::new(), &mut fragments)?;
        debug!(
            target: "ansunit::spec",
            module = name,
            fragments = fragments.len(),
            "resolved module"
        );
        Ok(fragments)
    }

    /// Resolves several modules, concatenating their fragments in order.
    pub fn resolve_all<I, S>(&self, names: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fragments = Vec::new();
        for name in names {
            fragments.extend(self.resolve(name.as_ref())?);
        }
        Ok(fragments)
    }

    /// `chain` holds the names currently being expanded, outermost first.
    fn resolve_into(
        &self,
        name: &str,
        chain: &mut Vec<String>,
        fragments: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(start) = chain.iter().position(|seen| seen == name) {
            let mut cycle = chain[start..].to_vec();
            cycle.push(name.to_string());
            return Err(AnsUnitError::CyclicModuleReference { chain: cycle });
        }
        let definition =
            self.definitions
                .get(name)
                .ok_or_else(|| AnsUnitError::UndefinedModule {
                    name: name.to_string(),
                })?;

        chain.push(name.to_string());
        match definition {
            ModuleDefinition::Literal(text) => fragments.push(text.clone()),
            ModuleDefinition::File(path) => {
                trace!(target: "ansunit::spec", module = name, path = %path.display(), "reading module file");
                let text = self
                    .source
                    .read_module(path)
                    .map_err(|source| AnsUnitError::ModuleFile {
                        name: name.to_string(),
                        path: path.clone(),
                        source,
                    })?;
                fragments.push(text.trim().to_string());
            }
            ModuleDefinition::Alias(target) => self.resolve_into(target, chain, fragments)?,
            ModuleDefinition::Group(members) => {
                for member in members {
                    self.resolve_into(member, chain, fragments)?;
                }
            }
        }
        chain.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemorySource(HashMap<PathBuf, String>);

    impl ModuleSource for MemorySource {
        fn read_module(&self, path: &Path) -> io::Result<String> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such module file"))
        }
    }

    fn definitions(yaml: &str) -> Definitions {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        value
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, v)| {
                let name = k.as_str().unwrap();
                (name.to_string(), ModuleDefinition::from_yaml(name, v).unwrap())
            })
            .collect()
    }

    fn no_files() -> MemorySource {
        MemorySource(HashMap::new())
    }

    #[test]
    fn parses_all_definition_shapes() {
        let defs = definitions(
            r#"
            lit: "p(1)."
            file: {filename: base.lp}
            alias: {reference: lit}
            grp: {group: [lit, alias]}
            "#,
        );
        assert_eq!(defs["lit"], ModuleDefinition::Literal("p(1).".into()));
        assert_eq!(defs["file"], ModuleDefinition::File("base.lp".into()));
        assert_eq!(defs["alias"], ModuleDefinition::Alias("lit".into()));
        assert_eq!(
            defs["grp"],
            ModuleDefinition::Group(vec!["lit".into(), "alias".into()])
        );
    }

    #[test]
    fn rejects_malformed_definitions() {
        for text in [
            "42",
            "[a, b]",
            "{}",
            "{filename: a.lp, reference: b}",
            "{include: a.lp}",
            "{group: a}",
            "{reference: [a]}",
        ] {
            let value: Value = serde_yaml::from_str(text).unwrap();
            let err = ModuleDefinition::from_yaml("m", &value).unwrap_err();
            assert!(
                matches!(err, AnsUnitError::InvalidModuleDefinition { ref name, .. } if name == "m"),
                "{text} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn group_of_repeated_literal() {
        let defs = definitions("{m1: 'p(1).', m2: {group: [m1, m1]}}");
        let source = no_files();
        let resolver = ModuleResolver::new(&defs, &source);
        assert_eq!(resolver.resolve("m2").unwrap(), vec!["p(1).", "p(1)."]);
    }

    #[test]
    fn nested_groups_flatten_in_order() {
        let defs = definitions(
            r#"
            m1: "a."
            m2: "b."
            inner: {group: [m1]}
            nested: {group: [inner, m2]}
            flat: {group: [m1, m2]}
            "#,
        );
        let source = no_files();
        let resolver = ModuleResolver::new(&defs, &source);
        assert_eq!(
            resolver.resolve("nested").unwrap(),
            resolver.resolve("flat").unwrap()
        );
    }

    #[test]
    fn alias_chain_resolves_to_target() {
        let defs = definitions("{a: {reference: b}, b: {reference: c}, c: 'x.'}");
        let source = no_files();
        let resolver = ModuleResolver::new(&defs, &source);
        assert_eq!(resolver.resolve("a").unwrap(), vec!["x."]);
    }

    #[test]
    fn file_modules_are_trimmed() {
        let defs = definitions("{base: {filename: base.lp}}");
        let source = MemorySource(HashMap::from([(
            PathBuf::from("base.lp"),
            "\n  edge(1,2).\n\n".to_string(),
        )]));
        let resolver = ModuleResolver::new(&defs, &source);
        assert_eq!(resolver.resolve("base").unwrap(), vec!["edge(1,2)."]);
    }

    #[test]
    fn unreadable_file_is_a_module_file_error() {
        let defs = definitions("{base: {filename: missing.lp}}");
        let source = no_files();
        let resolver = ModuleResolver::new(&defs, &source);
        let err = resolver.resolve("base").unwrap_err();
        assert!(matches!(err, AnsUnitError::ModuleFile { ref name, .. } if name == "base"));
    }

    #[test]
    fn dangling_reference_is_undefined() {
        let defs = definitions("{a: {group: [b]}}");
        let source = no_files();
        let resolver = ModuleResolver::new(&defs, &source);
        let err = resolver.resolve("a").unwrap_err();
        assert!(matches!(err, AnsUnitError::UndefinedModule { ref name } if name == "b"));
    }

    #[test]
    fn cycles_are_reported_with_their_chain() {
        let defs = definitions("{top: {group: [a]}, a: {reference: b}, b: {group: [a]}}");
        let source = no_files();
        let resolver = ModuleResolver::new(&defs, &source);
        match resolver.resolve("top").unwrap_err() {
            AnsUnitError::CyclicModuleReference { chain } => {
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_alias_is_a_cycle() {
        let defs = definitions("{a: {reference: a}}");
        let source = no_files();
        let resolver = ModuleResolver::new(&defs, &source);
        assert!(matches!(
            resolver.resolve("a"),
            Err(AnsUnitError::CyclicModuleReference { .. })
        ));
    }
}
