//! The suite specification pipeline.
//!
//! A suite document goes through four stages, each a pure function of the previous one:
//!
//! 1. [`SpecNode::load`] turns YAML into a typed tree of suites and leaves,
//! 2. [`canonicalize_root`] merges contexts downward and resolves every leaf into a
//!    [`ResolvedCase`],
//! 3. [`flatten`] names each case by its path,
//! 4. selection (see [`crate::select`]) decides which names run.

pub mod canonical;
pub mod context;
pub mod flatten;
pub mod module;
pub mod node;

pub use canonical::{canonicalize, canonicalize_root, resolve_case, CanonicalNode, Outcome, ResolvedCase};
pub use context::{merge_value, Context, LocalContext};
pub use flatten::{extend_unique, flatten, FlatSuite, DEFAULT_JOINER};
pub use module::{Definitions, FsModuleSource, ModuleDefinition, ModuleResolver, ModuleSource};
pub use node::{display_name, is_test_key, parse_document, SpecNode, TEST_TAG};
