//! The ansunit Command-Line Interface.
//!
//! This module is the main entry point of the binary and orchestrates the library: every
//! suite is loaded, canonicalized and flattened before a single solver runs, so a broken
//! specification never produces partial results.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use termcolor::{ColorChoice, StandardStream};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::cli::args::AnsUnitArgs;
use crate::errors::{print_error, AnsUnitError, Result};
use crate::harness::{report_results, run_suite, HarnessConfig, ProcessRunner};
use crate::select::Selector;
use crate::spec::{
    canonicalize_root, extend_unique, flatten, parse_document, CanonicalNode, FlatSuite,
    FsModuleSource, SpecNode,
};

pub mod args;
pub mod output;

/// A suite file after canonicalization.
#[derive(Debug)]
pub struct LoadedSuite {
    pub path: PathBuf,
    pub tree: CanonicalNode,
}

/// The main entry point for the CLI.
pub fn run() {
    let args = AnsUnitArgs::parse();
    init_tracing(args.verbose);

    match execute(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

/// Runs the CLI for parsed arguments. `Ok(true)` means every selected case passed (or a
/// dump was printed).
pub fn execute(args: &AnsUnitArgs) -> Result<bool> {
    let config = args.harness_config();
    let suites = discover_suites(&args.suites)?
        .into_iter()
        .map(|path| load_suite(&path))
        .collect::<Result<Vec<_>>>()?;

    if args.dump_canonical {
        for suite in &suites {
            print!("{}", output::render_canonical(&suite.path, &suite.tree)?);
        }
        return Ok(true);
    }

    let flat = flatten_suites(&suites, &config)?;
    let selector = Selector::new(&args.filter_match, &args.filter_nomatch)?;

    if args.dump_list {
        print!("{}", output::render_listing(&flat, &selector));
        return Ok(true);
    }

    let selected = selector.select(&flat);
    info!(
        target: "ansunit::cli",
        selected = selected.len(),
        total = flat.len(),
        solver = %config.solver,
        "running suite"
    );
    let mut diagnostics = io::stdout();
    let results = run_suite(selected, &config, &ProcessRunner, &mut diagnostics);

    let mut out = StandardStream::stdout(color_choice(&config));
    let summary = report_results(&results, &config, &mut out).map_err(AnsUnitError::Report)?;
    Ok(summary.is_success())
}

/// Expands directories into the `.yaml`/`.yml` files below them, sorted. Files are kept as
/// given, whatever their extension.
pub fn discover_suites(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut suites = Vec::new();
    for path in paths {
        if !path.is_dir() {
            suites.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(|e| AnsUnitError::SpecRead {
                path: path.clone(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() && is_yaml_file(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        debug!(target: "ansunit::cli", dir = %path.display(), suites = found.len(), "discovered suites");
        suites.extend(found);
    }
    Ok(suites)
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Reads, loads and canonicalizes one suite file.
pub fn load_suite(path: &Path) -> Result<LoadedSuite> {
    let text = fs::read_to_string(path).map_err(|source| AnsUnitError::SpecRead {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&text).map_err(|source| AnsUnitError::SpecParse {
        path: path.to_path_buf(),
        source,
    })?;
    let node = SpecNode::load(&document)?;
    let tree = canonicalize_root(&node, &FsModuleSource)?;
    info!(target: "ansunit::cli", suite = %path.display(), cases = tree.case_count(), "loaded suite");
    Ok(LoadedSuite {
        path: path.to_path_buf(),
        tree,
    })
}

/// Flattens every suite under its own path and merges them into one name space.
pub fn flatten_suites(suites: &[LoadedSuite], config: &HarnessConfig) -> Result<FlatSuite> {
    let mut all = FlatSuite::new();
    for suite in suites {
        let prefix = suite.path.display().to_string();
        extend_unique(&mut all, flatten(&suite.tree, &prefix, &config.joiner)?)?;
    }
    Ok(all)
}

fn color_choice(config: &HarnessConfig) -> ColorChoice {
    if config.use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}
