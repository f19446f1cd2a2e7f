/*
 * scan.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Scan command implementation.
//!
//! Prints the citations found in a document as JSON: either the recognized
//! spans with their parsed items, or (with `--csl`) the citation clusters a
//! CSL processor would receive.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quarto_cite_syntax::{CitationScanner, Source, Verbatim, csl_clusters};
use tracing::info;

use crate::config::Config;

/// Arguments for the scan command
#[derive(Debug)]
pub struct ScanArgs {
    /// Input file; stdin when `None` or `-`
    pub input: Option<PathBuf>,
    /// Emit CSL clusters
    pub csl: bool,
    /// Key → id map file
    pub ids: Option<PathBuf>,
}

pub fn execute(args: ScanArgs, config: &Config) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    let ids = args.ids.as_deref().map(load_ids).transpose()?;
    println!("{}", run(&text, args.csl, ids.as_ref(), config)?);
    Ok(())
}

/// Scan `text` and render the result as pretty JSON.
pub fn run(
    text: &str,
    csl: bool,
    ids: Option<&HashMap<String, String>>,
    config: &Config,
) -> Result<String> {
    let terms = config
        .registry()
        .default_terms()
        .with_context(|| format!("Failed to load locale '{}'", config.locale.default))?;

    let source = if config.scan.markdown {
        Source::markdown(text)
    } else {
        Source::plain(text)
    };
    let mut found = CitationScanner::new(source, &terms, &Verbatim)
        .with_options(config.scan_options())
        .scan();

    if let Some(ids) = ids {
        for recognized in &mut found {
            recognized.citation.remap_ids(ids);
        }
    }

    info!(citations = found.len(), "Scanned document");

    let json = if csl {
        serde_json::to_string_pretty(&csl_clusters(&found))?
    } else {
        serde_json::to_string_pretty(&found)?
    };
    Ok(json)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Read a key → id map. YAML is a superset of JSON, so both work.
fn load_ids(path: &Path) -> Result<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read id map {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Invalid id map {}", path.display()))
}
