/*
 * terms.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Terms command implementation

use std::fmt::Write;

use anyhow::{Context, Result};

use crate::config::Config;

pub fn execute(config: &Config) -> Result<()> {
    print!("{}", run(config)?);
    Ok(())
}

/// One `surface<TAB>label` line per term, sorted by surface form.
pub fn run(config: &Config) -> Result<String> {
    let terms = config
        .registry()
        .default_terms()
        .with_context(|| format!("Failed to load locale '{}'", config.locale.default))?;

    tracing::info!(locale = %config.locale.default, count = terms.len(), "Locator terms");

    let mut out = String::new();
    for (surface, label) in terms.entries() {
        writeln!(out, "{surface}\t{label}")?;
    }
    Ok(out)
}
