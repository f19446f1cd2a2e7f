/*
 * locator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Locator command implementation

use anyhow::{Context, Result};
use quarto_cite_syntax::resolve;

use crate::config::Config;

pub fn execute(text: &str, config: &Config) -> Result<()> {
    println!("{}", run(text, config)?);
    Ok(())
}

/// The resolved locator as pretty JSON.
pub fn run(text: &str, config: &Config) -> Result<String> {
    let terms = config
        .registry()
        .default_terms()
        .with_context(|| format!("Failed to load locale '{}'", config.locale.default))?;
    let resolved = resolve(text, &terms);
    Ok(serde_json::to_string_pretty(&resolved)?)
}
