/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! quarto-cite - inline citation inspector

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "quarto-cite")]
#[command(version)]
#[command(about = "Find inline citations and resolve locators", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Locale used for locator terms (e.g. de-DE)
    #[arg(short, long, global = true)]
    locale: Option<String>,

    /// Directory containing CSL locale files (repeatable)
    #[arg(long = "locale-dir", global = true)]
    locale_dirs: Vec<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the citations in a Markdown file and print them as JSON
    Scan {
        /// Input file (reads stdin when omitted or '-')
        input: Option<PathBuf>,

        /// Print CSL citation clusters instead of recognized spans
        #[arg(long)]
        csl: bool,

        /// Only recognize bracketed citations
        #[arg(long)]
        no_in_text: bool,

        /// Treat the input as plain text (no escapes, code spans or links)
        #[arg(long)]
        plain: bool,

        /// YAML or JSON map from citation keys to bibliography ids
        #[arg(long)]
        ids: Option<PathBuf>,
    },

    /// Split a locator string into label, locator and suffix
    Locator {
        /// Text such as "pp. 33-35, and passim"
        text: String,
    },

    /// List the locator terms of the selected locale
    Terms {
        /// Include every term of the locale file, not only locator names
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "quarto_cite=debug"
    } else {
        "quarto_cite=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut overrides = Overrides {
        locale: cli.locale,
        locale_dirs: cli.locale_dirs,
        ..Default::default()
    };

    match cli.command {
        Commands::Scan {
            input,
            csl,
            no_in_text,
            plain,
            ids,
        } => {
            overrides.no_in_text = no_in_text;
            overrides.plain = plain;
            config.apply(overrides);
            commands::scan::execute(commands::scan::ScanArgs { input, csl, ids }, &config)
        }
        Commands::Locator { text } => {
            config.apply(overrides);
            commands::locator::execute(&text, &config)
        }
        Commands::Terms { all } => {
            overrides.all_terms = all;
            config.apply(overrides);
            commands::terms::execute(&config)
        }
    }
}
