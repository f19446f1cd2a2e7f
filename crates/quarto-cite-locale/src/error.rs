/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for locale loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading locale vocabulary.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// The locale file is not well-formed XML.
    #[error("XML syntax error in locale: {message} (at byte {position})")]
    XmlSyntax { message: String, position: u64 },

    /// The document root is not `<locale>`.
    #[error("Expected <locale> root element, found <{found}>")]
    InvalidRootElement { found: String },

    /// The document has no root element at all.
    #[error("Empty locale document: no root element found")]
    EmptyDocument,

    /// A `<term>` element without a `name` attribute.
    #[error("Term missing 'name' attribute")]
    MissingTermName,

    /// No locale file, base-language file, or built-in table matches the id.
    #[error("Unknown locale '{id}'")]
    UnknownLocale { id: String },

    /// Reading a locale file failed.
    #[error("Failed to read locale file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for locale operations.
pub type Result<T> = std::result::Result<T, LocaleError>;
