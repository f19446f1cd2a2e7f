/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Locale vocabulary for citation locators.
//!
//! Citation suffixes such as `{pp. 4-8}` or `{chap. 3}` start with a
//! locale-specific term that names the locator type. This crate turns the
//! terms a CSL locale declares into a [`TermTable`], a read-only map from
//! surface form to canonical label with longest-match lookup.
//!
//! # Overview
//!
//! - [`TermTable`]: surface form → label, backed by a character trie
//! - [`parse_locale_xml`]: reads the `<terms>` section of a CSL locale file
//! - [`builtin`]: CSL locales embedded in the binary (en-US), always available
//! - [`LocaleRegistry`]: resolves locale ids to cached tables, with the usual
//!   `de-AT` → `de` → default fallback chain
//!
//! # Example
//!
//! ```rust
//! use quarto_cite_locale::{LocaleRegistry, TermSelection};
//!
//! let registry = LocaleRegistry::new("en-US", TermSelection::Locators);
//! let terms = registry.terms("en-US").unwrap();
//!
//! let m = terms.longest_prefix("pp. 33-35").unwrap();
//! assert_eq!(m.label, "page");
//! assert_eq!(m.len, 3);
//! ```

pub mod builtin;
pub mod error;
pub mod registry;
pub mod terms;
pub mod xml;

pub use error::{LocaleError, Result};
pub use registry::{LocaleRegistry, shared_registry};
pub use terms::{TermMatch, TermTable};
pub use xml::{LocaleDocument, LocaleTerm, TermForm, TermSelection, parse_locale_xml};

/// CSL locator types, in the order the CSL specification lists them.
///
/// With [`TermSelection::Locators`] only terms with one of these names
/// contribute surface forms to a [`TermTable`].
pub const LOCATOR_TERMS: &[&str] = &[
    "act",
    "appendix",
    "article-locator",
    "book",
    "canon",
    "chapter",
    "column",
    "elocation",
    "equation",
    "figure",
    "folio",
    "issue",
    "line",
    "note",
    "opus",
    "page",
    "paragraph",
    "part",
    "rule",
    "scene",
    "section",
    "sub-verbo",
    "supplement",
    "table",
    "timestamp",
    "title-locator",
    "verse",
    "version",
    "volume",
];

/// Whether `name` is a CSL locator term name.
pub fn is_locator_term(name: &str) -> bool {
    LOCATOR_TERMS.contains(&name)
}
