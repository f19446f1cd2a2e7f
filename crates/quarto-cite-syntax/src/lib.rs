/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Inline citation syntax.
//!
//! Recognizes Pandoc-flavoured citations written with brace annotations:
//!
//! ```text
//! [@doe99; -@roe10{p. 4}]      bracketed list, second author suppressed
//! [@doe99{see}{chap. 3-4}]     prefix and suffix; "chap. 3-4" is a locator
//! @doe99{pp. 33, 35} says      author in text
//! ```
//!
//! The building blocks are layered:
//!
//! - [`delimiter::match_delimited`] finds balanced delimiters, stepping over
//!   whatever the host's [`TokenSkipper`] says is atomic;
//! - [`parser`] reads keys, `{prefix}{suffix}` groups, items and item lists;
//! - [`locator::resolve`] pulls a labelled locator out of suffix text using a
//!   locale's [`TermTable`](quarto_cite_locale::TermTable);
//! - [`CitationScanner`] walks a whole text and assembles [`Citation`]s,
//!   which [`Citation::to_csl`] turns into CSL citation clusters.
//!
//! ```
//! use quarto_cite_syntax::{CitationMode, scan_markdown};
//! use quarto_cite_locale::builtin::en_us_table;
//!
//! let terms = en_us_table().unwrap();
//! let found = scan_markdown("As argued [@doe99{pp. 33-35}].", &terms);
//! assert_eq!(found.len(), 1);
//! let item = &found[0].citation.items[0];
//! assert_eq!(found[0].citation.mode, CitationMode::Normal);
//! assert_eq!(item.label.as_deref(), Some("page"));
//! assert_eq!(item.locator.as_deref(), Some("33–35"));
//! ```

pub mod context;
pub mod delimiter;
pub mod item;
pub mod locator;
pub mod parser;
pub mod scanner;
pub mod source;

pub use context::{KeyedTerms, RenderInline, TermSource, Verbatim};
pub use delimiter::match_delimited;
pub use item::{CitationKey, CiteItem};
pub use locator::{ResolvedLocator, resolve};
pub use parser::{Annotation, parse_item, parse_item_list, parse_key, parse_prefix_suffix};
pub use scanner::{
    Citation, CitationMode, CitationProperties, CitationScanner, CslCitation, RecognizedCitation,
    ScanOptions, csl_clusters, scan_markdown,
};
pub use source::{CharSkipper, MarkdownSkipper, Source, TokenSkipper};
