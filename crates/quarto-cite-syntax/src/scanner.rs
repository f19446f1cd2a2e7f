/*
 * scanner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Finding citations in running text.
//!
//! Two forms are recognized:
//!
//! - bracketed lists, `[@doe99{p. 33}; -@roe10]`, which must be fully
//!   consumed by the item list up to the closing bracket;
//! - bare keys in running text, `@doe99` (author in text) and `-@doe99`
//!   (author suppressed).
//!
//! Everything else is skipped one host unit at a time, so a citation-like
//! string inside a code span or a link is left alone.

use crate::context::{RenderInline, TermSource, Verbatim};
use crate::delimiter::match_delimited;
use crate::item::{CitationKey, CiteItem};
use crate::parser::{CITATION_SIGIL, SUPPRESS_AUTHOR_MARKER, parse_item, parse_item_list};
use crate::source::Source;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::ops::Range;

const LIST_OPEN: char = '[';
const LIST_CLOSE: char = ']';

/// How a citation relates to the surrounding sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CitationMode {
    /// `[@doe99]`: rendered as a parenthetical citation or footnote.
    Normal,
    /// `-@doe99`: the author's name already appears in the text.
    SuppressAuthor,
    /// `@doe99`: the author's name becomes part of the sentence.
    AuthorInText,
}

/// One recognized citation and its items, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub mode: CitationMode,
    pub items: Vec<CiteItem>,
}

/// A citation together with the byte range it covers in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizedCitation {
    pub span: Range<usize>,
    pub citation: Citation,
}

/// Citation cluster in the shape a CSL processor consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CslCitation {
    pub citation_items: Vec<CiteItem>,
    pub properties: CitationProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationProperties {
    pub note_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_part_of_in_text_citation: Option<bool>,
}

impl Citation {
    pub fn keys(&self) -> impl Iterator<Item = &CitationKey> {
        self.items.iter().map(|item| &item.id)
    }

    /// The CSL clusters for this citation.
    ///
    /// An author-in-text citation becomes two clusters: the author name
    /// alone, then the rest of the reference with the author suppressed.
    pub fn to_csl(&self) -> Vec<CslCitation> {
        match self.mode {
            CitationMode::Normal => vec![CslCitation {
                citation_items: self.items.clone(),
                properties: CitationProperties::default(),
            }],
            CitationMode::SuppressAuthor => vec![CslCitation {
                citation_items: self
                    .items
                    .iter()
                    .map(|item| CiteItem {
                        suppress_author: true,
                        ..item.clone()
                    })
                    .collect(),
                properties: CitationProperties::default(),
            }],
            CitationMode::AuthorInText => {
                let author_only = self
                    .items
                    .iter()
                    .map(|item| CiteItem {
                        locator: None,
                        suffix: None,
                        ..item.clone()
                    })
                    .collect();
                let rest = self
                    .items
                    .iter()
                    .map(|item| CiteItem {
                        prefix: None,
                        suppress_author: true,
                        ..item.clone()
                    })
                    .collect();
                vec![
                    CslCitation {
                        citation_items: author_only,
                        properties: CitationProperties {
                            mode: Some("author-only".to_string()),
                            is_part_of_in_text_citation: Some(true),
                            ..Default::default()
                        },
                    },
                    CslCitation {
                        citation_items: rest,
                        properties: CitationProperties::default(),
                    },
                ]
            }
        }
    }

    /// Replace keys found in `ids` (e.g. short keys mapped to canonical
    /// bibliography ids). Keys not in the map are kept.
    pub fn remap_ids<S: BuildHasher>(&mut self, ids: &HashMap<String, String, S>) {
        for item in &mut self.items {
            if let Some(id) = ids.get(item.id.as_str()) {
                item.id = CitationKey::new(id.clone());
            }
        }
    }
}

/// All CSL clusters for `citations`, in order.
pub fn csl_clusters(citations: &[RecognizedCitation]) -> Vec<CslCitation> {
    citations
        .iter()
        .flat_map(|recognized| recognized.citation.to_csl())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Recognize bare `@key` / `-@key` in running text.
    pub in_text: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { in_text: true }
    }
}

/// Walks a [`Source`] and collects the citations in it.
pub struct CitationScanner<'a, T: ?Sized, R: ?Sized> {
    source: Source<'a>,
    terms: &'a T,
    render: &'a R,
    options: ScanOptions,
}

impl<'a, T, R> CitationScanner<'a, T, R>
where
    T: TermSource + ?Sized,
    R: RenderInline + ?Sized,
{
    pub fn new(source: Source<'a>, terms: &'a T, render: &'a R) -> Self {
        Self {
            source,
            terms,
            render,
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Every citation in the text, in document order.
    pub fn scan(&self) -> Vec<RecognizedCitation> {
        let end = self.source.len();
        let mut found = Vec::new();
        let mut pos = 0;

        while pos < end {
            let recognized = self.bracketed_at(pos).or_else(|| {
                if self.options.in_text {
                    self.in_text_at(pos)
                } else {
                    None
                }
            });

            match recognized {
                Some(citation) => {
                    tracing::debug!(
                        span = ?citation.span,
                        mode = ?citation.citation.mode,
                        items = citation.citation.items.len(),
                        "Recognized citation"
                    );
                    pos = citation.span.end;
                    found.push(citation);
                }
                None => pos = self.source.skip_unit(pos, end),
            }
        }

        found
    }

    /// A bracketed citation list starting at `pos`.
    pub fn bracketed_at(&self, pos: usize) -> Option<RecognizedCitation> {
        let source = &self.source;
        let end = source.len();
        let opens_list = source.starts_with_at(pos, "[@") || source.starts_with_at(pos, "[-@");
        if !opens_list {
            return None;
        }
        // `[@doe99](https://...)` is a link, not a citation.
        if source.skip_unit(pos, end) > pos + LIST_OPEN.len_utf8() {
            return None;
        }

        let close = match_delimited(source, pos, end, LIST_OPEN, LIST_CLOSE, false)?;
        let (items, after) = parse_item_list(
            source,
            pos + LIST_OPEN.len_utf8(),
            end,
            close,
            self.terms,
            self.render,
        )?;
        if after != close {
            return None;
        }

        Some(RecognizedCitation {
            span: pos..close + LIST_CLOSE.len_utf8(),
            citation: Citation {
                mode: CitationMode::Normal,
                items,
            },
        })
    }

    /// A bare `@key` or `-@key` starting at `pos`.
    pub fn in_text_at(&self, pos: usize) -> Option<RecognizedCitation> {
        let source = &self.source;
        let suppressed = source.char_at(pos) == Some(SUPPRESS_AUTHOR_MARKER);
        let sigil_at = if suppressed { pos + SUPPRESS_AUTHOR_MARKER.len_utf8() } else { pos };
        if source.char_at(sigil_at) != Some(CITATION_SIGIL) {
            return None;
        }
        if source
            .char_before(pos)
            .is_some_and(|c| c == LIST_OPEN || c.is_alphanumeric())
        {
            return None;
        }

        let (item, after) = parse_item(source, pos, source.len(), self.terms, self.render)?;
        let mode = if item.suppress_author {
            CitationMode::SuppressAuthor
        } else {
            CitationMode::AuthorInText
        };

        Some(RecognizedCitation {
            span: pos..after,
            citation: Citation {
                mode,
                items: vec![item],
            },
        })
    }
}

/// Scan Markdown text with verbatim prefixes and suffixes.
pub fn scan_markdown<T: TermSource + ?Sized>(text: &str, terms: &T) -> Vec<RecognizedCitation> {
    CitationScanner::new(Source::markdown(text), terms, &Verbatim).scan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quarto_cite_locale::TermTable;

    fn en_us_table() -> TermTable {
        quarto_cite_locale::builtin::en_us_table().unwrap()
    }

    fn spans(text: &str) -> Vec<(&str, CitationMode)> {
        scan_markdown(text, &en_us_table())
            .into_iter()
            .map(|r| (&text[r.span], r.citation.mode))
            .collect()
    }

    #[test]
    fn test_bracketed_citation() {
        let text = "As shown [see @doe99]. Also [@doe99{p. 4}; -@roe10].";
        assert_eq!(
            spans(text),
            vec![
                ("@doe99", CitationMode::AuthorInText),
                ("[@doe99{p. 4}; -@roe10]", CitationMode::Normal),
            ]
        );
    }

    #[test]
    fn test_bracketed_items() {
        let found = scan_markdown("[@a{chap. 2}; -@b{see}{pp. 3-5, and more}]", &en_us_table());
        assert_eq!(found.len(), 1);
        let items = &found[0].citation.items;
        assert_eq!(items[0].label.as_deref(), Some("chapter"));
        assert_eq!(items[0].locator.as_deref(), Some("2"));
        assert!(items[1].suppress_author);
        assert_eq!(items[1].prefix.as_deref(), Some("see"));
        assert_eq!(items[1].locator.as_deref(), Some("3–5"));
        assert_eq!(items[1].suffix.as_deref(), Some(", and more"));
    }

    #[test]
    fn test_in_text_citations() {
        let text = "@doe99 argues, as -@roe10 notes, that";
        assert_eq!(
            spans(text),
            vec![
                ("@doe99", CitationMode::AuthorInText),
                ("-@roe10", CitationMode::SuppressAuthor),
            ]
        );
    }

    #[test]
    fn test_in_text_with_locator() {
        let found = scan_markdown("@doe99{p. 33} says", &en_us_table());
        assert_eq!(found[0].span, 0..13);
        assert_eq!(found[0].citation.items[0].locator.as_deref(), Some("33"));
    }

    #[test]
    fn test_email_is_not_a_citation() {
        assert_eq!(spans("mail me@example.com now"), vec![]);
    }

    #[test]
    fn test_brackets_must_be_fully_consumed() {
        // Trailing text inside the brackets makes the whole thing plain text,
        // and the bare key after `[` is not an in-text citation either.
        assert_eq!(spans("[@doe99 and others]"), vec![]);
        assert_eq!(spans("[@doe99; ]"), vec![("[@doe99; ]", CitationMode::Normal)]);
    }

    #[test]
    fn test_links_and_code_are_skipped() {
        assert_eq!(spans("[@doe99](https://example.com)"), vec![]);
        assert_eq!(spans("`[@doe99]` and `@roe10`"), vec![]);
        assert_eq!(spans(r"\[@doe99]"), vec![]);
        assert_eq!(spans(r"\[ @doe99]"), vec![("@doe99", CitationMode::AuthorInText)]);
    }

    #[test]
    fn test_unclosed_bracket() {
        assert_eq!(spans("[@doe99 and"), vec![]);
    }

    #[test]
    fn test_in_text_can_be_disabled() {
        let terms = TermTable::new();
        let scanner = CitationScanner::new(Source::markdown("@a and [@b]"), &terms, &Verbatim)
            .with_options(ScanOptions { in_text: false });
        let found = scanner.scan();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].citation.mode, CitationMode::Normal);
    }

    #[test]
    fn test_plain_source_has_no_links() {
        let terms = TermTable::new();
        let found = CitationScanner::new(Source::plain("[@a](x)"), &terms, &Verbatim).scan();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, 0..4);
    }

    #[test]
    fn test_csl_normal() {
        let citation = Citation {
            mode: CitationMode::Normal,
            items: vec![CiteItem::new("a"), CiteItem::new("b")],
        };
        let clusters = citation.to_csl();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].citation_items.len(), 2);
        assert_eq!(clusters[0].properties, CitationProperties::default());
    }

    #[test]
    fn test_csl_author_in_text() {
        let citation = Citation {
            mode: CitationMode::AuthorInText,
            items: vec![CiteItem {
                prefix: Some("see".to_string()),
                locator: Some("4".to_string()),
                label: Some("page".to_string()),
                suffix: Some("and more".to_string()),
                ..CiteItem::new("doe99")
            }],
        };
        let clusters = citation.to_csl();
        assert_eq!(clusters.len(), 2);

        let author = &clusters[0].citation_items[0];
        assert_eq!(author.prefix.as_deref(), Some("see"));
        assert_eq!(author.locator, None);
        assert_eq!(author.suffix, None);
        assert!(!author.suppress_author);
        assert_eq!(clusters[0].properties.mode.as_deref(), Some("author-only"));
        assert_eq!(clusters[0].properties.is_part_of_in_text_citation, Some(true));

        let rest = &clusters[1].citation_items[0];
        assert_eq!(rest.prefix, None);
        assert_eq!(rest.locator.as_deref(), Some("4"));
        assert!(rest.suppress_author);
    }

    #[test]
    fn test_csl_json_shape() {
        let citation = Citation {
            mode: CitationMode::AuthorInText,
            items: vec![CiteItem::new("doe99")],
        };
        insta::assert_snapshot!(
            serde_json::to_string(&citation.to_csl()).unwrap(),
            @r#"[{"citationItems":[{"id":"doe99","suppress-author":false}],"properties":{"noteIndex":0,"mode":"author-only","isPartOfInTextCitation":true}},{"citationItems":[{"id":"doe99","suppress-author":true}],"properties":{"noteIndex":0}}]"#
        );
    }

    #[test]
    fn test_remap_ids() {
        let mut citation = Citation {
            mode: CitationMode::Normal,
            items: vec![CiteItem::new("doe"), CiteItem::new("roe")],
        };
        let ids = HashMap::from([("doe".to_string(), "doe1999book".to_string())]);
        citation.remap_ids(&ids);
        let keys: Vec<&str> = citation.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["doe1999book", "roe"]);
    }

    #[test]
    fn test_clusters_in_document_order() {
        let found = scan_markdown("@a says [@b; @c] and [-@d]", &TermTable::new());
        let clusters = csl_clusters(&found);
        let ids: Vec<Vec<&str>> = clusters
            .iter()
            .map(|c| c.citation_items.iter().map(|i| i.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["a"], vec!["a"], vec!["b", "c"], vec!["d"]]);
    }
}
