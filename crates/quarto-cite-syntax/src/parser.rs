/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Recognizers for keys, annotations, items and item lists.
//!
//! Each recognizer takes a [`Source`] and a half-open range, and on success
//! returns what it read together with the position just past it. On failure
//! nothing is consumed.
//!
//! ```text
//! item       = [ "-" ] "@" key [ "{" prefix-or-suffix "}" [ "{" suffix "}" ] ]
//! item-list  = item { ";" { " " } item } [ ";" { " " } ]
//! ```
//!
//! With two brace groups the first is the prefix and the second the suffix;
//! with one it is the suffix. Locators are read from the start of the suffix.

use crate::context::{RenderInline, TermSource};
use crate::delimiter::match_delimited;
use crate::item::{CitationKey, CiteItem, is_key_char, is_key_start};
use crate::locator::resolve;
use crate::source::Source;

pub const CITATION_SIGIL: char = '@';
pub const SUPPRESS_AUTHOR_MARKER: char = '-';
pub const ITEM_SEPARATOR: char = ';';
const ANNOTATION_OPEN: char = '{';
const ANNOTATION_CLOSE: char = '}';

/// Raw annotation groups after a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Position after the last brace group consumed (or the start position
    /// if there was none).
    pub end: usize,
}

/// Read `@key` at `start`.
pub fn parse_key(source: &Source<'_>, start: usize, end: usize) -> Option<(CitationKey, usize)> {
    let end = end.min(source.len());
    if source.char_at(start) != Some(CITATION_SIGIL) {
        return None;
    }

    let key_start = start + CITATION_SIGIL.len_utf8();
    if key_start >= end || !source.char_at(key_start).is_some_and(is_key_start) {
        return None;
    }

    let mut pos = key_start;
    while pos < end {
        match source.char_at(pos) {
            Some(c) if is_key_char(c) => pos += c.len_utf8(),
            _ => break,
        }
    }

    Some((CitationKey::new(source.slice(key_start, pos)), pos))
}

/// Read zero, one or two `{...}` groups at `start`.
///
/// An unterminated second group is ignored, leaving the first group as the
/// suffix. An unterminated first group means no annotation at all.
/// Only the prefix goes through `render`; an empty prefix is dropped. The
/// suffix is returned raw for the locator resolver.
pub fn parse_prefix_suffix<R: RenderInline + ?Sized>(
    source: &Source<'_>,
    start: usize,
    end: usize,
    render: &R,
) -> Annotation {
    let Some(first_close) =
        match_delimited(source, start, end, ANNOTATION_OPEN, ANNOTATION_CLOSE, false)
    else {
        return Annotation {
            end: start,
            ..Default::default()
        };
    };
    let first = source.slice(start + ANNOTATION_OPEN.len_utf8(), first_close);
    let after_first = first_close + ANNOTATION_CLOSE.len_utf8();

    match match_delimited(source, after_first, end, ANNOTATION_OPEN, ANNOTATION_CLOSE, false) {
        Some(second_close) => {
            let second = source.slice(after_first + ANNOTATION_OPEN.len_utf8(), second_close);
            Annotation {
                prefix: (!first.is_empty()).then(|| render.render_inline(first)),
                suffix: Some(second.to_string()),
                end: second_close + ANNOTATION_CLOSE.len_utf8(),
            }
        }
        None => Annotation {
            prefix: None,
            suffix: Some(first.to_string()),
            end: after_first,
        },
    }
}

/// Read one citation item at `start`.
///
/// The suffix is run through the locator resolver with the terms `terms`
/// supplies for this key; text the resolver leaves over stays in the suffix
/// as written.
pub fn parse_item<T, R>(
    source: &Source<'_>,
    start: usize,
    end: usize,
    terms: &T,
    render: &R,
) -> Option<(CiteItem, usize)>
where
    T: TermSource + ?Sized,
    R: RenderInline + ?Sized,
{
    let suppress_author = source.char_at(start) == Some(SUPPRESS_AUTHOR_MARKER);
    let key_start = if suppress_author {
        start + SUPPRESS_AUTHOR_MARKER.len_utf8()
    } else {
        start
    };

    let (id, after_key) = parse_key(source, key_start, end)?;

    let annotation = parse_prefix_suffix(source, after_key, end, render);
    let mut item = CiteItem {
        prefix: annotation.prefix,
        suppress_author,
        ..CiteItem::new(id)
    };

    if let Some(suffix) = annotation.suffix {
        let resolved = resolve(&suffix, terms.terms_for(&item.id));
        item.label = resolved.label;
        item.locator = resolved.locator;
        item.suffix = resolved.suffix;
    }

    tracing::trace!(key = %item.id, locator = ?item.locator, "Parsed citation item");
    Some((item, annotation.end))
}

/// Read `item (";" item)*` from `start`, stopping at `list_end`.
///
/// A separator must follow its item directly and may be followed by plain
/// spaces. A trailing separator is consumed. Returns `None` if not even one
/// item can be read.
pub fn parse_item_list<T, R>(
    source: &Source<'_>,
    start: usize,
    end: usize,
    list_end: usize,
    terms: &T,
    render: &R,
) -> Option<(Vec<CiteItem>, usize)>
where
    T: TermSource + ?Sized,
    R: RenderInline + ?Sized,
{
    let limit = list_end.min(end);
    let mut items = Vec::new();
    let mut pos = start;

    while pos < limit {
        let Some((item, after)) = parse_item(source, pos, limit, terms, render) else {
            break;
        };
        items.push(item);
        pos = after;

        if pos >= limit || source.char_at(pos) != Some(ITEM_SEPARATOR) {
            break;
        }
        pos = skip_spaces(source, pos + ITEM_SEPARATOR.len_utf8(), limit);
    }

    (!items.is_empty()).then_some((items, pos))
}

fn skip_spaces(source: &Source<'_>, mut pos: usize, end: usize) -> usize {
    while pos < end && source.char_at(pos) == Some(' ') {
        pos += 1;
    }
    pos
}
