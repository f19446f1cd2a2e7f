/*
 * locator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Splitting suffix text into a locator label, a locator, and leftover text.
//!
//! `pp. 33-35, 38` becomes label `page`, locator `33–35, 38`. A locator is a
//! list of items joined by `,`, `;` or `&`, where an item is a numeral
//! (digits, lowercase roman, or uppercase roman), optionally followed by a
//! range to another numeral. Ranges are written with an en dash and
//! separators are followed by exactly one space.

use quarto_cite_locale::TermTable;
use serde::Serialize;

/// Range symbols, longest first so `--` wins over `-`.
const RANGE_SYMBOLS: &[&str] = &["--", EN_DASH, "-", "/"];

const EN_DASH: &str = "\u{2013}";

const LIST_SEPARATORS: &[char] = &[',', ';', '&'];

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedLocator {
    /// Canonical label of a leading locator term (`"page"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The normalized locator (`"33–35, 38"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    /// Text after the locator that is not part of it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

/// Resolve a leading locator in `text` using `terms` for labels.
///
/// If no locator item can be read after the (optional) label, `locator` is
/// `None` and the whole remainder becomes `suffix`.
pub fn resolve(text: &str, terms: &TermTable) -> ResolvedLocator {
    let text = text.trim_start();

    let (label, rest) = match terms.longest_prefix(text) {
        Some(m) => (Some(m.label.to_string()), &text[m.len..]),
        None => (None, text),
    };
    let rest = rest.trim();

    let (locator, leftover) = match take_list(rest) {
        Some((locator, leftover)) => (Some(locator), leftover),
        None => (None, rest),
    };

    tracing::trace!(?label, ?locator, leftover, "Resolved locator");

    ResolvedLocator {
        label,
        locator,
        suffix: (!leftover.is_empty()).then(|| leftover.to_string()),
    }
}

fn take_list(text: &str) -> Option<(String, &str)> {
    let (first, mut rest) = take_item(text)?;
    let mut out = first;

    loop {
        // Checkpoint: a separator only belongs to the list if an item
        // follows it.
        let Some(sep) = rest.chars().next().filter(|c| LIST_SEPARATORS.contains(c)) else {
            break;
        };
        let after = rest[sep.len_utf8()..].trim_start();
        let Some((item, next)) = take_item(after) else {
            break;
        };

        if sep == '&' {
            out.push_str(" &");
        } else {
            out.push(sep);
        }
        out.push(' ');
        out.push_str(&item);
        rest = next;
    }

    Some((out, rest))
}

/// One numeral, optionally followed by a range tail. Trailing whitespace
/// is consumed.
fn take_item(text: &str) -> Option<(String, &str)> {
    let len = numeral_len(text);
    if len == 0 {
        return None;
    }

    let mut out = text[..len].to_string();
    let mut rest = text[len..].trim_start();

    if let Some((end, after)) = range_tail(rest) {
        out.push_str(EN_DASH);
        out.push_str(end);
        rest = after;
    }

    Some((out, rest.trim_start()))
}

/// `-5`, `--xii`, `/IV`: a range symbol directly followed by the numeral
/// that ends the range. Returns that numeral and the text after it.
fn range_tail(text: &str) -> Option<(&str, &str)> {
    let symbol = RANGE_SYMBOLS.iter().find(|s| text.starts_with(**s))?;
    let after = &text[symbol.len()..];
    let len = numeral_len(after);
    if len == 0 {
        return None;
    }
    Some((&after[..len], &after[len..]))
}

/// Byte length of the leading numeral: a run of digits, lowercase roman
/// letters, or uppercase roman letters, whichever class the first character
/// belongs to.
fn numeral_len(text: &str) -> usize {
    let Some(first) = text.chars().next() else {
        return 0;
    };
    let class: fn(char) -> bool = if first.is_ascii_digit() {
        |c| c.is_ascii_digit()
    } else if is_lower_roman(first) {
        is_lower_roman
    } else if is_upper_roman(first) {
        is_upper_roman
    } else {
        return 0;
    };
    text.chars().take_while(|&c| class(c)).count()
}

fn is_lower_roman(c: char) -> bool {
    matches!(c, 'i' | 'v' | 'x' | 'l' | 'c' | 'd' | 'm')
}

fn is_upper_roman(c: char) -> bool {
    matches!(c, 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M')
}
