/*
 * delimiter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Balanced delimiter matching.

use crate::source::Source;

/// Find the delimiter closing the `open` at `start`.
///
/// Scans unit by unit up to `end`, counting nested `open`/`close` pairs.
/// A delimiter only counts when it stands alone as a unit, so one inside a
/// code span or after a backslash is invisible. With `disallow_nested`,
/// any nested `open` makes the match fail.
///
/// Returns the position of the closing delimiter, or `None` if `start` is
/// not `open` or the delimiter is never closed before `end`.
pub fn match_delimited(
    source: &Source<'_>,
    start: usize,
    end: usize,
    open: char,
    close: char,
    disallow_nested: bool,
) -> Option<usize> {
    if source.char_at(start) != Some(open) {
        return None;
    }

    let end = end.min(source.len());
    let mut depth = 1usize;
    let mut pos = start + open.len_utf8();

    while pos < end {
        let c = source.char_at(pos)?;
        let next = source.skip_unit(pos, end);
        let alone = next == pos + c.len_utf8();

        if alone && c == close {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
        } else if alone && c == open {
            if disallow_nested {
                return None;
            }
            depth += 1;
        }

        pos = next;
    }

    None
}
