/*
 * source.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Text being scanned plus the host's notion of an indivisible unit.
//!
//! The recognizers in this crate never look inside something the host
//! considers atomic: an escaped `\]`, a code span containing `}`, a nested
//! link. Hosts describe those units through [`TokenSkipper`].

use std::fmt;

/// Tells the recognizers how far one indivisible unit of input extends.
pub trait TokenSkipper {
    /// Position just past the unit starting at `pos`.
    ///
    /// Called with `pos < end` on a char boundary. The result should be a
    /// char boundary in `pos + 1 ..= end`; [`Source::skip_unit`] enforces
    /// forward progress if it is not.
    fn skip_token(&self, text: &str, pos: usize, end: usize) -> usize;
}

/// Every character is its own unit. No escapes, no code spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharSkipper;

impl TokenSkipper for CharSkipper {
    fn skip_token(&self, text: &str, pos: usize, _end: usize) -> usize {
        next_boundary(text, pos)
    }
}

/// Inline Markdown units: backslash escapes, code spans, autolinks and raw
/// HTML tags, inline links and images.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSkipper;

impl TokenSkipper for MarkdownSkipper {
    fn skip_token(&self, text: &str, pos: usize, end: usize) -> usize {
        let bytes = text.as_bytes();
        match bytes[pos] {
            b'[' => inline_link_end(text, pos, end).unwrap_or(pos + 1),
            b'!' if pos + 1 < end && bytes[pos + 1] == b'[' => {
                inline_link_end(text, pos + 1, end).unwrap_or(pos + 1)
            }
            _ => skip_simple(text, pos, end),
        }
    }
}

/// Units that contain no brackets of their own.
fn skip_simple(text: &str, pos: usize, end: usize) -> usize {
    let bytes = text.as_bytes();
    match bytes[pos] {
        b'\\' if pos + 1 < end && bytes[pos + 1].is_ascii_punctuation() => pos + 2,
        b'`' => code_span_end(bytes, pos, end),
        b'<' => angle_end(text, pos, end).unwrap_or(pos + 1),
        _ => next_boundary(text, pos),
    }
}

/// End of the code span opened by the backtick run at `pos`. Without a
/// closing run of the same length the opening run is literal text.
fn code_span_end(bytes: &[u8], pos: usize, end: usize) -> usize {
    let run_end = backtick_run_end(bytes, pos, end);
    let run = run_end - pos;

    let mut i = run_end;
    while i < end {
        if bytes[i] == b'`' {
            let close = backtick_run_end(bytes, i, end);
            if close - i == run {
                return close;
            }
            i = close;
        } else {
            i += 1;
        }
    }
    run_end
}

fn backtick_run_end(bytes: &[u8], pos: usize, end: usize) -> usize {
    let mut i = pos;
    while i < end && bytes[i] == b'`' {
        i += 1;
    }
    i
}

/// `<https://example.com>`, `<me@example.com>`, `<span class="x">`, `</span>`.
fn angle_end(text: &str, pos: usize, end: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let offset = bytes[pos + 1..end]
        .iter()
        .position(|&b| matches!(b, b'>' | b'<' | b'\n'))?;
    let gt = pos + 1 + offset;
    if bytes[gt] != b'>' {
        return None;
    }

    let content = &text[pos + 1..gt];
    let autolink = !content.is_empty()
        && !content.contains(char::is_whitespace)
        && (content.contains(':') || content.contains('@'));
    let tag = content
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');

    (autolink || tag).then_some(gt + 1)
}

/// End of `[text](destination)` starting at `pos`, if it is one.
fn inline_link_end(text: &str, pos: usize, end: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let label_end = balanced_end(text, pos, end, b'[', b']')?;
    let paren = label_end + 1;
    if paren >= end || bytes[paren] != b'(' {
        return None;
    }
    balanced_end(text, paren, end, b'(', b')').map(|close| close + 1)
}

/// Position of the byte closing the `open` at `pos`, counting nesting and
/// skipping escapes, code spans and angle-bracket units.
fn balanced_end(text: &str, pos: usize, end: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = pos;
    while i < end {
        if bytes[i] == open {
            depth += 1;
        } else if bytes[i] == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i = skip_simple(text, i, end);
    }
    None
}

fn next_boundary(text: &str, pos: usize) -> usize {
    pos + text[pos..].chars().next().map_or(1, char::len_utf8)
}

/// Input text paired with the skipper that defines its units.
///
/// All positions are byte offsets into [`text`](Self::text).
#[derive(Clone, Copy)]
pub struct Source<'a> {
    text: &'a str,
    skipper: &'a dyn TokenSkipper,
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("text", &self.text).finish_non_exhaustive()
    }
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str, skipper: &'a dyn TokenSkipper) -> Self {
        Self { text, skipper }
    }

    /// Text where every character stands alone.
    pub fn plain(text: &'a str) -> Self {
        Self::new(text, &CharSkipper)
    }

    /// Text with inline Markdown units.
    pub fn markdown(text: &'a str) -> Self {
        Self::new(text, &MarkdownSkipper)
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The character starting at `pos`, if `pos` is a char boundary inside
    /// the text.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..)?.chars().next()
    }

    /// The character ending at `pos`.
    pub fn char_before(&self, pos: usize) -> Option<char> {
        self.text.get(..pos)?.chars().next_back()
    }

    pub fn starts_with_at(&self, pos: usize, pattern: &str) -> bool {
        self.text.get(pos..).is_some_and(|rest| rest.starts_with(pattern))
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// Position after the unit at `pos`, never past `end` and always at
    /// least one character forward.
    pub fn skip_unit(&self, pos: usize, end: usize) -> usize {
        let Some(c) = self.char_at(pos) else {
            return end.max(pos + 1);
        };
        let min = pos + c.len_utf8();
        if min >= end {
            return min;
        }
        self.skipper.skip_token(self.text, pos, end).clamp(min, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(text: &str, pos: usize) -> &str {
        let source = Source::markdown(text);
        &text[pos..source.skip_unit(pos, text.len())]
    }

    #[test]
    fn test_plain_units_are_chars() {
        let source = Source::plain("a§b");
        assert_eq!(source.skip_unit(0, 4), 1);
        assert_eq!(source.skip_unit(1, 4), 3);
        assert_eq!(source.skip_unit(3, 4), 4);
    }

    #[test]
    fn test_escape() {
        assert_eq!(unit(r"\]x", 0), r"\]");
        assert_eq!(unit(r"\ax", 0), r"\");
    }

    #[test]
    fn test_code_span() {
        assert_eq!(unit("`a}b` c", 0), "`a}b`");
        assert_eq!(unit("``a`b`` c", 0), "``a`b``");
        // Unclosed: the opening run is literal.
        assert_eq!(unit("``a", 0), "``");
    }

    #[test]
    fn test_autolink_and_tags() {
        assert_eq!(unit("<https://x.org/[a]> b", 0), "<https://x.org/[a]>");
        assert_eq!(unit("<me@x.org>", 0), "<me@x.org>");
        assert_eq!(unit("<span class=\"x\">y", 0), "<span class=\"x\">");
        assert_eq!(unit("< 3 >", 0), "<");
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(unit("[see @a](http://x) b", 0), "[see @a](http://x)");
        assert_eq!(unit("![img [x]](a(b)c) d", 0), "![img [x]](a(b)c)");
        assert_eq!(unit("[@a] (http://x)", 0), "[");
        assert_eq!(unit("[unclosed](x", 0), "[");
    }

    #[test]
    fn test_link_respects_escapes() {
        assert_eq!(unit(r"[a\]b](c)", 0), r"[a\]b](c)");
    }

    #[test]
    fn test_code_span_must_close_before_end() {
        let source = Source::markdown("`a}b` c");
        assert_eq!(source.skip_unit(0, 3), 1);
        assert_eq!(source.skip_unit(0, 7), 5);
    }

    struct Wild(usize);

    impl TokenSkipper for Wild {
        fn skip_token(&self, _text: &str, _pos: usize, _end: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn test_skip_unit_is_bounded() {
        let far = Wild(100);
        assert_eq!(Source::new("abcdef", &far).skip_unit(1, 4), 4);
        let stuck = Wild(0);
        assert_eq!(Source::new("abcdef", &stuck).skip_unit(1, 4), 2);
    }

    #[test]
    fn test_char_before() {
        let source = Source::plain("x§@");
        assert_eq!(source.char_before(3), Some('§'));
        assert_eq!(source.char_before(0), None);
        assert_eq!(source.char_before(2), None);
    }
}
