/*
 * terms.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Surface form → label lookup with longest-prefix matching.

use std::collections::BTreeMap;

/// A read-only map from term surface forms (`"pp."`, `"sub verbo"`) to
/// canonical locator labels (`"page"`, `"sub-verbo"`).
///
/// Surface forms are stored in a character trie so that
/// [`longest_prefix`](Self::longest_prefix) finds the longest matching form
/// in one left-to-right pass over the input.
#[derive(Debug, Clone)]
pub struct TermTable {
    /// Trie nodes; index 0 is the root and never carries a label.
    nodes: Vec<Node>,
    len: usize,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<char, usize>,
    label: Option<String>,
}

/// A term found at the start of some text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermMatch<'a> {
    /// Canonical label of the matched term.
    pub label: &'a str,
    /// Byte length of the matched surface form.
    pub len: usize,
}

impl Default for TermTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TermTable {
    /// Create an empty table. An empty table never matches anything.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            len: 0,
        }
    }

    /// Add a surface form for `label`.
    ///
    /// The first label registered for a surface form wins; later ones are
    /// ignored and `false` is returned. Empty surface forms are ignored too.
    pub fn insert(&mut self, surface: &str, label: &str) -> bool {
        if surface.is_empty() {
            return false;
        }

        let mut idx = 0;
        for c in surface.chars() {
            idx = match self.nodes[idx].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[idx].children.insert(c, next);
                    next
                }
            };
        }

        let node = &mut self.nodes[idx];
        if node.label.is_some() {
            return false;
        }
        node.label = Some(label.to_string());
        self.len += 1;
        true
    }

    /// Exact lookup of a surface form.
    pub fn get(&self, surface: &str) -> Option<&str> {
        let mut idx = 0;
        for c in surface.chars() {
            idx = *self.nodes[idx].children.get(&c)?;
        }
        self.nodes[idx].label.as_deref()
    }

    /// Find the longest surface form that is a prefix of `text`.
    ///
    /// Shorter forms that are prefixes of a longer match are superseded, so
    /// with both `"p."` and `"pp."` registered, `"pp. 4"` matches `"pp."`.
    pub fn longest_prefix(&self, text: &str) -> Option<TermMatch<'_>> {
        let mut idx = 0;
        let mut best = None;

        for (offset, c) in text.char_indices() {
            match self.nodes[idx].children.get(&c) {
                Some(&next) => idx = next,
                None => break,
            }
            if let Some(label) = &self.nodes[idx].label {
                best = Some(TermMatch {
                    label,
                    len: offset + c.len_utf8(),
                });
            }
        }

        best
    }

    /// Number of surface forms in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All `(surface form, label)` pairs, sorted by surface form.
    pub fn entries(&self) -> Vec<(String, &str)> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = String::new();
        self.collect(0, &mut prefix, &mut out);
        out
    }

    fn collect<'a>(&'a self, idx: usize, prefix: &mut String, out: &mut Vec<(String, &'a str)>) {
        let node = &self.nodes[idx];
        if let Some(label) = &node.label {
            out.push((prefix.clone(), label.as_str()));
        }
        for (&c, &child) in &node.children {
            prefix.push(c);
            self.collect(child, prefix, out);
            prefix.pop();
        }
    }
}

impl<S: AsRef<str>, L: AsRef<str>> Extend<(S, L)> for TermTable {
    fn extend<I: IntoIterator<Item = (S, L)>>(&mut self, iter: I) {
        for (surface, label) in iter {
            self.insert(surface.as_ref(), label.as_ref());
        }
    }
}

impl<S: AsRef<str>, L: AsRef<str>> FromIterator<(S, L)> for TermTable {
    fn from_iter<I: IntoIterator<Item = (S, L)>>(iter: I) -> Self {
        let mut table = TermTable::new();
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_terms() -> TermTable {
        [
            ("page", "page"),
            ("pages", "page"),
            ("p.", "page"),
            ("pp.", "page"),
            ("sub verbo", "sub-verbo"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_exact_lookup() {
        let terms = page_terms();
        assert_eq!(terms.get("pp."), Some("page"));
        assert_eq!(terms.get("sub verbo"), Some("sub-verbo"));
        assert_eq!(terms.get("sub"), None);
        assert_eq!(terms.get(""), None);
        assert_eq!(terms.len(), 5);
    }

    #[test]
    fn test_longest_match_wins() {
        let terms = page_terms();
        let m = terms.longest_prefix("pages 4-8").unwrap();
        assert_eq!(m, TermMatch { label: "page", len: 5 });

        let m = terms.longest_prefix("page 4").unwrap();
        assert_eq!(m.len, 4);
    }

    #[test]
    fn test_match_survives_dead_end() {
        // "p." matches, then "p.x" leads nowhere: the shorter match stands.
        let terms = page_terms();
        let m = terms.longest_prefix("p.xii").unwrap();
        assert_eq!(m.len, 2);
    }

    #[test]
    fn test_no_match() {
        let terms = page_terms();
        assert_eq!(terms.longest_prefix("vii"), None);
        assert_eq!(terms.longest_prefix(""), None);
        assert_eq!(TermTable::new().longest_prefix("page"), None);
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut terms = TermTable::new();
        assert!(terms.insert("v.", "verse"));
        assert!(!terms.insert("v.", "version"));
        assert_eq!(terms.get("v."), Some("verse"));
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn test_multibyte_surface_forms() {
        let terms: TermTable = [("§", "section"), ("§§", "section")].into_iter().collect();
        let m = terms.longest_prefix("§§ 3-4").unwrap();
        assert_eq!(m.len, "§§".len());
    }

    #[test]
    fn test_entries_sorted() {
        let terms = page_terms();
        let surfaces: Vec<String> = terms.entries().into_iter().map(|(s, _)| s).collect();
        assert_eq!(surfaces, vec!["p.", "page", "pages", "pp.", "sub verbo"]);
    }
}
