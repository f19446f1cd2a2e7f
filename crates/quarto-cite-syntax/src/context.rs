/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Host-provided services: inline rendering and locator vocabulary.

use quarto_cite_locale::TermTable;
use std::collections::HashMap;
use std::sync::Arc;

/// Renders a raw citation prefix into the host's output form.
///
/// Any `Fn(&str) -> String` works, so a host can pass its inline renderer
/// as a closure.
pub trait RenderInline {
    fn render_inline(&self, text: &str) -> String;
}

impl<F: Fn(&str) -> String> RenderInline for F {
    fn render_inline(&self, text: &str) -> String {
        self(text)
    }
}

/// Keeps prefix text as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl RenderInline for Verbatim {
    fn render_inline(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Supplies the locator vocabulary used for a given citation key.
///
/// Most documents use one table for every key; [`KeyedTerms`] lets a host
/// pick the table by the cited work's language.
pub trait TermSource {
    fn terms_for(&self, key: &str) -> &TermTable;
}

impl TermSource for TermTable {
    fn terms_for(&self, _key: &str) -> &TermTable {
        self
    }
}

impl TermSource for Arc<TermTable> {
    fn terms_for(&self, _key: &str) -> &TermTable {
        self.as_ref()
    }
}

/// Per-key term tables with a default.
#[derive(Debug, Clone)]
pub struct KeyedTerms {
    default: Arc<TermTable>,
    by_key: HashMap<String, Arc<TermTable>>,
}

impl KeyedTerms {
    pub fn new(default: Arc<TermTable>) -> Self {
        Self {
            default,
            by_key: HashMap::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>, terms: Arc<TermTable>) -> Self {
        self.insert(key, terms);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, terms: Arc<TermTable>) {
        self.by_key.insert(key.into(), terms);
    }
}

impl TermSource for KeyedTerms {
    fn terms_for(&self, key: &str) -> &TermTable {
        self.by_key.get(key).unwrap_or(&self.default).as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_renderer() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(upper.render_inline("see"), "SEE");
        assert_eq!(Verbatim.render_inline("*see*"), "*see*");
    }

    #[test]
    fn test_keyed_terms() {
        let en: TermTable = [("p.", "page")].into_iter().collect();
        let de: TermTable = [("S.", "page")].into_iter().collect();
        let terms = KeyedTerms::new(Arc::new(en)).with_key("mueller", Arc::new(de));

        assert_eq!(terms.terms_for("mueller").get("S."), Some("page"));
        assert_eq!(terms.terms_for("doe").get("S."), None);
        assert_eq!(terms.terms_for("doe").get("p."), Some("page"));
    }
}
