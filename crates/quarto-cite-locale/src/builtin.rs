/*
 * builtin.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Locales compiled into the binary.
//!
//! The CSL locale files under `locales/` are embedded at build time and read
//! with the same parser as files on disk, so `{p. 4}` resolves without any
//! locale directory configured.

use crate::error::{LocaleError, Result};
use crate::terms::TermTable;
use crate::xml::{LocaleDocument, TermSelection, parse_locale_xml};
use rust_embed::Embed;

/// Embedded locale files from the locales/ directory.
#[derive(Embed)]
#[folder = "locales/"]
#[include = "*.xml"]
struct LocaleFiles;

/// `locales-en-US.xml` → `en-US`
fn locale_id(file_name: &str) -> Option<&str> {
    file_name.strip_prefix("locales-")?.strip_suffix(".xml")
}

/// Ids of the embedded locales, sorted.
pub fn builtin_locales() -> Vec<String> {
    let mut ids: Vec<String> = LocaleFiles::iter()
        .filter_map(|name| locale_id(&name).map(str::to_string))
        .collect();
    ids.sort();
    ids
}

/// The embedded file serving `id`, compared case-insensitively. A bare
/// language ("en") is served by the first regional file ("en-US").
fn file_for(id: &str) -> Option<String> {
    let ids = builtin_locales();
    let found = ids.iter().find(|l| l.eq_ignore_ascii_case(id)).or_else(|| {
        if id.contains('-') {
            return None;
        }
        ids.iter().find(|l| {
            l.split_once('-')
                .is_some_and(|(lang, _)| lang.eq_ignore_ascii_case(id))
        })
    })?;
    Some(format!("locales-{}.xml", found))
}

/// Whether an embedded locale serves `id`.
pub fn is_builtin(id: &str) -> bool {
    file_for(id).is_some()
}

/// Parse the embedded locale serving `id`, if there is one.
pub fn builtin_document(id: &str) -> Result<Option<LocaleDocument>> {
    let Some(file) = file_for(id).and_then(|name| LocaleFiles::get(&name)) else {
        return Ok(None);
    };
    let xml = std::str::from_utf8(file.data.as_ref()).map_err(|e| LocaleError::XmlSyntax {
        message: format!("Invalid UTF-8: {}", e),
        position: e.valid_up_to() as u64,
    })?;
    parse_locale_xml(xml).map(Some)
}

/// The built-in en-US locator table.
pub fn en_us_table() -> Result<TermTable> {
    builtin_document("en-US")?
        .map(|doc| doc.term_table(TermSelection::Locators))
        .ok_or_else(|| LocaleError::UnknownLocale {
            id: "en-US".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_common_abbreviations() {
        let table = en_us_table().unwrap();
        assert_eq!(table.get("p."), Some("page"));
        assert_eq!(table.get("pp."), Some("page"));
        assert_eq!(table.get("chap."), Some("chapter"));
        assert_eq!(table.get("vols."), Some("volume"));
        assert_eq!(table.get("§§"), Some("section"));
        assert_eq!(table.get("sub verbo"), Some("sub-verbo"));
        assert_eq!(table.get("and"), None);
    }

    #[test]
    fn test_shared_form_goes_to_first_declaration() {
        assert_eq!(en_us_table().unwrap().get("v."), Some("verse"));
    }

    #[test]
    fn test_builtin_ids() {
        assert_eq!(builtin_locales(), vec!["en-US".to_string()]);
        assert!(is_builtin("en-us"));
        assert!(is_builtin("EN"));
        assert!(!is_builtin("en-GB"));
        assert!(!is_builtin("de-DE"));
    }

    #[test]
    fn test_embedded_document() {
        let doc = builtin_document("en").unwrap().unwrap();
        assert_eq!(doc.lang.as_deref(), Some("en-US"));
        assert!(builtin_document("de-DE").unwrap().is_none());
    }

    #[test]
    fn test_all_selection_keeps_general_terms() {
        let doc = builtin_document("en-US").unwrap().unwrap();
        let locators = doc.term_table(TermSelection::Locators);
        let all = doc.term_table(TermSelection::All);

        assert!(all.len() > locators.len());
        assert_eq!(all.get("and"), Some("and"));
        assert_eq!(all.get("et al."), Some("et-al"));
        assert_eq!(all.get("pp."), Some("page"));
    }
}
