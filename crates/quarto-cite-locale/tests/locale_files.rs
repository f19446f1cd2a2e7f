/*
 * locale_files.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tests for loading locale files from search directories.

use quarto_cite_locale::{LocaleError, LocaleRegistry, TermSelection, parse_locale_xml};
use std::fs;
use std::path::PathBuf;

/// Get the test-data directory path.
fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data")
}

#[test]
fn test_parse_german_locale() {
    let content = fs::read_to_string(test_data_dir().join("locales-de-DE.xml"))
        .expect("Failed to read German locale");
    let doc = parse_locale_xml(&content).expect("Failed to parse German locale");

    assert_eq!(doc.lang.as_deref(), Some("de-DE"));
    let table = doc.term_table(TermSelection::Locators);
    assert_eq!(table.get("S."), Some("page"));
    assert_eq!(table.get("Bände"), Some("volume"));
    assert_eq!(table.get("und"), None);
}

#[test]
fn test_registry_loads_from_search_dir() {
    let registry =
        LocaleRegistry::new("en-US", TermSelection::Locators).with_search_dir(test_data_dir());

    let terms = registry.terms("de-DE").unwrap();
    let m = terms.longest_prefix("Seiten 4-6").unwrap();
    assert_eq!((m.label, m.len), ("page", 6));
}

#[test]
fn test_base_language_finds_regional_file() {
    let registry =
        LocaleRegistry::new("en-US", TermSelection::Locators).with_search_dir(test_data_dir());

    let terms = registry.terms("de").unwrap();
    assert_eq!(terms.get("Kap."), Some("chapter"));
}

#[test]
fn test_regional_variant_falls_back_to_base_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(
        test_data_dir().join("locales-de-DE.xml"),
        dir.path().join("de.xml"),
    )
    .unwrap();

    let registry =
        LocaleRegistry::new("en-US", TermSelection::Locators).with_search_dir(dir.path());
    let terms = registry.terms("de-AT").unwrap();
    assert_eq!(terms.get("Bd."), Some("volume"));
}

#[test]
fn test_all_terms_selection() {
    let registry =
        LocaleRegistry::new("en-US", TermSelection::All).with_search_dir(test_data_dir());
    let terms = registry.terms("de-DE").unwrap();
    assert_eq!(terms.get("u. a."), Some("et-al"));
}

#[test]
fn test_broken_locale_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("locales-fr-FR.xml"), "<locale><terms></locale>").unwrap();

    let registry =
        LocaleRegistry::new("en-US", TermSelection::Locators).with_search_dir(dir.path());
    let err = registry.terms("fr-FR").unwrap_err();
    assert!(matches!(err, LocaleError::XmlSyntax { .. }), "Got: {err:?}");
}

#[test]
fn test_error_display() {
    let err = LocaleError::UnknownLocale {
        id: "tlh".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"Unknown locale 'tlh'");

    let err = LocaleError::InvalidRootElement {
        found: "style".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"Expected <locale> root element, found <style>");
}
