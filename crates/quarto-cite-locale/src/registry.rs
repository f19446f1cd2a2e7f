/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Locale id → cached [`TermTable`].

use crate::builtin;
use crate::error::{LocaleError, Result};
use crate::terms::TermTable;
use crate::xml::{TermSelection, parse_locale_xml};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Environment variable holding extra locale directories for
/// [`shared_registry`], separated like `PATH`.
pub const LOCALE_PATH_ENV: &str = "QUARTO_CITE_LOCALE_PATH";

static SHARED: Lazy<LocaleRegistry> = Lazy::new(|| {
    let mut registry = LocaleRegistry::new("en-US", TermSelection::Locators);
    if let Some(paths) = std::env::var_os(LOCALE_PATH_ENV) {
        for dir in std::env::split_paths(&paths) {
            registry.add_search_dir(dir);
        }
    }
    registry
});

/// The process-wide registry: en-US default, locator terms only, plus any
/// directories listed in [`LOCALE_PATH_ENV`].
pub fn shared_registry() -> &'static LocaleRegistry {
    &SHARED
}

/// Resolves locale ids to term tables.
///
/// Lookup for an id tries, in order: a locale file in one of the search
/// directories (`locales-<id>.xml` or `<id>.xml`, case-insensitive), the
/// embedded locale, then the same for the base language (`de` for `de-AT`),
/// then the default locale. Each table is built once per id and shared.
pub struct LocaleRegistry {
    default_locale: String,
    selection: TermSelection,
    search_dirs: Vec<PathBuf>,
    /// Keyed by lowercased locale id.
    cache: RwLock<HashMap<String, Arc<TermTable>>>,
}

impl LocaleRegistry {
    pub fn new(default_locale: impl Into<String>, selection: TermSelection) -> Self {
        Self {
            default_locale: default_locale.into(),
            selection,
            search_dirs: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Builder form of [`add_search_dir`](Self::add_search_dir).
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.add_search_dir(dir);
        self
    }

    /// Add a directory containing CSL locale files. Earlier directories win.
    pub fn add_search_dir(&mut self, dir: impl Into<PathBuf>) {
        self.search_dirs.push(dir.into());
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn selection(&self) -> TermSelection {
        self.selection
    }

    /// Register a table directly, e.g. one built from a style-embedded
    /// locale. Replaces any cached table for `id`.
    pub fn insert(&self, id: &str, table: TermTable) -> Arc<TermTable> {
        let table = Arc::new(table);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_ascii_lowercase(), Arc::clone(&table));
        table
    }

    /// The table for the default locale.
    pub fn default_terms(&self) -> Result<Arc<TermTable>> {
        self.terms(&self.default_locale)
    }

    /// The table for `id`, loading and caching it on first use.
    pub fn terms(&self, id: &str) -> Result<Arc<TermTable>> {
        let key = id.to_ascii_lowercase();
        if let Some(table) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(self.load_with_fallback(id)?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have loaded the same id meanwhile; keep theirs.
        Ok(Arc::clone(cache.entry(key).or_insert(table)))
    }

    fn load_with_fallback(&self, id: &str) -> Result<TermTable> {
        let mut candidates: Vec<&str> = vec![id];
        if let Some((base, _)) = id.split_once('-') {
            candidates.push(base);
        }
        candidates.push(&self.default_locale);

        for candidate in candidates {
            if let Some(table) = self.load_exact(candidate)? {
                if !candidate.eq_ignore_ascii_case(id) {
                    tracing::debug!(requested = id, used = candidate, "Locale fallback");
                }
                return Ok(table);
            }
        }

        Err(LocaleError::UnknownLocale { id: id.to_string() })
    }

    fn load_exact(&self, id: &str) -> Result<Option<TermTable>> {
        if let Some(path) = self.find_locale_file(id) {
            let xml = fs::read_to_string(&path).map_err(|source| LocaleError::Io {
                path: path.clone(),
                source,
            })?;
            let doc = parse_locale_xml(&xml)?;
            let table = doc.term_table(self.selection);
            tracing::debug!(
                locale = id,
                path = %path.display(),
                terms = table.len(),
                "Loaded locale file"
            );
            return Ok(Some(table));
        }

        if let Some(doc) = builtin::builtin_document(id)? {
            let table = doc.term_table(self.selection);
            tracing::debug!(locale = id, terms = table.len(), "Using built-in locale");
            return Ok(Some(table));
        }

        Ok(None)
    }

    fn find_locale_file(&self, id: &str) -> Option<PathBuf> {
        let id = id.to_ascii_lowercase();
        let exact = [format!("locales-{}.xml", id), format!("{}.xml", id)];
        // A bare language ("de") also accepts any regional file ("de-DE").
        let regional = (!id.contains('-'))
            .then(|| [format!("locales-{}-", id), format!("{}-", id)]);

        for dir in &self.search_dirs {
            let names = xml_file_names(dir);
            if let Some(name) = names.iter().find(|n| exact.contains(&n.to_ascii_lowercase())) {
                return Some(dir.join(name));
            }
            if let Some(prefixes) = &regional {
                let found = names.iter().find(|n| {
                    let lower = n.to_ascii_lowercase();
                    prefixes.iter().any(|p| lower.starts_with(p.as_str()))
                });
                if let Some(name) = found {
                    return Some(dir.join(name));
                }
            }
        }
        None
    }
}

/// Sorted names of the `.xml` files directly inside `dir`.
fn xml_file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "Locale directory not readable");
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| n.to_ascii_lowercase().ends_with(".xml"))
        .collect();
    names.sort();
    names
}
