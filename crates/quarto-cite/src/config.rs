/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! YAML configuration with command-line overrides.
//!
//! ```yaml
//! locale:
//!   default: de-DE
//!   dirs: [locales]
//!   terms: locators   # or: all
//! scan:
//!   in-text: true
//!   markdown: true
//! ```
//!
//! Every key is optional. Relative locale directories are resolved against
//! the directory containing the configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quarto_cite_locale::{LocaleRegistry, TermSelection};
use quarto_cite_syntax::ScanOptions;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub locale: LocaleConfig,
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LocaleConfig {
    pub default: String,
    pub dirs: Vec<PathBuf>,
    pub terms: TermSelection,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: "en-US".to_string(),
            dirs: Vec::new(),
            terms: TermSelection::Locators,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScanConfig {
    pub in_text: bool,
    pub markdown: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            in_text: true,
            markdown: true,
        }
    }
}

/// Values given on the command line. Unset fields leave the file's value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub locale: Option<String>,
    pub locale_dirs: Vec<PathBuf>,
    pub all_terms: bool,
    pub no_in_text: bool,
    pub plain: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if let Some(base) = path.parent() {
            for dir in &mut config.locale.dirs {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }

        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty file is an empty mapping, not an error.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(locale) = overrides.locale {
            self.locale.default = locale;
        }
        // Command-line directories are searched first.
        if !overrides.locale_dirs.is_empty() {
            let mut dirs = overrides.locale_dirs;
            dirs.append(&mut self.locale.dirs);
            self.locale.dirs = dirs;
        }
        if overrides.all_terms {
            self.locale.terms = TermSelection::All;
        }
        if overrides.no_in_text {
            self.scan.in_text = false;
        }
        if overrides.plain {
            self.scan.markdown = false;
        }
    }

    pub fn registry(&self) -> LocaleRegistry {
        self.locale
            .dirs
            .iter()
            .fold(LocaleRegistry::new(&self.locale.default, self.locale.terms), |r, dir| {
                r.with_search_dir(dir)
            })
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            in_text: self.scan.in_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.locale.default, "en-US");
        assert_eq!(config.locale.terms, TermSelection::Locators);
        assert!(config.scan.in_text);
        assert!(config.scan.markdown);
        assert_eq!(Config::from_yaml("").unwrap(), config);
    }

    #[test]
    fn test_partial_yaml() {
        let config = Config::from_yaml("locale:\n  default: de-DE\n  terms: all\n").unwrap();
        assert_eq!(config.locale.default, "de-DE");
        assert_eq!(config.locale.terms, TermSelection::All);
        assert!(config.locale.dirs.is_empty());
        assert_eq!(config.scan, ScanConfig::default());
    }

    #[test]
    fn test_scan_keys_are_kebab_case() {
        let config = Config::from_yaml("scan:\n  in-text: false\n").unwrap();
        assert!(!config.scan.in_text);
        assert!(Config::from_yaml("scan:\n  in_text: false\n").is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_yaml("bibliography: refs.bib\n").is_err());
        assert!(Config::from_yaml("locale:\n  terms: some\n").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::from_yaml("locale:\n  default: fr-FR\n  dirs: [a]\n").unwrap();
        config.apply(Overrides {
            locale: Some("de-AT".to_string()),
            locale_dirs: vec![PathBuf::from("b")],
            all_terms: true,
            no_in_text: true,
            plain: false,
        });
        assert_eq!(config.locale.default, "de-AT");
        assert_eq!(config.locale.dirs, vec![PathBuf::from("b"), PathBuf::from("a")]);
        assert_eq!(config.locale.terms, TermSelection::All);
        assert!(!config.scan.in_text);
        assert!(config.scan.markdown);
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let mut config = Config::from_yaml("scan:\n  markdown: false\n").unwrap();
        let before = config.clone();
        config.apply(Overrides::default());
        assert_eq!(config, before);
    }

    #[test]
    fn test_load_resolves_relative_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cite.yml");
        std::fs::write(&path, "locale:\n  dirs: [locales, /abs/locales]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.locale.dirs,
            vec![dir.path().join("locales"), PathBuf::from("/abs/locales")]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/cite.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_registry_uses_locale() {
        let config = Config::from_yaml("locale:\n  default: en-GB\n").unwrap();
        let registry = config.registry();
        assert_eq!(registry.default_locale(), "en-GB");
        assert_eq!(registry.default_terms().unwrap().get("p."), Some("page"));
    }
}
