/*
 * item.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Punctuation allowed inside a key after its first character.
const KEY_PUNCTUATION: &str = ":.#$%&-+?<>~/";

/// Whether `c` may start a citation key (right after `@`).
///
/// Any Unicode letter or digit counts, not just the ASCII `\w` class that
/// markdown-it citation plugins match: `@Müller2001` is the key
/// `Müller2001`, where an ASCII-only class would stop at `M`.
pub fn is_key_start(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `c` may continue a citation key.
pub fn is_key_char(c: char) -> bool {
    is_key_start(c) || KEY_PUNCTUATION.contains(c)
}

/// A bibliography identifier, without the leading `@`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitationKey(String);

impl CitationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for CitationKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CitationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CitationKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for CitationKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl PartialEq<str> for CitationKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CitationKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One cited work with its annotations.
///
/// Serializes to the CSL-JSON citation item shape: `prefix`, `locator`,
/// `label` and `suffix` are omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiteItem {
    pub id: CitationKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(rename = "suppress-author", default)]
    pub suppress_author: bool,
}

impl CiteItem {
    pub fn new(id: impl Into<CitationKey>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Whether the item carries a locator or any text besides the key.
    pub fn is_annotated(&self) -> bool {
        self.prefix.is_some() || self.locator.is_some() || self.suffix.is_some()
    }
}
