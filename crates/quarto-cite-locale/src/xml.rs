/*
 * xml.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reader for the `<terms>` section of CSL locale files.
//!
//! Only what a [`TermTable`] needs is kept: the locale's `xml:lang` and each
//! term's name, form, and text. Date formats and style options are skipped.

use crate::error::{LocaleError, Result};
use crate::terms::TermTable;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};

/// The `form` attribute of a CSL term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermForm {
    #[default]
    Long,
    Short,
    Verb,
    VerbShort,
    Symbol,
}

impl TermForm {
    fn from_attribute(value: &str) -> Self {
        match value {
            "short" => TermForm::Short,
            "verb" => TermForm::Verb,
            "verb-short" => TermForm::VerbShort,
            "symbol" => TermForm::Symbol,
            _ => TermForm::Long,
        }
    }
}

/// One `<term>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocaleTerm {
    pub name: String,
    pub form: TermForm,
    /// Text of a `<single>` child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single: Option<String>,
    /// Text of a `<multiple>` child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<String>,
    /// Text content of a term without `<single>`/`<multiple>` children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl LocaleTerm {
    /// Every non-empty surface form of the term, in declaration order.
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        [&self.value, &self.single, &self.multiple]
            .into_iter()
            .filter_map(|form| form.as_deref())
            .filter(|form| !form.is_empty())
    }
}

/// Which terms feed a [`TermTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSelection {
    /// Only the CSL locator types (`page`, `chapter`, ...).
    #[default]
    Locators,
    /// Every term the locale declares, including `and`, `et-al`, month names.
    All,
}

impl TermSelection {
    pub fn includes(self, term_name: &str) -> bool {
        match self {
            TermSelection::Locators => crate::is_locator_term(term_name),
            TermSelection::All => true,
        }
    }
}

/// The parts of a CSL locale file this crate cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocaleDocument {
    /// Value of the root's `xml:lang` attribute.
    pub lang: Option<String>,
    /// Terms in document order.
    pub terms: Vec<LocaleTerm>,
}

impl LocaleDocument {
    /// Build the surface form → label table for this locale.
    ///
    /// Terms are visited in document order, so when two terms share a
    /// surface form the one declared first keeps it.
    pub fn term_table(&self, selection: TermSelection) -> TermTable {
        let mut table = TermTable::new();
        for term in self.terms.iter().filter(|t| selection.includes(&t.name)) {
            for form in term.surface_forms() {
                table.insert(form, &term.name);
            }
        }
        table
    }
}

/// Parse a CSL locale file.
///
/// # Example
///
/// ```rust
/// use quarto_cite_locale::{parse_locale_xml, TermSelection};
///
/// let doc = parse_locale_xml(r#"<locale xml:lang="en-US"><terms>
///   <term name="page" form="short"><single>p.</single><multiple>pp.</multiple></term>
/// </terms></locale>"#).unwrap();
///
/// assert_eq!(doc.lang.as_deref(), Some("en-US"));
/// let table = doc.term_table(TermSelection::Locators);
/// assert_eq!(table.get("pp."), Some("page"));
/// ```
pub fn parse_locale_xml(xml: &str) -> Result<LocaleDocument> {
    LocaleReader::new(xml).read()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermChild {
    Single,
    Multiple,
}

/// A `<term>` whose end tag has not been seen yet.
struct PendingTerm {
    name: String,
    form: TermForm,
    single: Option<String>,
    multiple: Option<String>,
    value: String,
    child: Option<TermChild>,
}

impl PendingTerm {
    fn push_text(&mut self, text: &str) {
        match self.child {
            Some(TermChild::Single) => self.single.get_or_insert_with(String::new).push_str(text),
            Some(TermChild::Multiple) => {
                self.multiple.get_or_insert_with(String::new).push_str(text)
            }
            None => self.value.push_str(text),
        }
    }

    fn finish(self) -> LocaleTerm {
        let value = self.value.trim();
        LocaleTerm {
            name: self.name,
            form: self.form,
            single: self.single.map(|s| s.trim().to_string()),
            multiple: self.multiple.map(|s| s.trim().to_string()),
            value: (!value.is_empty()).then(|| value.to_string()),
        }
    }
}

struct LocaleReader<'a> {
    reader: Reader<&'a [u8]>,
    /// Names of the currently open elements.
    path: Vec<String>,
    doc: LocaleDocument,
    seen_root: bool,
    pending: Option<PendingTerm>,
}

impl<'a> LocaleReader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            reader: Reader::from_str(source),
            path: Vec::new(),
            doc: LocaleDocument::default(),
            seen_root: false,
            pending: None,
        }
    }

    fn read(mut self) -> Result<LocaleDocument> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e);
                    self.open(&e, &name)?;
                    self.path.push(name);
                }
                Ok(Event::Empty(e)) => {
                    let name = local_name(&e);
                    self.open(&e, &name)?;
                    self.close(&name);
                }
                Ok(Event::End(_)) => {
                    if let Some(name) = self.path.pop() {
                        self.close(&name);
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| LocaleError::XmlSyntax {
                        message: format!("Invalid text content: {}", err),
                        position: self.reader.buffer_position(),
                    })?;
                    if let Some(term) = self.pending.as_mut() {
                        term.push_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    if let Some(term) = self.pending.as_mut() {
                        term.push_text(&text);
                    }
                }
                Ok(Event::Eof) => break,
                // Comments, processing instructions, declarations, doctypes
                Ok(_) => {}
                Err(e) => {
                    return Err(LocaleError::XmlSyntax {
                        message: e.to_string(),
                        position: self.reader.error_position(),
                    });
                }
            }
        }

        if !self.seen_root {
            return Err(LocaleError::EmptyDocument);
        }
        Ok(self.doc)
    }

    fn open(&mut self, e: &BytesStart<'_>, name: &str) -> Result<()> {
        let parent = self.path.last().map(String::as_str);

        match (parent, name) {
            (None, "locale") => {
                self.seen_root = true;
                self.doc.lang = attribute(e, Some("xml"), "lang")?;
            }
            (None, other) => {
                return Err(LocaleError::InvalidRootElement {
                    found: other.to_string(),
                });
            }
            (Some("terms"), "term") => {
                let name = attribute(e, None, "name")?.ok_or(LocaleError::MissingTermName)?;
                let form = attribute(e, None, "form")?
                    .map(|f| TermForm::from_attribute(&f))
                    .unwrap_or_default();
                self.pending = Some(PendingTerm {
                    name,
                    form,
                    single: None,
                    multiple: None,
                    value: String::new(),
                    child: None,
                });
            }
            (Some("term"), "single") => {
                if let Some(term) = self.pending.as_mut() {
                    term.child = Some(TermChild::Single);
                }
            }
            (Some("term"), "multiple") => {
                if let Some(term) = self.pending.as_mut() {
                    term.child = Some(TermChild::Multiple);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &str) {
        match name {
            "term" => {
                if let Some(term) = self.pending.take() {
                    self.doc.terms.push(term.finish());
                }
            }
            "single" | "multiple" => {
                if let Some(term) = self.pending.as_mut() {
                    term.child = None;
                }
            }
            _ => {}
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

/// Look up an attribute by optional namespace prefix and local name.
fn attribute(e: &BytesStart<'_>, prefix: Option<&str>, name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| LocaleError::XmlSyntax {
            message: format!("Invalid attribute: {}", err),
            position: 0,
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let (attr_prefix, attr_name) = match key.split_once(':') {
            Some((p, n)) => (Some(p), n),
            None => (None, key.as_str()),
        };
        if attr_prefix == prefix && attr_name == name {
            let value = attr
                .unescape_value()
                .map_err(|err| LocaleError::XmlSyntax {
                    message: format!("Invalid attribute value: {}", err),
                    position: 0,
                })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
