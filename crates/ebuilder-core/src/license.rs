//! Maven license name to Gentoo license mapping.
//!
//! Matching is exact on the trimmed, lower-cased license name. Every accepted
//! spelling is its own table entry: license names are curated by hand, never
//! guessed.

use crate::error::{CoreError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::sync::Arc;

const BUNDLED_TABLE: &str = include_str!("../data/licenses.xml");

/// One row of the license table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseMappingEntry {
    /// Lower-cased Maven license name.
    pub free_text_key: String,
    /// Gentoo license, possibly compound (`A:B`, `|| ( A B )`).
    pub canonical_tag: String,
}

/// Read-only license lookup table.
#[derive(Debug, Clone, Default)]
pub struct LicenseTable {
    entries: HashMap<String, String>,
}

impl LicenseTable {
    /// The curated table shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_xml(BUNDLED_TABLE)
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v.into()))
                .collect(),
        }
    }

    /// Loads a table in the `<licenses><license mavenlicense=".."
    /// gentoolicense=".."/></licenses>` format.
    pub fn from_xml(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut entries = HashMap::new();

        loop {
            let event = reader.read_event().map_err(|e| CoreError::LicenseTable {
                message: e.to_string(),
            })?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"license" =>
                {
                    let entry = read_entry(e)?;
                    if entries
                        .insert(entry.free_text_key.clone(), entry.canonical_tag)
                        .is_some()
                    {
                        tracing::debug!("duplicate license mapping for '{}'", entry.free_text_key);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        tracing::debug!("loaded {} license mappings", entries.len());
        Ok(Self { entries })
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_xml(&content)
    }

    pub fn get(&self, free_text: &str) -> Option<&str> {
        self.entries
            .get(&normalize_key(free_text))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

fn read_entry(element: &BytesStart<'_>) -> Result<LicenseMappingEntry> {
    let mut maven = None;
    let mut gentoo = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| CoreError::LicenseTable {
            message: e.to_string(),
        })?;
        let raw = std::str::from_utf8(&attr.value).map_err(|e| CoreError::LicenseTable {
            message: e.to_string(),
        })?;
        let value = quick_xml::escape::unescape(raw)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| raw.to_string());

        match attr.key.local_name().as_ref() {
            b"mavenlicense" => maven = Some(value),
            b"gentoolicense" => gentoo = Some(value),
            _ => {}
        }
    }

    match (maven, gentoo) {
        (Some(maven), Some(gentoo)) => Ok(LicenseMappingEntry {
            free_text_key: normalize_key(&maven),
            canonical_tag: gentoo,
        }),
        _ => Err(CoreError::LicenseTable {
            message: "license entry needs both 'mavenlicense' and 'gentoolicense'".into(),
        }),
    }
}

/// Maps free-text license names onto canonical license tags.
///
/// Cheap to clone; the table is shared.
#[derive(Debug, Clone)]
pub struct LicenseNormalizer {
    table: Arc<LicenseTable>,
}

impl LicenseNormalizer {
    pub fn new(table: LicenseTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Returns `None` for names not present in the table.
    pub fn normalize(&self, free_text: &str) -> Option<&str> {
        self.table.get(free_text)
    }

    pub fn table(&self) -> &LicenseTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> LicenseNormalizer {
        LicenseNormalizer::new(LicenseTable::bundled().unwrap())
    }

    #[test]
    fn test_case_insensitive_exact_match() {
        let licenses = bundled();
        assert_eq!(licenses.normalize("Apache 2.0"), Some("Apache-2.0"));
        assert_eq!(licenses.normalize("apache 2.0"), Some("Apache-2.0"));
        assert_eq!(licenses.normalize("  The MIT License "), Some("MIT"));
    }

    #[test]
    fn test_unknown_license() {
        let licenses = bundled();
        assert_eq!(licenses.normalize("INVALID-LICENSE"), None);
        // no fuzzy matching
        assert_eq!(licenses.normalize("apache 2.0."), None);
        assert_eq!(licenses.normalize("apache  2.0"), None);
    }

    #[test]
    fn test_compound_tags() {
        let licenses = bundled();
        assert_eq!(licenses.normalize("cddl+gpl license"), Some("CDDL:GPL-1"));
        assert_eq!(
            licenses.normalize("cddl/gplv2+ce"),
            Some("|| ( CDDL GPL-2-with-classpath-exception)")
        );
        assert_eq!(
            licenses.normalize("mpl 2.0 or epl 1.0"),
            Some("|| ( MPL-1.1 EPL-1.0 )")
        );
        assert_eq!(licenses.normalize("jquery license"), Some("MIT:CC0-1.0"));
    }

    #[test]
    fn test_spelling_variants_are_separate_entries() {
        let licenses = bundled();
        assert_eq!(licenses.normalize("bsd licence"), Some("BSD-1"));
        assert_eq!(licenses.normalize("bsd license"), Some("BSD-1"));
        assert_eq!(licenses.normalize("gnu lesser general public licence"), Some("LGPL-3"));
    }

    #[test]
    fn test_from_xml() {
        let xml = r#"<licenses>
  <license mavenlicense="Foo License" gentoolicense="FOO" description="made up"/>
  <license mavenlicense="bar &amp; baz" gentoolicense="BAR"></license>
</licenses>"#;
        let table = LicenseTable::from_xml(xml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("foo license"), Some("FOO"));
        assert_eq!(table.get("BAR & BAZ"), Some("BAR"));
    }

    #[test]
    fn test_from_xml_missing_attribute() {
        let xml = r#"<licenses><license mavenlicense="foo"/></licenses>"#;
        assert!(matches!(
            LicenseTable::from_xml(xml),
            Err(CoreError::LicenseTable { .. })
        ));
    }

    #[test]
    fn test_from_xml_malformed() {
        let xml = r#"<licenses><license mavenlicense="unclosed></licenses>"#;
        assert!(LicenseTable::from_xml(xml).is_err());
    }

    #[test]
    fn test_from_entries() {
        let table = LicenseTable::from_entries([("  Some License ", "SOME")]);
        let licenses = LicenseNormalizer::new(table);
        assert_eq!(licenses.normalize("some license"), Some("SOME"));
        assert!(!licenses.table().is_empty());
    }
}
