//! Bibliography store: parsed reference entries, key lookup, and subset
//! serialization.
//!
//! The store is built once from BibTeX source text and is read-only
//! afterwards; the tracking engine consumes it through `contains`, `len`,
//! `entries` and `serialize`.

mod parser;

pub use parser::ParseError;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// One reference record: a citation key plus its named fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry type ("article", "book", ...), lowercased.
    pub entry_type: String,
    /// Unique citation key.
    pub key: String,
    /// Field name/value pairs in source order. Names are lowercased.
    pub fields: Vec<(String, String)>,
}

impl Entry {
    /// Look up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A parsed bibliography, immutable after construction.
#[derive(Debug, Clone)]
pub struct Bibliography {
    source: String,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Bibliography {
    /// Parse a bibliography from BibTeX source text.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let entries = parser::parse(source)?;
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.key.clone(), i).is_some() {
                return Err(ParseError::DuplicateKey(entry.key.clone()));
            }
        }
        Ok(Self {
            source: source.to_string(),
            entries,
            index,
        })
    }

    /// Parse a bibliography from a `.bib` file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(Self::parse(&content)?)
    }

    /// The source text the store was built from.
    pub fn full_source(&self) -> &str {
        &self.source
    }

    /// Whether an entry with this citation key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Look up an entry by citation key.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Serialize the subset of entries whose keys appear in `keys`.
    ///
    /// Entries keep their source order and each entry keeps its field set
    /// and field ordering. Keys absent from the store are ignored; an empty
    /// subset serializes to empty text.
    pub fn serialize(&self, keys: &BTreeSet<String>) -> String {
        let mut out = String::new();
        for entry in self.entries.iter().filter(|e| keys.contains(&e.key)) {
            if !out.is_empty() {
                out.push('\n');
            }
            write_entry(&mut out, entry);
        }
        out
    }
}

fn write_entry(out: &mut String, entry: &Entry) {
    let _ = writeln!(out, "@{}{{{},", entry.entry_type, entry.key);
    for (name, value) in &entry.fields {
        let _ = writeln!(out, "  {} = {{{}}},", name, value);
    }
    out.push_str("}\n");
}
