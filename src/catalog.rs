use crate::definition::{Automaton, AutomatonInfo, AutomatonSpec};
use crate::types::AutomatonError;
use log::warn;
use serde::Deserialize;

// Built-in automata, embedded at compile time
const CATALOG_TEXTS: [&str; 6] = [
    include_str!("../machines/ends-with-a.json"),
    include_str!("../machines/even-zeros.json"),
    include_str!("../machines/anbn.json"),
    include_str!("../machines/even-palindromes.json"),
    include_str!("../machines/unary-increment.json"),
    include_str!("../machines/contains-11.json"),
];

/// A named, validated built-in automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub description: String,
    pub automaton: Automaton,
}

#[derive(Deserialize)]
struct CatalogDocument {
    name: String,
    description: String,
    automaton: AutomatonSpec,
}

fn parse_entry(text: &str) -> Result<CatalogEntry, AutomatonError> {
    let document: CatalogDocument = serde_json::from_str(text)?;

    Ok(CatalogEntry {
        name: document.name,
        description: document.description,
        automaton: document.automaton.build()?,
    })
}

fn load_entries() -> Vec<CatalogEntry> {
    CATALOG_TEXTS
        .iter()
        .enumerate()
        .filter_map(|(index, text)| match parse_entry(text) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping built-in automaton #{}: {}", index, e);
                None
            }
        })
        .collect()
}

lazy_static::lazy_static! {
    /// Loaded on first access. Entries never change afterwards, so they can be shared
    /// by reference across threads.
    pub static ref CATALOG: Vec<CatalogEntry> = load_entries();
}

pub struct Catalog;

impl Catalog {
    /// Get the number of built-in automata
    pub fn count() -> usize {
        CATALOG.len()
    }

    /// List all built-in names, in catalog order
    pub fn names() -> Vec<String> {
        CATALOG.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn by_index(index: usize) -> Result<&'static CatalogEntry, AutomatonError> {
        CATALOG
            .get(index)
            .ok_or_else(|| {
                AutomatonError::NotFound(format!("Catalog index {} out of range", index))
            })
    }

    /// Looks an entry up by exact name, falling back to a case-insensitive match.
    pub fn by_name(name: &str) -> Result<&'static CatalogEntry, AutomatonError> {
        CATALOG
            .iter()
            .find(|entry| entry.name == name)
            .or_else(|| {
                CATALOG
                    .iter()
                    .find(|entry| entry.name.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| AutomatonError::NotFound(format!("Automaton '{}' not found", name)))
    }

    pub fn info(index: usize) -> Result<AutomatonInfo, AutomatonError> {
        Self::by_index(index).map(|entry| entry.automaton.info())
    }

    /// Search names and descriptions, returning matching indices
    pub fn search(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        CATALOG
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry.name.to_lowercase().contains(&query)
                    || entry.description.to_lowercase().contains(&query)
            })
            .map(|(index, _)| index)
            .collect()
    }
}
