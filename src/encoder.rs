//! This module converts automata to and from their plain-data JSON form, the format used
//! when a collection of automata is persisted and reloaded.
//!
//! Decoding always re-validates, so a tampered document cannot produce an invalid definition.

use crate::definition::{Automaton, AutomatonRecord};
use crate::types::AutomatonError;

/// Encodes an automaton as compact JSON.
pub fn encode(automaton: &Automaton) -> Result<String, AutomatonError> {
    Ok(serde_json::to_string(automaton)?)
}

/// Encodes an automaton as indented JSON.
pub fn encode_pretty(automaton: &Automaton) -> Result<String, AutomatonError> {
    Ok(serde_json::to_string_pretty(automaton)?)
}

/// Decodes and validates an automaton previously produced by [`encode`].
///
/// # Returns
///
/// * `Ok(Automaton)` if the document is well formed and passes validation.
/// * `Err(AutomatonError::ParseError)` if the document is not a tagged record.
/// * `Err(AutomatonError::InvalidDefinition)` if the record fails validation.
pub fn decode(encoded: &str) -> Result<Automaton, AutomatonError> {
    let record: AutomatonRecord = serde_json::from_str(encoded)?;
    Automaton::try_from(record)
}
