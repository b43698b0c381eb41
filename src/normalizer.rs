//! This module turns loosely structured NPDA transition tables into the canonical nested
//! transition function used by [`NpdaDefinition`](crate::definition::NpdaDefinition).
//!
//! Raw tables are keyed by compound strings such as `"a,Z"` (consume `a` while `Z` is on top
//! of the stack). A key without a separator, such as `"Z"`, is an epsilon move on stack top `Z`.
//! Each key maps to a list of `[destination, replacement]` pairs.

use crate::definition::{NpdaTransitions, StackAction};
use crate::types::{
    AutomatonError, Entries, State, Symbol, EPSILON, EPSILON_ALIAS, TRANSITION_KEY_SEPARATOR,
};
use serde_json::Value;
use std::collections::BTreeSet;

/// NPDA transitions as supplied by a caller, before normalization.
pub type RawNpdaTransitions = Entries<State, Entries<String, Value>>;

/// Normalizes a raw NPDA transition table.
///
/// Keys that differ only in surrounding whitespace collapse onto the same
/// `(input, stack)` pair and their destinations are merged into one set.
///
/// # Returns
///
/// * `Ok(NpdaTransitions)` keyed `state -> input (EPSILON for none) -> stack top -> moves`.
/// * `Err(AutomatonError::MalformedTransitionKey)` if a key has no stack symbol.
/// * `Err(AutomatonError::MalformedTransitionValue)` if a value is not a list of pairs.
pub fn normalize_npda_transitions(
    raw: &RawNpdaTransitions,
) -> Result<NpdaTransitions, AutomatonError> {
    let mut normalized = NpdaTransitions::new();

    for (state, table) in raw.iter() {
        let by_input = normalized.entry(state.clone()).or_default();

        for (key, value) in table.iter() {
            let (input, stack_top) = parse_key(state, key)?;
            let actions = parse_value(state, key, value)?;

            by_input
                .entry(input)
                .or_default()
                .entry(stack_top)
                .or_default()
                .extend(actions);
        }
    }

    Ok(normalized)
}

/// Splits a compound key into its `(input, stack top)` parts.
fn parse_key(state: &str, key: &str) -> Result<(Symbol, Symbol), AutomatonError> {
    let malformed = || AutomatonError::MalformedTransitionKey {
        state: state.to_string(),
        key: key.to_string(),
    };

    let (input, stack_top) = match key.split_once(TRANSITION_KEY_SEPARATOR) {
        Some((input, stack_top)) => (input.trim(), stack_top.trim()),
        None => (EPSILON, key.trim()),
    };

    if stack_top.is_empty() || stack_top.contains(TRANSITION_KEY_SEPARATOR) {
        return Err(malformed());
    }

    let input = if input == EPSILON_ALIAS { EPSILON } else { input };

    Ok((input.to_string(), stack_top.to_string()))
}

/// Reads a list of `[destination, replacement]` pairs.
fn parse_value(
    state: &str,
    key: &str,
    value: &Value,
) -> Result<BTreeSet<StackAction>, AutomatonError> {
    let malformed = |reason: String| AutomatonError::MalformedTransitionValue {
        state: state.to_string(),
        key: key.to_string(),
        reason,
    };

    let items = value
        .as_array()
        .ok_or_else(|| malformed(format!("expected a list of pairs, found {}", value)))?;

    items
        .iter()
        .map(|item| match item.as_array().map(Vec::as_slice) {
            Some([Value::String(next_state), Value::String(replacement)]) => {
                Ok(StackAction::new(next_state.clone(), replacement.clone()))
            }
            _ => Err(malformed(format!(
                "expected a [state, replacement] pair, found {}",
                item
            ))),
        })
        .collect()
}

/// Returns `true` if any state has a move that consumes no input.
pub fn has_epsilon_moves(transitions: &NpdaTransitions) -> bool {
    transitions
        .values()
        .any(|by_input| by_input.keys().any(|input| input == EPSILON))
}
