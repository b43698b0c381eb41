//! This module defines the core data structures and types shared by every automaton kind,
//! including symbols, reserved markers, head moves, acceptance outcomes and error types.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// An opaque alphabet token. Symbols are read from input strings one character at a time.
pub type Symbol = String;
/// An opaque state identifier, unique within one definition.
pub type State = String;

/// The reserved input marker for moves that consume nothing.
pub const EPSILON: &str = "";
/// Alternative spelling of [`EPSILON`] accepted in raw transition keys.
pub const EPSILON_ALIAS: &str = "ε";
/// Separates the input part from the stack part of a compound NPDA transition key.
pub const TRANSITION_KEY_SEPARATOR: char = ',';
/// The default number of configurations a nondeterministic search may explore.
pub const DEFAULT_MAX_CONFIGURATIONS: usize = 10_000;

/// Splits a string into the one-character symbols the engines consume.
pub fn symbols(input: &str) -> impl Iterator<Item = &str> {
    input
        .char_indices()
        .map(move |(i, c)| &input[i..i + c.len_utf8()])
}

/// Returns `true` for symbols that carry a reserved meaning in transition tables.
pub fn is_reserved(symbol: &str) -> bool {
    symbol == EPSILON || symbol == EPSILON_ALIAS
}

/// The three automaton kinds handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Dfa,
    Npda,
    Ntm,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Kind::Dfa => "DFA",
            Kind::Npda => "NPDA",
            Kind::Ntm => "NTM",
        })
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Move the head one position to the left.
    #[serde(rename = "L", alias = "Left")]
    Left,
    /// Move the head one position to the right.
    #[serde(rename = "R", alias = "Right")]
    Right,
    /// Keep the head in the same position.
    #[serde(rename = "N", alias = "S", alias = "Stay")]
    Stay,
}

impl Move {
    /// Returns the head position after applying this move to `position`.
    pub fn apply(self, position: i64) -> i64 {
        match self {
            Move::Left => position - 1,
            Move::Right => position + 1,
            Move::Stay => position,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Left => write!(f, "L"),
            Move::Right => write!(f, "R"),
            Move::Stay => write!(f, "N"),
        }
    }
}

/// Limits how much of the configuration space a nondeterministic search may visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationBound {
    /// Maximum number of distinct configurations expanded before giving up.
    pub max_configurations: usize,
}

impl ExplorationBound {
    pub fn new(max_configurations: usize) -> Self {
        Self { max_configurations }
    }
}

impl Default for ExplorationBound {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONFIGURATIONS)
    }
}

/// Details reported when a search exhausts its bound without a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inconclusive {
    /// Number of configurations expanded.
    pub explored: usize,
    /// The bound that was in force.
    pub limit: usize,
}

/// The outcome of an acceptance test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acceptance {
    /// Some reachable configuration is accepting.
    Accepted,
    /// The reachable configuration space was exhausted without an accepting configuration.
    Rejected,
    /// The exploration bound was hit first; the answer is unknown.
    DidNotHalt(Inconclusive),
}

impl Acceptance {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Acceptance::Accepted)
    }

    /// Collapses the outcome into a boolean, surfacing an inconclusive search as an error.
    pub fn into_bool(self) -> Result<bool, AutomatonError> {
        match self {
            Acceptance::Accepted => Ok(true),
            Acceptance::Rejected => Ok(false),
            Acceptance::DidNotHalt(Inconclusive { explored, limit }) => {
                Err(AutomatonError::DidNotHalt { explored, limit })
            }
        }
    }
}

impl fmt::Display for Acceptance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acceptance::Accepted => write!(f, "accepted"),
            Acceptance::Rejected => write!(f, "rejected"),
            Acceptance::DidNotHalt(Inconclusive { limit, .. }) => {
                write!(f, "did not halt within {} configurations", limit)
            }
        }
    }
}

/// Represents the errors reported by normalization, construction and execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// A compound transition key has no stack symbol.
    #[error("Malformed transition key '{key}' in state '{state}'")]
    MalformedTransitionKey { state: State, key: String },
    /// A transition value could not be read as destination pairs.
    #[error("Malformed transition value for key '{key}' in state '{state}': {reason}")]
    MalformedTransitionValue {
        state: State,
        key: String,
        reason: String,
    },
    /// A referential, determinism or structural invariant does not hold.
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
    /// The input string contains a symbol outside the input alphabet.
    #[error("Symbol '{0}' is not in the input alphabet")]
    SymbolNotInAlphabet(Symbol),
    /// The search bound was exhausted before a verdict was reached.
    #[error("Did not halt: explored {explored} configurations (limit {limit})")]
    DidNotHalt { explored: usize, limit: usize },
    /// A payload could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// An error related to reading definition files.
    #[error("File error: {0}")]
    FileError(String),
    /// No built-in automaton matches the requested name or index.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for AutomatonError {
    fn from(error: serde_json::Error) -> Self {
        AutomatonError::ParseError(error.to_string())
    }
}

/// A map read from plain data that keeps every entry, including repeated keys.
///
/// JSON objects may repeat a key, and a `HashMap` would keep only the last one.
/// Validation needs to see all of them to reject nondeterministic DFA tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entries<K, V>(pub Vec<(K, V)>);

impl<K, V> Entries<K, V> {
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> Default for Entries<K, V> {
    fn default() -> Self {
        Entries(Vec::new())
    }
}

impl<K, V> IntoIterator for Entries<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Entries<K, V> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Entries<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Entries(iter.into_iter().collect())
    }
}

impl<K: Serialize, V: Serialize> Serialize for Entries<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Deserialize<'de> for Entries<K, V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<K, V> {
            type Value = Entries<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_serialization() {
        assert_eq!(serde_json::to_string(&Move::Left).unwrap(), "\"L\"");
        assert_eq!(serde_json::to_string(&Move::Stay).unwrap(), "\"N\"");

        let right: Move = serde_json::from_str("\"R\"").unwrap();
        let stay: Move = serde_json::from_str("\"S\"").unwrap();
        let left: Move = serde_json::from_str("\"Left\"").unwrap();

        assert_eq!(right, Move::Right);
        assert_eq!(stay, Move::Stay);
        assert_eq!(left, Move::Left);
    }

    #[test]
    fn test_move_apply() {
        assert_eq!(Move::Left.apply(0), -1);
        assert_eq!(Move::Right.apply(0), 1);
        assert_eq!(Move::Stay.apply(7), 7);
    }

    #[test]
    fn test_entries_keep_repeated_keys() {
        let entries: Entries<String, String> =
            serde_json::from_str(r#"{"a": "q1", "a": "q2", "b": "q0"}"#).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries.0[0], ("a".to_string(), "q1".to_string()));
        assert_eq!(entries.0[1], ("a".to_string(), "q2".to_string()));
    }

    #[test]
    fn test_into_bool_keeps_inconclusive_distinct() {
        assert_eq!(Acceptance::Accepted.into_bool(), Ok(true));
        assert_eq!(Acceptance::Rejected.into_bool(), Ok(false));

        let inconclusive = Acceptance::DidNotHalt(Inconclusive {
            explored: 10,
            limit: 10,
        });
        assert_eq!(
            inconclusive.into_bool(),
            Err(AutomatonError::DidNotHalt {
                explored: 10,
                limit: 10
            })
        );
    }

    #[test]
    fn test_error_display() {
        let error = AutomatonError::MalformedTransitionKey {
            state: "q0".to_string(),
            key: " ".to_string(),
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed transition key"));
        assert!(error_msg.contains("q0"));
    }

    #[test]
    fn test_symbols_split_by_character() {
        assert_eq!(symbols("ab1").collect::<Vec<_>>(), vec!["a", "b", "1"]);
        assert_eq!(symbols("εa").collect::<Vec<_>>(), vec!["ε", "a"]);
        assert_eq!(symbols("").count(), 0);
    }
}
