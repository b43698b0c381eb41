//! This module defines validated automaton definitions and their plain-data records.
//!
//! A definition is built once from a record, checked by the [`validator`](crate::validator),
//! and never mutated afterwards. Records are what crosses the persistence boundary: every
//! definition serializes into its record and deserializes (and re-validates) from it.

use crate::normalizer::{has_epsilon_moves, normalize_npda_transitions, RawNpdaTransitions};
use crate::types::{AutomatonError, Entries, Kind, Move, State, Symbol, EPSILON, EPSILON_ALIAS};
use crate::validator::{validate_dfa, validate_npda, validate_ntm};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical DFA transition function: `state -> symbol -> destination`.
pub type DfaTransitions = BTreeMap<State, BTreeMap<Symbol, State>>;
/// Canonical NPDA transition function: `state -> input (or EPSILON) -> stack top -> moves`.
pub type NpdaTransitions =
    BTreeMap<State, BTreeMap<Symbol, BTreeMap<Symbol, BTreeSet<StackAction>>>>;
/// Canonical NTM transition function: `state -> symbol under head -> moves`.
pub type NtmTransitions = BTreeMap<State, BTreeMap<Symbol, BTreeSet<TapeAction>>>;

/// One NPDA move: the destination state and the string that replaces the stack top.
///
/// The replacement is pushed so that its first symbol becomes the new top; an empty
/// replacement pops without pushing. Serialized as `[destination, replacement]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StackAction(State, String);

impl StackAction {
    pub fn new(next_state: impl Into<State>, replacement: impl Into<String>) -> Self {
        Self(next_state.into(), replacement.into())
    }

    pub fn next_state(&self) -> &str {
        &self.0
    }

    pub fn replacement(&self) -> &str {
        &self.1
    }
}

/// One NTM move. Serialized as `[destination, write, move]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TapeAction(State, Symbol, Move);

impl TapeAction {
    pub fn new(next_state: impl Into<State>, write: impl Into<Symbol>, movement: Move) -> Self {
        Self(next_state.into(), write.into(), movement)
    }

    pub fn next_state(&self) -> &str {
        &self.0
    }

    pub fn write(&self) -> &str {
        &self.1
    }

    pub fn movement(&self) -> Move {
        self.2
    }
}

/// Plain-data form of a DFA. Transition entries keep repeated keys so that
/// nondeterministic tables can be detected and rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfaRecord {
    pub states: Vec<State>,
    pub input_symbols: Vec<Symbol>,
    pub transitions: Entries<State, Entries<Symbol, State>>,
    pub initial_state: State,
    pub final_states: Vec<State>,
}

/// Plain-data form of an NPDA. The empty input key denotes an epsilon move.
/// Repeated keys at any level are kept and their moves merged on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpdaRecord {
    pub states: Vec<State>,
    pub input_symbols: Vec<Symbol>,
    pub stack_symbols: Vec<Symbol>,
    pub transitions: Entries<State, Entries<Symbol, Entries<Symbol, Vec<StackAction>>>>,
    pub initial_state: State,
    pub initial_stack_symbol: Symbol,
    pub final_states: Vec<State>,
}

/// Plain-data form of an NTM. Repeated keys are kept and their moves merged on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NtmRecord {
    pub states: Vec<State>,
    pub input_symbols: Vec<Symbol>,
    pub tape_symbols: Vec<Symbol>,
    pub transitions: Entries<State, Entries<Symbol, Vec<TapeAction>>>,
    pub initial_state: State,
    pub blank_symbol: Symbol,
    pub final_states: Vec<State>,
}

/// NPDA creation payload, with transitions still keyed by compound `"input,stack"` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpdaSpec {
    pub states: Vec<State>,
    pub input_symbols: Vec<Symbol>,
    pub stack_symbols: Vec<Symbol>,
    pub transitions: RawNpdaTransitions,
    pub initial_state: State,
    pub initial_stack_symbol: Symbol,
    pub final_states: Vec<State>,
}

fn to_set(items: &[String]) -> BTreeSet<String> {
    items.iter().cloned().collect()
}

/// A validated deterministic finite automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DfaRecord", into = "DfaRecord")]
pub struct DfaDefinition {
    states: BTreeSet<State>,
    input_symbols: BTreeSet<Symbol>,
    transitions: DfaTransitions,
    initial_state: State,
    final_states: BTreeSet<State>,
}

impl DfaDefinition {
    /// Validates `record` and builds the definition.
    pub fn new(record: DfaRecord) -> Result<Self, AutomatonError> {
        validate_dfa(&record)?;

        let mut transitions = DfaTransitions::new();
        for (state, table) in record.transitions.iter() {
            let row = transitions.entry(state.clone()).or_default();
            for (symbol, next_state) in table.iter() {
                row.insert(symbol.clone(), next_state.clone());
            }
        }

        Ok(Self {
            states: to_set(&record.states),
            input_symbols: to_set(&record.input_symbols),
            transitions,
            initial_state: record.initial_state,
            final_states: to_set(&record.final_states),
        })
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn input_symbols(&self) -> &BTreeSet<Symbol> {
        &self.input_symbols
    }

    pub fn transitions(&self) -> &DfaTransitions {
        &self.transitions
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn final_states(&self) -> &BTreeSet<State> {
        &self.final_states
    }

    /// Returns the destination for `(state, symbol)`, if one is defined.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&State> {
        self.transitions.get(state)?.get(symbol)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(BTreeMap::len).sum()
    }
}

impl TryFrom<DfaRecord> for DfaDefinition {
    type Error = AutomatonError;

    fn try_from(record: DfaRecord) -> Result<Self, Self::Error> {
        Self::new(record)
    }
}

impl From<DfaDefinition> for DfaRecord {
    fn from(definition: DfaDefinition) -> Self {
        DfaRecord {
            states: definition.states.into_iter().collect(),
            input_symbols: definition.input_symbols.into_iter().collect(),
            transitions: definition
                .transitions
                .into_iter()
                .map(|(state, row)| (state, row.into_iter().collect()))
                .collect(),
            initial_state: definition.initial_state,
            final_states: definition.final_states.into_iter().collect(),
        }
    }
}

/// A validated nondeterministic pushdown automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NpdaRecord", into = "NpdaRecord")]
pub struct NpdaDefinition {
    states: BTreeSet<State>,
    input_symbols: BTreeSet<Symbol>,
    stack_symbols: BTreeSet<Symbol>,
    transitions: NpdaTransitions,
    initial_state: State,
    initial_stack_symbol: Symbol,
    final_states: BTreeSet<State>,
}

impl NpdaDefinition {
    /// Validates `record` and builds the definition.
    pub fn new(record: NpdaRecord) -> Result<Self, AutomatonError> {
        validate_npda(&record)?;

        let mut transitions = NpdaTransitions::new();
        for (state, by_input) in record.transitions {
            let row = transitions.entry(state).or_default();
            for (input, by_stack) in by_input {
                let input = if input == EPSILON_ALIAS {
                    EPSILON.to_string()
                } else {
                    input
                };
                let cell = row.entry(input).or_default();
                for (stack_top, actions) in by_stack {
                    cell.entry(stack_top).or_default().extend(actions);
                }
            }
        }

        Ok(Self {
            states: to_set(&record.states),
            input_symbols: to_set(&record.input_symbols),
            stack_symbols: to_set(&record.stack_symbols),
            transitions,
            initial_state: record.initial_state,
            initial_stack_symbol: record.initial_stack_symbol,
            final_states: to_set(&record.final_states),
        })
    }

    /// Normalizes the compound-key transitions of `spec`, then validates and builds.
    pub fn from_spec(spec: NpdaSpec) -> Result<Self, AutomatonError> {
        let transitions = normalize_npda_transitions(&spec.transitions)?;

        Self::new(NpdaRecord {
            states: spec.states,
            input_symbols: spec.input_symbols,
            stack_symbols: spec.stack_symbols,
            transitions: transitions
                .into_iter()
                .map(|(state, by_input)| {
                    let by_input = by_input
                        .into_iter()
                        .map(|(input, by_stack)| {
                            let by_stack = by_stack
                                .into_iter()
                                .map(|(top, actions)| (top, actions.into_iter().collect()))
                                .collect();
                            (input, by_stack)
                        })
                        .collect();
                    (state, by_input)
                })
                .collect(),
            initial_state: spec.initial_state,
            initial_stack_symbol: spec.initial_stack_symbol,
            final_states: spec.final_states,
        })
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn input_symbols(&self) -> &BTreeSet<Symbol> {
        &self.input_symbols
    }

    /// The declared input symbols, widened with [`EPSILON`] when any epsilon move exists.
    pub fn effective_input_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = self.input_symbols.clone();
        if has_epsilon_moves(&self.transitions) {
            symbols.insert(EPSILON.to_string());
        }
        symbols
    }

    pub fn stack_symbols(&self) -> &BTreeSet<Symbol> {
        &self.stack_symbols
    }

    pub fn transitions(&self) -> &NpdaTransitions {
        &self.transitions
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn initial_stack_symbol(&self) -> &str {
        &self.initial_stack_symbol
    }

    pub fn final_states(&self) -> &BTreeSet<State> {
        &self.final_states
    }

    /// Returns the moves for `(state, input, stack top)`. Pass [`EPSILON`] for epsilon moves.
    pub fn moves(
        &self,
        state: &str,
        input: &str,
        stack_top: &str,
    ) -> Option<&BTreeSet<StackAction>> {
        self.transitions.get(state)?.get(input)?.get(stack_top)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }
}

impl TryFrom<NpdaRecord> for NpdaDefinition {
    type Error = AutomatonError;

    fn try_from(record: NpdaRecord) -> Result<Self, Self::Error> {
        Self::new(record)
    }
}

impl From<NpdaDefinition> for NpdaRecord {
    fn from(definition: NpdaDefinition) -> Self {
        NpdaRecord {
            states: definition.states.into_iter().collect(),
            input_symbols: definition.input_symbols.into_iter().collect(),
            stack_symbols: definition.stack_symbols.into_iter().collect(),
            transitions: definition
                .transitions
                .into_iter()
                .map(|(state, by_input)| {
                    let by_input = by_input
                        .into_iter()
                        .map(|(input, by_stack)| {
                            let by_stack = by_stack
                                .into_iter()
                                .map(|(top, actions)| (top, actions.into_iter().collect()))
                                .collect();
                            (input, by_stack)
                        })
                        .collect();
                    (state, by_input)
                })
                .collect(),
            initial_state: definition.initial_state,
            initial_stack_symbol: definition.initial_stack_symbol,
            final_states: definition.final_states.into_iter().collect(),
        }
    }
}

/// A validated single-tape nondeterministic Turing machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NtmRecord", into = "NtmRecord")]
pub struct NtmDefinition {
    states: BTreeSet<State>,
    input_symbols: BTreeSet<Symbol>,
    tape_symbols: BTreeSet<Symbol>,
    transitions: NtmTransitions,
    initial_state: State,
    blank_symbol: Symbol,
    final_states: BTreeSet<State>,
}

impl NtmDefinition {
    /// Validates `record` and builds the definition.
    pub fn new(record: NtmRecord) -> Result<Self, AutomatonError> {
        validate_ntm(&record)?;

        let mut transitions = NtmTransitions::new();
        for (state, by_read) in record.transitions {
            let row = transitions.entry(state).or_default();
            for (read, actions) in by_read {
                row.entry(read).or_default().extend(actions);
            }
        }

        Ok(Self {
            states: to_set(&record.states),
            input_symbols: to_set(&record.input_symbols),
            tape_symbols: to_set(&record.tape_symbols),
            transitions,
            initial_state: record.initial_state,
            blank_symbol: record.blank_symbol,
            final_states: to_set(&record.final_states),
        })
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn input_symbols(&self) -> &BTreeSet<Symbol> {
        &self.input_symbols
    }

    pub fn tape_symbols(&self) -> &BTreeSet<Symbol> {
        &self.tape_symbols
    }

    pub fn transitions(&self) -> &NtmTransitions {
        &self.transitions
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn blank_symbol(&self) -> &str {
        &self.blank_symbol
    }

    pub fn final_states(&self) -> &BTreeSet<State> {
        &self.final_states
    }

    /// Returns the moves available in `state` while `read` is under the head.
    pub fn moves(&self, state: &str, read: &str) -> Option<&BTreeSet<TapeAction>> {
        self.transitions.get(state)?.get(read)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }
}

impl TryFrom<NtmRecord> for NtmDefinition {
    type Error = AutomatonError;

    fn try_from(record: NtmRecord) -> Result<Self, Self::Error> {
        Self::new(record)
    }
}

impl From<NtmDefinition> for NtmRecord {
    fn from(definition: NtmDefinition) -> Self {
        NtmRecord {
            states: definition.states.into_iter().collect(),
            input_symbols: definition.input_symbols.into_iter().collect(),
            tape_symbols: definition.tape_symbols.into_iter().collect(),
            transitions: definition
                .transitions
                .into_iter()
                .map(|(state, by_read)| {
                    let by_read = by_read
                        .into_iter()
                        .map(|(read, actions)| (read, actions.into_iter().collect()))
                        .collect();
                    (state, by_read)
                })
                .collect(),
            initial_state: definition.initial_state,
            blank_symbol: definition.blank_symbol,
            final_states: definition.final_states.into_iter().collect(),
        }
    }
}

/// Any validated automaton, tagged by kind in its plain-data form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Automaton {
    Dfa(DfaDefinition),
    Npda(NpdaDefinition),
    Ntm(NtmDefinition),
}

/// Summary of an automaton's size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomatonInfo {
    pub kind: Kind,
    pub initial_state: State,
    pub state_count: usize,
    pub final_state_count: usize,
    pub transition_count: usize,
}

impl Automaton {
    pub fn kind(&self) -> Kind {
        match self {
            Automaton::Dfa(_) => Kind::Dfa,
            Automaton::Npda(_) => Kind::Npda,
            Automaton::Ntm(_) => Kind::Ntm,
        }
    }

    pub fn states(&self) -> &BTreeSet<State> {
        match self {
            Automaton::Dfa(dfa) => dfa.states(),
            Automaton::Npda(npda) => npda.states(),
            Automaton::Ntm(ntm) => ntm.states(),
        }
    }

    pub fn input_symbols(&self) -> &BTreeSet<Symbol> {
        match self {
            Automaton::Dfa(dfa) => dfa.input_symbols(),
            Automaton::Npda(npda) => npda.input_symbols(),
            Automaton::Ntm(ntm) => ntm.input_symbols(),
        }
    }

    pub fn initial_state(&self) -> &str {
        match self {
            Automaton::Dfa(dfa) => dfa.initial_state(),
            Automaton::Npda(npda) => npda.initial_state(),
            Automaton::Ntm(ntm) => ntm.initial_state(),
        }
    }

    pub fn final_states(&self) -> &BTreeSet<State> {
        match self {
            Automaton::Dfa(dfa) => dfa.final_states(),
            Automaton::Npda(npda) => npda.final_states(),
            Automaton::Ntm(ntm) => ntm.final_states(),
        }
    }

    pub fn info(&self) -> AutomatonInfo {
        let transition_count = match self {
            Automaton::Dfa(dfa) => dfa.transition_count(),
            Automaton::Npda(npda) => npda.transition_count(),
            Automaton::Ntm(ntm) => ntm.transition_count(),
        };

        AutomatonInfo {
            kind: self.kind(),
            initial_state: self.initial_state().to_string(),
            state_count: self.states().len(),
            final_state_count: self.final_states().len(),
            transition_count,
        }
    }
}

impl From<DfaDefinition> for Automaton {
    fn from(definition: DfaDefinition) -> Self {
        Automaton::Dfa(definition)
    }
}

impl From<NpdaDefinition> for Automaton {
    fn from(definition: NpdaDefinition) -> Self {
        Automaton::Npda(definition)
    }
}

impl From<NtmDefinition> for Automaton {
    fn from(definition: NtmDefinition) -> Self {
        Automaton::Ntm(definition)
    }
}

/// A creation payload for any kind. NPDA payloads use compound transition keys;
/// DFA and NTM payloads are already in record form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AutomatonSpec {
    Dfa(DfaRecord),
    Npda(NpdaSpec),
    Ntm(NtmRecord),
}

/// The plain-data form of an [`Automaton`], as written by the encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AutomatonRecord {
    Dfa(DfaRecord),
    Npda(NpdaRecord),
    Ntm(NtmRecord),
}

impl TryFrom<AutomatonRecord> for Automaton {
    type Error = AutomatonError;

    fn try_from(record: AutomatonRecord) -> Result<Self, Self::Error> {
        Ok(match record {
            AutomatonRecord::Dfa(record) => DfaDefinition::new(record)?.into(),
            AutomatonRecord::Npda(record) => NpdaDefinition::new(record)?.into(),
            AutomatonRecord::Ntm(record) => NtmDefinition::new(record)?.into(),
        })
    }
}

impl AutomatonSpec {
    /// Normalizes and validates the payload into an [`Automaton`].
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        Ok(match self {
            AutomatonSpec::Dfa(record) => DfaDefinition::new(record)?.into(),
            AutomatonSpec::Npda(spec) => NpdaDefinition::from_spec(spec)?.into(),
            AutomatonSpec::Ntm(record) => NtmDefinition::new(record)?.into(),
        })
    }
}
