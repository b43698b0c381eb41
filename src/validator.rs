//! This module provides the checks run before an automaton definition is built.
//!
//! Checks run in a fixed order and the first violation wins: alphabet and state-set
//! structure, the initial configuration, the final-state subset, transition references,
//! and finally (DFA only) determinism. Each error names the offending element.

use crate::definition::{DfaRecord, NpdaRecord, NtmRecord};
use crate::types::{is_reserved, symbols, AutomatonError, Symbol, EPSILON_ALIAS};
use std::collections::{BTreeSet, HashSet};

/// Represents the violations found while validating a definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// The state set is empty.
    NoStates,
    /// A declared alphabet contains a reserved marker.
    ReservedSymbol { alphabet: &'static str, symbol: Symbol },
    /// A declared symbol is not exactly one character long.
    InvalidSymbol { alphabet: &'static str, symbol: Symbol },
    /// The initial state is not a member of the state set.
    InvalidInitialState(String),
    /// The initial stack symbol is not a member of the stack alphabet.
    InvalidInitialStackSymbol(Symbol),
    /// The blank symbol is missing from the tape alphabet or clashes with the input alphabet.
    InvalidBlankSymbol(Symbol),
    /// Input symbols that are missing from the tape alphabet.
    InputNotOnTape(Vec<Symbol>),
    /// Final states that are not members of the state set.
    UndefinedFinalStates(Vec<String>),
    /// Transitions that reference undeclared states.
    UndefinedStates(Vec<String>),
    /// Transitions that reference symbols outside their alphabet.
    UndefinedSymbols(Vec<String>),
    /// `(state, symbol)` pairs with more than one destination.
    Nondeterministic(Vec<String>),
}

impl From<ValidationError> for AutomatonError {
    /// Converts a `ValidationError` into an `AutomatonError::InvalidDefinition`.
    fn from(error: ValidationError) -> Self {
        let reason = match error {
            ValidationError::NoStates => "State set is empty".to_string(),
            ValidationError::ReservedSymbol { alphabet, symbol } => {
                format!("Reserved symbol '{}' declared in {}", symbol, alphabet)
            }
            ValidationError::InvalidSymbol { alphabet, symbol } => format!(
                "Symbol '{}' in {} must be exactly one character",
                symbol, alphabet
            ),
            ValidationError::InvalidInitialState(state) => {
                format!("Initial state '{}' is not in states", state)
            }
            ValidationError::InvalidInitialStackSymbol(symbol) => {
                format!("Initial stack symbol '{}' is not in stack_symbols", symbol)
            }
            ValidationError::InvalidBlankSymbol(symbol) => format!(
                "Blank symbol '{}' must be in tape_symbols and not in input_symbols",
                symbol
            ),
            ValidationError::InputNotOnTape(symbols) => {
                format!("Input symbols missing from tape_symbols: {:?}", symbols)
            }
            ValidationError::UndefinedFinalStates(states) => {
                format!("Final states not in states: {:?}", states)
            }
            ValidationError::UndefinedStates(references) => {
                format!("Transitions reference undefined states: {:?}", references)
            }
            ValidationError::UndefinedSymbols(references) => {
                format!("Transitions reference undefined symbols: {:?}", references)
            }
            ValidationError::Nondeterministic(pairs) => {
                format!("Multiple destinations for: {:?}", pairs)
            }
        };

        AutomatonError::InvalidDefinition(reason)
    }
}

/// Validates a DFA record.
pub fn validate_dfa(record: &DfaRecord) -> Result<(), AutomatonError> {
    [
        check_dfa_structure,
        check_dfa_initial_state,
        check_dfa_final_states,
        check_dfa_transitions,
        check_dfa_determinism,
    ]
    .iter()
    .try_for_each(|check| check(record))
    .map_err(Into::into)
}

/// Validates an NPDA record.
pub fn validate_npda(record: &NpdaRecord) -> Result<(), AutomatonError> {
    [
        check_npda_structure,
        check_npda_initial_configuration,
        check_npda_final_states,
        check_npda_transitions,
    ]
    .iter()
    .try_for_each(|check| check(record))
    .map_err(Into::into)
}

/// Validates an NTM record.
pub fn validate_ntm(record: &NtmRecord) -> Result<(), AutomatonError> {
    [
        check_ntm_structure,
        check_ntm_initial_configuration,
        check_ntm_final_states,
        check_ntm_transitions,
    ]
    .iter()
    .try_for_each(|check| check(record))
    .map_err(Into::into)
}

fn check_dfa_structure(record: &DfaRecord) -> Result<(), ValidationError> {
    check_states(&record.states)?;
    check_alphabet("input_symbols", &record.input_symbols)
}

fn check_npda_structure(record: &NpdaRecord) -> Result<(), ValidationError> {
    check_states(&record.states)?;
    check_alphabet("input_symbols", &record.input_symbols)?;
    check_alphabet("stack_symbols", &record.stack_symbols)
}

fn check_ntm_structure(record: &NtmRecord) -> Result<(), ValidationError> {
    check_states(&record.states)?;
    check_alphabet("input_symbols", &record.input_symbols)?;
    check_alphabet("tape_symbols", &record.tape_symbols)?;
    check_input_on_tape(record)
}

fn check_dfa_initial_state(record: &DfaRecord) -> Result<(), ValidationError> {
    check_initial_state(&record.initial_state, &record.states)
}

fn check_npda_initial_configuration(record: &NpdaRecord) -> Result<(), ValidationError> {
    check_initial_state(&record.initial_state, &record.states)?;
    check_initial_stack_symbol(record)
}

fn check_ntm_initial_configuration(record: &NtmRecord) -> Result<(), ValidationError> {
    check_initial_state(&record.initial_state, &record.states)?;
    check_blank_symbol(record)
}

fn check_dfa_final_states(record: &DfaRecord) -> Result<(), ValidationError> {
    check_final_states(&record.final_states, &record.states)
}

fn check_npda_final_states(record: &NpdaRecord) -> Result<(), ValidationError> {
    check_final_states(&record.final_states, &record.states)
}

fn check_ntm_final_states(record: &NtmRecord) -> Result<(), ValidationError> {
    check_final_states(&record.final_states, &record.states)
}

fn check_states(states: &[String]) -> Result<(), ValidationError> {
    if states.is_empty() {
        return Err(ValidationError::NoStates);
    }

    Ok(())
}

/// Rejects reserved markers and symbols that are not a single character.
fn check_alphabet(alphabet: &'static str, symbols: &[Symbol]) -> Result<(), ValidationError> {
    for symbol in symbols {
        if is_reserved(symbol) {
            return Err(ValidationError::ReservedSymbol {
                alphabet,
                symbol: symbol.clone(),
            });
        }

        if symbol.chars().count() != 1 {
            return Err(ValidationError::InvalidSymbol {
                alphabet,
                symbol: symbol.clone(),
            });
        }
    }

    Ok(())
}

fn check_initial_state(initial_state: &str, states: &[String]) -> Result<(), ValidationError> {
    if !states.iter().any(|state| state == initial_state) {
        return Err(ValidationError::InvalidInitialState(
            initial_state.to_string(),
        ));
    }

    Ok(())
}

fn check_initial_stack_symbol(record: &NpdaRecord) -> Result<(), ValidationError> {
    if !record.stack_symbols.contains(&record.initial_stack_symbol) {
        return Err(ValidationError::InvalidInitialStackSymbol(
            record.initial_stack_symbol.clone(),
        ));
    }

    Ok(())
}

fn check_blank_symbol(record: &NtmRecord) -> Result<(), ValidationError> {
    if !record.tape_symbols.contains(&record.blank_symbol)
        || record.input_symbols.contains(&record.blank_symbol)
    {
        return Err(ValidationError::InvalidBlankSymbol(
            record.blank_symbol.clone(),
        ));
    }

    Ok(())
}

fn check_input_on_tape(record: &NtmRecord) -> Result<(), ValidationError> {
    let tape: HashSet<&Symbol> = record.tape_symbols.iter().collect();
    let missing: BTreeSet<Symbol> = record
        .input_symbols
        .iter()
        .filter(|symbol| !tape.contains(symbol))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::InputNotOnTape(missing.into_iter().collect()));
    }

    Ok(())
}

fn check_final_states(final_states: &[String], states: &[String]) -> Result<(), ValidationError> {
    let declared: HashSet<&String> = states.iter().collect();
    let undefined: BTreeSet<String> = final_states
        .iter()
        .filter(|state| !declared.contains(state))
        .cloned()
        .collect();

    if !undefined.is_empty() {
        return Err(ValidationError::UndefinedFinalStates(
            undefined.into_iter().collect(),
        ));
    }

    Ok(())
}

/// Collects the references that fall outside their declared set.
///
/// States are reported before symbols, so a table with both problems reports states.
#[derive(Default)]
struct References {
    states: Vec<String>,
    symbols: Vec<String>,
}

impl References {
    fn state(
        &mut self,
        declared: &HashSet<&String>,
        state: &String,
        context: impl FnOnce() -> String,
    ) {
        if !declared.contains(state) {
            self.states.push(context());
        }
    }

    fn symbol(
        &mut self,
        declared: &HashSet<&String>,
        symbol: &String,
        context: impl FnOnce() -> String,
    ) {
        if !declared.contains(symbol) {
            self.symbols.push(context());
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if !self.states.is_empty() {
            return Err(ValidationError::UndefinedStates(self.states));
        }

        if !self.symbols.is_empty() {
            return Err(ValidationError::UndefinedSymbols(self.symbols));
        }

        Ok(())
    }
}

fn check_dfa_transitions(record: &DfaRecord) -> Result<(), ValidationError> {
    let states: HashSet<&String> = record.states.iter().collect();
    let inputs: HashSet<&String> = record.input_symbols.iter().collect();
    let mut references = References::default();

    for (state, table) in record.transitions.iter() {
        references.state(&states, state, || state.clone());

        for (symbol, next_state) in table.iter() {
            references.symbol(&inputs, symbol, || format!("{} --{}-->", state, symbol));
            references.state(&states, next_state, || {
                format!("{} --{}--> {}", state, symbol, next_state)
            });
        }
    }

    references.finish()
}

/// Every `(state, symbol)` pair may appear at most once across the whole table.
fn check_dfa_determinism(record: &DfaRecord) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let mut repeated = BTreeSet::new();

    for (state, table) in record.transitions.iter() {
        for (symbol, _) in table.iter() {
            if !seen.insert((state, symbol)) {
                repeated.insert(format!("({}, {})", state, symbol));
            }
        }
    }

    if !repeated.is_empty() {
        return Err(ValidationError::Nondeterministic(
            repeated.into_iter().collect(),
        ));
    }

    Ok(())
}

fn check_npda_transitions(record: &NpdaRecord) -> Result<(), ValidationError> {
    let states: HashSet<&String> = record.states.iter().collect();
    let inputs: HashSet<&String> = record.input_symbols.iter().collect();
    let stack: HashSet<&String> = record.stack_symbols.iter().collect();
    let mut references = References::default();

    for (state, by_input) in &record.transitions {
        references.state(&states, state, || state.clone());

        for (input, by_stack) in by_input {
            if !is_reserved(input) {
                references.symbol(&inputs, input, || format!("{} reading '{}'", state, input));
            }

            for (top, actions) in by_stack {
                references.symbol(&stack, top, || format!("{} with top '{}'", state, top));

                for action in actions {
                    let next_state = action.next_state().to_string();
                    references.state(&states, &next_state, || {
                        format!("{} --{},{}--> {}", state, display_input(input), top, next_state)
                    });

                    for pushed in symbols(action.replacement()).map(str::to_string) {
                        references.symbol(&stack, &pushed, || {
                            format!("{} pushing '{}'", state, pushed)
                        });
                    }
                }
            }
        }
    }

    references.finish()
}

fn check_ntm_transitions(record: &NtmRecord) -> Result<(), ValidationError> {
    let states: HashSet<&String> = record.states.iter().collect();
    let tape: HashSet<&String> = record.tape_symbols.iter().collect();
    let mut references = References::default();

    for (state, by_read) in &record.transitions {
        references.state(&states, state, || state.clone());

        for (read, actions) in by_read {
            references.symbol(&tape, read, || format!("{} reading '{}'", state, read));

            for action in actions {
                let next_state = action.next_state().to_string();
                let write = action.write().to_string();
                references.state(&states, &next_state, || {
                    format!("{} --{}--> {}", state, read, next_state)
                });
                references.symbol(&tape, &write, || format!("{} writing '{}'", state, write));
            }
        }
    }

    references.finish()
}

fn display_input(input: &str) -> &str {
    if input.is_empty() {
        EPSILON_ALIAS
    } else {
        input
    }
}
