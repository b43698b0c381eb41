use super::{explore, read_input, Machine};
use crate::definition::{NtmDefinition, TapeAction};
use crate::types::{Acceptance, AutomatonError, ExplorationBound};
use std::collections::BTreeMap;

/// An instantaneous description of an NTM run on a bi-infinite tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Configuration<'a> {
    state: &'a str,
    /// Non-blank cells only, so equal tapes always compare equal.
    tape: BTreeMap<i64, &'a str>,
    head: i64,
}

impl Machine for NtmDefinition {
    /// Searches for any reachable configuration in a final state. The tape contents at that
    /// point do not matter, and the machine need not halt there.
    ///
    /// The input is written from position 0 rightwards with the head on position 0.
    fn accepts(&self, input: &str, bound: ExplorationBound) -> Result<Acceptance, AutomatonError> {
        let symbols = read_input(self.input_symbols(), input)?;

        let initial = Configuration {
            state: self.initial_state(),
            tape: (0..).zip(symbols).collect(),
            head: 0,
        };

        Ok(explore(
            initial,
            bound,
            |configuration| self.final_states().contains(configuration.state),
            |configuration| successors(self, configuration),
        ))
    }
}

/// Applies every move keyed by the symbol under the head.
fn successors<'a>(
    ntm: &'a NtmDefinition,
    configuration: &Configuration<'a>,
) -> Vec<Configuration<'a>> {
    let read = configuration
        .tape
        .get(&configuration.head)
        .copied()
        .unwrap_or(ntm.blank_symbol());

    ntm.moves(configuration.state, read)
        .map(|actions| {
            actions
                .iter()
                .map(|action| apply(ntm, configuration, action))
                .collect()
        })
        .unwrap_or_default()
}

/// Writes under the head, then moves it.
fn apply<'a>(
    ntm: &'a NtmDefinition,
    configuration: &Configuration<'a>,
    action: &'a TapeAction,
) -> Configuration<'a> {
    let mut tape = configuration.tape.clone();

    if action.write() == ntm.blank_symbol() {
        tape.remove(&configuration.head);
    } else {
        tape.insert(configuration.head, action.write());
    }

    Configuration {
        state: action.next_state(),
        tape,
        head: action.movement().apply(configuration.head),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::NtmRecord;
    use crate::types::Inconclusive;

    fn ntm(json: &str) -> NtmDefinition {
        let record: NtmRecord = serde_json::from_str(json).unwrap();
        NtmDefinition::new(record).unwrap()
    }

    fn run(ntm: &NtmDefinition, input: &str) -> Result<Acceptance, AutomatonError> {
        ntm.accepts(input, ExplorationBound::default())
    }

    /// Scans right over the ones and appends another.
    fn unary_increment() -> NtmDefinition {
        ntm(r#"{
            "states": ["q0", "q1"],
            "input_symbols": ["1"],
            "tape_symbols": ["1", "_"],
            "transitions": {"q0": {"1": [["q0", "1", "R"]], "_": [["q1", "1", "N"]]}},
            "initial_state": "q0",
            "blank_symbol": "_",
            "final_states": ["q1"]
        }"#)
    }

    #[test]
    fn test_unary_increment_scenario() {
        let ntm = unary_increment();

        assert_eq!(run(&ntm, "111"), Ok(Acceptance::Accepted));
        assert_eq!(run(&ntm, ""), Ok(Acceptance::Accepted));
    }

    #[test]
    fn test_unbounded_movement_does_not_halt() {
        let ntm = ntm(r#"{
            "states": ["q0", "q1"],
            "input_symbols": ["1"],
            "tape_symbols": ["1", "_"],
            "transitions": {"q0": {"1": [["q0", "1", "R"]], "_": [["q0", "_", "R"]]}},
            "initial_state": "q0",
            "blank_symbol": "_",
            "final_states": ["q1"]
        }"#);

        let result = ntm.accepts("11", ExplorationBound::new(100)).unwrap();

        assert_eq!(
            result,
            Acceptance::DidNotHalt(Inconclusive {
                explored: 100,
                limit: 100
            })
        );
        assert_ne!(result, Acceptance::Rejected);
    }

    #[test]
    fn test_cycle_without_final_state_rejects() {
        // Stays on the same cell forever: the configuration repeats.
        let ntm = ntm(r#"{
            "states": ["q0", "q1"],
            "input_symbols": ["1"],
            "tape_symbols": ["1", "_"],
            "transitions": {"q0": {"1": [["q0", "1", "N"]]}},
            "initial_state": "q0",
            "blank_symbol": "_",
            "final_states": ["q1"]
        }"#);

        assert_eq!(run(&ntm, "1"), Ok(Acceptance::Rejected));
        // Halts at once: no move on blank.
        assert_eq!(run(&ntm, ""), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_nondeterministic_branches() {
        // Guesses where a "11" starts.
        let ntm = ntm(r#"{
            "states": ["q0", "q1", "q2"],
            "input_symbols": ["0", "1"],
            "tape_symbols": ["0", "1", "_"],
            "transitions": {
                "q0": {"0": [["q0", "0", "R"]], "1": [["q0", "1", "R"], ["q1", "1", "R"]]},
                "q1": {"1": [["q2", "1", "R"]]}
            },
            "initial_state": "q0",
            "blank_symbol": "_",
            "final_states": ["q2"]
        }"#);

        assert_eq!(run(&ntm, "0110"), Ok(Acceptance::Accepted));
        assert_eq!(run(&ntm, "0101"), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_final_state_accepts_regardless_of_further_moves() {
        // The initial state is final, although the machine would run right forever.
        let ntm = ntm(r#"{
            "states": ["q0"],
            "input_symbols": ["1"],
            "tape_symbols": ["1", "_"],
            "transitions": {"q0": {"1": [["q0", "1", "R"]], "_": [["q0", "_", "R"]]}},
            "initial_state": "q0",
            "blank_symbol": "_",
            "final_states": ["q0"]
        }"#);

        assert_eq!(ntm.accepts("1", ExplorationBound::new(0)), Ok(Acceptance::Accepted));
    }

    #[test]
    fn test_head_moves_left_of_the_input() {
        let ntm = ntm(r#"{
            "states": ["q0", "q1", "q2"],
            "input_symbols": ["1"],
            "tape_symbols": ["1", "x", "_"],
            "transitions": {
                "q0": {"1": [["q1", "x", "L"]]},
                "q1": {"_": [["q2", "1", "N"]]}
            },
            "initial_state": "q0",
            "blank_symbol": "_",
            "final_states": ["q2"]
        }"#);

        assert_eq!(run(&ntm, "1"), Ok(Acceptance::Accepted));
    }

    #[test]
    fn test_foreign_symbol_is_an_error() {
        assert_eq!(
            run(&unary_increment(), "1_1"),
            Err(AutomatonError::SymbolNotInAlphabet("_".to_string()))
        );
    }
}
