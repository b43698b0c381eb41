use super::{read_input, Machine};
use crate::definition::DfaDefinition;
use crate::types::{Acceptance, AutomatonError, ExplorationBound};
use log::trace;

impl Machine for DfaDefinition {
    /// Walks the single path through the DFA. The bound is not consulted: a DFA always
    /// halts after one step per input symbol.
    ///
    /// A missing transition on an in-alphabet symbol rejects immediately.
    fn accepts(&self, input: &str, _bound: ExplorationBound) -> Result<Acceptance, AutomatonError> {
        let symbols = read_input(self.input_symbols(), input)?;
        let mut state = self.initial_state();

        for symbol in symbols {
            match self.transition(state, symbol) {
                Some(next_state) => {
                    trace!("{} --{}--> {}", state, symbol, next_state);
                    state = next_state.as_str();
                }
                None => {
                    trace!("No transition from {} on {}", state, symbol);
                    return Ok(Acceptance::Rejected);
                }
            }
        }

        if self.final_states().contains(state) {
            Ok(Acceptance::Accepted)
        } else {
            Ok(Acceptance::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DfaRecord;

    /// States `{q0, q1}` over `{a, b}`: `q0-a->q1`, `q1-a->q1`, `q1-b->q0`, final `{q1}`.
    fn dfa() -> DfaDefinition {
        let record: DfaRecord = serde_json::from_str(
            r#"{
                "states": ["q0", "q1"],
                "input_symbols": ["a", "b"],
                "transitions": {"q0": {"a": "q1"}, "q1": {"a": "q1", "b": "q0"}},
                "initial_state": "q0",
                "final_states": ["q1"]
            }"#,
        )
        .unwrap();

        DfaDefinition::new(record).unwrap()
    }

    fn run(dfa: &DfaDefinition, input: &str) -> Result<Acceptance, AutomatonError> {
        dfa.accepts(input, ExplorationBound::default())
    }

    #[test]
    fn test_accepts_scenario() {
        let dfa = dfa();

        assert_eq!(run(&dfa, "a"), Ok(Acceptance::Accepted));
        assert_eq!(run(&dfa, "ab"), Ok(Acceptance::Rejected));
        assert_eq!(run(&dfa, ""), Ok(Acceptance::Rejected));
        assert_eq!(run(&dfa, "abaa"), Ok(Acceptance::Accepted));
    }

    #[test]
    fn test_missing_transition_rejects() {
        // q0 has no move on b.
        assert_eq!(run(&dfa(), "ba"), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_foreign_symbol_is_an_error() {
        let dfa = dfa();

        assert_eq!(
            run(&dfa, "c"),
            Err(AutomatonError::SymbolNotInAlphabet("c".to_string()))
        );
        // Reported even when an earlier symbol would already reject.
        assert_eq!(
            run(&dfa, "bc"),
            Err(AutomatonError::SymbolNotInAlphabet("c".to_string()))
        );
    }

    #[test]
    fn test_repeated_calls_agree() {
        let dfa = dfa();

        for input in ["", "a", "ab", "aba", "bb"] {
            let first = run(&dfa, input);
            for _ in 0..3 {
                assert_eq!(run(&dfa, input), first);
            }
        }
    }

    #[test]
    fn test_no_final_states_never_accepts() {
        let record: DfaRecord = serde_json::from_str(
            r#"{
                "states": ["q0"],
                "input_symbols": ["a"],
                "transitions": {"q0": {"a": "q0"}},
                "initial_state": "q0",
                "final_states": []
            }"#,
        )
        .unwrap();
        let dfa = DfaDefinition::new(record).unwrap();

        assert_eq!(run(&dfa, ""), Ok(Acceptance::Rejected));
        assert_eq!(run(&dfa, "aaaa"), Ok(Acceptance::Rejected));
    }
}
