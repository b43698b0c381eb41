use super::{explore, read_input, Machine};
use crate::definition::{NpdaDefinition, StackAction};
use crate::types::{symbols, Acceptance, AutomatonError, ExplorationBound, EPSILON};

/// An instantaneous description of an NPDA run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Configuration<'a> {
    state: &'a str,
    /// Number of input symbols consumed so far.
    position: usize,
    /// The last element is the top of the stack.
    stack: Vec<&'a str>,
}

impl Machine for NpdaDefinition {
    /// Searches for a configuration that has consumed all input in a final state.
    /// Acceptance is by final state; the stack need not be empty.
    ///
    /// Epsilon cycles that return to an identical configuration are cut by the visited set.
    /// Cycles that keep growing the stack are only stopped by `bound`, which yields
    /// [`Acceptance::DidNotHalt`].
    fn accepts(&self, input: &str, bound: ExplorationBound) -> Result<Acceptance, AutomatonError> {
        let symbols = read_input(self.input_symbols(), input)?;

        let initial = Configuration {
            state: self.initial_state(),
            position: 0,
            stack: vec![self.initial_stack_symbol()],
        };

        Ok(explore(
            initial,
            bound,
            |configuration| {
                configuration.position == symbols.len()
                    && self.final_states().contains(configuration.state)
            },
            |configuration| successors(self, configuration, &symbols),
        ))
    }
}

/// Applies every move that matches the stack top: those consuming the next input symbol,
/// and the epsilon moves. An empty stack has no moves.
fn successors<'a>(
    npda: &'a NpdaDefinition,
    configuration: &Configuration<'a>,
    input: &[&'a str],
) -> Vec<Configuration<'a>> {
    let Some(&top) = configuration.stack.last() else {
        return Vec::new();
    };

    let mut next = Vec::new();

    if let Some(&symbol) = input.get(configuration.position) {
        if let Some(actions) = npda.moves(configuration.state, symbol, top) {
            next.extend(
                actions
                    .iter()
                    .map(|action| apply(configuration, action, configuration.position + 1)),
            );
        }
    }

    if let Some(actions) = npda.moves(configuration.state, EPSILON, top) {
        next.extend(
            actions
                .iter()
                .map(|action| apply(configuration, action, configuration.position)),
        );
    }

    next
}

/// Pops the top and pushes the replacement so that its first symbol ends on top.
fn apply<'a>(
    configuration: &Configuration<'a>,
    action: &'a StackAction,
    position: usize,
) -> Configuration<'a> {
    let mut stack = configuration.stack.clone();
    stack.pop();

    let pushed: Vec<&'a str> = symbols(action.replacement()).collect();
    stack.extend(pushed.into_iter().rev());

    Configuration {
        state: action.next_state(),
        position,
        stack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::NpdaSpec;

    fn npda(json: &str) -> NpdaDefinition {
        let spec: NpdaSpec = serde_json::from_str(json).unwrap();
        NpdaDefinition::from_spec(spec).unwrap()
    }

    fn run(npda: &NpdaDefinition, input: &str) -> Result<Acceptance, AutomatonError> {
        npda.accepts(input, ExplorationBound::default())
    }

    /// `{aⁿbⁿ | n ≥ 1}`, accepting with `Z` still on the stack.
    fn anbn() -> NpdaDefinition {
        npda(
            r#"{
                "states": ["q0", "q1", "q2"],
                "input_symbols": ["a", "b"],
                "stack_symbols": ["Z", "A"],
                "transitions": {
                    "q0": {"a,Z": [["q0", "AZ"]], "a,A": [["q0", "AA"]], "b,A": [["q1", ""]]},
                    "q1": {"b,A": [["q1", ""]], "Z": [["q2", "Z"]]}
                },
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q2"]
            }"#,
        )
    }

    /// Even-length palindromes `wwᴿ`, guessing the middle with epsilon moves.
    fn even_palindromes() -> NpdaDefinition {
        npda(
            r#"{
                "states": ["q0", "q1", "q2"],
                "input_symbols": ["a", "b"],
                "stack_symbols": ["Z", "A", "B"],
                "transitions": {
                    "q0": {
                        "a,Z": [["q0", "AZ"]], "a,A": [["q0", "AA"]], "a,B": [["q0", "AB"]],
                        "b,Z": [["q0", "BZ"]], "b,A": [["q0", "BA"]], "b,B": [["q0", "BB"]],
                        "Z": [["q1", "Z"]], "A": [["q1", "A"]], "B": [["q1", "B"]]
                    },
                    "q1": {"a,A": [["q1", ""]], "b,B": [["q1", ""]], "Z": [["q2", "Z"]]}
                },
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q2"]
            }"#,
        )
    }

    #[test]
    fn test_anbn_scenario() {
        let npda = anbn();

        assert_eq!(run(&npda, "aabb"), Ok(Acceptance::Accepted));
        assert_eq!(run(&npda, "aab"), Ok(Acceptance::Rejected));
        assert_eq!(run(&npda, "ab"), Ok(Acceptance::Accepted));
        assert_eq!(run(&npda, "abab"), Ok(Acceptance::Rejected));
        assert_eq!(run(&npda, ""), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_nondeterministic_guess() {
        let npda = even_palindromes();

        assert_eq!(run(&npda, "abba"), Ok(Acceptance::Accepted));
        assert_eq!(run(&npda, "abaaba"), Ok(Acceptance::Accepted));
        assert_eq!(run(&npda, ""), Ok(Acceptance::Accepted));
        assert_eq!(run(&npda, "ab"), Ok(Acceptance::Rejected));
        assert_eq!(run(&npda, "aba"), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_epsilon_move_needs_no_input() {
        let npda = npda(
            r#"{
                "states": ["q0", "q1"],
                "input_symbols": ["a"],
                "stack_symbols": ["Z"],
                "transitions": {"q0": {"Z": [["q1", "Z"]]}},
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q1"]
            }"#,
        );

        assert_eq!(run(&npda, ""), Ok(Acceptance::Accepted));
        assert_eq!(run(&npda, "a"), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_push_order_puts_first_symbol_on_top() {
        // After pushing "AB" over Z, only a move keyed on top A can fire.
        let npda = npda(
            r#"{
                "states": ["q0", "q1", "q2"],
                "input_symbols": ["a"],
                "stack_symbols": ["Z", "A", "B"],
                "transitions": {
                    "q0": {"a,Z": [["q1", "AB"]]},
                    "q1": {"A": [["q2", ""]]}
                },
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q2"]
            }"#,
        );

        assert_eq!(run(&npda, "a"), Ok(Acceptance::Accepted));
    }

    #[test]
    fn test_empty_stack_is_a_dead_end() {
        let npda = npda(
            r#"{
                "states": ["q0"],
                "input_symbols": ["a"],
                "stack_symbols": ["Z"],
                "transitions": {"q0": {"a,Z": [["q0", ""]]}},
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q0"]
            }"#,
        );

        assert_eq!(run(&npda, "a"), Ok(Acceptance::Accepted));
        assert_eq!(run(&npda, "aa"), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_epsilon_self_loop_terminates() {
        let npda = npda(
            r#"{
                "states": ["q0", "q1"],
                "input_symbols": ["a"],
                "stack_symbols": ["Z"],
                "transitions": {"q0": {"Z": [["q0", "Z"]]}},
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q1"]
            }"#,
        );

        assert_eq!(run(&npda, ""), Ok(Acceptance::Rejected));
    }

    #[test]
    fn test_growing_epsilon_loop_hits_bound() {
        let npda = npda(
            r#"{
                "states": ["q0", "q1"],
                "input_symbols": ["a"],
                "stack_symbols": ["Z"],
                "transitions": {"q0": {"Z": [["q0", "ZZ"]]}},
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q1"]
            }"#,
        );

        let result = npda.accepts("a", ExplorationBound::new(50)).unwrap();

        assert!(matches!(result, Acceptance::DidNotHalt(_)));
        assert_ne!(result, Acceptance::Rejected);
    }

    #[test]
    fn test_foreign_symbol_is_an_error() {
        assert_eq!(
            run(&anbn(), "abc"),
            Err(AutomatonError::SymbolNotInAlphabet("c".to_string()))
        );
        assert_eq!(
            run(&anbn(), "aZ"),
            Err(AutomatonError::SymbolNotInAlphabet("Z".to_string()))
        );
    }
}
