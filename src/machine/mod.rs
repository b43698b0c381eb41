//! This module defines the execution engines that decide whether an automaton accepts an
//! input string.
//!
//! Every engine borrows an immutable definition for the duration of one call and keeps its
//! configurations local to that call, so one definition may be tested from many threads at
//! once. The nondeterministic engines share [`explore`], a breadth-first search over
//! configurations with a visited set and an [`ExplorationBound`].

mod dfa;
mod npda;
mod ntm;

use crate::definition::Automaton;
use crate::types::{symbols, Acceptance, AutomatonError, ExplorationBound, Inconclusive, Symbol};
use log::{debug, trace};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

/// An automaton that can be asked whether it accepts an input string.
pub trait Machine {
    /// Decides acceptance of `input`, exploring at most `bound` configurations.
    ///
    /// # Returns
    ///
    /// * `Ok(Acceptance::Accepted)` if an accepting configuration is reachable.
    /// * `Ok(Acceptance::Rejected)` if the reachable configurations were exhausted.
    /// * `Ok(Acceptance::DidNotHalt(_))` if the bound ran out first.
    /// * `Err(AutomatonError::SymbolNotInAlphabet)` if `input` has a foreign symbol.
    fn accepts(&self, input: &str, bound: ExplorationBound) -> Result<Acceptance, AutomatonError>;
}

impl Machine for Automaton {
    fn accepts(&self, input: &str, bound: ExplorationBound) -> Result<Acceptance, AutomatonError> {
        match self {
            Automaton::Dfa(dfa) => dfa.accepts(input, bound),
            Automaton::Npda(npda) => npda.accepts(input, bound),
            Automaton::Ntm(ntm) => ntm.accepts(input, bound),
        }
    }
}

/// Tests `input` against `automaton`.
pub fn accepts(
    automaton: &Automaton,
    input: &str,
    bound: ExplorationBound,
) -> Result<Acceptance, AutomatonError> {
    automaton.accepts(input, bound)
}

/// Splits `input` into symbols, failing on the first one outside `alphabet`.
pub(crate) fn read_input<'a>(
    alphabet: &BTreeSet<Symbol>,
    input: &'a str,
) -> Result<Vec<&'a str>, AutomatonError> {
    symbols(input)
        .map(|symbol| {
            if alphabet.contains(symbol) {
                Ok(symbol)
            } else {
                Err(AutomatonError::SymbolNotInAlphabet(symbol.to_string()))
            }
        })
        .collect()
}

/// Breadth-first search from `initial` until an accepting configuration is found, the
/// reachable space runs out, or `bound.max_configurations` configurations were expanded.
///
/// Configurations are compared by value; one already seen is never queued again.
pub(crate) fn explore<C, A, S>(
    initial: C,
    bound: ExplorationBound,
    is_accepting: A,
    mut successors: S,
) -> Acceptance
where
    C: Clone + Eq + Hash + Debug,
    A: Fn(&C) -> bool,
    S: FnMut(&C) -> Vec<C>,
{
    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();
    let mut explored = 0;

    visited.insert(initial.clone());
    frontier.push_back(initial);

    while let Some(configuration) = frontier.pop_front() {
        if is_accepting(&configuration) {
            debug!(
                "Accepting configuration found after {} expansions: {:?}",
                explored, configuration
            );
            return Acceptance::Accepted;
        }

        if explored >= bound.max_configurations {
            debug!(
                "Exploration bound of {} reached with {} configurations queued",
                bound.max_configurations,
                frontier.len() + 1
            );
            return Acceptance::DidNotHalt(Inconclusive {
                explored,
                limit: bound.max_configurations,
            });
        }

        explored += 1;
        trace!("Expanding {:?}", configuration);

        for next in successors(&configuration) {
            if !visited.contains(&next) {
                visited.insert(next.clone());
                frontier.push_back(next);
            }
        }
    }

    debug!("Configuration space exhausted after {} expansions", explored);
    Acceptance::Rejected
}
