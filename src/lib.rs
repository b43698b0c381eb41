//! This crate defines finite automata, pushdown automata and Turing machines, validates
//! their definitions, and decides acceptance of input strings by exploring every branch of
//! a nondeterministic computation under an explicit bound.

pub mod catalog;
pub mod definition;
pub mod diagram;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod normalizer;
pub mod types;
pub mod validator;

/// Re-exports the built-in automata registry.
pub use catalog::{Catalog, CatalogEntry, CATALOG};
/// Re-exports validated definitions, their plain-data records and the creation payload.
pub use definition::{
    Automaton, AutomatonInfo, AutomatonRecord, AutomatonSpec, DfaDefinition, DfaRecord,
    NpdaDefinition, NpdaRecord, NpdaSpec, NtmDefinition, NtmRecord, StackAction, TapeAction,
};
/// Re-exports the diagram boundary types.
pub use diagram::{Diagram, Edge};
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{decode, encode, encode_pretty};
/// Re-exports the `AutomatonLoader` struct from the loader module.
pub use loader::AutomatonLoader;
/// Re-exports the execution entry points.
pub use machine::{accepts, Machine};
/// Re-exports the NPDA transition normalizer.
pub use normalizer::normalize_npda_transitions;
/// Re-exports shared types, constants and the error enum.
pub use types::{
    Acceptance, AutomatonError, ExplorationBound, Inconclusive, Kind, Move, State, Symbol,
    DEFAULT_MAX_CONFIGURATIONS, EPSILON, EPSILON_ALIAS,
};
