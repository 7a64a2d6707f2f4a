//! Finite automata over string tokens.
//!
//! This module provides epsilon-NFA and DFA implementations with:
//! - Epsilon closure and move primitives
//! - Subset construction (NFA to DFA conversion), DFA states keyed by the
//!   exact set of NFA states they stand for
//! - Named, serde-friendly NFA definitions for caller-supplied automata

mod definition;
mod dfa;
mod epsilon_nfa;
mod state;
mod subset_construction;
mod symbol;

pub use definition::{DfaDefinition, EPSILON_LABEL, NamedNfa, NfaDefinition};
pub use dfa::{DFA, GraphEdge};
pub use epsilon_nfa::EpsilonNFA;
pub use state::{StateId, StateSet};
pub use subset_construction::{nfa_to_dfa, subset_construction};
pub use symbol::{Alphabet, EPSILON, SymbolId, is_epsilon};
