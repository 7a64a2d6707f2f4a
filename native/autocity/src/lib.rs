//! Automata for recognizing commands in free text.
//!
//! Two structures do the work:
//! - [`pattern`]: "contains these token classes, in order" matchers, built as
//!   an ε-NFA and compiled through subset construction ([`automaton`]).
//! - [`dafsa`]: a minimal acyclic word automaton backing the hint
//!   [`lexicon`].
//!
//! [`Engine`] bundles a set of compiled patterns with a lexicon as owned
//! application state.

pub mod automaton;
pub mod dafsa;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod pattern;

pub use automaton::{DFA, EpsilonNFA, NfaDefinition, nfa_to_dfa};
pub use dafsa::Dafsa;
pub use engine::{Analysis, Engine, EngineConfig, PatternConfig};
pub use error::{Error, Result};
pub use lexicon::{LexMatch, Lexicon};
pub use pattern::{CompiledPattern, compile_pattern, dfa_accepts};
