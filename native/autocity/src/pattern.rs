//! Ordered "contains" patterns over token streams.
//!
//! A pattern is a list of stages, each a set of acceptable tokens. It matches
//! any token sequence that contains, left to right, one token from every
//! stage, with any number of other tokens in between. Patterns are compiled
//! once into a [`DFA`] and can then be shared freely between readers.

use crate::automaton::{Alphabet, DFA, EpsilonNFA, StateId, nfa_to_dfa};
use log::debug;

/// A named pattern compiled to a DFA.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    name: String,
    dfa: DFA,
}

impl CompiledPattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    /// Union of the tokens of all stages.
    pub fn alphabet(&self) -> &Alphabet {
        self.dfa.alphabet()
    }

    /// Shorthand for [`dfa_accepts`] on this pattern's DFA.
    pub fn accepts<I, S>(&self, tokens: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        dfa_accepts(&self.dfa, tokens)
    }
}

/// Compile an ordered list of alternative sets into a [`CompiledPattern`].
///
/// The NFA has one state per stage plus a final one, laid out in a line.
/// Every stage state loops on the whole alphabet (skip a token) and moves to
/// the next state on any token of its own stage. The final state loops on
/// the whole alphabet too, so acceptance is sticky.
///
/// With no stages at all, the start state is final and every input matches.
/// A stage without tokens can never be passed.
pub fn compile_pattern<N, P, T, S>(name: N, stages: P) -> CompiledPattern
where
    N: Into<String>,
    P: IntoIterator<Item = T>,
    T: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let name = name.into();
    let mut nfa = EpsilonNFA::new();

    let stages: Vec<Vec<_>> = stages
        .into_iter()
        .map(|stage| {
            stage
                .into_iter()
                .map(|token| nfa.add_symbol(token.as_ref()))
                .collect()
        })
        .collect();

    let states: Vec<StateId> = (0..=stages.len()).map(|_| nfa.add_state()).collect();
    let symbols: Vec<_> = nfa.alphabet().symbols().collect();

    for (i, required) in stages.iter().enumerate() {
        let (current, next) = (states[i], states[i + 1]);
        for &symbol in &symbols {
            nfa.add_transition(current, symbol, current);
        }
        for &symbol in required {
            nfa.add_transition(current, symbol, next);
        }
    }

    let accept = states[stages.len()];
    for &symbol in &symbols {
        nfa.add_transition(accept, symbol, accept);
    }

    nfa.add_start_state(states[0]);
    nfa.add_final_state(accept);

    let dfa = nfa_to_dfa(&nfa);
    debug!(
        "compiled pattern {name:?}: {} stages, {} tokens, {} DFA states",
        stages.len(),
        symbols.len(),
        dfa.num_states()
    );

    CompiledPattern { name, dfa }
}

/// Run a token sequence through a DFA, ignoring what it cannot read.
///
/// Tokens outside the alphabet, and tokens with no transition from the
/// current state, leave the state unchanged instead of rejecting. The input
/// is accepted iff the state reached at the end is final.
pub fn dfa_accepts<I, S>(dfa: &DFA, tokens: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(start) = dfa.start_state() else {
        return false;
    };

    let end = tokens.into_iter().fold(start, |current, token| {
        dfa.transition_on(current, token.as_ref()).unwrap_or(current)
    });

    dfa.is_final(end)
}
