//! Epsilon Non-deterministic Finite Automaton (ε-NFA) implementation.

use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::{Alphabet, EPSILON, SymbolId, is_epsilon};
use std::collections::HashMap;

/// An Epsilon Non-deterministic Finite Automaton over string tokens.
///
/// Lookups never fail: a `(state, symbol)` pair without transitions, a state
/// past `num_states` or a symbol that was never interned all behave as an
/// empty destination set.
#[derive(Debug, Clone, Default)]
pub struct EpsilonNFA {
    /// Number of states (states are numbered 0..num_states)
    num_states: StateId,
    /// Start states
    start_states: StateSet,
    /// Final (accepting) states
    final_states: StateSet,
    /// Transitions: (source, symbol) -> set of destination states
    /// For epsilon transitions, symbol == EPSILON
    transitions: HashMap<(StateId, SymbolId), StateSet>,
    /// Tokens the automaton reads (excluding epsilon)
    alphabet: Alphabet,
    /// Cached epsilon closures for each state
    epsilon_closures: Option<Vec<StateSet>>,
}

impl EpsilonNFA {
    /// Create a new empty epsilon-NFA.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a state exists, expanding num_states if needed.
    fn ensure_state(&mut self, state: StateId) {
        if state >= self.num_states {
            self.num_states = state + 1;
            self.epsilon_closures = None;
        }
    }

    /// Allocate a fresh state and return its ID.
    pub fn add_state(&mut self) -> StateId {
        let id = self.num_states;
        self.ensure_state(id);
        id
    }

    /// Declare a token as part of the alphabet, returning its symbol.
    pub fn add_symbol(&mut self, token: &str) -> SymbolId {
        self.alphabet.intern(token)
    }

    /// Add a transition from source to destination on the given symbol.
    ///
    /// Transitions on a symbol id that is not part of the alphabet are kept
    /// but never followed by subset construction.
    pub fn add_transition(&mut self, source: StateId, symbol: SymbolId, destination: StateId) {
        self.ensure_state(source);
        self.ensure_state(destination);

        self.transitions
            .entry((source, symbol))
            .or_insert_with(|| StateSet::with_capacity(self.num_states as usize))
            .insert(destination);

        if is_epsilon(symbol) {
            self.epsilon_closures = None;
        }
    }

    /// Add a transition on a token, interning the token into the alphabet.
    pub fn add_transition_on(&mut self, source: StateId, token: &str, destination: StateId) {
        let symbol = self.add_symbol(token);
        self.add_transition(source, symbol, destination);
    }

    /// Add an epsilon transition from source to destination.
    pub fn add_epsilon_transition(&mut self, source: StateId, destination: StateId) {
        self.add_transition(source, EPSILON, destination);
    }

    /// Add a start state.
    pub fn add_start_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.start_states.insert(state);
    }

    /// Add a final (accepting) state.
    pub fn add_final_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.final_states.insert(state);
    }

    /// Get the number of states.
    pub fn num_states(&self) -> StateId {
        self.num_states
    }

    /// Get the start states.
    pub fn start_states(&self) -> &StateSet {
        &self.start_states
    }

    /// Get the final states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    /// Get the alphabet (all symbols except epsilon).
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Compute the epsilon closure of a single state using DFS.
    fn epsilon_closure_single(&self, state: StateId) -> StateSet {
        self.closure_from(std::iter::once(state))
    }

    fn closure_from(&self, seeds: impl Iterator<Item = StateId>) -> StateSet {
        let mut closure = StateSet::with_capacity(self.num_states as usize);
        let mut stack: Vec<StateId> = seeds.collect();

        while let Some(s) = stack.pop() {
            if closure.contains(s) {
                continue;
            }
            closure.insert(s);

            if let Some(destinations) = self.transitions.get(&(s, EPSILON)) {
                stack.extend(destinations.iter().filter(|&dest| !closure.contains(dest)));
            }
        }

        closure
    }

    /// Compute epsilon closures for all states (cached).
    pub fn compute_epsilon_closures(&mut self) {
        if self.epsilon_closures.is_some() {
            return;
        }

        let closures = (0..self.num_states)
            .map(|state| self.epsilon_closure_single(state))
            .collect();
        self.epsilon_closures = Some(closures);
    }

    /// Get the epsilon closure of a set of states: every state reachable
    /// through zero or more epsilon moves.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        match &self.epsilon_closures {
            Some(cached) => {
                let mut closure = StateSet::with_capacity(self.num_states as usize);
                for state in states.iter() {
                    match cached.get(state as usize) {
                        Some(c) => closure.union_with(c),
                        // Past the cache: nothing leaves it.
                        None => closure.insert(state),
                    }
                }
                closure
            }
            None => self.closure_from(states.iter()),
        }
    }

    /// Union of the `symbol` destinations of every state in `states`.
    /// No epsilon closure is applied.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        let mut reached = StateSet::with_capacity(self.num_states as usize);

        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                reached.union_with(destinations);
            }
        }

        reached
    }

    /// One subset-construction step: `epsilon_closure(move(states, symbol))`.
    pub fn step(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        self.epsilon_closure(&self.move_on_symbol(states, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_nfa_basic() {
        let mut nfa = EpsilonNFA::new();

        // 0 -a-> 1 -ε-> 2 (final)
        nfa.add_transition_on(0, "a", 1);
        nfa.add_epsilon_transition(1, 2);
        nfa.add_start_state(0);
        nfa.add_final_state(2);

        assert_eq!(nfa.num_states(), 3);
        assert_eq!(nfa.alphabet().len(), 1);

        let a = nfa.alphabet().get("a").unwrap();
        let start = StateSet::singleton(0, 3);
        assert_eq!(nfa.step(&start, a).to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_epsilon_closure() {
        let mut nfa = EpsilonNFA::new();

        // 0 -ε-> 1 -ε-> 2
        nfa.add_epsilon_transition(0, 1);
        nfa.add_epsilon_transition(1, 2);
        nfa.add_start_state(0);

        let start = StateSet::singleton(0, 3);
        assert_eq!(nfa.epsilon_closure(&start).to_vec(), vec![0, 1, 2]);

        nfa.compute_epsilon_closures();
        assert_eq!(nfa.epsilon_closure(&start).to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_epsilon_cycle_terminates() {
        let mut nfa = EpsilonNFA::new();
        nfa.add_epsilon_transition(0, 1);
        nfa.add_epsilon_transition(1, 0);

        let closure = nfa.epsilon_closure(&StateSet::singleton(1, 2));
        assert_eq!(closure.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_move_and_step() {
        let mut nfa = EpsilonNFA::new();

        // 0 -a-> 1, 0 -a-> 2, 1 -ε-> 3
        let a = nfa.add_symbol("a");
        nfa.add_transition(0, a, 1);
        nfa.add_transition(0, a, 2);
        nfa.add_epsilon_transition(1, 3);

        let start = StateSet::singleton(0, 4);
        assert_eq!(nfa.move_on_symbol(&start, a).to_vec(), vec![1, 2]);
        assert_eq!(nfa.step(&start, a).to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_absent_entries_are_empty() {
        let mut nfa = EpsilonNFA::new();
        let a = nfa.add_symbol("a");
        nfa.add_transition(0, a, 1);

        // State 9 was never declared, symbol 5 was never interned.
        let ghost = StateSet::singleton(9, 10);
        assert!(nfa.move_on_symbol(&ghost, a).is_empty());
        assert!(nfa.move_on_symbol(&StateSet::singleton(0, 2), 5).is_empty());
        assert_eq!(nfa.epsilon_closure(&ghost).to_vec(), vec![9]);

        nfa.compute_epsilon_closures();
        assert_eq!(nfa.epsilon_closure(&ghost).to_vec(), vec![9]);
    }

    #[test]
    fn test_symbol_ids_follow_interning_order() {
        // "b" is interned before "a", so "a" is not symbol 0.
        let mut nfa = EpsilonNFA::new();
        nfa.add_transition_on(1, "b", 2);
        nfa.add_transition_on(0, "a", 1);
        nfa.add_transition_on(0, "a", 2);

        let a = nfa.alphabet().get("a").unwrap();
        let b = nfa.alphabet().get("b").unwrap();
        assert_eq!((b, a), (0, 1));

        let start = StateSet::singleton(0, 3);
        assert_eq!(nfa.move_on_symbol(&start, a).to_vec(), vec![1, 2]);
        assert!(nfa.move_on_symbol(&start, b).is_empty());
        assert_eq!(nfa.step(&nfa.move_on_symbol(&start, a), b).to_vec(), vec![2]);
    }
}
