//! Deterministic Finite Automaton (DFA) implementation.
//!
//! Every DFA state stands for a set of NFA states. The set itself is the
//! state's identity: [`DFA::add_state`] interns it, so two state sets with the
//! same members always resolve to the same [`StateId`].

use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::{Alphabet, SymbolId};
use indexmap::IndexSet;
use std::collections::HashMap;

/// A labeled edge in the graph representation: (source, destination, token).
pub type GraphEdge<'a> = (StateId, StateId, &'a str);

/// A Deterministic Finite Automaton with a partial transition function.
///
/// A missing `(state, symbol)` entry means "no move"; there is no implicit
/// dead state.
#[derive(Debug, Clone, Default)]
pub struct DFA {
    /// NFA state sets, indexed by DFA state ID
    states: IndexSet<StateSet>,
    /// Start state (None if empty)
    start_state: Option<StateId>,
    /// Final (accepting) states
    final_states: StateSet,
    /// Transitions: (source, symbol) -> destination
    transitions: HashMap<(StateId, SymbolId), StateId>,
    /// Tokens the automaton reads
    alphabet: Alphabet,
}

impl DFA {
    /// Create a new DFA without states over the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Self::default()
        }
    }

    /// Intern a state set. Returns its ID and whether it was newly added.
    pub fn add_state(&mut self, nfa_states: StateSet) -> (StateId, bool) {
        let (idx, inserted) = self.states.insert_full(nfa_states);
        (idx as StateId, inserted)
    }

    /// Find the DFA state standing for exactly these NFA states.
    pub fn state_id(&self, nfa_states: &StateSet) -> Option<StateId> {
        self.states.get_index_of(nfa_states).map(|idx| idx as StateId)
    }

    /// The NFA states a DFA state stands for.
    pub fn state_set(&self, state: StateId) -> Option<&StateSet> {
        self.states.get_index(state as usize)
    }

    /// Set the start state.
    pub fn set_start_state(&mut self, state: StateId) {
        self.start_state = Some(state);
    }

    /// Add a final (accepting) state.
    pub fn add_final_state(&mut self, state: StateId) {
        self.final_states.insert(state);
    }

    /// Add a transition.
    pub fn add_transition(&mut self, source: StateId, symbol: SymbolId, destination: StateId) {
        self.transitions.insert((source, symbol), destination);
    }

    /// Get the transition from a state on a symbol.
    pub fn transition(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.transitions.get(&(source, symbol)).copied()
    }

    /// Get the transition from a state on a token. Tokens outside the
    /// alphabet have no transition.
    pub fn transition_on(&self, source: StateId, token: &str) -> Option<StateId> {
        self.alphabet
            .get(token)
            .and_then(|symbol| self.transition(source, symbol))
    }

    /// Get the number of states.
    pub fn num_states(&self) -> StateId {
        self.states.len() as StateId
    }

    /// Get the start state.
    pub fn start_state(&self) -> Option<StateId> {
        self.start_state
    }

    /// The NFA state set of the start state.
    pub fn start_set(&self) -> Option<&StateSet> {
        self.start_state.and_then(|state| self.state_set(state))
    }

    /// Get the final states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(state)
    }

    /// Get the alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// All states with the NFA states they stand for, in discovery order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &StateSet)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(idx, set)| (idx as StateId, set))
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.transitions
            .iter()
            .map(|(&(src, sym), &dst)| (src, sym, dst))
    }

    /// Convert to a graph representation, edges sorted by source and token.
    /// Returns: (nodes, edges) where edges are (src, dst, token)
    pub fn to_graph(&self) -> (Vec<StateId>, Vec<GraphEdge<'_>>) {
        let nodes: Vec<StateId> = (0..self.num_states()).collect();
        let mut edges: Vec<GraphEdge<'_>> = self
            .transitions()
            .filter_map(|(src, sym, dst)| self.alphabet.token(sym).map(|token| (src, dst, token)))
            .collect();
        edges.sort_unstable_by(|a, b| (a.0, a.2).cmp(&(b.0, b.2)));

        (nodes, edges)
    }
}
