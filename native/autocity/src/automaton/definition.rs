//! Caller-supplied automata with named states.
//!
//! [`NfaDefinition`] is the serde shape of an NFA whose states and symbols are
//! plain strings. It is converted with lenient semantics: nothing in a
//! definition is rejected, entries that cannot mean anything simply contribute
//! no transitions.

use crate::automaton::dfa::DFA;
use crate::automaton::epsilon_nfa::EpsilonNFA;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::subset_construction::nfa_to_dfa;
use crate::automaton::symbol::EPSILON;
use crate::error::Result;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The symbol that denotes an epsilon move in a definition.
pub const EPSILON_LABEL: &str = "";

/// An NFA with string-named states and symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfaDefinition {
    pub states: IndexSet<String>,
    pub alphabet: IndexSet<String>,
    pub start: String,
    #[serde(default)]
    pub finals: IndexSet<String>,
    /// state -> symbol -> destination states
    #[serde(default)]
    pub transitions: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl NfaDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Intern all names and build the numbered automaton.
    ///
    /// Declared states are numbered first, in declaration order. A state that
    /// only shows up as start, final or transition endpoint still gets a
    /// number. Transitions on symbols outside the declared alphabet are
    /// dropped.
    pub fn build(&self) -> NamedNfa {
        let mut names: IndexSet<String> = self.states.clone();
        let mut nfa = EpsilonNFA::new();

        for symbol in &self.alphabet {
            if symbol != EPSILON_LABEL {
                nfa.add_symbol(symbol);
            }
        }

        let mut state_of = |name: &str, nfa: &mut EpsilonNFA| -> StateId {
            let (idx, _) = names.insert_full(name.to_owned());
            let id = idx as StateId;
            // Names are numbered densely, so a new name is always the next state.
            while nfa.num_states() <= id {
                nfa.add_state();
            }
            id
        };

        for name in &self.states {
            state_of(name, &mut nfa);
        }

        let start = state_of(&self.start, &mut nfa);
        nfa.add_start_state(start);

        for name in &self.finals {
            let id = state_of(name, &mut nfa);
            nfa.add_final_state(id);
        }

        for (source, moves) in &self.transitions {
            let src = state_of(source, &mut nfa);
            for (symbol, destinations) in moves {
                let symbol_id = if symbol == EPSILON_LABEL {
                    EPSILON
                } else if let Some(id) = nfa.alphabet().get(symbol) {
                    id
                } else {
                    debug!("dropping transitions of {source:?} on undeclared symbol {symbol:?}");
                    continue;
                };
                for destination in destinations {
                    let dst = state_of(destination, &mut nfa);
                    nfa.add_transition(src, symbol_id, dst);
                }
            }
        }

        NamedNfa { nfa, names }
    }
}

/// An [`EpsilonNFA`] together with the names of its states.
#[derive(Debug, Clone)]
pub struct NamedNfa {
    nfa: EpsilonNFA,
    names: IndexSet<String>,
}

impl NamedNfa {
    pub fn nfa(&self) -> &EpsilonNFA {
        &self.nfa
    }

    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.names.get_index(state as usize).map(String::as_str)
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.names.get_index_of(name).map(|idx| idx as StateId)
    }

    /// Render a set of NFA states as `{a,b}`, names sorted.
    pub fn set_name(&self, states: &StateSet) -> String {
        let mut names: Vec<&str> = states
            .iter()
            .filter_map(|state| self.state_name(state))
            .collect();
        names.sort_unstable();
        format!("{{{}}}", names.join(","))
    }

    /// Run subset construction and describe the result with state-set names.
    pub fn to_dfa(&self) -> DfaDefinition {
        let dfa = nfa_to_dfa(&self.nfa);
        self.describe(&dfa)
    }

    /// Describe a DFA built from this NFA.
    pub fn describe(&self, dfa: &DFA) -> DfaDefinition {
        let name_of = |state: StateId| {
            dfa.state_set(state)
                .map(|set| self.set_name(set))
                .unwrap_or_default()
        };

        let states = dfa.states().map(|(id, _)| name_of(id)).collect();

        let mut alphabet: Vec<String> = dfa
            .alphabet()
            .iter()
            .map(|(_, token)| token.to_owned())
            .collect();
        alphabet.sort_unstable();

        let start = dfa.start_state().map(name_of);
        let finals = dfa.final_states().iter().map(name_of).collect();

        let mut transitions: BTreeMap<String, BTreeMap<String, String>> = dfa
            .states()
            .map(|(id, _)| (name_of(id), BTreeMap::new()))
            .collect();
        for (src, symbol, dst) in dfa.transitions() {
            if let Some(token) = dfa.alphabet().token(symbol) {
                transitions
                    .entry(name_of(src))
                    .or_default()
                    .insert(token.to_owned(), name_of(dst));
            }
        }

        DfaDefinition {
            states,
            alphabet,
            start,
            finals,
            transitions,
        }
    }
}

/// A DFA whose states are named after the NFA state sets they stand for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaDefinition {
    /// State names in discovery order, start state first.
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub start: Option<String>,
    pub finals: Vec<String>,
    pub transitions: BTreeMap<String, BTreeMap<String, String>>,
}

impl DfaDefinition {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
