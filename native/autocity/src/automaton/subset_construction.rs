//! Subset construction algorithm for converting ε-NFA to DFA.

use crate::automaton::dfa::DFA;
use crate::automaton::epsilon_nfa::EpsilonNFA;
use crate::automaton::state::StateSet;
use log::{debug, trace};

/// Convert an epsilon-NFA to a DFA using the powerset construction algorithm.
///
/// Only state sets reachable from the start closure are ever created. A
/// symbol that leads nowhere from a state set leaves the transition undefined.
pub fn subset_construction(nfa: &EpsilonNFA) -> DFA {
    let mut dfa = DFA::new(nfa.alphabet().clone());

    // Initial DFA state is the epsilon closure of NFA start states
    let initial_set = nfa.epsilon_closure(nfa.start_states());

    if initial_set.is_empty() {
        // No reachable states - return empty DFA
        return dfa;
    }

    let is_final = initial_set.intersects(nfa.final_states());
    let (initial_dfa_state, _) = dfa.add_state(initial_set.clone());
    dfa.set_start_state(initial_dfa_state);
    if is_final {
        dfa.add_final_state(initial_dfa_state);
    }

    // Discovered but not yet expanded state sets
    let mut worklist: Vec<StateSet> = vec![initial_set];

    while let Some(current_nfa_set) = worklist.pop() {
        let Some(current_dfa_state) = dfa.state_id(&current_nfa_set) else {
            continue;
        };

        for symbol in nfa.alphabet().symbols() {
            let next_nfa_set = nfa.step(&current_nfa_set, symbol);

            if next_nfa_set.is_empty() {
                continue;
            }

            let is_final = next_nfa_set.intersects(nfa.final_states());
            let (next_dfa_state, inserted) = dfa.add_state(next_nfa_set.clone());
            if inserted {
                trace!("DFA state {next_dfa_state} = {next_nfa_set:?}");
                if is_final {
                    dfa.add_final_state(next_dfa_state);
                }
                worklist.push(next_nfa_set);
            }

            dfa.add_transition(current_dfa_state, symbol, next_dfa_state);
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states ({} final)",
        nfa.num_states(),
        dfa.num_states(),
        dfa.final_states().len()
    );

    dfa
}

/// Convert an NFA to an equivalent DFA.
///
/// Epsilon closures are computed once up front on a copy so callers can keep
/// sharing `nfa` immutably.
pub fn nfa_to_dfa(nfa: &EpsilonNFA) -> DFA {
    let mut nfa = nfa.clone();
    nfa.compute_epsilon_closures();
    subset_construction(&nfa)
}
