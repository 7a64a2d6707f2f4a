//! Symbol types for automata transitions.

use indexmap::IndexSet;

/// A symbol identifier represented as a u32.
/// The special value `EPSILON` represents an epsilon (empty) transition.
pub type SymbolId = u32;

/// Special symbol ID representing epsilon (empty) transitions.
/// We use u32::MAX as the epsilon marker.
pub const EPSILON: SymbolId = u32::MAX;

/// Check if a symbol is an epsilon transition.
#[inline]
pub fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// The tokens an automaton reads, numbered in insertion order.
///
/// Symbol `i` is the `i`-th distinct token interned. Epsilon is never part of
/// an alphabet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    tokens: IndexSet<String>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a token, returning its existing id if it is already known.
    pub fn intern(&mut self, token: &str) -> SymbolId {
        if let Some(id) = self.get(token) {
            return id;
        }
        let (idx, _) = self.tokens.insert_full(token.to_owned());
        idx as SymbolId
    }

    /// Look up the id of a token.
    pub fn get(&self, token: &str) -> Option<SymbolId> {
        self.tokens.get_index_of(token).map(|idx| idx as SymbolId)
    }

    /// Look up the token for an id. Epsilon and unknown ids have no token.
    pub fn token(&self, symbol: SymbolId) -> Option<&str> {
        if is_epsilon(symbol) {
            return None;
        }
        self.tokens.get_index(symbol as usize).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All symbol ids, in interning order.
    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.tokens.len()).map(|idx| idx as SymbolId)
    }

    /// `(id, token)` pairs, in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| (idx as SymbolId, token.as_str()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for Alphabet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut alphabet = Alphabet::new();
        for token in iter {
            alphabet.intern(token.as_ref());
        }
        alphabet
    }
}
