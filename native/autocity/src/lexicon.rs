//! Known words with hint tags, looked up through a minimized [`Dafsa`].

use crate::dafsa::Dafsa;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Result of a lexicon query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexMatch {
    /// Known words found in the text, lowercased.
    pub found: BTreeSet<String>,
    /// Union of the hint tags of every found word.
    pub hints: BTreeSet<String>,
}

impl LexMatch {
    pub fn has_hint(&self, hint: &str) -> bool {
        self.hints.contains(hint)
    }
}

/// A lexicon maps lowercase words to hint tags.
///
/// Reloading replaces everything; there is no incremental update.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    dafsa: Dafsa,
    hints: BTreeMap<String, BTreeSet<String>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lexicon from `word -> tags` entries.
    pub fn from_entries<I, W, T, H>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: IntoIterator<Item = H>,
        H: Into<String>,
    {
        let mut lexicon = Self::new();
        lexicon.load(entries);
        lexicon
    }

    /// Replace the lexicon with `word -> tags` entries.
    ///
    /// Words are lowercased; tags of words that collide after lowercasing are
    /// merged. The word DAFSA is rebuilt and minimized.
    pub fn load<I, W, T, H>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: IntoIterator<Item = H>,
        H: Into<String>,
    {
        let mut hints: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (word, tags) in entries {
            hints
                .entry(word.as_ref().to_lowercase())
                .or_default()
                .extend(tags.into_iter().map(Into::into));
        }

        self.dafsa = Dafsa::build(hints.keys());
        self.hints = hints;

        debug!(
            "loaded lexicon: {} words, {} DAFSA states",
            self.hints.len(),
            self.dafsa.num_states()
        );
    }

    /// Number of known words.
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn dafsa(&self) -> &Dafsa {
        &self.dafsa
    }

    /// Hint tags of a single (already lowercase) word.
    pub fn hints_for(&self, word: &str) -> Option<&BTreeSet<String>> {
        self.hints.get(word)
    }

    /// Find known words among the whitespace-separated tokens of `text`
    /// (compared lowercase) and collect their hints.
    pub fn query(&self, text: &str) -> LexMatch {
        let lowered = text.to_lowercase();
        self.query_tokens(lowered.split_whitespace())
    }

    /// Same as [`query`](Lexicon::query) over tokens that are already split
    /// and lowercased.
    pub fn query_tokens<'a, I>(&self, tokens: I) -> LexMatch
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = LexMatch::default();
        for token in tokens {
            if !self.dafsa.search(token) {
                continue;
            }
            if let Some(tags) = self.hints.get(token) {
                found.hints.extend(tags.iter().cloned());
            }
            found.found.insert(token.to_owned());
        }
        found
    }
}
