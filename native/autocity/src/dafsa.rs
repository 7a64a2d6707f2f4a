//! Deterministic acyclic finite-state automaton (DAFSA) for word membership.
//!
//! Words are inserted into a trie, then [`Dafsa::minimize`] merges every pair
//! of nodes that accept the same set of suffixes. Nodes live in an arena and
//! are addressed by [`NodeId`], so sharing a subtree between parents is just
//! two edges holding the same index.

use crate::error::{Error, Result};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Index of a node in the DAFSA arena.
pub type NodeId = u32;

/// A labeled edge in the graph representation: (source, destination, label).
pub type DafsaEdge = (NodeId, NodeId, char);

#[derive(Debug, Clone, Default)]
struct Node {
    edges: BTreeMap<char, NodeId>,
    accepting: bool,
}

/// Canonical description of a node once its children are canonical: its
/// accepting flag and its labeled edges to canonical child indices.
#[derive(Debug, PartialEq, Eq, Hash)]
struct Signature {
    accepting: bool,
    edges: Vec<(char, NodeId)>,
}

/// A word set stored as a trie, optionally minimized into a DAG.
///
/// Searching works at any point. Adding words is only allowed until the
/// first call to [`minimize`](Dafsa::minimize).
#[derive(Debug, Clone)]
pub struct Dafsa {
    nodes: Vec<Node>,
    root: NodeId,
    minimized: bool,
}

impl Default for Dafsa {
    fn default() -> Self {
        Self::new()
    }
}

impl Dafsa {
    /// Create a DAFSA holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            root: 0,
            minimized: false,
        }
    }

    /// Insert every word, then minimize.
    pub fn build<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dafsa = Self::new();
        for word in words {
            dafsa.insert(word.as_ref());
        }
        dafsa.minimize();
        dafsa
    }

    /// Add a word. Adding a word twice has no further effect.
    ///
    /// Fails with [`Error::InsertAfterMinimize`] once the structure has been
    /// minimized, since a new path could run through shared nodes.
    pub fn add(&mut self, word: &str) -> Result<()> {
        if self.minimized {
            return Err(Error::InsertAfterMinimize {
                word: word.to_owned(),
            });
        }
        self.insert(word);
        Ok(())
    }

    fn insert(&mut self, word: &str) {
        let mut current = self.root;
        for label in word.chars() {
            current = match self.nodes[current as usize].edges.get(&label) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    self.nodes.push(Node::default());
                    self.nodes[current as usize].edges.insert(label, child);
                    child
                }
            };
        }
        self.nodes[current as usize].accepting = true;
    }

    /// Check whether a word was added.
    pub fn search(&self, word: &str) -> bool {
        let mut current = self.root;
        for label in word.chars() {
            match self.child(current, label) {
                Some(child) => current = child,
                None => return false,
            }
        }
        self.is_accepting(current)
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Merge equivalent nodes bottom-up.
    ///
    /// Each node is visited after all of its children (explicit post-order
    /// stack). Its edges are redirected to the canonical children, and its
    /// [`Signature`] is looked up in a register: the first node with a given
    /// signature becomes the representative, later ones are replaced by it.
    /// Unreachable nodes are then dropped and the arena renumbered.
    ///
    /// Calling this again on a minimized DAFSA does nothing.
    pub fn minimize(&mut self) {
        if self.minimized {
            return;
        }
        let before = self.nodes.len();

        let mut canonical: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut register: HashMap<Signature, NodeId> = HashMap::new();
        let mut stack: Vec<(NodeId, bool)> = vec![(self.root, false)];

        while let Some((id, children_done)) = stack.pop() {
            if canonical[id as usize].is_some() {
                continue;
            }
            if !children_done {
                stack.push((id, true));
                stack.extend(
                    self.nodes[id as usize]
                        .edges
                        .values()
                        .filter(|&&child| canonical[child as usize].is_none())
                        .map(|&child| (child, false)),
                );
                continue;
            }

            let node = &mut self.nodes[id as usize];
            for child in node.edges.values_mut() {
                *child = canonical[*child as usize].unwrap_or(*child);
            }
            let signature = Signature {
                accepting: node.accepting,
                edges: node.edges.iter().map(|(&label, &child)| (label, child)).collect(),
            };
            let representative = *register.entry(signature).or_insert(id);
            canonical[id as usize] = Some(representative);
        }

        self.root = canonical[self.root as usize].unwrap_or(self.root);
        self.compact();
        self.minimized = true;

        debug!("minimized DAFSA: {before} -> {} nodes", self.nodes.len());
    }

    /// Keep only nodes reachable from the root, renumbered in DFS order with
    /// the root at 0.
    fn compact(&mut self) {
        let order = self.reachable();
        let mut renumber: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (new_id, &old_id) in order.iter().enumerate() {
            renumber[old_id as usize] = Some(new_id as NodeId);
        }

        let nodes = order
            .iter()
            .map(|&old_id| {
                let old = &self.nodes[old_id as usize];
                Node {
                    accepting: old.accepting,
                    edges: old
                        .edges
                        .iter()
                        .filter_map(|(&label, &child)| {
                            renumber[child as usize].map(|child| (label, child))
                        })
                        .collect(),
                }
            })
            .collect();

        self.nodes = nodes;
        self.root = 0;
    }

    /// Distinct nodes reachable from the root, in DFS pre-order.
    fn reachable(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id as usize], true) {
                continue;
            }
            order.push(id);
            // Reverse so that lower labels are visited first.
            stack.extend(
                self.nodes[id as usize]
                    .edges
                    .values()
                    .rev()
                    .filter(|&&child| !seen[child as usize]),
            );
        }

        order
    }

    /// Number of distinct nodes reachable from the root. Shared nodes count
    /// once.
    pub fn num_states(&self) -> usize {
        self.reachable().len()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether a node marks the end of a word. Unknown nodes do not.
    pub fn is_accepting(&self, node: NodeId) -> bool {
        self.nodes
            .get(node as usize)
            .is_some_and(|node| node.accepting)
    }

    /// Follow the edge labeled `label` out of `node`.
    pub fn child(&self, node: NodeId, label: char) -> Option<NodeId> {
        self.nodes
            .get(node as usize)
            .and_then(|node| node.edges.get(&label).copied())
    }

    /// Outgoing edges of a node, ordered by label.
    pub fn edges(&self, node: NodeId) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.nodes
            .get(node as usize)
            .into_iter()
            .flat_map(|node| node.edges.iter().map(|(&label, &child)| (label, child)))
    }

    /// Convert to a graph representation over the reachable nodes.
    /// Returns: (nodes, edges) where edges are (src, dst, label)
    pub fn to_graph(&self) -> (Vec<NodeId>, Vec<DafsaEdge>) {
        let nodes = self.reachable();
        let edges = nodes
            .iter()
            .flat_map(|&src| self.edges(src).map(move |(label, dst)| (src, dst, label)))
            .collect();
        (nodes, edges)
    }

    /// Every accepted word, in lexicographic order.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::new();
        let mut prefix = String::new();
        // (node, label leading into it, prefix length before that label)
        let mut stack: Vec<(NodeId, Option<char>, usize)> = vec![(self.root, None, 0)];

        while let Some((id, label, len)) = stack.pop() {
            prefix.truncate(len);
            if let Some(label) = label {
                prefix.push(label);
            }
            if self.is_accepting(id) {
                words.push(prefix.clone());
            }
            let depth = prefix.len();
            let children: Vec<(char, NodeId)> = self.edges(id).collect();
            for (label, child) in children.into_iter().rev() {
                stack.push((child, Some(label), depth));
            }
        }

        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 10] = [
        "aa", "aab", "aaab", "aba", "abab", "ba", "baab", "bab", "bba", "bbab",
    ];

    fn trie(words: &[&str]) -> Dafsa {
        let mut dafsa = Dafsa::new();
        for word in words {
            dafsa.add(word).unwrap();
        }
        dafsa
    }

    #[test]
    fn test_add_and_search() {
        let dafsa = trie(&["cat", "car"]);
        assert!(dafsa.search("cat"));
        assert!(dafsa.search("car"));
        assert!(!dafsa.search("ca"));
        assert!(!dafsa.search("cart"));
        assert!(!dafsa.search(""));
        assert_eq!(dafsa.num_states(), 5);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut dafsa = trie(&["tap"]);
        let states = dafsa.num_states();
        dafsa.add("tap").unwrap();
        assert_eq!(dafsa.num_states(), states);
    }

    #[test]
    fn test_empty_word() {
        let dafsa = trie(&[""]);
        assert!(dafsa.search(""));
        assert_eq!(dafsa.num_states(), 1);
    }

    #[test]
    fn test_minimize_preserves_language() {
        let mut dafsa = trie(&WORDS);
        let before = dafsa.num_states();
        dafsa.minimize();

        for word in WORDS {
            assert!(dafsa.search(word), "{word} lost");
        }
        for word in ["", "a", "bb", "abba", "baa"] {
            assert!(!dafsa.search(word), "{word} appeared");
        }

        let mut expected: Vec<String> = WORDS.iter().map(|w| w.to_string()).collect();
        expected.sort();
        assert_eq!(dafsa.words(), expected);
        assert!(dafsa.num_states() < before);
    }

    #[test]
    fn test_shared_suffixes() {
        // tap / top / tip: the "p" leaf is shared, and so is the
        // middle layer since every vowel leads to the same node.
        let mut dafsa = trie(&["tap", "top", "tip"]);
        assert_eq!(dafsa.num_states(), 8);
        dafsa.minimize();
        assert_eq!(dafsa.num_states(), 4);

        let t = dafsa.child(dafsa.root(), 't').unwrap();
        let via_a = dafsa.child(t, 'a');
        assert!(via_a.is_some());
        assert_eq!(via_a, dafsa.child(t, 'o'));
        assert_eq!(via_a, dafsa.child(t, 'i'));
    }

    #[test]
    fn test_accepting_flag_splits_nodes() {
        // "ab" ends at an accepting leaf, "b" under "c" is followed by more.
        let mut dafsa = trie(&["ab", "cb", "cbd"]);
        dafsa.minimize();
        let a = dafsa.child(dafsa.root(), 'a').unwrap();
        let c = dafsa.child(dafsa.root(), 'c').unwrap();
        assert_ne!(a, c);
        assert!(dafsa.search("cb"));
        assert!(dafsa.search("cbd"));
        assert!(!dafsa.search("abd"));
    }

    #[test]
    fn test_insert_after_minimize_is_rejected() {
        let mut dafsa = trie(&["one"]);
        dafsa.minimize();
        assert!(dafsa.is_minimized());

        let err = dafsa.add("two").unwrap_err();
        assert!(matches!(err, Error::InsertAfterMinimize { ref word } if word == "two"));
        assert!(!dafsa.search("two"));
    }

    #[test]
    fn test_minimize_twice_is_noop() {
        let mut dafsa = trie(&WORDS);
        dafsa.minimize();
        let (nodes, edges) = dafsa.to_graph();
        dafsa.minimize();
        assert_eq!(dafsa.to_graph(), (nodes, edges));
    }

    #[test]
    fn test_empty_dafsa() {
        let mut dafsa = Dafsa::new();
        assert!(!dafsa.search(""));
        dafsa.minimize();
        assert_eq!(dafsa.num_states(), 1);
        assert!(dafsa.words().is_empty());
    }

    #[test]
    fn test_long_word_does_not_recurse() {
        let long: String = std::iter::repeat_n('x', 200_000).collect();
        let dafsa = Dafsa::build([long.as_str(), "xy"]);
        assert!(dafsa.search(&long));
        assert!(dafsa.search("xy"));
        assert!(!dafsa.search("x"));
        assert_eq!(dafsa.words(), vec![long, "xy".to_string()]);
    }

    #[test]
    fn test_to_graph_after_minimize() {
        let dafsa = Dafsa::build(["ab", "b"]);
        let (nodes, edges) = dafsa.to_graph();
        // root, "a" node, shared "b"-suffix leaf
        assert_eq!(nodes, vec![0, 1, 2]);
        assert_eq!(edges, vec![(0, 1, 'a'), (0, 2, 'b'), (1, 2, 'b')]);
        assert!(dafsa.is_accepting(2));
    }

    #[test]
    fn test_unicode_labels() {
        let dafsa = Dafsa::build(["↑", "über"]);
        assert!(dafsa.search("↑"));
        assert!(dafsa.search("über"));
        assert!(!dafsa.search("uber"));
    }
}
