//! Owned matching state: compiled patterns plus the lexicon.
//!
//! An [`Engine`] is built once from an [`EngineConfig`] and handed to whoever
//! needs it. Reading it (`analyze`, `pattern`, `lexicon`) only takes `&self`;
//! reloading the lexicon takes `&mut self`, so the borrow checker enforces a
//! single writer.

use crate::error::Result;
use crate::lexicon::{LexMatch, Lexicon};
use crate::pattern::{CompiledPattern, compile_pattern};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named pattern: an ordered list of token alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub stages: Vec<Vec<String>>,
}

impl PatternConfig {
    pub fn new<N, P, T, S>(name: N, stages: P) -> Self
    where
        N: Into<String>,
        P: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            stages: stages
                .into_iter()
                .map(|stage| stage.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
    /// word -> hint tags
    #[serde(default)]
    pub lexicon: BTreeMap<String, Vec<String>>,
}

impl Default for EngineConfig {
    /// The chat patterns for the traffic light and the elevator, no lexicon.
    fn default() -> Self {
        Self {
            patterns: vec![
                PatternConfig::new(
                    "traffic_next",
                    [vec!["traffic"], vec!["next", "timer", "advance"]],
                ),
                PatternConfig::new("elevator_up", [vec!["elevator"], vec!["up", "↑"]]),
                PatternConfig::new("elevator_down", [vec!["elevator"], vec!["down", "↓"]]),
            ],
            lexicon: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What the engine recognized in a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Lowercased whitespace-separated tokens of the message.
    pub tokens: Vec<String>,
    /// Names of the patterns the tokens satisfy, in configuration order.
    pub patterns: Vec<String>,
    pub lexicon: LexMatch,
}

impl Analysis {
    pub fn matches(&self, pattern: &str) -> bool {
        self.patterns.iter().any(|name| name == pattern)
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    patterns: Vec<CompiledPattern>,
    lexicon: Lexicon,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Engine {
    /// Compile every configured pattern and load the lexicon.
    pub fn new(config: &EngineConfig) -> Self {
        let patterns: Vec<CompiledPattern> = config
            .patterns
            .iter()
            .map(|pattern| compile_pattern(pattern.name.as_str(), &pattern.stages))
            .collect();
        let lexicon = Lexicon::from_entries(&config.lexicon);

        debug!(
            "engine ready: {} patterns, {} lexicon words",
            patterns.len(),
            lexicon.len()
        );

        Self { patterns, lexicon }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(&EngineConfig::from_json(json)?))
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn pattern(&self, name: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|pattern| pattern.name() == name)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Replace the lexicon wholesale.
    pub fn load_lexicon<I, W, T, H>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: IntoIterator<Item = H>,
        H: Into<String>,
    {
        self.lexicon.load(entries);
    }

    /// Tokenize a message once and run it through every pattern and the
    /// lexicon.
    pub fn analyze(&self, message: &str) -> Analysis {
        let tokens: Vec<String> = message
            .to_lowercase()
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        let patterns = self
            .patterns
            .iter()
            .filter(|pattern| pattern.accepts(&tokens))
            .map(|pattern| pattern.name().to_owned())
            .collect();
        let lexicon = self.lexicon.query_tokens(tokens.iter().map(String::as_str));

        Analysis {
            tokens,
            patterns,
            lexicon,
        }
    }
}
