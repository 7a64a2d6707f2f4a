//! Error type for the few fallible operations of the crate.
//!
//! Compiling and running automata is total; only structural misuse of a
//! [`Dafsa`](crate::Dafsa) and malformed configuration input can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A word was added to a DAFSA that has already been minimized. Shared
    /// suffix nodes would make the insertion leak into other words.
    #[error("cannot add {word:?}: the DAFSA has already been minimized")]
    InsertAfterMinimize { word: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
