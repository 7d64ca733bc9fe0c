//! Code blocks copied out of MFront sources
//!
//! A [`CodeBlock`] is the result of one copy of a brace delimited region: the
//! rewritten code, the documentation found around it and the member and
//! static member names it references. A [`CodeBlocksAggregator`] composes
//! several of them into one named slot of generated code.

pub mod aggregator;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use aggregator::{CodeBlockError, CodeBlocksAggregator};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub code: String,
    pub description: String,
    /// Member variables referenced by the code
    pub members: BTreeSet<String>,
    /// Static variables referenced by the code
    pub static_members: BTreeSet<String>,
}

impl CodeBlock {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn references(&self, name: &str) -> bool {
        self.members.contains(name) || self.static_members.contains(name)
    }
}

/// Insertion point of a block inside an aggregated slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    AtBeginning,
    #[default]
    Body,
    AtEnd,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::AtBeginning => "AtBeginning",
            Position::Body => "Body",
            Position::AtEnd => "AtEnd",
        }
    }
}

/// How a new block interacts with an existing slot of the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Fails if the slot already exists
    #[default]
    Create,
    CreateOrAppend,
    CreateOrReplace,
    /// Keeps an existing slot untouched
    CreateButDontReplace,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Create => "Create",
            Mode::CreateOrAppend => "CreateOrAppend",
            Mode::CreateOrReplace => "CreateOrReplace",
            Mode::CreateButDontReplace => "CreateButDontReplace",
        }
    }
}
