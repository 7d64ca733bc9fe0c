//! Three bucket composition of code blocks with freeze on first read

use super::{CodeBlock, Position};
use serde::Serialize;
use crate::logging::{codes, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeBlockError {
    #[error("can't modify a code block that has already been read")]
    Frozen,
}

impl CodeBlockError {
    pub fn error_code(&self) -> Code {
        match self {
            CodeBlockError::Frozen => codes::state::FROZEN_CODE_BLOCK,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeBlocksAggregator {
    block: CodeBlock,
    begin: String,
    body: String,
    end: String,
    doc_begin: String,
    doc_body: String,
    doc_end: String,
    mutable: bool,
}

impl Default for CodeBlocksAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `text` on a new line of `buffer`
fn push_line(buffer: &mut String, text: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(text);
}

/// Concatenate the buckets, making sure each one starts on a new line
fn concatenate(begin: &str, body: &str, end: &str) -> String {
    let mut result = begin.to_string();
    for part in [body, end] {
        if part.is_empty() {
            continue;
        }
        if !result.is_empty() && !result.ends_with('\n') {
            result.push('\n');
        }
        result.push_str(part);
    }
    result
}

impl CodeBlocksAggregator {
    pub fn new() -> Self {
        Self {
            block: CodeBlock::default(),
            begin: String::new(),
            body: String::new(),
            end: String::new(),
            doc_begin: String::new(),
            doc_body: String::new(),
            doc_end: String::new(),
            mutable: true,
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Add a block at the given position
    pub fn set(&mut self, block: &CodeBlock, position: Position) -> Result<(), CodeBlockError> {
        self.check()?;
        self.block.members.extend(block.members.iter().cloned());
        self.block
            .static_members
            .extend(block.static_members.iter().cloned());

        let (code, doc) = match position {
            Position::AtBeginning => (&mut self.begin, &mut self.doc_begin),
            Position::Body => (&mut self.body, &mut self.doc_body),
            Position::AtEnd => (&mut self.end, &mut self.doc_end),
        };
        push_line(code, &block.code);
        if !block.description.is_empty() {
            push_line(doc, &block.description);
        }
        self.update();
        Ok(())
    }

    /// Discard everything set so far, then add the block
    pub fn replace(&mut self, block: &CodeBlock, position: Position) -> Result<(), CodeBlockError> {
        self.check()?;
        *self = Self::new();
        self.set(block, position)
    }

    /// Read the aggregated block; no modification is allowed afterwards
    pub fn get(&mut self) -> &CodeBlock {
        self.mutable = false;
        &self.block
    }

    fn check(&self) -> Result<(), CodeBlockError> {
        if self.mutable {
            Ok(())
        } else {
            Err(CodeBlockError::Frozen)
        }
    }

    fn update(&mut self) {
        self.block.code = concatenate(&self.begin, &self.body, &self.end);
        self.block.description = concatenate(&self.doc_begin, &self.doc_body, &self.doc_end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_position_decides_bucket_call_order_decides_rank() {
        let mut aggregator = CodeBlocksAggregator::new();
        aggregator.set(&CodeBlock::new("b1"), Position::Body).unwrap();
        aggregator.set(&CodeBlock::new("e1"), Position::AtEnd).unwrap();
        aggregator.set(&CodeBlock::new("a1"), Position::AtBeginning).unwrap();
        aggregator.set(&CodeBlock::new("b2"), Position::Body).unwrap();
        aggregator.set(&CodeBlock::new("a2"), Position::AtBeginning).unwrap();
        aggregator.set(&CodeBlock::new("e2"), Position::AtEnd).unwrap();

        assert_eq!(aggregator.get().code, "a1\na2\nb1\nb2\ne1\ne2");
    }

    #[test]
    fn test_descriptions_and_members_are_merged() {
        let mut first = CodeBlock::new("x = 1;");
        first.description = "first".to_string();
        first.members.insert("x".to_string());
        let mut second = CodeBlock::new("y = A;");
        second.static_members.insert("A".to_string());

        let mut aggregator = CodeBlocksAggregator::new();
        aggregator.set(&first, Position::AtEnd).unwrap();
        aggregator.set(&second, Position::AtBeginning).unwrap();

        let block = aggregator.get();
        assert_eq!(block.code, "y = A;\nx = 1;");
        assert_eq!(block.description, "first");
        assert!(block.references("x"));
        assert!(block.references("A"));
    }

    #[test]
    fn test_replace_clears_every_bucket() {
        let mut old = CodeBlock::new("old");
        old.members.insert("x".to_string());
        let mut aggregator = CodeBlocksAggregator::new();
        aggregator.set(&old, Position::AtBeginning).unwrap();
        aggregator.set(&CodeBlock::new("old end"), Position::AtEnd).unwrap();
        aggregator.replace(&CodeBlock::new("new"), Position::Body).unwrap();

        let block = aggregator.get();
        assert_eq!(block.code, "new");
        assert!(block.members.is_empty());
    }

    #[test]
    fn test_get_freezes() {
        let mut aggregator = CodeBlocksAggregator::new();
        aggregator.set(&CodeBlock::new("a"), Position::Body).unwrap();
        assert!(aggregator.is_mutable());
        let _ = aggregator.get();
        assert!(!aggregator.is_mutable());

        assert_matches!(
            aggregator.set(&CodeBlock::new("b"), Position::Body),
            Err(CodeBlockError::Frozen)
        );
        assert_matches!(
            aggregator.replace(&CodeBlock::new("b"), Position::AtEnd),
            Err(CodeBlockError::Frozen)
        );
        assert_eq!(aggregator.get().code, "a");
        assert_eq!(CodeBlockError::Frozen.error_code(), codes::state::FROZEN_CODE_BLOCK);
    }
}
