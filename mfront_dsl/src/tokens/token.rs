//! Tokens produced by the C++-like tokenizer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenFlag {
    /// Words, numbers and operators
    Standard,
    /// Double quoted literal, quotes included in the value
    String,
    /// Character literal such as `'c'` or `'\n'`
    Char,
    Comment,
    /// `//!` or `/*!` comment documenting the next token
    DoxygenComment,
    /// `//!<` or `/*!<` comment documenting the previous token
    DoxygenBackwardComment,
    /// A preprocessor directive folded with the rest of its line
    Preprocessor,
}

impl TokenFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenFlag::Standard => "standard",
            TokenFlag::String => "string",
            TokenFlag::Char => "char",
            TokenFlag::Comment => "comment",
            TokenFlag::DoxygenComment => "doxygen comment",
            TokenFlag::DoxygenBackwardComment => "doxygen backward comment",
            TokenFlag::Preprocessor => "preprocessor",
        }
    }

    /// Any of the three comment flavours
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            TokenFlag::Comment | TokenFlag::DoxygenComment | TokenFlag::DoxygenBackwardComment
        )
    }
}

impl fmt::Display for TokenFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexeme with its source position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 1-based line number
    pub line: usize,
    /// 0-based column in the physical line
    pub offset: usize,
    pub value: String,
    pub flag: TokenFlag,
    /// Documentation attached by comment stripping
    pub comment: String,
}

impl Token {
    pub fn new(line: usize, offset: usize, value: impl Into<String>) -> Self {
        Self::with_flag(line, offset, value, TokenFlag::Standard)
    }

    pub fn with_flag(line: usize, offset: usize, value: impl Into<String>, flag: TokenFlag) -> Self {
        Self {
            line,
            offset,
            value: value.into(),
            flag,
            comment: String::new(),
        }
    }

    pub fn is_standard(&self) -> bool {
        self.flag == TokenFlag::Standard
    }

    pub fn is_string(&self) -> bool {
        self.flag == TokenFlag::String
    }

    pub fn is_comment(&self) -> bool {
        self.flag.is_comment()
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    /// Number of columns the token occupies when re-emitted
    pub fn width(&self) -> usize {
        self.value.chars().count()
    }

    /// Append documentation, newline separated
    pub fn append_comment(&mut self, comment: &str) {
        if comment.is_empty() {
            return;
        }
        if !self.comment.is_empty() {
            self.comment.push('\n');
        }
        self.comment.push_str(comment);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_construction() {
        let token = Token::new(3, 4, "@Law");
        assert_eq!(token.line, 3);
        assert_eq!(token.offset, 4);
        assert!(token.is_standard());
        assert!(!token.has_comment());
        assert_eq!(token.width(), 4);
        assert_eq!(token.to_string(), "@Law");
    }

    #[test]
    fn test_comment_accumulation() {
        let mut token = Token::new(1, 0, "E");
        token.append_comment("");
        assert!(!token.has_comment());
        token.append_comment("Young modulus");
        token.append_comment("in Pa");
        assert_eq!(token.comment, "Young modulus\nin Pa");
    }

    #[test]
    fn test_flag_classification() {
        assert!(TokenFlag::DoxygenBackwardComment.is_comment());
        assert!(TokenFlag::Comment.is_comment());
        assert!(!TokenFlag::Preprocessor.is_comment());
        assert_eq!(TokenFlag::String.to_string(), "string");
    }
}
