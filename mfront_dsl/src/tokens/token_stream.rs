//! Cursor over an immutable token sequence

use crate::tokens::token::Token;

/// Ordered tokens plus a cursor; consumers never mutate the tokens
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    // === CORE NAVIGATION ===

    /// Token under the cursor
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Text of the token under the cursor
    pub fn current_value(&self) -> Option<&str> {
        self.current().map(|token| token.value.as_str())
    }

    /// Peek ahead by n positions without advancing
    pub fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.peek_ahead(1)
    }

    /// Token just before the cursor
    pub fn previous(&self) -> Option<&Token> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    /// Advance and return the token that was under the cursor
    pub fn advance(&mut self) -> Option<&Token> {
        if self.position < self.tokens.len() {
            self.position += 1;
            self.tokens.get(self.position - 1)
        } else {
            None
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the current token has the given text
    pub fn check(&self, value: &str) -> bool {
        self.current_value() == Some(value)
    }

    /// Advance past `value` if it is under the cursor
    pub fn advance_if(&mut self, value: &str) -> bool {
        if self.check(value) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    // === CHECKPOINTS ===

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn restore_position(&mut self, saved_position: usize) {
        self.position = saved_position.min(self.tokens.len());
    }

    // === DIAGNOSTICS ===

    /// Line of the current token, or of the last token once the end is reached
    pub fn current_line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|token| token.line)
            .unwrap_or(0)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn remaining_count(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Space separated rendering of the tokens, one output line per source line
    pub fn render(&self) -> String {
        let mut output = String::new();
        let mut line = self.tokens.first().map(|t| t.line).unwrap_or(0);
        for token in &self.tokens {
            if token.line != line {
                output.push('\n');
                line = token.line;
            }
            output.push_str(&token.value);
            output.push(' ');
        }
        output
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
