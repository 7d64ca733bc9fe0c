//! Comment stripping
//!
//! Builds a new token sequence without comment tokens. Doxygen comments are
//! not lost: a forward comment is attached to the next token, a backward
//! comment to the previous one.

use crate::tokens::{Token, TokenFlag};

pub fn strip_comments(tokens: Vec<Token>) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut pending = String::new();

    for mut token in tokens {
        match token.flag {
            TokenFlag::Comment => {}
            TokenFlag::DoxygenComment => {
                if !pending.is_empty() {
                    pending.push('\n');
                }
                pending.push_str(&token.value);
            }
            TokenFlag::DoxygenBackwardComment => {
                if let Some(previous) = result.last_mut() {
                    previous.append_comment(&token.value);
                }
            }
            _ => {
                if !pending.is_empty() {
                    token.append_comment(&std::mem::take(&mut pending));
                }
                result.push(token);
            }
        }
    }
    result
}
