//! Line oriented C++-like tokenizer
//!
//! Each physical line is scanned independently; the only state carried from
//! one line to the next is an open C-style comment. Two passes follow the
//! scan: preprocessor folding and splitting of words on C++ separators.

use super::number;
use super::{LexerError, TokenizerOptions};
use crate::config::compile_time::lexical::{MAX_LINE_LENGTH, MAX_TOKEN_COUNT};
use crate::tokens::{Token, TokenFlag};

/// Characters that always end a word
pub const SEPARATORS: [char; 20] = [
    '?', ';', '/', '!', '&', '*', '|', '{', '}', '[', ']', '(', ')', '%', '=', '^', ',', ':', '<',
    '>',
];

/// Adjacent pieces merged back into C++ operators, applied in this order
pub const JOIN_TABLE: [(&str, &str); 22] = [
    ("/", "/"),
    ("/", "*"),
    ("*", "/"),
    (":", ":"),
    ("-", ">"),
    ("<", "<"),
    ("<", "="),
    (">", "="),
    ("+", "+"),
    ("-", "-"),
    ("+", "="),
    ("-", "="),
    ("*", "="),
    ("/", "="),
    ("%", "="),
    ("|", "="),
    ("!", "="),
    ("&", "&"),
    ("=", "="),
    (".", "*"),
    ("->", "*"),
    ("|", "|"),
];

/// Directives folded with the remainder of their line
pub const PREPROCESSOR_DIRECTIVES: [&str; 11] = [
    "#define", "#undef", "#include", "#line", "#error", "#if", "#ifdef", "#ifndef", "#elif",
    "#else", "#endif",
];

/// The construct found first on the rest of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
    String(usize),
    CxxComment(usize),
    CComment(usize),
    Char(usize),
}

impl Construct {
    fn position(&self) -> usize {
        match *self {
            Construct::String(p)
            | Construct::CxxComment(p)
            | Construct::CComment(p)
            | Construct::Char(p) => p,
        }
    }
}

pub struct Tokenizer {
    options: TokenizerOptions,
    tokens: Vec<Token>,
    c_comment_opened: bool,
    c_comment_line: usize,
}

impl Tokenizer {
    pub fn new(options: TokenizerOptions) -> Self {
        Self {
            options,
            tokens: Vec::new(),
            c_comment_opened: false,
            c_comment_line: 0,
        }
    }

    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    /// Tokenize a whole source buffer
    pub fn tokenize(mut self, source: &str) -> Result<Vec<Token>, LexerError> {
        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;
            if line.len() > MAX_LINE_LENGTH {
                return Err(LexerError::LineTooLong {
                    line: line_number,
                    length: line.len(),
                    max: MAX_LINE_LENGTH,
                });
            }
            self.split_line(line, line_number)?;
            if self.tokens.len() > MAX_TOKEN_COUNT {
                return Err(LexerError::TooManyTokens {
                    count: self.tokens.len(),
                    max: MAX_TOKEN_COUNT,
                });
            }
        }

        if self.c_comment_opened {
            return Err(LexerError::UnterminatedComment {
                line: self.c_comment_line,
            });
        }

        let mut tokens = self.tokens;
        if self.options.treat_preprocessor_directives {
            tokens = fold_preprocessor_directives(tokens);
        }
        if self.options.split_tokens {
            tokens = split_tokens(tokens, self.options.extract_numbers)?;
        }
        if tokens.len() > MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: tokens.len(),
                max: MAX_TOKEN_COUNT,
            });
        }
        Ok(tokens)
    }

    fn split_line(&mut self, line: &str, line_number: usize) -> Result<(), LexerError> {
        let mut pos = 0;

        if self.c_comment_opened {
            match line.find("*/") {
                None => {
                    self.continue_c_comment(strip_continuation(line));
                    return Ok(());
                }
                Some(end) => {
                    self.continue_c_comment(strip_continuation(&line[..end]));
                    self.c_comment_opened = false;
                    pos = end + 2;
                }
            }
        }

        while pos < line.len() {
            let construct = match self.find_construct(line, pos) {
                Some(construct) => construct,
                None => {
                    self.push_words(line, pos, line.len(), line_number);
                    break;
                }
            };
            let start = construct.position();
            self.push_words(line, pos, start, line_number);

            pos = match construct {
                Construct::String(p) => self.read_quoted(line, p, '"', line_number)?,
                Construct::CxxComment(p) => {
                    self.push_comment(&line[p + 2..], column(line, p), line_number);
                    line.len()
                }
                Construct::CComment(p) => match line[p + 2..].find("*/") {
                    Some(rel) => {
                        let end = p + 2 + rel;
                        self.push_comment(&line[p + 2..end], column(line, p), line_number);
                        end + 2
                    }
                    None => {
                        self.push_comment(&line[p + 2..], column(line, p), line_number);
                        self.c_comment_opened = true;
                        self.c_comment_line = line_number;
                        line.len()
                    }
                },
                Construct::Char(p) => {
                    if self.options.char_as_string {
                        self.read_quoted(line, p, '\'', line_number)?
                    } else {
                        self.read_char(line, p, line_number)?
                    }
                }
            };
        }
        Ok(())
    }

    /// Earliest string, comment or character literal at or after `from`
    fn find_construct(&self, line: &str, from: usize) -> Option<Construct> {
        let candidates = [
            find_unescaped(line, from, '"').map(Construct::String),
            line[from..].find("//").map(|p| Construct::CxxComment(from + p)),
            line[from..].find("/*").map(|p| Construct::CComment(from + p)),
            find_char_literal(line, from).map(Construct::Char),
        ];
        candidates
            .into_iter()
            .flatten()
            .min_by_key(|construct| construct.position())
    }

    fn push_words(&mut self, line: &str, start: usize, end: usize, line_number: usize) {
        if start >= end {
            return;
        }
        let mut word_start: Option<usize> = None;
        for (i, c) in line[start..end].char_indices() {
            let i = start + i;
            if c.is_whitespace() {
                if let Some(ws) = word_start.take() {
                    self.tokens
                        .push(Token::new(line_number, column(line, ws), &line[ws..i]));
                }
            } else if word_start.is_none() {
                word_start = Some(i);
            }
        }
        if let Some(ws) = word_start {
            self.tokens
                .push(Token::new(line_number, column(line, ws), &line[ws..end]));
        }
    }

    /// Quoted literal starting at `start`; adjacent literals are merged
    fn read_quoted(
        &mut self,
        line: &str,
        start: usize,
        quote: char,
        line_number: usize,
    ) -> Result<usize, LexerError> {
        let close = find_closing_quote(line, start + 1, quote).ok_or(
            LexerError::UnterminatedString {
                line: line_number,
                quote,
            },
        )?;
        let value = &line[start..=close];

        let merge = matches!(
            self.tokens.last(),
            Some(previous) if previous.flag == TokenFlag::String && previous.value.ends_with(quote)
        );
        match self.tokens.last_mut() {
            Some(previous) if merge => {
                previous.value.pop();
                previous.value.push_str(&value[1..]);
            }
            _ => self.tokens.push(Token::with_flag(
                line_number,
                column(line, start),
                value,
                TokenFlag::String,
            )),
        }
        Ok(close + 1)
    }

    /// `'c'` or `'\c'`
    fn read_char(&mut self, line: &str, start: usize, line_number: usize) -> Result<usize, LexerError> {
        let chars: Vec<(usize, char)> = line[start..].char_indices().take(4).collect();
        let invalid = |message: &str| LexerError::InvalidCharacterLiteral {
            line: line_number,
            message: message.to_string(),
        };

        if chars.len() < 3 {
            return Err(invalid("character literal is too short"));
        }
        let last = if chars[1].1 == '\\' {
            if chars.len() < 4 || chars[3].1 != '\'' {
                return Err(invalid("expected ' after escape sequence"));
            }
            chars[3].0
        } else {
            if chars[2].1 != '\'' {
                return Err(invalid(&format!(
                    "expected ' after character, read '{}'",
                    chars[2].1
                )));
            }
            chars[2].0
        };

        let end = start + last + 1;
        self.tokens.push(Token::with_flag(
            line_number,
            column(line, start),
            &line[start..end],
            TokenFlag::Char,
        ));
        Ok(end)
    }

    /// Comment text following `//` or `/*`
    fn push_comment(&mut self, text: &str, offset: usize, line_number: usize) {
        let (flag, content) = match text.strip_prefix('!') {
            Some(rest) => match rest.strip_prefix('<') {
                Some(rest) if !self.tokens.is_empty() => (TokenFlag::DoxygenBackwardComment, rest),
                Some(rest) => (TokenFlag::Comment, rest),
                None => (TokenFlag::DoxygenComment, rest),
            },
            None => (TokenFlag::Comment, text),
        };
        self.tokens.push(Token::with_flag(
            line_number,
            offset,
            content.trim_start(),
            flag,
        ));
    }

    fn continue_c_comment(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(comment) = self.tokens.iter_mut().rev().find(|t| t.is_comment()) {
            if !comment.value.is_empty() {
                comment.value.push('\n');
            }
            comment.value.push_str(text);
        }
    }
}

/// Character column of a byte index
fn column(line: &str, byte_index: usize) -> usize {
    line[..byte_index].chars().count()
}

/// Leading whitespace and one `*` of a comment continuation line
fn strip_continuation(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed.strip_prefix('*').unwrap_or(trimmed).trim_start()
}

fn find_unescaped(line: &str, from: usize, quote: char) -> Option<usize> {
    let bytes = line.as_bytes();
    line[from..]
        .match_indices(quote)
        .map(|(p, _)| from + p)
        .find(|&p| p == 0 || bytes[p - 1] != b'\\')
}

fn find_closing_quote(line: &str, from: usize, quote: char) -> Option<usize> {
    let bytes = line.as_bytes();
    line[from..]
        .match_indices(quote)
        .map(|(p, _)| from + p)
        .find(|&p| bytes[p - 1] != b'\\')
}

/// Opening `'` of a character literal, skipping C++14 digit separators
fn find_char_literal(line: &str, from: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    line[from..]
        .match_indices('\'')
        .map(|(p, _)| from + p)
        .find(|&p| (p == 0 || bytes[p - 1] != b'\\') && !is_digit_separator(bytes, p))
}

/// A `'` between two hexadecimal digits of a word starting with a digit
fn is_digit_separator(bytes: &[u8], p: usize) -> bool {
    if p == 0 || p + 1 >= bytes.len() {
        return false;
    }
    if !bytes[p - 1].is_ascii_hexdigit() || !bytes[p + 1].is_ascii_hexdigit() {
        return false;
    }
    let word_start = bytes[..p]
        .iter()
        .rposition(|b| !(b.is_ascii_alphanumeric() || *b == b'\'' || *b == b'.' || *b == b'_'))
        .map(|i| i + 1)
        .unwrap_or(0);
    bytes[word_start].is_ascii_digit()
        || (bytes[word_start] == b'.' && bytes.get(word_start + 1).map_or(false, u8::is_ascii_digit))
}

/// Merge each directive with the non-comment tokens following it on its line
pub fn fold_preprocessor_directives(tokens: Vec<Token>) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(mut token) = iter.next() {
        let is_directive = token.flag == TokenFlag::Standard
            && PREPROCESSOR_DIRECTIVES
                .iter()
                .any(|directive| token.value.starts_with(directive));
        if !is_directive {
            result.push(token);
            continue;
        }

        token.flag = TokenFlag::Preprocessor;
        let line = token.line;
        let mut comments = Vec::new();
        while let Some(next) = iter.next_if(|next| next.line == line) {
            if next.is_comment() {
                comments.push(next);
            } else {
                token.value.push(' ');
                token.value.push_str(&next.value);
            }
        }
        result.push(token);
        result.extend(comments);
    }
    result
}

/// Split standard tokens on separators, optionally peel numbers, rejoin operators
pub fn split_tokens(tokens: Vec<Token>, extract_numbers: bool) -> Result<Vec<Token>, LexerError> {
    let mut result = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.flag != TokenFlag::Standard {
            result.push(token);
            continue;
        }
        let mut pieces = split_at_separators(&token.value);
        if extract_numbers {
            pieces = extract_number_pieces(pieces).map_err(|message| LexerError::InvalidNumber {
                line: token.line,
                literal: token.value.clone(),
                message,
            })?;
        }
        for (first, second) in JOIN_TABLE {
            pieces = join(pieces, first, second);
        }
        result.extend(
            pieces
                .into_iter()
                .map(|(offset, value)| Token::new(token.line, token.offset + offset, value)),
        );
    }
    Ok(result)
}

/// Pieces are (column relative to the word, text)
type Pieces = Vec<(usize, String)>;

fn split_at_separators(word: &str) -> Pieces {
    let chars: Vec<char> = word.chars().collect();
    let mut pieces = Pieces::new();
    let mut current = String::new();
    let mut current_start = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !SEPARATORS.contains(&c) {
            if current.is_empty() {
                current_start = i;
            }
            current.push(c);
            i += 1;
            continue;
        }
        if !current.is_empty() {
            pieces.push((current_start, std::mem::take(&mut current)));
        }
        if (c == '<' || c == '>') && chars.get(i + 1) == Some(&c) {
            pieces.push((i, format!("{}{}", c, c)));
            i += 2;
        } else {
            pieces.push((i, c.to_string()));
            i += 1;
        }
    }
    if !current.is_empty() {
        pieces.push((current_start, current));
    }
    pieces
}

fn extract_number_pieces(pieces: Pieces) -> Result<Pieces, String> {
    let mut result = Pieces::new();
    for (offset, piece) in pieces {
        let chars: Vec<char> = piece.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if number::starts_number(&chars, i) {
                let end = number::read_number(&chars, i)?;
                result.push((offset + i, chars[i..end].iter().collect()));
                i = end;
            } else if matches!(c, '+' | '-' | '.') {
                result.push((offset + i, c.to_string()));
                i += 1;
            } else {
                let start = i;
                while i < chars.len() && !matches!(chars[i], '+' | '-' | '.') {
                    i += 1;
                }
                result.push((offset + start, chars[start..i].iter().collect()));
            }
        }
    }
    Ok(result)
}

fn join(pieces: Pieces, first: &str, second: &str) -> Pieces {
    let mut result = Pieces::with_capacity(pieces.len());
    for (offset, piece) in pieces {
        let joins = piece == second && result.last().map_or(false, |(_, last)| last == first);
        if joins {
            if let Some((_, last)) = result.last_mut() {
                last.push_str(second);
            }
        } else {
            result.push((offset, piece));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(word: &str) -> Vec<String> {
        let mut pieces = split_at_separators(word);
        pieces = extract_number_pieces(pieces).unwrap();
        for (a, b) in JOIN_TABLE {
            pieces = join(pieces, a, b);
        }
        pieces.into_iter().map(|(_, p)| p).collect()
    }

    #[test]
    fn test_separator_split_keeps_shifts() {
        assert_eq!(words("a<<b"), ["a", "<<", "b"]);
        assert_eq!(words("a>>=b"), ["a", ">>", "=", "b"]);
        assert_eq!(words("f(x);"), ["f", "(", "x", ")", ";"]);
    }

    #[test]
    fn test_join_table_chains() {
        assert_eq!(words("p->*m"), ["p", "->*", "m"]);
        assert_eq!(words("i++"), ["i", "++"]);
        assert_eq!(words("a-=2"), ["a", "-=", "2"]);
        assert_eq!(words("a.*m"), ["a", ".*", "m"]);
    }

    #[test]
    fn test_piece_offsets() {
        let pieces = split_at_separators("x=f(y)");
        let offsets: Vec<usize> = pieces.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_digit_separator_detection() {
        let line = "x = 1'000; c = 'a';";
        assert_eq!(find_char_literal(line, 0), Some(15));
        assert!(is_digit_separator(line.as_bytes(), 5));
    }

    #[test]
    fn test_fold_keeps_comments() {
        let tokens = vec![
            Token::new(1, 0, "#include"),
            Token::with_flag(1, 9, "<cmath>", TokenFlag::Standard),
            Token::with_flag(1, 17, "math", TokenFlag::Comment),
            Token::new(2, 0, "x"),
        ];
        let folded = fold_preprocessor_directives(tokens);
        assert_eq!(folded.len(), 3);
        assert_eq!(folded[0].value, "#include <cmath>");
        assert_eq!(folded[0].flag, TokenFlag::Preprocessor);
        assert_eq!(folded[1].flag, TokenFlag::Comment);
        assert_eq!(folded[2].value, "x");
    }
}
