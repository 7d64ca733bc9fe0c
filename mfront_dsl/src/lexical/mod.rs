//! Lexical analysis for MFront sources
//!
//! The tokenizer works line by line on C++-like text: it recognises string
//! and character literals, C and C++ comments (including doxygen forward and
//! backward comments), folds preprocessor directives, splits words on C++
//! separators, peels numeric literals and rejoins multi-character operators.
//!
//! Comment tokens survive tokenization; [`strip_comments`] is the separate
//! pass that removes them before the keyword dispatcher runs.

pub mod comments;
pub mod identifiers;
pub mod number;
pub mod tokenizer;

use crate::config::runtime::TokenizerPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::{Token, TokenFlag};
use thiserror::Error;

pub use comments::strip_comments;
pub use identifiers::{is_reserved_cxx_keyword, is_valid_function_identifier, is_valid_identifier};
pub use tokenizer::Tokenizer;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexerError {
    #[error("unterminated string literal (missing {quote}) at line {line}")]
    UnterminatedString { line: usize, quote: char },

    #[error("invalid character literal at line {line}: {message}")]
    InvalidCharacterLiteral { line: usize, message: String },

    #[error("invalid number '{literal}' at line {line}: {message}")]
    InvalidNumber {
        line: usize,
        literal: String,
        message: String,
    },

    #[error("unfinished C-style comment opened at line {line}")]
    UnterminatedComment { line: usize },

    #[error("too many tokens: {count} (max {max})")]
    TooManyTokens { count: usize, max: usize },

    #[error("line {line} is too long: {length} bytes (max {max})")]
    LineTooLong {
        line: usize,
        length: usize,
        max: usize,
    },
}

impl LexerError {
    pub fn line(&self) -> Option<usize> {
        match self {
            LexerError::UnterminatedString { line, .. }
            | LexerError::InvalidCharacterLiteral { line, .. }
            | LexerError::InvalidNumber { line, .. }
            | LexerError::UnterminatedComment { line }
            | LexerError::LineTooLong { line, .. } => Some(*line),
            LexerError::TooManyTokens { .. } => None,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::InvalidCharacterLiteral { .. } => codes::lexical::INVALID_CHARACTER_LITERAL,
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::LineTooLong { .. } => codes::lexical::LINE_TOO_LONG,
        }
    }
}

/// Tokenizer switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerOptions {
    pub treat_preprocessor_directives: bool,
    pub split_tokens: bool,
    pub extract_numbers: bool,
    pub char_as_string: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            treat_preprocessor_directives: true,
            split_tokens: true,
            extract_numbers: true,
            char_as_string: false,
        }
    }
}

impl TokenizerOptions {
    pub fn from_preferences(prefs: &TokenizerPreferences) -> Self {
        Self {
            treat_preprocessor_directives: prefs.treat_preprocessor_directives,
            split_tokens: prefs.split_tokens,
            extract_numbers: prefs.extract_numbers,
            char_as_string: prefs.char_as_string,
        }
    }
}

/// Tokenize an in-memory source
pub fn tokenize_str(source: &str, options: &TokenizerOptions) -> Result<Vec<Token>, LexerError> {
    Tokenizer::new(options.clone()).tokenize(source)
}

/// Tokenize the content of a file read by the file processor
pub fn tokenize_file_result(
    file_result: &FileProcessingResult,
    options: &TokenizerOptions,
) -> Result<Vec<Token>, LexerError> {
    let tokens = match tokenize_str(&file_result.source, options) {
        Ok(tokens) => tokens,
        Err(e) => {
            match e.line() {
                Some(line) => crate::log_error!(e.error_code(), &e.to_string(), line = line,
                    "file" => file_result.metadata.path.display()),
                None => crate::log_error!(e.error_code(), &e.to_string(),
                    "file" => file_result.metadata.path.display()),
            }
            return Err(e);
        }
    };

    let comment_count = tokens.iter().filter(|t| t.is_comment()).count();
    crate::log_success!(
        codes::success::TOKENIZATION_COMPLETE,
        "Tokenization completed",
        "tokens" => tokens.len(),
        "comments" => comment_count,
        "preprocessor" => tokens.iter().filter(|t| t.flag == TokenFlag::Preprocessor).count()
    );
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenStream;
    use assert_matches::assert_matches;

    fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        tokenize_str(source, &TokenizerOptions::default())
    }

    fn values(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn test_whitespace_split() {
        assert_eq!(values("a b c d"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_cxx_comment_hiding_c_comment() {
        let tokens = tokenize("///*").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].flag, TokenFlag::Comment);
        assert_eq!(tokens[0].value, "/*");
    }

    #[test]
    fn test_doxygen_comment_with_string() {
        let tokens = tokenize("test //! a comment \"with string\"").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, "test");
        assert_eq!(tokens[0].flag, TokenFlag::Standard);
        assert_eq!(tokens[1].flag, TokenFlag::DoxygenComment);
        assert_eq!(tokens[1].value, "a comment \"with string\"");
    }

    #[test]
    fn test_backward_comment_needs_a_previous_token() {
        let tokens = tokenize("//!< first").unwrap();
        assert_eq!(tokens[0].flag, TokenFlag::Comment);

        let tokens = tokenize("x //!< the x").unwrap();
        assert_eq!(tokens[1].flag, TokenFlag::DoxygenBackwardComment);
        assert_eq!(tokens[1].value, "the x");
    }

    #[test]
    fn test_c_comments() {
        let tokens = tokenize("/*< a comment \"with string\" */").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].flag, TokenFlag::Comment);
        assert_eq!(tokens[0].value, "< a comment \"with string\" ");

        let tokens = tokenize("/*!< a comment */ test").unwrap();
        assert_eq!(tokens[0].flag, TokenFlag::Comment);

        let tokens = tokenize("test /*!< a comment */").unwrap();
        assert_eq!(tokens[1].flag, TokenFlag::DoxygenBackwardComment);
        assert_eq!(tokens[1].value, "a comment ");

        let stripped = strip_comments(tokens);
        assert_eq!(stripped.len(), 1);
        assert_eq!(stripped[0].value, "test");
        assert_eq!(stripped[0].comment, "a comment ");
    }

    #[test]
    fn test_c_comment_spanning_lines() {
        let tokens = tokenize("/* first\n * second\n */ x").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, "first\nsecond");
        assert_eq!(tokens[1].value, "x");
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[1].offset, 4);
    }

    #[test]
    fn test_unterminated_c_comment() {
        assert_matches!(
            tokenize("a\n/* never closed\nb"),
            Err(LexerError::UnterminatedComment { line: 2 })
        );
    }

    #[test]
    fn test_strings() {
        assert_matches!(
            tokenize("\"test"),
            Err(LexerError::UnterminatedString { line: 1, quote: '"' })
        );
        let tokens = tokenize("\"string test\"").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].flag, TokenFlag::String);
        assert_eq!(tokens[0].value, "\"string test\"");

        let tokens = tokenize("\"a \\\"quoted\\\" word\" ;").unwrap();
        assert_eq!(tokens[0].value, "\"a \\\"quoted\\\" word\"");
        assert_eq!(tokens[1].value, ";");
    }

    #[test]
    fn test_strings_split_across_lines_are_merged() {
        let tokens = tokenize("@Author \"Thomas \"\n  \"Helfer\";").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].value, "\"Thomas Helfer\"");
        assert_eq!(tokens[1].line, 1);
    }

    #[test]
    fn test_character_literals() {
        assert!(tokenize("'test").is_err());
        assert!(tokenize("'te'").is_err());
        assert_matches!(
            tokenize("'string test'"),
            Err(LexerError::InvalidCharacterLiteral { line: 1, .. })
        );

        let tokens = tokenize("'c'").unwrap();
        assert_eq!(tokens[0].flag, TokenFlag::Char);
        assert_eq!(tokens[0].value, "'c'");

        let tokens = tokenize("'\\''").unwrap();
        assert_eq!(tokens[0].flag, TokenFlag::Char);
        assert_eq!(tokens[0].value, "'\\''");
    }

    #[test]
    fn test_char_as_string() {
        let options = TokenizerOptions {
            char_as_string: true,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize_str("'string test'", &options).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].flag, TokenFlag::String);
        assert_eq!(tokens[0].value, "'string test'");
    }

    #[test]
    fn test_numbers_followed_by_words() {
        assert_eq!(values("12.3a"), ["12.3", "a"]);
        assert_eq!(values("12.3a+"), ["12.3", "a", "+"]);
        assert_eq!(values("12.3+a"), ["12.3", "+", "a"]);
        assert_eq!(values("a=2.e-5"), ["a", "=", "2.e-5"]);
        assert_eq!(values("2.e-5F_banana+3.5_potato"), ["2.e-5F_banana", "+", "3.5_potato"]);
        assert_eq!(values("a+1"), ["a", "+", "1"]);
    }

    #[test]
    fn test_single_token_numbers() {
        for literal in [
            "0", "0.5", "1e10", "0x1F", "0b101", "0b0101", "1'000", "1.5f", "10u", "3_mycustom",
            ".3", ".3f", ".3e+11", ".3e-11", ".3e-11f", ".3e-11F", ".3e-11l", ".3e-11L", "2.e-5_kg",
            "2.e-5l_kg", "2.e-5L_kg", "2.e-5f_kg", "2.e-5F_kg", "2", "-2", "2l", "-2L", "2ll",
            "-2LL", "2u", "+1.5e3f",
        ] {
            assert_eq!(values(literal), [literal], "{}", literal);
        }
    }

    #[test]
    fn test_invalid_numbers() {
        for literal in [
            "0.3LL", "0.3.3", ".3.3", ".3f.3", "1.3e-4.3", "-2U", "-2UL", "-2ULL", "-2LU", "-2LLU",
            "0b", "0b2", "0b020", "1..",
        ] {
            assert_matches!(
                tokenize(literal),
                Err(LexerError::InvalidNumber { line: 1, .. }),
                "{}",
                literal
            );
        }
    }

    #[test]
    fn test_operator_rejoin() {
        for op in [
            "==", "!=", "<=", ">=", "&&", "||", "->", "::", "<<", ">>", "+=", "-=", "*=", "/=",
            "%=", "|=",
        ] {
            let source = format!("a{}b", op);
            assert_eq!(values(&source), ["a", op, "b"], "{}", source);
        }
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("  a = b;").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, [2, 4, 6, 7]);
    }

    #[test]
    fn test_preprocessor_folding() {
        let tokens = tokenize("#include <cmath> // math\nx").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].flag, TokenFlag::Preprocessor);
        assert_eq!(tokens[0].value, "#include <cmath>");
        assert_eq!(tokens[1].flag, TokenFlag::Comment);
        assert_eq!(tokens[2].value, "x");

        let options = TokenizerOptions {
            treat_preprocessor_directives: false,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize_str("#define N 3", &options).unwrap();
        assert!(tokens.iter().all(|t| t.flag == TokenFlag::Standard));
        assert!(tokens.len() > 1);
    }

    #[test]
    fn test_no_split_keeps_words() {
        let options = TokenizerOptions {
            split_tokens: false,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize_str("a<=b;", &options).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "a<=b;");
    }

    #[test]
    fn test_line_too_long() {
        let long_line = "x".repeat(crate::config::compile_time::lexical::MAX_LINE_LENGTH + 1);
        assert_matches!(
            tokenize(&format!("a\n{}", long_line)),
            Err(LexerError::LineTooLong { line: 2, .. })
        );
    }

    #[test]
    fn test_stripped_output_retokenizes_identically() {
        let source = "@Law Norton; //! the law\n\
                      @Input T, p; //!< inputs\n\
                      /* setup */\n\
                      @Function{\n  res = A*exp(-Q/(R*T))+p->x[2]<=1.e-3;\n  s = \"a \" \"b\";\n}";
        let first = strip_comments(tokenize(source).unwrap());
        let rendered = TokenStream::new(first.clone()).render();
        let second = strip_comments(tokenize(&rendered).unwrap());

        let first_values: Vec<&str> = first.iter().map(|t| t.value.as_str()).collect();
        let second_values: Vec<&str> = second.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(first_values, second_values);
    }

    #[test]
    fn test_error_codes_and_lines() {
        let error = tokenize("\"open").unwrap_err();
        assert_eq!(error.line(), Some(1));
        assert_eq!(error.error_code(), codes::lexical::UNTERMINATED_STRING);
        let error = LexerError::TooManyTokens { count: 2, max: 1 };
        assert_eq!(error.line(), None);
        assert_eq!(error.error_code(), codes::lexical::TOO_MANY_TOKENS);
    }
}
