//! Errors raised while analysing MFront sources
//!
//! Every failure is fatal to the current parse. The dispatcher only adds
//! context (keyword, import site) before handing the error back.

use crate::code_block::CodeBlockError;
use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};

pub type DslResult<T> = Result<T, DslError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DslError {
    #[error(transparent)]
    Lexical(#[from] LexerError),

    #[error("unknown keyword (read '{token}') at line {line}")]
    UnknownKeyword { token: String, line: usize },

    #[error("{handler}: {message} (line {line})")]
    MalformedConstruct {
        handler: String,
        message: String,
        line: usize,
    },

    #[error("{handler}: unexpected end of file ({message})")]
    UnexpectedEndOfFile { handler: String, message: String },

    #[error("invalid expression '{expression}' at line {line}: {message}")]
    InvalidExpression {
        expression: String,
        message: String,
        line: usize,
    },

    #[error("name '{name}' can't be used: {message} (line {line})")]
    NameCollision {
        name: String,
        message: String,
        line: usize,
    },

    #[error("{message}")]
    State {
        message: String,
        line: Option<usize>,
    },

    #[error("error while treating keyword '{keyword}' at line {line}: {source}")]
    Keyword {
        keyword: String,
        line: usize,
        source: Box<DslError>,
    },

    #[error("error while importing file '{file}' at line {line}: {source}")]
    Import {
        file: String,
        line: usize,
        source: Box<DslError>,
    },

    #[error("file '{file}' is already being imported (line {line})")]
    ImportCycle { file: String, line: usize },

    #[error("too many nested imports while importing '{file}' (line {line}, max {max})")]
    ImportTooDeep {
        file: String,
        line: usize,
        max: usize,
    },

    #[error(transparent)]
    FileProcessing(#[from] FileProcessorError),
}

impl From<CodeBlockError> for DslError {
    fn from(error: CodeBlockError) -> Self {
        Self::State {
            message: error.to_string(),
            line: None,
        }
    }
}

impl DslError {
    pub fn malformed(handler: &str, message: impl Into<String>, line: usize) -> Self {
        Self::MalformedConstruct {
            handler: handler.to_string(),
            message: message.into(),
            line,
        }
    }

    pub fn unexpected_end_of_file(handler: &str, message: impl Into<String>) -> Self {
        Self::UnexpectedEndOfFile {
            handler: handler.to_string(),
            message: message.into(),
        }
    }

    pub fn collision(name: &str, message: impl Into<String>, line: usize) -> Self {
        Self::NameCollision {
            name: name.to_string(),
            message: message.into(),
            line,
        }
    }

    pub fn state(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::State {
            message: message.into(),
            line,
        }
    }

    /// Dispatcher context around a handler failure
    pub fn in_keyword(keyword: &str, line: usize, source: DslError) -> Self {
        Self::Keyword {
            keyword: keyword.to_string(),
            line,
            source: Box::new(source),
        }
    }

    pub fn in_import(file: &str, line: usize, source: DslError) -> Self {
        Self::Import {
            file: file.to_string(),
            line,
            source: Box::new(source),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(e) => e.error_code(),
            Self::UnknownKeyword { .. } => codes::dsl::UNKNOWN_KEYWORD,
            Self::MalformedConstruct { .. } => codes::dsl::MALFORMED_CONSTRUCT,
            Self::UnexpectedEndOfFile { .. } => codes::dsl::UNEXPECTED_END_OF_FILE,
            Self::InvalidExpression { .. } => codes::dsl::INVALID_EXPRESSION,
            Self::NameCollision { .. } => codes::symbols::NAME_COLLISION,
            Self::State { .. } => codes::state::INVALID_STATE,
            Self::Keyword { .. } => codes::dsl::KEYWORD_FAILED,
            Self::Import { .. } => codes::import::IMPORT_FAILED,
            Self::ImportCycle { .. } => codes::import::IMPORT_CYCLE,
            Self::ImportTooDeep { .. } => codes::import::IMPORT_TOO_DEEP,
            Self::FileProcessing(e) => e.error_code(),
        }
    }

    /// Line where the error was detected, outermost context first
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lexical(e) => e.line(),
            Self::UnknownKeyword { line, .. }
            | Self::MalformedConstruct { line, .. }
            | Self::InvalidExpression { line, .. }
            | Self::NameCollision { line, .. }
            | Self::Keyword { line, .. }
            | Self::Import { line, .. }
            | Self::ImportCycle { line, .. }
            | Self::ImportTooDeep { line, .. } => Some(*line),
            Self::State { line, .. } => *line,
            Self::UnexpectedEndOfFile { .. } | Self::FileProcessing(_) => None,
        }
    }

    /// The failure itself, without dispatcher or import context
    pub fn root_cause(&self) -> &DslError {
        match self {
            Self::Keyword { source, .. } | Self::Import { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_context_wrapping_keeps_root_cause() {
        let inner = DslError::malformed("@Law", "expected ';'", 3);
        let wrapped = DslError::in_import("a.mfront", 1, DslError::in_keyword("@Law", 3, inner));

        assert_eq!(wrapped.line(), Some(1));
        assert_eq!(wrapped.error_code(), codes::import::IMPORT_FAILED);
        assert_matches!(wrapped.root_cause(), DslError::MalformedConstruct { line: 3, .. });
        assert!(wrapped.to_string().contains("a.mfront"));
        assert!(wrapped.to_string().contains("expected ';'"));
    }

    #[test]
    fn test_frozen_code_block_is_a_state_error() {
        let error: DslError = CodeBlockError::Frozen.into();
        assert_matches!(error, DslError::State { line: None, .. });
        assert_eq!(error.error_code(), codes::state::INVALID_STATE);
    }
}
