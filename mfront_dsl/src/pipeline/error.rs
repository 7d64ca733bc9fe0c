use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::DslError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Unknown DSL '{name}' at line {line}")]
    UnknownDsl { name: String, line: usize },

    #[error("Analysis failed: {0}")]
    Analysis(#[from] DslError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::LexicalAnalysis(e) => e.error_code(),
            Self::UnknownDsl { .. } => codes::dsl::UNKNOWN_DSL,
            Self::Analysis(e) => e.error_code(),
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::FileProcessing(_) => None,
            Self::LexicalAnalysis(e) => e.line(),
            Self::UnknownDsl { line, .. } => Some(*line),
            Self::Analysis(e) => e.line(),
        }
    }
}
