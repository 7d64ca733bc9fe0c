//! Error codes and their classification
//!
//! Every diagnostic emitted by the front end carries one of these codes.
//! The registry below attaches category, severity and a recommended action
//! to each of them.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Tokenizer error codes
pub mod lexical {
    use super::Code;

    pub const UNTERMINATED_STRING: Code = Code::new("E020");
    pub const INVALID_CHARACTER_LITERAL: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E024");
    pub const LINE_TOO_LONG: Code = Code::new("E025");
}

/// Keyword dispatcher and reader error codes
pub mod dsl {
    use super::Code;

    pub const UNKNOWN_KEYWORD: Code = Code::new("E040");
    pub const MALFORMED_CONSTRUCT: Code = Code::new("E041");
    pub const UNEXPECTED_END_OF_FILE: Code = Code::new("E042");
    pub const INVALID_EXPRESSION: Code = Code::new("E043");
    pub const KEYWORD_FAILED: Code = Code::new("E044");
    pub const UNKNOWN_DSL: Code = Code::new("E045");
}

/// Variable registry error codes
pub mod symbols {
    use super::Code;

    pub const NAME_COLLISION: Code = Code::new("E050");
}

/// Model state error codes
pub mod state {
    use super::Code;

    pub const INVALID_STATE: Code = Code::new("E060");
    pub const FROZEN_CODE_BLOCK: Code = Code::new("E061");
}

/// Import error codes
pub mod import {
    use super::Code;

    pub const IMPORT_FAILED: Code = Code::new("E070");
    pub const IMPORT_CYCLE: Code = Code::new("E071");
    pub const IMPORT_TOO_DEEP: Code = Code::new("E072");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E080");
    pub const NO_FILES_FOUND: Code = Code::new("E081");
    pub const WORKER_FAILURE: Code = Code::new("E082");
}

/// Warning codes
pub mod warnings {
    use super::Code;

    pub const LONELY_SEPARATOR: Code = Code::new("W010");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const ANALYSIS_COMPLETE: Code = Code::new("I040");
    pub const IMPORT_COMPLETE: Code = Code::new("I070");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I080");
    pub const PIPELINE_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        use Severity::*;

        let entries = [
            // System
            ErrorMetadata::new(
                "ERR001",
                "System",
                Critical,
                false,
                true,
                "Internal error in the DSL front end",
                "File a bug report with the offending input",
            ),
            // File processing
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                Medium,
                false,
                true,
                "Source file not found",
                "Check the file path",
            ),
            ErrorMetadata::new(
                "E006",
                "FileProcessing",
                Low,
                true,
                false,
                "Source file does not carry the .mfront extension",
                "Rename the file or disable the extension requirement",
            ),
            ErrorMetadata::new(
                "E007",
                "FileProcessing",
                High,
                false,
                true,
                "Source file exceeds the configured size limits",
                "Split the description into imported files",
            ),
            ErrorMetadata::new(
                "E008",
                "FileProcessing",
                Low,
                true,
                false,
                "Source file is empty",
                "Provide a non-empty description",
            ),
            ErrorMetadata::new(
                "E009",
                "FileProcessing",
                Medium,
                false,
                true,
                "Permission denied while reading the source file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E010",
                "FileProcessing",
                Medium,
                false,
                true,
                "Source file is not valid UTF-8",
                "Re-encode the file as UTF-8",
            ),
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                Medium,
                false,
                true,
                "I/O error while reading the source file",
                "Retry or check the file system",
            ),
            ErrorMetadata::new(
                "E012",
                "FileProcessing",
                Medium,
                false,
                true,
                "Invalid source path",
                "Pass a path to a regular file",
            ),
            // Tokenizer
            ErrorMetadata::new(
                "E020",
                "Lexical",
                High,
                false,
                true,
                "Unterminated string literal",
                "Close the string with a double quote on the same line",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                High,
                false,
                true,
                "Invalid character literal",
                "Use a single character or escape sequence between quotes",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                High,
                false,
                true,
                "Malformed numeric literal",
                "Check digits, exponent and suffix of the number",
            ),
            ErrorMetadata::new(
                "E023",
                "Lexical",
                High,
                false,
                true,
                "C-style comment not closed before end of input",
                "Add the missing '*/'",
            ),
            ErrorMetadata::new(
                "E024",
                "Lexical",
                High,
                false,
                true,
                "Token count limit exceeded",
                "Split the description into imported files",
            ),
            ErrorMetadata::new(
                "E025",
                "Lexical",
                Medium,
                false,
                true,
                "Source line exceeds the configured length limit",
                "Break the line",
            ),
            // Dispatcher
            ErrorMetadata::new(
                "E040",
                "Dsl",
                High,
                false,
                true,
                "Unknown keyword",
                "Check the keyword spelling against the selected DSL",
            ),
            ErrorMetadata::new(
                "E041",
                "Dsl",
                High,
                false,
                true,
                "Malformed keyword arguments",
                "Check the syntax expected by the keyword",
            ),
            ErrorMetadata::new(
                "E042",
                "Dsl",
                High,
                false,
                true,
                "Unexpected end of file",
                "Terminate the last instruction or block",
            ),
            ErrorMetadata::new(
                "E043",
                "Dsl",
                High,
                false,
                true,
                "Invalid integer expression",
                "Use integer constants and + - * / operators only",
            ),
            ErrorMetadata::new(
                "E044",
                "Dsl",
                High,
                false,
                true,
                "Error while treating a keyword",
                "See the nested diagnostic",
            ),
            ErrorMetadata::new(
                "E045",
                "Dsl",
                High,
                false,
                true,
                "Unknown DSL requested by @DSL or @Parser",
                "Use MaterialLaw or one of the behaviour DSLs",
            ),
            // Symbols
            ErrorMetadata::new(
                "E050",
                "Symbols",
                High,
                false,
                true,
                "Name already used by a variable, glossary name, entry name or reserved word",
                "Choose another name",
            ),
            // State
            ErrorMetadata::new(
                "E060",
                "State",
                High,
                false,
                true,
                "Operation not allowed in the current model state",
                "Check keyword ordering and duplicates",
            ),
            ErrorMetadata::new(
                "E061",
                "State",
                Critical,
                false,
                true,
                "Code block modified after it was read",
                "Declare all contributions to a code block before it is used",
            ),
            // Import
            ErrorMetadata::new(
                "E070",
                "Import",
                High,
                false,
                true,
                "Imported file could not be processed",
                "See the nested diagnostic of the imported file",
            ),
            ErrorMetadata::new(
                "E071",
                "Import",
                High,
                false,
                true,
                "File imports itself directly or transitively",
                "Break the import cycle",
            ),
            ErrorMetadata::new(
                "E072",
                "Import",
                High,
                false,
                true,
                "Import nesting exceeds the configured depth",
                "Flatten the import hierarchy",
            ),
            // Batch
            ErrorMetadata::new(
                "E080",
                "Batch",
                Medium,
                false,
                true,
                "Directory not found",
                "Check the directory path",
            ),
            ErrorMetadata::new(
                "E081",
                "Batch",
                Low,
                true,
                false,
                "No .mfront files found",
                "Check the directory content or recursion settings",
            ),
            ErrorMetadata::new(
                "E082",
                "Batch",
                High,
                false,
                false,
                "A batch worker thread failed",
                "Re-run sequentially to isolate the failing file",
            ),
            // Warnings
            ErrorMetadata::new(
                "W010",
                "Dsl",
                Low,
                true,
                false,
                "Lonely separator ';'",
                "Remove the extra semicolon",
            ),
        ];

        entries.into_iter().map(|m| (m.code, m)).collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_PATH,
            lexical::UNTERMINATED_STRING,
            lexical::INVALID_NUMBER,
            dsl::UNKNOWN_KEYWORD,
            dsl::KEYWORD_FAILED,
            dsl::UNKNOWN_DSL,
            symbols::NAME_COLLISION,
            state::FROZEN_CODE_BLOCK,
            import::IMPORT_CYCLE,
            batch::NO_FILES_FOUND,
            warnings::LONELY_SEPARATOR,
        ];
        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification_defaults_for_unknown_code() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(!requires_halt("X999"));
    }

    #[test]
    fn test_frozen_code_block_is_critical() {
        assert_eq!(
            get_severity(state::FROZEN_CODE_BLOCK.as_str()),
            Severity::Critical
        );
        assert_eq!(get_category(lexical::INVALID_NUMBER.as_str()), "Lexical");
    }
}
