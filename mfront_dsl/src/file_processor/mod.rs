//! File processor module: reads MFront sources under compile-time limits

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
pub use processor::{
    FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError, MFRONT_EXTENSION,
};

/// Process a file with default settings
pub fn process_file<P: AsRef<std::path::Path>>(
    file_path: P,
) -> Result<FileProcessingResult, FileProcessorError> {
    processor::process_file(file_path)
}

/// Create a file processor from runtime preferences
pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    processor::create_processor_from_preferences(prefs)
}

/// Compile-time maximum file size
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

pub fn get_large_file_threshold() -> u64 {
    LARGE_FILE_THRESHOLD
}

/// Whether a path names an MFront source
pub fn is_mfront_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(MFRONT_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_module_api() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("law.mfront");
        fs::write(&file_path, "@Law L;\n").unwrap();

        assert!(process_file(&file_path).is_ok());
    }

    #[test]
    fn test_limits_are_consistent() {
        assert!(get_max_file_size() > 0);
        assert!(get_large_file_threshold() <= get_max_file_size());
    }

    #[test]
    fn test_is_mfront_path() {
        assert!(is_mfront_path(Path::new("a/Norton.mfront")));
        assert!(is_mfront_path(Path::new("Norton.MFRONT")));
        assert!(!is_mfront_path(Path::new("Norton.mtest")));
        assert!(!is_mfront_path(Path::new("Makefile")));
    }
}
