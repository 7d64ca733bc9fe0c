//! Batch processing of MFront files
//!
//! Discovers `.mfront` files under a directory and analyses them sequentially
//! or on `std::thread` workers. Every file gets its own parse session, so
//! workers share nothing but the configuration.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::RuntimeConfig;
use crate::file_processor::is_mfront_path;
use crate::logging::{self, codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            recursive: true,
            max_files: None,
            progress_reporting: true,
            fail_fast: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Worker count within `1..=MAX_WORKER_THREADS`
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }

    /// File limit, never above `MAX_FILES_PER_BATCH`
    pub fn effective_max_files(&self) -> usize {
        self.max_files.map_or(MAX_FILES_PER_BATCH, |max| max.min(MAX_FILES_PER_BATCH))
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn add(&mut self, file_path: PathBuf, result: Result<PipelineResult, PipelineError>) {
        match result {
            Ok(result) => self.successful_files.push((file_path, result)),
            Err(error) => self.failed_files.push((file_path, error)),
        }
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    /// Results in file order, whatever worker produced them
    fn sort(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} failed, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No MFront files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread failed: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::NoFilesFound { .. } => codes::batch::NO_FILES_FOUND,
            BatchError::IoError { .. } => codes::file_processing::IO_ERROR,
            BatchError::ThreadError { .. } => codes::batch::WORKER_FAILURE,
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Sorted `.mfront` files under `dir_path`
pub fn discover_mfront_files(dir_path: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        let error = BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        };
        crate::log_error!(error.error_code(), &error.to_string());
        return Err(error);
    }

    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config.recursive)?;
    if files.is_empty() {
        let error = BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        };
        crate::log_error!(error.error_code(), &error.to_string());
        return Err(error);
    }

    files.sort();
    let limit = config.effective_max_files();
    if files.len() > limit {
        crate::log_info!("File limit reached, remaining files skipped",
            "files_found" => files.len(),
            "limit" => limit
        );
        files.truncate(limit);
    }

    crate::log_success!(
        codes::success::FILE_DISCOVERY_COMPLETE,
        "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );
    Ok(files)
}

fn visit_directory(dir_path: &Path, files: &mut Vec<PathBuf>, recursive: bool) -> Result<(), BatchError> {
    let entries = fs::read_dir(dir_path).map_err(|e| BatchError::IoError {
        error: format!("{}: {e}", dir_path.display()),
    })?;
    for entry in entries {
        let path = entry
            .map_err(|e| BatchError::IoError {
                error: e.to_string(),
            })?
            .path();
        if path.is_dir() {
            if recursive {
                visit_directory(&path, files, recursive)?;
            }
        } else if path.is_file() && is_mfront_path(&path) {
            files.push(path);
        }
    }
    Ok(())
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn process_one(file_path: &Path, file_id: usize, runtime: &RuntimeConfig) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        pipeline::process_file_with_config(file_path, runtime)
    })
}

pub fn process_files_sequential(files: &[PathBuf], config: &BatchConfig) -> BatchResults {
    let mut results = BatchResults::new();
    for (file_id, file_path) in files.iter().enumerate() {
        if config.progress_reporting {
            println!(
                "Processing file {} of {}: {}",
                file_id + 1,
                files.len(),
                file_path.display()
            );
        }
        let result = process_one(file_path, file_id, &config.runtime);
        let failed = result.is_err();
        results.add(file_path.clone(), result);
        if failed && config.fail_fast {
            crate::log_info!("Fail-fast mode enabled, stopping batch processing");
            break;
        }
    }
    results
}

/// Files are dealt round robin to the workers
pub fn process_files_parallel(files: &[PathBuf], config: &BatchConfig) -> Result<BatchResults, BatchError> {
    let threads = config.effective_threads().min(files.len().max(1));
    let mut handles = Vec::with_capacity(threads);
    for worker in 0..threads {
        let assigned: Vec<(usize, PathBuf)> = files
            .iter()
            .enumerate()
            .skip(worker)
            .step_by(threads)
            .map(|(id, path)| (id, path.clone()))
            .collect();
        let runtime = config.runtime.clone();
        let fail_fast = config.fail_fast;
        handles.push(thread::spawn(move || {
            let mut results = BatchResults::new();
            for (file_id, file_path) in assigned {
                let result = process_one(&file_path, file_id, &runtime);
                let failed = result.is_err();
                results.add(file_path, result);
                if failed && fail_fast {
                    break;
                }
            }
            results
        }));
    }

    let mut results = BatchResults::new();
    for handle in handles {
        let worker_results = handle.join().map_err(|_| {
            let error = BatchError::ThreadError {
                message: "worker panicked during processing".to_string(),
            };
            crate::log_error!(error.error_code(), &error.to_string());
            error
        })?;
        results.merge(worker_results);
    }
    results.sort();
    Ok(results)
}

/// Discover and analyse every `.mfront` file of a directory
pub fn process_directory_with_config(dir_path: &Path, config: &BatchConfig) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let files = discover_mfront_files(dir_path, config)?;

    let threads = config.effective_threads();
    crate::log_info!("Starting batch processing",
        "directory" => dir_path.display(),
        "files" => files.len(),
        "threads" => threads
    );

    let mut results = if threads == 1 {
        process_files_sequential(&files, config)
    } else {
        process_files_parallel(&files, config)?
    };
    results.files_discovered = files.len();
    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::PIPELINE_COMPLETE,
        "Batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );
    Ok(results)
}

pub fn process_directory(dir_path: &Path) -> Result<BatchResults, BatchError> {
    process_directory_with_config(dir_path, &BatchConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn quiet_config(max_threads: usize) -> BatchConfig {
        BatchConfig {
            max_threads,
            progress_reporting: false,
            ..BatchConfig::default()
        }
    }

    fn write_tree(root: &Path) {
        fs::write(root.join("a.mfront"), "@Law A;\n@Output y;\n@Function{\ny = 1;\n}\n").unwrap();
        fs::write(root.join("b.mfront"), "@Behaviour B;\n@StateVariable real p;\n").unwrap();
        fs::write(root.join("broken.mfront"), "@Law C;\n@Unknown;\n").unwrap();
        fs::write(root.join("notes.txt"), "@Law D;").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("c.mfront"), "@Law E;\n").unwrap();
    }

    #[test]
    fn test_file_discovery() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let files = discover_mfront_files(dir.path(), &quiet_config(1)).unwrap();
        assert_eq!(files.len(), 4);
        assert!(files.windows(2).all(|pair| pair[0] <= pair[1]));

        let flat = BatchConfig {
            recursive: false,
            ..quiet_config(1)
        };
        assert_eq!(discover_mfront_files(dir.path(), &flat).unwrap().len(), 3);

        let limited = BatchConfig {
            max_files: Some(2),
            ..quiet_config(1)
        };
        assert_eq!(discover_mfront_files(dir.path(), &limited).unwrap().len(), 2);
    }

    #[test]
    fn test_discovery_errors() {
        let dir = tempdir().unwrap();
        assert_matches!(
            discover_mfront_files(&dir.path().join("missing"), &quiet_config(1)),
            Err(BatchError::DirectoryNotFound { .. })
        );
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        assert_matches!(
            discover_mfront_files(dir.path(), &quiet_config(1)),
            Err(BatchError::NoFilesFound { .. })
        );
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let sequential = process_directory_with_config(dir.path(), &quiet_config(1)).unwrap();
        let parallel = process_directory_with_config(dir.path(), &quiet_config(3)).unwrap();
        for results in [&sequential, &parallel] {
            assert_eq!(results.files_discovered, 4);
            assert_eq!(results.files_processed, 4);
            assert_eq!(results.success_count(), 3);
            assert_eq!(results.failed_files[0].0.file_name().unwrap(), "broken.mfront");
        }
        let names = |results: &BatchResults| -> Vec<PathBuf> {
            results.successful_files.iter().map(|(path, _)| path.clone()).collect()
        };
        assert_eq!(names(&sequential), names(&parallel));
    }

    #[test]
    fn test_fail_fast_stops_sequential_processing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mfront"), "@Unknown;\n").unwrap();
        fs::write(dir.path().join("b.mfront"), "@Law B;\n").unwrap();
        let config = BatchConfig {
            fail_fast: true,
            ..quiet_config(1)
        };

        let results = process_directory_with_config(dir.path(), &config).unwrap();
        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_effective_limits() {
        assert_eq!(quiet_config(0).effective_threads(), 1);
        assert_eq!(quiet_config(usize::MAX).effective_threads(), MAX_WORKER_THREADS);
        assert_eq!(quiet_config(1).effective_max_files(), MAX_FILES_PER_BATCH);
    }

    #[test]
    fn test_batch_results_counting() {
        let mut results = BatchResults::new();
        assert_eq!(results.success_rate(), 0.0);
        results.add(
            PathBuf::from("missing.mfront"),
            Err(PipelineError::UnknownDsl {
                name: "X".to_string(),
                line: 1,
            }),
        );
        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
        assert!(results.summary().contains("1 failed"));
    }
}
