use mfront_dsl::batch::{self, BatchConfig, BatchResults};
use mfront_dsl::config::runtime::RuntimeConfig;
use mfront_dsl::logging;
use mfront_dsl::pipeline::{self, ParsedModel, PipelineError, PipelineOutput, PipelineResult};
use mfront_dsl::symbols::VariableRole;
use std::env;
use std::path::Path;

/// Command line switches besides the input path
#[derive(Debug, Default)]
struct Options {
    batch: BatchConfig,
    json: bool,
    diagnostics: bool,
    config_file: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.mfront|directory> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }
    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let input_path = Path::new(&args[1]);
    let mut options = parse_options(&args[2..]);
    if let Some(config_file) = &options.config_file {
        options.batch.runtime = RuntimeConfig::from_toml_file(Path::new(config_file))?;
    }
    logging::config::init_runtime_preferences(options.batch.runtime.logging.clone())?;
    logging::init_global_logging()?;

    if input_path.is_file() {
        process_single_file(input_path, &options)
    } else if input_path.is_dir() {
        process_directory_batch(input_path, &options)
    } else {
        eprintln!("Error: Input must be an MFront file or a directory");
        eprintln!("  Path: {}", input_path.display());
        std::process::exit(1);
    }
}

fn print_help(program_name: &str) {
    println!("MFront DSL front end v{}", env!("CARGO_PKG_VERSION"));
    println!("Tokenizes and analyses MFront material property and behaviour files");
    println!();
    println!("USAGE:");
    println!("    {} <file.mfront> [--json]          # Analyse one file", program_name);
    println!("    {} <directory> [options]          # Analyse every .mfront file", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --sequential        Analyse files one after the other");
    println!("    --threads N         Maximum number of worker threads");
    println!("    --no-recursive      Don't search subdirectories");
    println!("    --max-files N       Limit the number of files analysed");
    println!("    --fail-fast         Stop on the first failing file");
    println!("    --quiet             Suppress progress reporting");
    println!("    --json              Print the analysed model as JSON (single file)");
    println!("    --diagnostics       Print logging diagnostics when done");
    println!("    --config FILE       Read runtime preferences from a TOML file");
    println!();
    println!("ENVIRONMENT:");
    println!("    MFRONT_DSL_DEBUG_MODE=true        No #line directives in copied code");
    println!("    MFRONT_DSL_PEDANTIC=true          Warn about questionable constructs");
    println!("    MFRONT_LOGGING_MIN_LEVEL=info     error, warn, info or debug");
    println!();
    println!("LIMITS: {}", mfront_dsl::config::build_info::source_info());
}

fn parse_options(args: &[String]) -> Options {
    let mut options = Options::default();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sequential" => options.batch.max_threads = 1,
            "--threads" => match args.next().map(|n| n.parse::<usize>()) {
                Some(Ok(threads)) => options.batch.max_threads = threads.max(1),
                Some(Err(_)) => eprintln!("Warning: Invalid thread count, using default"),
                None => eprintln!("Warning: --threads requires a number"),
            },
            "--no-recursive" => options.batch.recursive = false,
            "--max-files" => match args.next().map(|n| n.parse::<usize>()) {
                Some(Ok(max_files)) => options.batch.max_files = Some(max_files),
                Some(Err(_)) => eprintln!("Warning: Invalid max files, ignoring"),
                None => eprintln!("Warning: --max-files requires a number"),
            },
            "--fail-fast" => options.batch.fail_fast = true,
            "--quiet" => options.batch.progress_reporting = false,
            "--json" => options.json = true,
            "--diagnostics" => options.diagnostics = true,
            "--config" => match args.next() {
                Some(path) => options.config_file = Some(path.clone()),
                None => eprintln!("Warning: --config requires a path"),
            },
            other => eprintln!("Warning: Unknown option '{}'", other),
        }
    }
    options
}

fn process_single_file(path: &Path, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    match pipeline::process_file_with_config(path, &options.batch.runtime) {
        Ok(result) => {
            if options.json {
                println!("{}", PipelineOutput::new(&path.display().to_string(), &result).to_json()?);
            } else {
                print_model_summary(path, &result);
            }
            finish_reporting(options);
            Ok(())
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", path.display());
            print_detailed_error(&error);
            finish_reporting(options);
            std::process::exit(1);
        }
    }
}

fn process_directory_batch(dir_path: &Path, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = &options.batch;
    println!("Starting batch processing: {}", dir_path.display());
    println!(
        "Configuration: {} threads, recursive={}, fail_fast={}",
        config.effective_threads(),
        config.recursive,
        config.fail_fast
    );

    match batch::process_directory_with_config(dir_path, config) {
        Ok(results) => {
            print_batch_results(&results);
            finish_reporting(options);
            if results.failure_count() > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(error) => {
            eprintln!("Batch processing failed: {}", error);
            finish_reporting(options);
            std::process::exit(1);
        }
    }
}

fn print_model_summary(path: &Path, result: &PipelineResult) {
    println!("{}: {} ({})", path.display(), result.model.name(), result.dialect().as_str());
    match &result.model {
        ParsedModel::MaterialProperty(law) => {
            println!("  function: {}", law.function_name());
            if !law.library.is_empty() {
                println!("  library: {}", law.library);
            }
            println!("  output: {}", law.output);
            println!("  inputs: {}", law.inputs.names().join(", "));
            if !law.parameters.is_empty() {
                println!("  parameters: {}", law.parameters.join(", "));
            }
            println!("  bounds: {}, physical bounds: {}", law.bounds.len(), law.physical_bounds.len());
        }
        ParsedModel::Behaviour(behaviour) => {
            for role in VariableRole::ALL {
                let names = behaviour.data.variables(role).names();
                if !names.is_empty() {
                    println!("  {}: {}", role.as_str(), names.join(", "));
                }
            }
            println!("  code blocks: {}", behaviour.data.code_block_names().join(", "));
        }
    }
    println!(
        "  {} tokens, {:.2} ms",
        result.token_count,
        result.timings.total.as_secs_f64() * 1000.0
    );
}

fn print_batch_results(results: &BatchResults) {
    println!("\nBatch Processing Summary:");
    println!("  Files discovered: {}", results.files_discovered);
    println!("  Files processed: {}", results.files_processed);
    println!(
        "  Successful: {} ({:.1}%)",
        results.success_count(),
        results.success_rate() * 100.0
    );
    println!("  Failed: {}", results.failure_count());
    println!("  Total time: {:.2}s", results.processing_duration.as_secs_f64());
    let diagnostics = logging::get_processing_summary();
    if diagnostics.has_errors() || diagnostics.has_warnings() {
        println!(
            "  Diagnostics: {} errors, {} warnings in {} files",
            diagnostics.total_errors, diagnostics.total_warnings, diagnostics.total_files
        );
    }

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            println!("  {}: [{}] {}", file_path.display(), error.error_code().as_str(), error);
        }
    }

    if results.success_count() > 0 && results.success_count() <= 10 {
        println!("\nSuccessful Files:");
        for (file_path, result) in &results.successful_files {
            println!(
                "  {}: {} {} ({} tokens)",
                file_path.display(),
                result.dialect().as_str(),
                result.model.name(),
                result.token_count
            );
        }
    }
}

fn finish_reporting(options: &Options) {
    logging::print_cargo_style_summary();
    if options.diagnostics {
        eprintln!("\n{}", logging::get_system_diagnostics());
    }
}

fn print_detailed_error(error: &PipelineError) {
    let stage = match error {
        PipelineError::FileProcessing(_) => "File processing",
        PipelineError::LexicalAnalysis(_) => "Lexical analysis",
        PipelineError::UnknownDsl { .. } => "Dialect selection",
        PipelineError::Analysis(_) => "Analysis",
    };
    eprintln!("{} stage failed:", stage);
    eprintln!("  [{}] {}", error.error_code().as_str(), error);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(&args(&[
            "--threads",
            "4",
            "--fail-fast",
            "--no-recursive",
            "--json",
            "--max-files",
            "7",
            "--diagnostics",
        ]));
        assert_eq!(options.batch.max_threads, 4);
        assert!(options.batch.fail_fast);
        assert!(!options.batch.recursive);
        assert!(options.json);
        assert_eq!(options.batch.max_files, Some(7));
        assert!(options.diagnostics);
    }

    #[test]
    fn test_parse_options_invalid() {
        let options = parse_options(&args(&["--threads", "invalid", "--unknown-option", "--sequential"]));
        assert_eq!(options.batch.max_threads, 1);
        assert!(options.config_file.is_none());
    }
}
