//! File to model pipeline: read, tokenize, pick the dialect, analyse

mod dialect;
mod error;
pub mod output;
mod result;

pub use dialect::{detect_dialect, Dialect};
pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::{ParsedModel, PipelineResult, StageTimings};

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::lexical::{self, TokenizerOptions};
use crate::logging;
use crate::syntax::{BehaviourDsl, Dsl, MaterialPropertyDsl};
use crate::tokens::Token;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Analyse an MFront file with preferences read from the environment
pub fn process_file(path: &Path) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    path: &Path,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let display = path.display().to_string();
    logging::with_file_context(path.to_path_buf(), 0, || {
        crate::log_info!("Starting file analysis", "file" => display.as_str());
        let start = Instant::now();

        let file_result = FileProcessor::from_preferences(&config.file_processor).process_file(path)?;
        let file_processing = start.elapsed();

        let stage = Instant::now();
        let options = TokenizerOptions::from_preferences(&config.tokenizer);
        let tokens = lexical::tokenize_file_result(&file_result, &options)?;
        let tokenization = stage.elapsed();

        let result = analyse(path, tokens, config, start, |timings| {
            timings.file_processing = file_processing;
            timings.tokenization = tokenization;
        });
        finish(result, &display, Some(file_result.metadata))
    })
}

/// Analyse an in-memory source; `name` stands for the file name in diagnostics
pub fn process_source(
    name: &str,
    source: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(PathBuf::from(name), 0, || {
        let start = Instant::now();
        let options = TokenizerOptions::from_preferences(&config.tokenizer);
        let tokens = lexical::tokenize_str(source, &options);
        let tokenization = start.elapsed();
        let result = tokens.map_err(PipelineError::from).and_then(|tokens| {
            analyse(Path::new(name), tokens, config, start, |timings| {
                timings.tokenization = tokenization;
            })
        });
        finish(result, name, None)
    })
}

fn analyse(
    path: &Path,
    tokens: Vec<Token>,
    config: &RuntimeConfig,
    start: Instant,
    record: impl FnOnce(&mut StageTimings),
) -> Result<PipelineResult, PipelineError> {
    let token_count = tokens.len();
    let dialect = detect_dialect(&tokens)?;
    crate::log_debug!("Dialect selected", "dialect" => dialect.as_str());

    let stage = Instant::now();
    let model = match dialect {
        Dialect::MaterialProperty => {
            let mut dsl = MaterialPropertyDsl::new(config);
            dsl.analyse_tokens(path, tokens)?;
            ParsedModel::MaterialProperty(dsl.into_description())
        }
        Dialect::Behaviour => {
            let mut dsl = BehaviourDsl::new(config);
            dsl.analyse_tokens(path, tokens)?;
            ParsedModel::Behaviour(dsl.into_description())
        }
    };

    let mut timings = StageTimings {
        analysis: stage.elapsed(),
        ..StageTimings::default()
    };
    record(&mut timings);
    timings.total = start.elapsed();
    Ok(PipelineResult {
        model,
        file_metadata: None,
        token_count,
        timings,
    })
}

fn finish(
    result: Result<PipelineResult, PipelineError>,
    file: &str,
    metadata: Option<crate::file_processor::FileMetadata>,
) -> Result<PipelineResult, PipelineError> {
    match result {
        Ok(mut result) => {
            result.file_metadata = metadata;
            result.log_success(file);
            Ok(result)
        }
        Err(error) => {
            match error.line() {
                Some(line) => crate::log_error!(error.error_code(), &error.to_string(), line = line,
                    "file" => file),
                None => crate::log_error!(error.error_code(), &error.to_string(), "file" => file),
            }
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::DslPreferences;
    use crate::syntax::DslError;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn config() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.dsl = DslPreferences {
            register_line_directives: true,
            pedantic: false,
            debug_mode: false,
        };
        config.file_processor.require_mfront_extension = false;
        config
    }

    #[test]
    fn test_process_material_property_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("YoungModulus.mfront");
        fs::write(
            &path,
            "@DSL MaterialLaw;\n@Law YoungModulus;\n@Material Steel;\n@Output E;\n@Input T;\n\
             T.setGlossaryName(\"Temperature\");\n@Function{\nE = 2e11 - 1e8 * T;\n}\n",
        )
        .unwrap();

        let result = process_file_with_config(&path, &config()).unwrap();
        assert_eq!(result.dialect(), Dialect::MaterialProperty);
        assert!(result.file_metadata.is_some());
        let law = result.model.as_material_property().unwrap();
        assert_eq!(law.function_name(), "Steel_YoungModulus");
        assert!(law.function.body.starts_with("#line 8 \""));
        assert!(law.function.body.ends_with("E = 2e11 - 1e8 * T;"));
    }

    #[test]
    fn test_process_behaviour_source() {
        let result = process_source(
            "Norton.mfront",
            "@DSL Implicit;\n@Behaviour Norton;\n@StateVariable real p;\n@Integrator{\ndp = 1;\n}",
            &config(),
        )
        .unwrap();
        assert_eq!(result.dialect(), Dialect::Behaviour);
        assert_eq!(result.model.name(), "Norton");
        assert!(result.file_metadata.is_none());
        let output = PipelineOutput::new("Norton.mfront", &result).to_json().unwrap();
        assert!(output.contains("\"dialect\": \"Behaviour\""));
    }

    #[test]
    fn test_errors_are_stage_tagged() {
        let missing = process_file_with_config(Path::new("/no/such/Law.mfront"), &config());
        assert_matches!(missing, Err(PipelineError::FileProcessing(_)));

        let lexical = process_source("bad", "@Law \"L;", &config());
        assert_matches!(lexical, Err(PipelineError::LexicalAnalysis(_)));

        let unknown = process_source("bad", "@DSL Mystery;", &config());
        assert_matches!(unknown, Err(PipelineError::UnknownDsl { .. }));

        let analysis = process_source("bad", "@Law L;\n@Frobnicate;", &config()).unwrap_err();
        assert_matches!(analysis, PipelineError::Analysis(DslError::UnknownKeyword { line: 2, .. }));
    }
}
