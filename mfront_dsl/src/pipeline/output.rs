use super::{ParsedModel, PipelineResult};
use serde::Serialize;

/// Serializable view of a pipeline result
#[derive(Debug, Serialize)]
pub struct PipelineOutput<'a> {
    pub file: String,
    pub token_count: usize,
    pub duration_ms: f64,
    #[serde(flatten)]
    pub model: &'a ParsedModel,
}

impl<'a> PipelineOutput<'a> {
    pub fn new(file: &str, result: &'a PipelineResult) -> Self {
        Self {
            file: file.to_string(),
            token_count: result.token_count,
            duration_ms: result.timings.total.as_secs_f64() * 1000.0,
            model: &result.model,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
